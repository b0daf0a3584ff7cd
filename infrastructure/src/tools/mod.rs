//! Tool advertisement
//!
//! Converts the domain tool definitions into the descriptors returned by
//! `tools/list`.

pub mod schema;

pub use schema::JsonSchemaToolConverter;
