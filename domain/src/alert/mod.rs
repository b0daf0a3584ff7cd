//! Alert domain module
//!
//! Records and request shapes for the Opsgenie Alert API (`/v2/alerts`).
//!
//! - [`entities`]: alerts, notes, logs, paging envelopes and request payloads
//! - [`value_objects`]: the closed value sets the API accepts (priority,
//!   identifier type, sort order, page direction, recipient type)
//!
//! Field names serialize in the API's camelCase form so the same types are
//! used for both the wire format and the tool argument shapes.

pub mod entities;
pub mod value_objects;
