//! Model Context Protocol server.
//!
//! [`McpServer`] dispatches JSON-RPC messages to the alert tools; the stdio
//! and HTTP modules carry those messages to and from the client.

pub mod error;
pub mod http;
pub mod protocol;
pub mod server;
pub mod session;
pub mod stdio;

pub use error::{McpError, TransportError};
pub use http::{HttpState, serve_http};
pub use server::McpServer;
pub use session::{SessionRegistry, SessionTransport};
pub use stdio::serve_stdio;
