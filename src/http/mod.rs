//! HTTP host layer and per-request types.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum, tower-http layers, request id)
//!     → request.rs (method, url, headers, buffered body)
//!     → context.rs (request + response + settings)
//!     → Application / Router dispatch
//!     → response.rs (status, headers, body) → axum response
//! ```

pub mod context;
pub mod request;
pub mod request_id;
pub mod response;
pub mod server;

pub use context::Context;
pub use request::Request;
pub use request_id::{UuidRequestId, X_REQUEST_ID};
pub use response::Response;
pub use server::{HttpServer, ServerError};
