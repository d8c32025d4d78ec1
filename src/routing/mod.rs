//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Context (method, url)
//!     → router.rs (walk the stack, rewrite url at mount points)
//!     → layer.rs (match path, invoke handler, catch panics)
//!     → route.rs (dispatch by method)
//!     → Flow returned to the parent router or the application
//! ```
//!
//! # Design Decisions
//! - Stacks are built at startup and immutable while serving
//! - First structural match wins; order of registration is precedence
//! - Control signals travel as `Flow` values, never through the error type
//! - No regex, no path parameters: prefix and exact matching only

pub mod flow;
pub mod handler;
pub mod layer;
pub mod matcher;
pub mod route;
pub mod router;

pub use flow::Flow;
pub use handler::{ErrorHandler, Handler};
pub use layer::Layer;
pub use matcher::Pattern;
pub use route::{MethodFilter, Route};
pub use router::Router;
