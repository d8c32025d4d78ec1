//! Cascade Router Library
//!
//! Express-style middleware dispatch: ordered layers, path-prefix mounting,
//! method routes, error-handling middleware and a final responder, hosted on
//! Axum.

pub mod application;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use application::Application;
pub use config::schema::ServerConfig;
pub use error::Error;
pub use futures_util::future::BoxFuture;
pub use http::{Context, HttpServer, Request, Response};
pub use lifecycle::Shutdown;
pub use routing::{Flow, Route, Router};
