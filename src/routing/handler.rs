//! Handler contracts.
//!
//! # Design Decisions
//! - Request handlers and error handlers are separate traits, chosen by the
//!   registration call rather than by inspecting the callable
//! - Handlers return a boxed future so routers can nest without recursive
//!   future types
//! - Closures of the shape `|ctx| Box::pin(async move { .. })` implement the
//!   traits directly

use futures_util::future::BoxFuture;

use crate::error::Error;
use crate::http::Context;
use crate::routing::Flow;

/// A request handler: middleware, route handler or mounted router.
pub trait Handler: Send + Sync + 'static {
    fn call<'a>(&'a self, ctx: &'a mut Context) -> BoxFuture<'a, Flow>;
}

impl<F> Handler for F
where
    F: for<'a> Fn(&'a mut Context) -> BoxFuture<'a, Flow> + Send + Sync + 'static,
{
    fn call<'a>(&'a self, ctx: &'a mut Context) -> BoxFuture<'a, Flow> {
        (self)(ctx)
    }
}

/// An error handler. Only runs while an error is pending.
pub trait ErrorHandler: Send + Sync + 'static {
    fn call<'a>(&'a self, err: Error, ctx: &'a mut Context) -> BoxFuture<'a, Flow>;
}

impl<F> ErrorHandler for F
where
    F: for<'a> Fn(Error, &'a mut Context) -> BoxFuture<'a, Flow> + Send + Sync + 'static,
{
    fn call<'a>(&'a self, err: Error, ctx: &'a mut Context) -> BoxFuture<'a, Flow> {
        (self)(err, ctx)
    }
}
