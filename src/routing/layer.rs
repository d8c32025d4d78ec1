//! A single matchable, invocable stack entry.
//!
//! # Responsibilities
//! - Answer whether a path matches (prefix for middleware, exact for routes)
//! - Invoke the stored handler, converting panics into pending errors
//! - Forward errors untouched past layers that cannot handle them
//!
//! # Design Decisions
//! - A layer holds exactly one of: request handler, error handler, route.
//!   A mounted router is a request handler
//! - Layers never rewrite the request; the router owns path bookkeeping

use std::any::type_name;
use std::fmt;
use std::future::{self, Future};
use std::panic::AssertUnwindSafe;

use futures_util::future::{BoxFuture, FutureExt};

use crate::error::Error;
use crate::http::Context;
use crate::routing::{ErrorHandler, Flow, Handler, Pattern, Route};

enum Handle {
    Request(Box<dyn Handler>),
    Error(Box<dyn ErrorHandler>),
    Route(Route),
}

/// Pattern plus handler.
pub struct Layer {
    pattern: Pattern,
    name: &'static str,
    handle: Handle,
}

impl Layer {
    pub(crate) fn request<H: Handler>(path: &str, handler: H) -> Self {
        Self::named_request(path, type_name::<H>(), handler)
    }

    pub(crate) fn named_request<H: Handler>(path: &str, name: &'static str, handler: H) -> Self {
        Self {
            pattern: Pattern::parse(path),
            name,
            handle: Handle::Request(Box::new(handler)),
        }
    }

    pub(crate) fn error<H: ErrorHandler>(path: &str, handler: H) -> Self {
        Self {
            pattern: Pattern::parse(path),
            name: type_name::<H>(),
            handle: Handle::Error(Box::new(handler)),
        }
    }

    pub(crate) fn for_route(route: Route) -> Self {
        Self {
            pattern: Pattern::parse(route.path()),
            name: "route",
            handle: Handle::Route(route),
        }
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Type name of the handler, for logs.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_error_handler(&self) -> bool {
        matches!(self.handle, Handle::Error(_))
    }

    /// The route this layer dispatches to, if it was created by `Router::route`.
    pub fn route(&self) -> Option<&Route> {
        match &self.handle {
            Handle::Route(route) => Some(route),
            _ => None,
        }
    }

    pub(crate) fn route_mut(&mut self) -> Option<&mut Route> {
        match &mut self.handle {
            Handle::Route(route) => Some(route),
            _ => None,
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        match self.handle {
            Handle::Route(_) => self.pattern.matches_exact(path),
            _ => self.pattern.matches_prefix(path),
        }
    }

    /// Prefix stripped from the url while this layer runs.
    pub(crate) fn consumed_prefix(&self) -> &str {
        self.pattern.prefix()
    }

    /// Whether invoking this layer would run any handler code.
    pub(crate) fn accepts(&self, error_pending: bool) -> bool {
        match self.handle {
            Handle::Request(_) | Handle::Route(_) => !error_pending,
            Handle::Error(_) => error_pending,
        }
    }

    /// Run the layer with no pending error.
    ///
    /// Error handlers are not run; they answer `Continue`.
    pub fn handle_request<'a>(&'a self, ctx: &'a mut Context) -> BoxFuture<'a, Flow> {
        match &self.handle {
            Handle::Request(handler) => Box::pin(catch_panic(async move { handler.call(ctx).await })),
            Handle::Error(_) => Box::pin(future::ready(Flow::Continue)),
            Handle::Route(route) => Box::pin(route.dispatch(ctx)),
        }
    }

    /// Run the layer with `err` pending.
    ///
    /// Request handlers and routes are not run; the error is handed back
    /// untouched.
    pub fn handle_error<'a>(&'a self, err: Error, ctx: &'a mut Context) -> BoxFuture<'a, Flow> {
        match &self.handle {
            Handle::Request(_) | Handle::Route(_) => Box::pin(future::ready(Flow::Fail(err))),
            Handle::Error(handler) => {
                Box::pin(catch_panic(async move { handler.call(err, ctx).await }))
            }
        }
    }

    pub(crate) fn invoke<'a>(&'a self, pending: Option<Error>, ctx: &'a mut Context) -> BoxFuture<'a, Flow> {
        match pending {
            Some(err) => self.handle_error(err, ctx),
            None => self.handle_request(ctx),
        }
    }
}

impl fmt::Debug for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.handle {
            Handle::Request(_) => "request",
            Handle::Error(_) => "error",
            Handle::Route(_) => "route",
        };
        f.debug_struct("Layer")
            .field("pattern", &self.pattern.to_string())
            .field("name", &self.name)
            .field("kind", &kind)
            .field("route", &self.route())
            .finish()
    }
}

async fn catch_panic<F>(fut: F) -> Flow
where
    F: Future<Output = Flow>,
{
    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(flow) => flow,
        Err(payload) => {
            let err = Error::from_panic(payload);
            tracing::error!(error = %err, "Handler panicked");
            Flow::Fail(err)
        }
    }
}
