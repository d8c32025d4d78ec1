//! Method dispatch for a single path.
//!
//! # Responsibilities
//! - Keep method-tagged handlers for one path in registration order
//! - Report which methods the route answers
//! - Cascade through the handlers for the request's method
//!
//! # Design Decisions
//! - Registering a method twice appends, it never replaces
//! - `SkipRoute` is consumed here; `SkipRouter` is handed to the router
//! - An error raised by one of the route's handlers only reaches the
//!   route's method-scoped error handlers; outside errors never enter

use std::collections::HashSet;

use axum::http::Method;
use futures_util::future::BoxFuture;

use crate::error::Error;
use crate::http::Context;
use crate::routing::{Flow, Layer};

/// Which request methods a route entry answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodFilter {
    Any,
    Only(Method),
}

impl MethodFilter {
    pub fn matches(&self, method: &Method) -> bool {
        match self {
            MethodFilter::Any => true,
            MethodFilter::Only(m) => m == method,
        }
    }
}

#[derive(Debug)]
struct MethodLayer {
    filter: MethodFilter,
    layer: Layer,
}

macro_rules! verb_methods {
    ($($name:ident => $method:expr),* $(,)?) => {
        $(
            #[doc = concat!("Append a `", stringify!($name), "` handler.")]
            pub fn $name<F>(&mut self, handler: F) -> &mut Self
            where
                F: for<'a> Fn(&'a mut Context) -> BoxFuture<'a, Flow> + Send + Sync + 'static,
            {
                self.method($method, handler)
            }
        )*
    };
}

/// Handlers for one path, keyed by method.
#[derive(Debug)]
pub struct Route {
    path: String,
    stack: Vec<MethodLayer>,
    methods: HashSet<Method>,
    any_method: bool,
}

impl Route {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            stack: Vec::new(),
            methods: HashSet::new(),
            any_method: false,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn handles_method(&self, method: &Method) -> bool {
        self.any_method || self.methods.contains(method)
    }

    /// Methods registered explicitly (excluding `all`).
    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.methods.iter()
    }

    /// Append a handler for `method`.
    pub fn method<F>(&mut self, method: Method, handler: F) -> &mut Self
    where
        F: for<'a> Fn(&'a mut Context) -> BoxFuture<'a, Flow> + Send + Sync + 'static,
    {
        self.register(MethodFilter::Only(method), Layer::request("/", handler))
    }

    /// Append an error handler scoped to `method`.
    pub fn method_error<F>(&mut self, method: Method, handler: F) -> &mut Self
    where
        F: for<'a> Fn(Error, &'a mut Context) -> BoxFuture<'a, Flow> + Send + Sync + 'static,
    {
        self.register(MethodFilter::Only(method), Layer::error("/", handler))
    }

    /// Append a handler for every method.
    pub fn all<F>(&mut self, handler: F) -> &mut Self
    where
        F: for<'a> Fn(&'a mut Context) -> BoxFuture<'a, Flow> + Send + Sync + 'static,
    {
        self.register(MethodFilter::Any, Layer::request("/", handler))
    }

    verb_methods! {
        get => Method::GET,
        post => Method::POST,
        put => Method::PUT,
        delete => Method::DELETE,
        patch => Method::PATCH,
        head => Method::HEAD,
        options => Method::OPTIONS,
    }

    fn register(&mut self, filter: MethodFilter, layer: Layer) -> &mut Self {
        match &filter {
            MethodFilter::Any => self.any_method = true,
            MethodFilter::Only(method) => {
                self.methods.insert(method.clone());
            }
        }
        self.stack.push(MethodLayer { filter, layer });
        self
    }

    /// Run the handlers registered for the request's method.
    ///
    /// Returns `Continue` when the route is exhausted or skipped,
    /// `Fail` when an error survives every error handler.
    pub async fn dispatch(&self, ctx: &mut Context) -> Flow {
        let method = ctx.request.method().clone();
        let mut pending: Option<Error> = None;

        for entry in self.stack.iter().filter(|e| e.filter.matches(&method)) {
            if !entry.layer.accepts(pending.is_some()) {
                continue;
            }

            let flow = entry.layer.invoke(pending.take(), ctx).await;
            tracing::trace!(
                route = %self.path,
                method = %method,
                handler = entry.layer.name(),
                flow = flow.label(),
                "Route handler returned"
            );

            match flow {
                Flow::Continue => {}
                Flow::SkipRoute => return Flow::Continue,
                Flow::SkipRouter => return Flow::SkipRouter,
                Flow::Fail(err) => pending = Some(err),
                Flow::Halt => return Flow::Halt,
            }
        }

        pending.map_or(Flow::Continue, Flow::Fail)
    }
}
