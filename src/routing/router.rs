//! Ordered layer stack and the cascading traversal.
//!
//! # Responsibilities
//! - Store middleware, error middleware, routes and mounted routers in
//!   registration order
//! - Walk the stack for one request, rewriting `url`/`base_url` at mount points
//! - Carry a pending error past layers that cannot handle it
//!
//! # Design Decisions
//! - Registration takes `&mut self`; dispatch takes `&self` and never mutates
//!   the stack
//! - One loop per router; nesting happens through `Handler for Router`
//! - A prefix rewrite is undone as soon as the layer returns, so siblings see
//!   the url their router received
//! - `SkipRouter` is consumed here and resumes the parent router

use futures_util::future::BoxFuture;

use crate::error::Error;
use crate::http::Context;
use crate::routing::{Flow, Handler, Layer, Route};

macro_rules! verb_shortcuts {
    ($($name:ident),* $(,)?) => {
        $(
            #[doc = concat!("Shortcut for `route(path).", stringify!($name), "(handler)`.")]
            pub fn $name<F>(&mut self, path: &str, handler: F) -> &mut Self
            where
                F: for<'a> Fn(&'a mut Context) -> BoxFuture<'a, Flow> + Send + Sync + 'static,
            {
                self.route(path).$name(handler);
                self
            }
        )*
    };
}

/// A stack of layers dispatched in order.
#[derive(Debug, Default)]
pub struct Router {
    stack: Vec<Layer>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn layers(&self) -> &[Layer] {
        &self.stack
    }

    /// Append middleware that runs for every request.
    pub fn use_<F>(&mut self, handler: F) -> &mut Self
    where
        F: for<'a> Fn(&'a mut Context) -> BoxFuture<'a, Flow> + Send + Sync + 'static,
    {
        self.use_at("/", handler)
    }

    /// Append middleware mounted at `path`.
    pub fn use_at<F>(&mut self, path: &str, handler: F) -> &mut Self
    where
        F: for<'a> Fn(&'a mut Context) -> BoxFuture<'a, Flow> + Send + Sync + 'static,
    {
        self.stack.push(Layer::request(path, handler));
        self
    }

    /// Append error middleware that runs for every request with an error pending.
    pub fn use_error<F>(&mut self, handler: F) -> &mut Self
    where
        F: for<'a> Fn(Error, &'a mut Context) -> BoxFuture<'a, Flow> + Send + Sync + 'static,
    {
        self.use_error_at("/", handler)
    }

    pub fn use_error_at<F>(&mut self, path: &str, handler: F) -> &mut Self
    where
        F: for<'a> Fn(Error, &'a mut Context) -> BoxFuture<'a, Flow> + Send + Sync + 'static,
    {
        self.stack.push(Layer::error(path, handler));
        self
    }

    /// Append any [`Handler`] implementation mounted at `path`.
    pub fn use_handler<H: Handler>(&mut self, path: &str, handler: H) -> &mut Self {
        self.stack.push(Layer::request(path, handler));
        self
    }

    /// Mount a sub-router at `path`.
    ///
    /// Inside the sub-router `url` is relative to `path` and `base_url`
    /// ends with it.
    pub fn mount(&mut self, path: &str, router: Router) -> &mut Self {
        self.stack.push(Layer::named_request(path, "router", router));
        self
    }

    /// Create a new route for `path`.
    ///
    /// Every call creates a separate route, even for a path already used.
    pub fn route(&mut self, path: &str) -> &mut Route {
        self.stack.push(Layer::for_route(Route::new(path)));
        self.stack
            .last_mut()
            .and_then(Layer::route_mut)
            .expect("route layer was just pushed")
    }

    verb_shortcuts!(get, post, put, delete, patch, head, options, all);

    /// Dispatch the request through the stack.
    ///
    /// Returns `Halt` if a layer produced the response, `Fail` if an error
    /// survived every error handler, and `Continue` otherwise (stack
    /// exhausted or `SkipRouter`).
    pub async fn handle(&self, ctx: &mut Context) -> Flow {
        let parent_url = ctx.request.base_url.clone();
        let mut pending: Option<Error> = None;

        for layer in &self.stack {
            if !layer.matches(ctx.request.path()) || !layer.accepts(pending.is_some()) {
                continue;
            }

            let flow = match layer.route() {
                Some(route) => {
                    if !route.handles_method(ctx.request.method()) {
                        continue;
                    }
                    tracing::debug!(
                        route = %route.path(),
                        method = %ctx.request.method(),
                        url = %ctx.request.url,
                        "Dispatching to route"
                    );
                    layer.invoke(pending.take(), ctx).await
                }
                None => {
                    let removed = layer.consumed_prefix();
                    let saved_url = strip_prefix(ctx, &parent_url, removed);
                    tracing::debug!(
                        layer = layer.name(),
                        pattern = %layer.pattern(),
                        url = %ctx.request.url,
                        base_url = %ctx.request.base_url,
                        "Invoking middleware"
                    );

                    let flow = layer.invoke(pending.take(), ctx).await;

                    if let Some(url) = saved_url {
                        ctx.request.url = url;
                        ctx.request.base_url.clone_from(&parent_url);
                    }
                    flow
                }
            };

            match flow {
                Flow::Continue | Flow::SkipRoute => {}
                Flow::SkipRouter => return Flow::Continue,
                Flow::Fail(err) => {
                    tracing::debug!(error = %err, "Layer failed, switching to error handlers");
                    pending = Some(err);
                }
                Flow::Halt => return Flow::Halt,
            }
        }

        pending.map_or(Flow::Continue, Flow::Fail)
    }
}

impl Handler for Router {
    fn call<'a>(&'a self, ctx: &'a mut Context) -> BoxFuture<'a, Flow> {
        Box::pin(self.handle(ctx))
    }
}

/// Strip `removed` from the request url for the duration of one layer.
///
/// Returns the url to restore afterwards, or `None` when nothing was consumed.
fn strip_prefix(ctx: &mut Context, parent_url: &str, removed: &str) -> Option<String> {
    if removed.is_empty() {
        return None;
    }

    let original = std::mem::take(&mut ctx.request.url);
    let rest = original.strip_prefix(removed).unwrap_or(&original);
    ctx.request.url = if rest.starts_with('/') {
        rest.to_string()
    } else {
        format!("/{rest}")
    };
    ctx.request.base_url = format!("{parent_url}{removed}");
    Some(original)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Request;
    use axum::http::Method;
    use std::sync::{Arc, Mutex};

    type Log = Arc<Mutex<Vec<String>>>;

    fn ctx(method: Method, url: &str) -> Context {
        Context::new(Request::new(method, url))
    }

    fn new_log() -> Log {
        Arc::new(Mutex::new(Vec::new()))
    }

    fn entries(log: &Log) -> Vec<String> {
        log.lock().unwrap().clone()
    }

    #[tokio::test]
    async fn test_layers_run_in_registration_order() {
        let log = new_log();
        let (a, b) = (log.clone(), log.clone());
        let mut router = Router::new();
        router
            .use_(move |_ctx| {
                a.lock().unwrap().push("A".into());
                Box::pin(async { Flow::Continue })
            })
            .use_(move |_ctx| {
                b.lock().unwrap().push("B".into());
                Box::pin(async { Flow::Continue })
            });

        let mut ctx = ctx(Method::GET, "/anything");
        assert!(matches!(router.handle(&mut ctx).await, Flow::Continue));
        assert_eq!(entries(&log), vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_empty_router_exhausts() {
        let router = Router::new();
        let mut ctx = ctx(Method::GET, "/");
        assert!(matches!(router.handle(&mut ctx).await, Flow::Continue));
    }

    #[tokio::test]
    async fn test_prefix_rewrite_and_restore() {
        let log = new_log();
        let (inner, after) = (log.clone(), log.clone());
        let mut router = Router::new();
        router
            .use_at("/users", move |ctx| {
                inner
                    .lock()
                    .unwrap()
                    .push(format!("{} {}", ctx.request.base_url(), ctx.request.url()));
                Box::pin(async { Flow::Continue })
            })
            .use_(move |ctx| {
                after
                    .lock()
                    .unwrap()
                    .push(format!("{} {}", ctx.request.base_url(), ctx.request.url()));
                Box::pin(async { Flow::Continue })
            });

        let mut ctx = ctx(Method::GET, "/users/1?x=2");
        router.handle(&mut ctx).await;
        assert_eq!(entries(&log), vec!["/users /1?x=2", " /users/1?x=2"]);
        assert_eq!(ctx.request.url(), "/users/1?x=2");
        assert_eq!(ctx.request.base_url(), "");
    }

    #[tokio::test]
    async fn test_exact_mount_path_becomes_root() {
        let seen = new_log();
        let s = seen.clone();
        let mut router = Router::new();
        router.use_at("/users", move |ctx| {
            s.lock().unwrap().push(ctx.request.url().to_string());
            Box::pin(async { Flow::Continue })
        });

        let mut ctx = ctx(Method::GET, "/users");
        router.handle(&mut ctx).await;
        assert_eq!(entries(&seen), vec!["/"]);
    }

    #[tokio::test]
    async fn test_method_mismatch_keeps_scanning() {
        let mut router = Router::new();
        router
            .post("/books", |ctx| {
                ctx.send("post");
                Box::pin(async { Flow::Halt })
            })
            .get("/books", |ctx| {
                ctx.send("get");
                Box::pin(async { Flow::Halt })
            });

        let mut ctx = ctx(Method::GET, "/books");
        assert!(router.handle(&mut ctx).await.is_halt());
        assert_eq!(ctx.response.text(), "get");
    }

    #[tokio::test]
    async fn test_same_path_routes_are_independent() {
        let mut router = Router::new();
        router.route("/a").get(|_ctx| Box::pin(async { Flow::SkipRoute }));
        router.route("/a").get(|ctx| {
            ctx.send("second route");
            Box::pin(async { Flow::Halt })
        });
        assert_eq!(router.len(), 2);

        let mut ctx = ctx(Method::GET, "/a");
        assert!(router.handle(&mut ctx).await.is_halt());
        assert_eq!(ctx.response.text(), "second route");
    }

    #[tokio::test]
    async fn test_error_skips_plain_layers() {
        let log = new_log();
        let (plain, caught) = (log.clone(), log.clone());
        let mut router = Router::new();
        router
            .use_(|_ctx| Box::pin(async { Flow::fail(Error::msg("boom")) }))
            .use_(move |_ctx| {
                plain.lock().unwrap().push("plain".into());
                Box::pin(async { Flow::Continue })
            })
            .get("/", |_ctx| Box::pin(async { Flow::Halt }))
            .use_error(move |err, ctx| {
                caught.lock().unwrap().push(err.to_string());
                ctx.send("recovered");
                Box::pin(async { Flow::Halt })
            });

        let mut ctx = ctx(Method::GET, "/");
        assert!(router.handle(&mut ctx).await.is_halt());
        assert_eq!(entries(&log), vec!["boom"]);
        assert_eq!(ctx.response.text(), "recovered");
    }

    #[tokio::test]
    async fn test_error_handler_can_recover() {
        let mut router = Router::new();
        router
            .use_(|_ctx| Box::pin(async { Flow::fail(Error::msg("boom")) }))
            .use_error(|_err, _ctx| Box::pin(async { Flow::Continue }))
            .use_(|ctx| {
                ctx.send("after recovery");
                Box::pin(async { Flow::Halt })
            });

        let mut ctx = ctx(Method::GET, "/");
        assert!(router.handle(&mut ctx).await.is_halt());
        assert_eq!(ctx.response.text(), "after recovery");
    }

    #[tokio::test]
    async fn test_unhandled_error_returned() {
        let mut router = Router::new();
        router.use_(|_ctx| Box::pin(async { Flow::fail(Error::msg("boom")) }));
        let mut ctx = ctx(Method::GET, "/");
        match router.handle(&mut ctx).await {
            Flow::Fail(err) => assert_eq!(err.to_string(), "boom"),
            other => panic!("unexpected flow: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_skip_router_resumes_parent() {
        let mut child = Router::new();
        child
            .use_(|_ctx| Box::pin(async { Flow::SkipRouter }))
            .use_(|ctx| {
                ctx.send("child");
                Box::pin(async { Flow::Halt })
            });

        let mut parent = Router::new();
        parent.mount("/api", child).use_(|ctx| {
            ctx.send("parent fallback");
            Box::pin(async { Flow::Halt })
        });

        let mut ctx = ctx(Method::GET, "/api/x");
        assert!(parent.handle(&mut ctx).await.is_halt());
        assert_eq!(ctx.response.text(), "parent fallback");
    }

    #[tokio::test]
    async fn test_skip_router_from_route() {
        let mut child = Router::new();
        child.get("/x", |_ctx| Box::pin(async { Flow::SkipRouter }));
        child.use_(|ctx| {
            ctx.send("child fallback");
            Box::pin(async { Flow::Halt })
        });

        let mut ctx = ctx(Method::GET, "/x");
        assert!(matches!(child.handle(&mut ctx).await, Flow::Continue));
        assert!(!ctx.response.is_finished());
    }

    #[tokio::test]
    async fn test_skip_route_from_middleware_continues() {
        let mut router = Router::new();
        router
            .use_(|_ctx| Box::pin(async { Flow::SkipRoute }))
            .use_(|ctx| {
                ctx.send("next");
                Box::pin(async { Flow::Halt })
            });

        let mut ctx = ctx(Method::GET, "/");
        assert!(router.handle(&mut ctx).await.is_halt());
        assert_eq!(ctx.response.text(), "next");
    }

    #[tokio::test]
    async fn test_nested_mounts_accumulate_base_url() {
        let seen = new_log();
        let s = seen.clone();
        let mut inner = Router::new();
        inner.get("/item", move |ctx| {
            s.lock()
                .unwrap()
                .push(format!("{}|{}", ctx.request.base_url(), ctx.request.url()));
            Box::pin(async { Flow::Continue })
        });
        let mut middle = Router::new();
        middle.mount("/b", inner);
        let mut outer = Router::new();
        outer.mount("/a", middle);

        let mut ctx = ctx(Method::GET, "/a/b/item");
        assert!(matches!(outer.handle(&mut ctx).await, Flow::Continue));
        assert_eq!(entries(&seen), vec!["/a/b|/item"]);
        assert_eq!(ctx.request.url(), "/a/b/item");
        assert_eq!(ctx.request.base_url(), "");
    }

    #[tokio::test]
    async fn test_wildcard_matches_every_path() {
        let mut router = Router::new();
        router.use_at("*", |ctx| {
            ctx.send(ctx.request.url().to_string());
            Box::pin(async { Flow::Halt })
        });

        for url in ["/", "/deep/path"] {
            let mut ctx = ctx(Method::DELETE, url);
            assert!(router.handle(&mut ctx).await.is_halt());
            assert_eq!(ctx.response.text(), url);
        }
    }

    #[tokio::test]
    async fn test_root_middleware_url_rewrite_persists() {
        let mut router = Router::new();
        router
            .use_(|ctx| {
                ctx.request.set_url("/rewritten");
                Box::pin(async { Flow::Continue })
            })
            .get("/rewritten", |ctx| {
                ctx.send("rewritten");
                Box::pin(async { Flow::Halt })
            });

        let mut ctx = ctx(Method::GET, "/original");
        assert!(router.handle(&mut ctx).await.is_halt());
        assert_eq!(ctx.response.text(), "rewritten");
        assert_eq!(ctx.request.original_url(), "/original");
    }
}
