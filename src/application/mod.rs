//! Application: top-level router, settings and final handler.
//!
//! # Responsibilities
//! - Own the top-level [`Router`] and forward registration to it
//! - Hold settings shared with every request
//! - Build a [`Context`] per request, dispatch, then run the final handler
//! - Record dispatch metrics
//!
//! # Design Decisions
//! - Registration needs `&mut Application`; serving shares it behind `Arc`,
//!   so the stack cannot change while traffic flows
//! - The final handler never overwrites a response that was already sent

pub mod finalhandler;
pub mod settings;

use std::sync::Arc;
use std::time::Instant;

use futures_util::future::BoxFuture;

use crate::config::AppConfig;
use crate::error::Error;
use crate::http::{Context, Request, Response};
use crate::observability::metrics;
use crate::routing::{Flow, Handler, Route, Router};

pub use finalhandler::Outcome;
pub use settings::Settings;

macro_rules! verb_shortcuts {
    ($($name:ident),* $(,)?) => {
        $(
            #[doc = concat!("Register a `", stringify!($name), "` handler on the top-level router.")]
            pub fn $name<F>(&mut self, path: &str, handler: F) -> &mut Self
            where
                F: for<'a> Fn(&'a mut Context) -> BoxFuture<'a, Flow> + Send + Sync + 'static,
            {
                self.router.$name(path, handler);
                self
            }
        )*
    };
}

/// A routing application.
#[derive(Debug)]
pub struct Application {
    router: Router,
    settings: Arc<Settings>,
    expose_errors: bool,
}

impl Application {
    pub fn new() -> Self {
        Self {
            router: Router::new(),
            settings: Arc::new(Settings::default()),
            expose_errors: true,
        }
    }

    /// Application configured from the `[app]` config section.
    pub fn with_config(config: &AppConfig) -> Self {
        Self {
            router: Router::new(),
            settings: Arc::new(Settings::from(config.settings.clone())),
            expose_errors: config.expose_errors,
        }
    }

    /// Store a setting readable through `Context::setting`.
    pub fn set(&mut self, name: &str, value: impl Into<serde_json::Value>) -> &mut Self {
        Arc::make_mut(&mut self.settings).insert(name, value);
        self
    }

    pub fn setting(&self, name: &str) -> Option<&serde_json::Value> {
        self.settings.get(name)
    }

    /// Whether 5xx bodies include the error message.
    pub fn expose_errors(&mut self, expose: bool) -> &mut Self {
        self.expose_errors = expose;
        self
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn use_<F>(&mut self, handler: F) -> &mut Self
    where
        F: for<'a> Fn(&'a mut Context) -> BoxFuture<'a, Flow> + Send + Sync + 'static,
    {
        self.router.use_(handler);
        self
    }

    pub fn use_at<F>(&mut self, path: &str, handler: F) -> &mut Self
    where
        F: for<'a> Fn(&'a mut Context) -> BoxFuture<'a, Flow> + Send + Sync + 'static,
    {
        self.router.use_at(path, handler);
        self
    }

    pub fn use_error<F>(&mut self, handler: F) -> &mut Self
    where
        F: for<'a> Fn(Error, &'a mut Context) -> BoxFuture<'a, Flow> + Send + Sync + 'static,
    {
        self.router.use_error(handler);
        self
    }

    pub fn use_error_at<F>(&mut self, path: &str, handler: F) -> &mut Self
    where
        F: for<'a> Fn(Error, &'a mut Context) -> BoxFuture<'a, Flow> + Send + Sync + 'static,
    {
        self.router.use_error_at(path, handler);
        self
    }

    pub fn use_handler<H: Handler>(&mut self, path: &str, handler: H) -> &mut Self {
        self.router.use_handler(path, handler);
        self
    }

    pub fn mount(&mut self, path: &str, router: Router) -> &mut Self {
        self.router.mount(path, router);
        self
    }

    pub fn route(&mut self, path: &str) -> &mut Route {
        self.router.route(path)
    }

    verb_shortcuts!(get, post, put, delete, patch, head, options, all);

    /// Dispatch one request and return the finished response.
    pub async fn handle(&self, request: Request) -> Response {
        let started = Instant::now();
        let mut ctx = Context::with_settings(request, Arc::clone(&self.settings));

        let flow = self.router.handle(&mut ctx).await;
        let outcome = finalhandler::finish(&mut ctx, flow, self.expose_errors);

        tracing::debug!(
            method = %ctx.request.method(),
            url = %ctx.request.original_url(),
            status = %ctx.response.status_code(),
            outcome = outcome.as_str(),
            "Request dispatched"
        );
        metrics::record_dispatch(ctx.request.method().as_str(), outcome, started);

        ctx.into_response()
    }
}

impl Default for Application {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Method, StatusCode};

    #[tokio::test]
    async fn test_settings_visible_to_handlers() {
        let mut app = Application::new();
        app.set("title", "Hey").get("/", |ctx| {
            let title = ctx
                .setting("title")
                .and_then(|v| v.as_str())
                .unwrap_or("none")
                .to_string();
            ctx.send(title);
            Box::pin(async { Flow::Halt })
        });

        let res = app.handle(Request::new(Method::GET, "/")).await;
        assert_eq!(res.text(), "Hey");
        assert_eq!(app.setting("title"), Some(&serde_json::json!("Hey")));
    }

    #[tokio::test]
    async fn test_with_config() {
        let mut config = AppConfig::default();
        config.expose_errors = false;
        config
            .settings
            .insert("env".into(), serde_json::json!("production"));

        let mut app = Application::with_config(&config);
        app.get("/", |_ctx| Box::pin(async { Flow::fail(Error::msg("secret")) }));
        assert_eq!(app.setting("env"), Some(&serde_json::json!("production")));

        let res = app.handle(Request::new(Method::GET, "/")).await;
        assert_eq!(res.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(res.text(), "Internal Server Error");
    }

    #[tokio::test]
    async fn test_default_exposes_error_messages() {
        let mut app = Application::default();
        app.get("/", |_ctx| Box::pin(async { Flow::fail(Error::msg("boom")) }));

        let res = app.handle(Request::new(Method::GET, "/")).await;
        assert_eq!(res.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(res.text(), "Internal Server Error: boom");
    }

    #[tokio::test]
    async fn test_empty_application_is_not_found() {
        let app = Application::new();
        let res = app.handle(Request::new(Method::PUT, "/x?y=1")).await;
        assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(res.text(), "Cannot PUT /x?y=1");
    }
}
