//! Per-request context.
//!
//! One `Context` is built when a request enters the application and is
//! dropped when the response leaves. Every layer receives it by `&mut`.

use std::sync::Arc;

use axum::body::Bytes;

use crate::application::Settings;
use crate::http::{Request, Response};

/// Request, response and application settings for one dispatch.
#[derive(Debug)]
pub struct Context {
    pub request: Request,
    pub response: Response,
    settings: Arc<Settings>,
}

impl Context {
    /// Context with empty application settings.
    pub fn new(request: Request) -> Self {
        Self::with_settings(request, Arc::new(Settings::default()))
    }

    pub fn with_settings(request: Request, settings: Arc<Settings>) -> Self {
        Self {
            request,
            response: Response::new(),
            settings,
        }
    }

    /// Shortcut for `self.response.send(body)`.
    pub fn send(&mut self, body: impl Into<Bytes>) {
        self.response.send(body);
    }

    /// Application setting registered with `Application::set`.
    pub fn setting(&self, name: &str) -> Option<&serde_json::Value> {
        self.settings.get(name)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn into_response(self) -> Response {
        self.response
    }
}
