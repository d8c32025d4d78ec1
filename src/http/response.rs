//! Append-only response sink.
//!
//! # Responsibilities
//! - Collect status, headers and body produced by handlers
//! - Finish the response exactly once
//! - Convert the finished response for the host layer
//!
//! # Design Decisions
//! - The first `send` wins; later sends are ignored and logged
//! - `send` defaults the content type to plain text

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode};
use serde::Serialize;

use crate::error::Error;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
const APPLICATION_JSON: &str = "application/json";

/// Response under construction for one request.
#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    finished: bool,
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl Response {
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            finished: false,
        }
    }

    /// Set the status code used when the response is sent.
    pub fn status(&mut self, status: StatusCode) -> &mut Self {
        self.status = status;
        self
    }

    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    pub fn set_header(&mut self, name: HeaderName, value: HeaderValue) -> &mut Self {
        self.headers.insert(name, value);
        self
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Body as UTF-8 text, lossy.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// True once `send`, `json` or `end` has been called.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Send `body` and finish the response.
    pub fn send(&mut self, body: impl Into<Bytes>) {
        if self.finished {
            tracing::warn!(status = %self.status, "Response already sent, ignoring send");
            return;
        }
        if !self.headers.contains_key(header::CONTENT_TYPE) {
            self.headers
                .insert(header::CONTENT_TYPE, HeaderValue::from_static(TEXT_PLAIN));
        }
        self.body = body.into();
        self.finished = true;
    }

    /// Serialize `value` as JSON and finish the response.
    pub fn json<T: Serialize>(&mut self, value: &T) -> Result<(), Error> {
        let body = serde_json::to_vec(value)?;
        self.headers
            .entry(header::CONTENT_TYPE)
            .or_insert(HeaderValue::from_static(APPLICATION_JSON));
        self.send(body);
        Ok(())
    }

    /// Finish the response with whatever body it has.
    pub fn end(&mut self) {
        self.finished = true;
    }

    /// Convert into the host layer's response type.
    pub fn into_http(self) -> axum::response::Response {
        let mut response = axum::response::Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}
