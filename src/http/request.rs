//! Request view handed to handlers.
//!
//! # Responsibilities
//! - Hold the method, headers and buffered body delivered by the host layer
//! - Track `url`, `base_url` and `original_url` during traversal
//! - Split the path from the query string for matching
//!
//! # Design Decisions
//! - `original_url` is fixed at construction and never changes
//! - `url` and `base_url` are rewritten only by the router at mount points
//!   (and by handlers that deliberately rewrite the url)
//! - Body is buffered; streaming is the host layer's business

use axum::body::Bytes;
use axum::http::{Extensions, HeaderMap, Method};

/// An incoming request as seen by the dispatch chain.
#[derive(Debug)]
pub struct Request {
    method: Method,
    pub(crate) url: String,
    pub(crate) base_url: String,
    original_url: String,
    headers: HeaderMap,
    body: Bytes,
    extensions: Extensions,
}

impl Request {
    /// Create a request for `method` and `url` (path plus optional query).
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        let mut url = url.into();
        if !url.starts_with('/') {
            url.insert(0, '/');
        }
        Self {
            method,
            original_url: url.clone(),
            url,
            base_url: String::new(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
            extensions: Extensions::new(),
        }
    }

    /// Replace the request headers.
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Replace the request body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Remaining, not yet consumed part of the url.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Rewrite the remaining url.
    ///
    /// Layers that run after the caller observe the new value. A rewrite made
    /// below a mount point is undone when control returns past that mount point.
    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
    }

    /// Prefix consumed by the enclosing mount points.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The url as it arrived from the host layer.
    pub fn original_url(&self) -> &str {
        &self.original_url
    }

    /// Path component of the remaining url.
    pub fn path(&self) -> &str {
        split_query(&self.url).0
    }

    /// Query string of the request, without the leading `?`.
    pub fn query(&self) -> Option<&str> {
        split_query(&self.url).1
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Header value as a string, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Typed per-request storage shared between layers.
    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }
}

fn split_query(url: &str) -> (&str, Option<&str>) {
    match url.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (url, None),
    }
}
