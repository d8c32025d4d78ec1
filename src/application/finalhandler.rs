//! Terminal responder.
//!
//! Runs after the top-level router returns and renders a response when
//! nothing along the chain did: 404 for an exhausted stack, the error's
//! status for an unhandled error.

use axum::http::StatusCode;

use crate::error::Error;
use crate::http::Context;
use crate::routing::Flow;

/// How a dispatch ended, as seen by the final handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A layer produced the response.
    Handled,
    /// No layer handled the request.
    NotFound,
    /// An error reached the top of the stack.
    Failed,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Handled => "handled",
            Outcome::NotFound => "not_found",
            Outcome::Failed => "error",
        }
    }
}

/// Finish the response for `flow`.
pub fn finish(ctx: &mut Context, flow: Flow, expose_errors: bool) -> Outcome {
    match flow {
        Flow::Halt => Outcome::Handled,
        Flow::Fail(err) => {
            render_error(ctx, &err, expose_errors);
            Outcome::Failed
        }
        Flow::Continue | Flow::SkipRoute | Flow::SkipRouter => {
            if ctx.response.is_finished() {
                return Outcome::Handled;
            }
            let body = format!(
                "Cannot {} {}",
                ctx.request.method(),
                ctx.request.original_url()
            );
            tracing::debug!(url = %ctx.request.original_url(), "No layer handled request");
            ctx.response.status(StatusCode::NOT_FOUND).send(body);
            Outcome::NotFound
        }
    }
}

fn render_error(ctx: &mut Context, err: &Error, expose_errors: bool) {
    let status = err.status();
    tracing::error!(
        error = %err,
        status = %status,
        method = %ctx.request.method(),
        url = %ctx.request.original_url(),
        "Unhandled error"
    );

    if ctx.response.is_finished() {
        return;
    }

    let reason = status.canonical_reason().unwrap_or("Error");
    let body = if expose_errors {
        format!("{reason}: {err}")
    } else {
        reason.to_string()
    };
    ctx.response.status(status).send(body);
}
