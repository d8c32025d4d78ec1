//! Continuation values returned by handlers.

use crate::error::Error;

/// What a handler asks the traversal to do next.
///
/// A handler's returned `Flow` plays the part of calling `next`: the
/// traversal resumes exactly once, when the handler's future resolves.
#[derive(Debug)]
pub enum Flow {
    /// Move on to the next matching layer.
    Continue,
    /// Skip the remaining handlers of the current route.
    SkipRoute,
    /// Abandon the rest of the current router and resume in its parent.
    SkipRouter,
    /// Propagate an error to the next error handler.
    Fail(Error),
    /// The response has been produced; stop dispatching.
    Halt,
}

impl Flow {
    /// Shortcut for `Flow::Fail(err.into())`.
    pub fn fail(err: impl Into<Error>) -> Self {
        Flow::Fail(err.into())
    }

    pub fn is_halt(&self) -> bool {
        matches!(self, Flow::Halt)
    }

    pub(crate) fn label(&self) -> &'static str {
        match self {
            Flow::Continue => "continue",
            Flow::SkipRoute => "skip_route",
            Flow::SkipRouter => "skip_router",
            Flow::Fail(_) => "fail",
            Flow::Halt => "halt",
        }
    }
}

impl From<Error> for Flow {
    fn from(err: Error) -> Self {
        Flow::Fail(err)
    }
}
