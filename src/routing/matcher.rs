//! Path pattern matching.
//!
//! # Responsibilities
//! - Normalize registered paths (leading slash, no trailing slash)
//! - Prefix matching for middleware and mount points
//! - Exact matching for routes
//!
//! # Design Decisions
//! - Matching is case-sensitive
//! - `*` matches every path and consumes nothing
//! - `/` normalizes to the empty prefix, so root middleware matches everything
//! - Prefix matches stop at segment boundaries: `/user` does not match `/users`
//! - No regex, no parameters

use std::fmt;

/// A registered path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// `*`: matches every path.
    Wildcard,
    /// Normalized path; the root is stored as the empty string.
    Path(String),
}

impl Pattern {
    pub fn parse(raw: &str) -> Self {
        if raw == "*" {
            return Pattern::Wildcard;
        }
        let trimmed = raw.trim_end_matches('/');
        if trimmed.is_empty() || trimmed.starts_with('/') {
            Pattern::Path(trimmed.to_string())
        } else {
            Pattern::Path(format!("/{trimmed}"))
        }
    }

    /// True if the pattern is a segment-aligned prefix of `path`.
    pub fn matches_prefix(&self, path: &str) -> bool {
        match self {
            Pattern::Wildcard => true,
            Pattern::Path(prefix) => {
                prefix.is_empty()
                    || path
                        .strip_prefix(prefix.as_str())
                        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
            }
        }
    }

    /// True if `path` equals the pattern, ignoring trailing slashes.
    pub fn matches_exact(&self, path: &str) -> bool {
        match self {
            Pattern::Wildcard => true,
            Pattern::Path(expected) => path.trim_end_matches('/') == expected.as_str(),
        }
    }

    /// The part of the path a prefix match consumes.
    pub fn prefix(&self) -> &str {
        match self {
            Pattern::Wildcard => "",
            Pattern::Path(prefix) => prefix,
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Wildcard => f.write_str("*"),
            Pattern::Path(p) if p.is_empty() => f.write_str("/"),
            Pattern::Path(p) => f.write_str(p),
        }
    }
}
