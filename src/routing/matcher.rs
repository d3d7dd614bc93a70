//! Path pattern matching.
//!
//! # Responsibilities
//! - Split patterns on `/` into literal and `:name` capture segments
//! - Match a request path segment-by-segment
//! - Bind captured segments to parameter names
//!
//! # Design Decisions
//! - Segment counts must be equal; no prefix or wildcard matching
//! - Literal segments compare byte-for-byte (case-sensitive, undecoded)
//! - Captured values are kept verbatim as strings
//! - No regex to guarantee O(n) matching

use std::collections::HashMap;
use std::fmt;

/// One `/`-delimited piece of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A compiled route pattern such as `/api/users/:id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Compile a pattern. Any string is accepted.
    pub fn new(pattern: impl Into<String>) -> Self {
        let raw = pattern.into();
        let segments = raw
            .split('/')
            .map(|part| match part.strip_prefix(':') {
                Some(name) => Segment::Param(name.to_string()),
                None => Segment::Literal(part.to_string()),
            })
            .collect();
        Self { raw, segments }
    }

    /// The pattern as registered.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Names of the `:`-prefixed segments, in order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Match `path`, returning the bound parameters or `None` on mismatch.
    pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
        let parts: Vec<&str> = path.split('/').collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = HashMap::new();
        for (segment, actual) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Param(name) => {
                    params.insert(name.clone(), actual.to_string());
                }
                Segment::Literal(expected) if expected == actual => {}
                Segment::Literal(_) => return None,
            }
        }
        Some(params)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Match `request_path` against `route_pattern` without keeping the compiled pattern.
pub fn extract_params(route_pattern: &str, request_path: &str) -> Option<HashMap<String, String>> {
    PathPattern::new(route_pattern).matches(request_path)
}
