//! Wildcard patterns matched against the daemon's metric catalog.
//!
//! A pattern is a regular expression with one convenience: a bare `*`
//! stands for "any sequence". The pattern may match anywhere inside an
//! identifier, so `/cpu*/usage` selects `web-01/cpu1/usage` without the
//! caller having to know the hostname.

use regex::Regex;

use crate::metric_id::normalize_path;

#[derive(Debug, Clone)]
pub struct MetricPattern {
    /// Normalized pattern as written by the operator (leading `/`).
    source: String,
    regex: Regex,
}

impl MetricPattern {
    /// Normalize `pattern` and compile it into a matching rule.
    pub fn compile(pattern: &str) -> Result<Self, regex::Error> {
        let source = normalize_path(pattern);
        let regex = Regex::new(&translate(&source))?;
        Ok(Self { source, regex })
    }

    /// The normalized pattern as the operator wrote it, with a leading `/`.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether `identifier` contains a match for this pattern.
    pub fn is_match(&self, identifier: &str) -> bool {
        self.regex.is_match(identifier)
    }
}

impl PartialEq for MetricPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl std::fmt::Display for MetricPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

/// Translate the operator syntax into regex syntax.
///
/// `/` is literal in regex syntax and needs no escaping; `*` becomes `.*`.
/// The resulting expression is unanchored.
fn translate(pattern: &str) -> String {
    pattern.replace('*', ".*")
}
