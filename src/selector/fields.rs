// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Field selector expressions.
//!
//! Field selectors are the second selector family understood by the control
//! plane: dot-joined field paths compared with `==`/`!=`, one clause per
//! expression, clauses joined with `,` (e.g. `status.phase==Running`).
//! Unlike label terms there are no set operators and no presence markers.
//!
//! Paths are purely structural here: segments are joined verbatim and not
//! checked against any resource schema.

use std::fmt;

use super::error::SelectorError;

/// A field expression operator. Only equality and inequality exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOperator {
    Equals,
    NotEquals,
}

impl FieldOperator {
    /// Recognize an operator token (`=` and `==` both mean equality).
    pub fn from_token(token: &str) -> Option<FieldOperator> {
        match token {
            "=" | "==" => Some(FieldOperator::Equals),
            "!=" => Some(FieldOperator::NotEquals),
            _ => None,
        }
    }
}

impl fmt::Display for FieldOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldOperator::Equals => write!(f, "=="),
            FieldOperator::NotEquals => write!(f, "!="),
        }
    }
}

/// An ordered, non-empty field path. Renders dot-joined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Parse a dot-notation path. Empty paths and empty segments (as in
    /// `a..b`) are structural errors; segment *names* are never validated.
    pub fn parse(path: &str) -> Result<FieldPath, SelectorError> {
        if path.is_empty() {
            return Err(SelectorError::EmptyFieldPath);
        }
        let segments: Vec<String> = path.split('.').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(SelectorError::EmptyFieldPath);
        }
        Ok(FieldPath { segments })
    }

    /// Extend the path with one more segment.
    #[allow(dead_code)]
    pub fn child(mut self, segment: impl Into<String>) -> FieldPath {
        self.segments.push(segment.into());
        self
    }

    #[allow(dead_code)]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

/// One field constraint: path, operator, single value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldExpr {
    pub path: FieldPath,
    pub op: FieldOperator,
    pub value: String,
}

impl FieldExpr {
    pub fn new(path: FieldPath, op: FieldOperator, value: impl Into<String>) -> FieldExpr {
        FieldExpr {
            path,
            op,
            value: value.into(),
        }
    }
}

impl fmt::Display for FieldExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.path, self.op, self.value)
    }
}

/// Mutable accumulation state for a field selector.
#[derive(Debug, Default)]
pub struct FieldSelectorBuilder {
    exprs: Vec<FieldExpr>,
}

impl FieldSelectorBuilder {
    pub fn new() -> FieldSelectorBuilder {
        FieldSelectorBuilder::default()
    }

    pub fn push(&mut self, expr: FieldExpr) -> &mut Self {
        self.exprs.push(expr);
        self
    }

    pub fn eq(&mut self, path: &str, value: &str) -> Result<&mut Self, SelectorError> {
        let path = FieldPath::parse(path)?;
        Ok(self.push(FieldExpr::new(path, FieldOperator::Equals, value)))
    }

    pub fn ne(&mut self, path: &str, value: &str) -> Result<&mut Self, SelectorError> {
        let path = FieldPath::parse(path)?;
        Ok(self.push(FieldExpr::new(path, FieldOperator::NotEquals, value)))
    }

    pub fn exprs(&self) -> &[FieldExpr] {
        &self.exprs
    }

    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }

    /// Clone the current state into a sealed field selector.
    pub fn snapshot(&self) -> FieldSelector {
        FieldSelector {
            exprs: self.exprs.clone(),
        }
    }

    #[allow(dead_code)]
    pub fn build(self) -> FieldSelector {
        FieldSelector { exprs: self.exprs }
    }
}

/// A sealed, ordered field selector. Renders comma-joined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSelector {
    exprs: Vec<FieldExpr>,
}

impl FieldSelector {
    #[allow(dead_code)]
    pub fn exprs(&self) -> &[FieldExpr] {
        &self.exprs
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }
}

impl fmt::Display for FieldSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let clauses: Vec<String> = self.exprs.iter().map(FieldExpr::to_string).collect();
        f.write_str(&clauses.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_parse_and_display() {
        let path = FieldPath::parse("status.phase").unwrap();
        assert_eq!(path.segments(), ["status", "phase"]);
        assert_eq!(path.to_string(), "status.phase");
    }

    #[test]
    fn test_path_segments_are_not_interpreted() {
        // "not" is just a path segment, not an operator
        let path = FieldPath::parse("bar.not.baz").unwrap();
        assert_eq!(path.to_string(), "bar.not.baz");
    }

    #[test]
    fn test_path_child_extends() {
        let path = FieldPath::parse("bar").unwrap().child("baz").child("qux");
        assert_eq!(path.to_string(), "bar.baz.qux");
    }

    #[test]
    fn test_empty_paths_rejected() {
        assert_eq!(
            FieldPath::parse("").unwrap_err(),
            SelectorError::EmptyFieldPath
        );
        assert_eq!(
            FieldPath::parse("a..b").unwrap_err(),
            SelectorError::EmptyFieldPath
        );
    }

    #[test]
    fn test_expr_render() {
        let eq = FieldExpr::new(
            FieldPath::parse("bar.not.baz").unwrap(),
            FieldOperator::Equals,
            "Ready",
        );
        assert_eq!(eq.to_string(), "bar.not.baz==Ready");

        let ne = FieldExpr::new(
            FieldPath::parse("status.phase").unwrap(),
            FieldOperator::NotEquals,
            "Running",
        );
        assert_eq!(ne.to_string(), "status.phase!=Running");
    }

    #[test]
    fn test_operator_tokens() {
        assert_eq!(FieldOperator::from_token("="), Some(FieldOperator::Equals));
        assert_eq!(FieldOperator::from_token("=="), Some(FieldOperator::Equals));
        assert_eq!(
            FieldOperator::from_token("!="),
            Some(FieldOperator::NotEquals)
        );
        assert_eq!(FieldOperator::from_token("=~"), None);
    }

    #[test]
    fn test_selector_joins_with_comma() {
        let mut builder = FieldSelectorBuilder::new();
        builder.eq("status.phase", "Running").unwrap();
        builder.ne("spec.nodeName", "node-1").unwrap();
        assert_eq!(
            builder.build().to_string(),
            "status.phase==Running,spec.nodeName!=node-1"
        );
    }

    #[test]
    fn test_empty_selector_renders_empty_string() {
        assert_eq!(FieldSelectorBuilder::new().build().to_string(), "");
    }
}
