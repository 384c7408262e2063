// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Term model and loose value-spec classification.
//!
//! A term is a single constraint inside a set-based label selector: a key
//! plus either a presence marker or an `in`/`notin` operator with an ordered
//! value list. Terms are fed from loosely-structured input (JSON/YAML
//! scalars, lists, operator-tagged lists, sentinel strings), so
//! classification is best-effort by design:
//!
//! - `null` or `":present"` -> bare key ("key is set")
//! - `":absent"` -> recorded but rendered as nothing
//! - `["in", ...]` / `["notin", ...]` -> explicit operator, tag removed
//! - any other list -> implicit `in`, flattened recursively, `null`s dropped
//! - any other scalar -> implicit `in` with a single value
//!
//! Values are stored as plain strings; scalars are coerced once at this
//! boundary via [`to_display_string`]. No label-key or value legality
//! checking happens here — the control plane owns that contract.

use std::fmt;

use serde_json::Value;

use super::error::SelectorError;

/// Value-spec sentinel marking a key as "present" (rendered as the bare key).
pub const PRESENT_SENTINEL: &str = ":present";

/// Value-spec sentinel marking a key as "absent" (recorded, never rendered).
pub const ABSENT_SENTINEL: &str = ":absent";

/// The four term shapes of the set-based selector grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermKind {
    /// Bare key: `mykey`
    Present,
    /// Suppressed key: contributes nothing to the rendered selector
    Absent,
    /// `mykey in (v1, v2)`
    In,
    /// `mykey notin (v1, v2)`
    NotIn,
}

impl TermKind {
    /// Recognize a leading operator tag in a value-spec list.
    pub fn from_tag(tag: &str) -> Option<TermKind> {
        match tag {
            "in" | "In" => Some(TermKind::In),
            "notin" | "NotIn" => Some(TermKind::NotIn),
            _ => None,
        }
    }

    /// Whether this kind requires a non-empty value list.
    pub fn is_operator(&self) -> bool {
        matches!(self, TermKind::In | TermKind::NotIn)
    }
}

impl fmt::Display for TermKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TermKind::Present => write!(f, "present"),
            TermKind::Absent => write!(f, "absent"),
            TermKind::In => write!(f, "in"),
            TermKind::NotIn => write!(f, "notin"),
        }
    }
}

/// One key/operator/values constraint within a selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub key: String,
    pub kind: TermKind,
    pub values: Vec<String>,
}

impl Term {
    /// Create a term, enforcing the one structural invariant: an operator
    /// term with zero values would render a malformed clause and is rejected.
    /// Values passed with `Present`/`Absent` are ignored.
    pub fn new(
        key: impl Into<String>,
        kind: TermKind,
        values: Vec<String>,
    ) -> Result<Term, SelectorError> {
        let key = key.into();
        if key.is_empty() {
            return Err(SelectorError::EmptyKey);
        }
        if kind.is_operator() {
            if values.is_empty() {
                return Err(SelectorError::InvalidTermKind { key, kind });
            }
            Ok(Term { key, kind, values })
        } else {
            Ok(Term {
                key,
                kind,
                values: Vec::new(),
            })
        }
    }

    pub fn present(key: impl Into<String>) -> Result<Term, SelectorError> {
        Term::new(key, TermKind::Present, Vec::new())
    }

    pub fn absent(key: impl Into<String>) -> Result<Term, SelectorError> {
        Term::new(key, TermKind::Absent, Vec::new())
    }

    /// Classify a loose value-spec into a term (see module docs).
    ///
    /// Never fails on shape: unrecognized specs degrade to an implicit `in`.
    /// The only errors are an empty key and the hardened case of an explicit
    /// operator tag with nothing after it.
    pub fn classify(key: &str, spec: &Value) -> Result<Term, SelectorError> {
        match spec {
            Value::Null => Term::present(key),
            Value::String(s) if s == PRESENT_SENTINEL => Term::present(key),
            Value::String(s) if s == ABSENT_SENTINEL => Term::absent(key),
            Value::Array(items) => {
                let tagged = items
                    .first()
                    .and_then(Value::as_str)
                    .and_then(TermKind::from_tag);
                if let Some(kind) = tagged {
                    let mut values = Vec::new();
                    for item in &items[1..] {
                        collect_values(&mut values, item);
                    }
                    Term::new(key, kind, values)
                } else {
                    let mut values = Vec::new();
                    collect_values(&mut values, spec);
                    if values.is_empty() {
                        // An untagged empty list means "no value supplied"
                        Term::present(key)
                    } else {
                        Term::new(key, TermKind::In, values)
                    }
                }
            }
            other => Term::new(key, TermKind::In, vec![to_display_string(other)]),
        }
    }

    /// Render this term as one selector clause.
    ///
    /// `Absent` terms contribute nothing and return `None`.
    pub fn render(&self) -> Option<String> {
        match self.kind {
            TermKind::Present => Some(self.key.clone()),
            TermKind::Absent => None,
            TermKind::In | TermKind::NotIn => Some(format!(
                "{} {} ({})",
                self.key,
                self.kind,
                self.values.join(", ")
            )),
        }
    }
}

/// Coerce a loose scalar to its display form.
///
/// Strings pass through unquoted, numbers use their natural decimal form
/// (display precision is the caller's responsibility), booleans spell
/// `true`/`false`. Anything else falls back to its compact JSON text.
pub fn to_display_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}

/// Flatten a value-spec into display strings, recursing into nested lists.
/// `null` elements are dropped, not stringified.
fn collect_values(out: &mut Vec<String>, spec: &Value) {
    match spec {
        Value::Array(items) => {
            for item in items {
                collect_values(out, item);
            }
        }
        Value::Null => {}
        other => out.push(to_display_string(other)),
    }
}
