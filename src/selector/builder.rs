// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Selector accumulation and mapping-mode construction.
//!
//! A selector has exactly two states. [`SelectorBuilder`] is the mutable
//! building state: terms and raw fragments accumulate in insertion order.
//! [`Selector`] is the sealed state produced by [`SelectorBuilder::build`]:
//! immutable, cheap to clone, and safe to render concurrently.
//!
//! Two construction paths feed the same model: the builder API below, and
//! [`Selector::from_mapping`] which turns an ordered mapping document into
//! one term per entry (the reserved [`RAW_SENTINEL_KEY`] entry becomes a raw
//! passthrough fragment instead).

use std::fmt;

use serde_json::Value;
use tracing::debug;

use super::error::SelectorError;
use super::term::{self, Term, TermKind};

/// Reserved mapping key whose value is raw passthrough text, not a term.
pub const RAW_SENTINEL_KEY: &str = "___";

/// A sealed, ordered collection of terms and raw fragments.
///
/// Rendering via `Display`/`to_string` is a pure function: terms render in
/// insertion order, fragments follow verbatim, non-empty clauses join with
/// `,`. An empty selector renders to the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    terms: Vec<Term>,
    fragments: Vec<String>,
}

impl Selector {
    pub fn builder() -> SelectorBuilder {
        SelectorBuilder::new()
    }

    /// Build a selector from an ordered mapping document.
    ///
    /// Each entry becomes one term via classification, in mapping order,
    /// except the [`RAW_SENTINEL_KEY`] entry: a string value is stored
    /// verbatim as a fragment, a nested mapping is built into a selector and
    /// absorbed as its rendered string, anything else is display-coerced.
    pub fn from_mapping(doc: &Value) -> Result<Selector, SelectorError> {
        let map = doc.as_object().ok_or_else(|| {
            SelectorError::InvalidMapping("document must be a key/value mapping".to_string())
        })?;

        let mut builder = Selector::builder();
        for (key, spec) in map {
            if key == RAW_SENTINEL_KEY {
                match spec {
                    Value::Object(_) => {
                        let nested = Selector::from_mapping(spec)?;
                        builder.raw(nested.to_string());
                    }
                    Value::String(s) => {
                        builder.raw(s.clone());
                    }
                    other => {
                        builder.raw(term::to_display_string(other));
                    }
                }
                continue;
            }
            builder.push(Term::classify(key, spec)?);
        }

        let selector = builder.build();
        debug!(
            terms = selector.terms.len(),
            fragments = selector.fragments.len(),
            "built selector from mapping"
        );
        Ok(selector)
    }

    /// Parse a mapping document from JSON or YAML text and build a selector.
    ///
    /// JSON is tried first for its better error messages; anything else is
    /// read as YAML (of which JSON is a subset). Mapping order is preserved.
    pub fn from_mapping_str(doc: &str) -> Result<Selector, SelectorError> {
        let value: Value = match serde_json::from_str(doc) {
            Ok(v) => v,
            Err(_) => serde_yaml::from_str(doc)
                .map_err(|e| SelectorError::InvalidMapping(e.to_string()))?,
        };
        Selector::from_mapping(&value)
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty() && self.fragments.is_empty()
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let clauses: Vec<String> = self
            .terms
            .iter()
            .filter_map(Term::render)
            .chain(self.fragments.iter().cloned())
            .collect();
        f.write_str(&clauses.join(","))
    }
}

/// The mutable building state of a selector.
///
/// Every method appends in insertion order except [`set`](Self::set), which
/// replaces the first term with the same key in place. `build` consumes the
/// builder; there is no way back from the sealed state.
#[derive(Debug, Default)]
pub struct SelectorBuilder {
    terms: Vec<Term>,
    fragments: Vec<String>,
}

impl SelectorBuilder {
    pub fn new() -> SelectorBuilder {
        SelectorBuilder::default()
    }

    fn push(&mut self, term: Term) -> &mut Self {
        self.terms.push(term);
        self
    }

    /// Append a bare-key term.
    pub fn present(&mut self, key: &str) -> Result<&mut Self, SelectorError> {
        let term = Term::present(key)?;
        Ok(self.push(term))
    }

    /// Record a key as explicitly suppressed; it will render as nothing.
    pub fn absent(&mut self, key: &str) -> Result<&mut Self, SelectorError> {
        let term = Term::absent(key)?;
        Ok(self.push(term))
    }

    /// Append a term for `key`: no values means "present", otherwise an
    /// implicit `in` over the given values. Always appends, even when a term
    /// with the same key already exists.
    pub fn add(&mut self, key: &str, values: &[String]) -> Result<&mut Self, SelectorError> {
        let term = classify_args(key, values)?;
        Ok(self.push(term))
    }

    /// Like [`add`](Self::add), but replaces the first existing term with the
    /// same key in place (position preserved); appends if the key is new.
    pub fn set(&mut self, key: &str, values: &[String]) -> Result<&mut Self, SelectorError> {
        let term = classify_args(key, values)?;
        if let Some(slot) = self.terms.iter_mut().find(|t| t.key == key) {
            *slot = term;
        } else {
            self.terms.push(term);
        }
        Ok(self)
    }

    /// Append an explicit `in` term; empty values are an error.
    pub fn add_in(&mut self, key: &str, values: &[String]) -> Result<&mut Self, SelectorError> {
        let term = Term::new(key, TermKind::In, values.to_vec())?;
        Ok(self.push(term))
    }

    /// Append an explicit `notin` term; empty values are an error.
    pub fn add_not_in(&mut self, key: &str, values: &[String]) -> Result<&mut Self, SelectorError> {
        let term = Term::new(key, TermKind::NotIn, values.to_vec())?;
        Ok(self.push(term))
    }

    /// Append opaque passthrough text; it renders verbatim as one clause
    /// after all terms, never reinterpreted.
    pub fn raw(&mut self, text: impl Into<String>) -> &mut Self {
        self.fragments.push(text.into());
        self
    }

    /// Merge an externally built selector: its terms are appended after the
    /// existing ones (order preserved), its fragments after the existing
    /// fragments. Everything is copied; the source selector is untouched.
    pub fn merge(&mut self, other: &Selector) -> &mut Self {
        debug!(
            terms = other.terms().len(),
            fragments = other.fragments().len(),
            "merging selector into draft"
        );
        self.terms.extend(other.terms().iter().cloned());
        self.fragments.extend(other.fragments().iter().cloned());
        self
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty() && self.fragments.is_empty()
    }

    /// Clone the current state into a sealed selector without ending the
    /// building session. Used for previews mid-session.
    pub fn snapshot(&self) -> Selector {
        Selector {
            terms: self.terms.clone(),
            fragments: self.fragments.clone(),
        }
    }

    /// Seal the selector. Consumes the builder.
    pub fn build(self) -> Selector {
        Selector {
            terms: self.terms,
            fragments: self.fragments,
        }
    }
}

/// Builder-path classification: an empty argument list means "present",
/// anything else is an implicit `in` over the arguments.
fn classify_args(key: &str, values: &[String]) -> Result<Term, SelectorError> {
    if values.is_empty() {
        Term::present(key)
    } else {
        Term::new(key, TermKind::In, values.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vals(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_mapping_mode_mixed_entries() {
        let selector =
            Selector::from_mapping_str(r#"{"bar": ":present", "baz": ":present", "foo": "bar"}"#)
                .unwrap();
        assert_eq!(selector.to_string(), "bar,baz,foo in (bar)");
    }

    #[test]
    fn test_mapping_mode_raw_sentinel() {
        let selector =
            Selector::from_mapping_str(r#"{"bar": ":present", "___": "x!=y"}"#).unwrap();
        assert_eq!(selector.to_string(), "bar,x!=y");
    }

    #[test]
    fn test_mapping_mode_nested_selector_absorbed_as_fragment() {
        let selector = Selector::from_mapping_str(
            r#"{"app": "web", "___": {"tier": ["in", "frontend", "cache"]}}"#,
        )
        .unwrap();
        assert_eq!(
            selector.to_string(),
            "app in (web),tier in (frontend, cache)"
        );
        // The nested render is one opaque fragment, not two terms
        assert_eq!(selector.terms().len(), 1);
        assert_eq!(selector.fragments().len(), 1);
    }

    #[test]
    fn test_mapping_mode_yaml_document() {
        let selector = Selector::from_mapping_str("bar: :present\nfoo: [a, b]\n").unwrap();
        assert_eq!(selector.to_string(), "bar,foo in (a, b)");
    }

    #[test]
    fn test_mapping_mode_preserves_document_order() {
        let selector =
            Selector::from_mapping_str(r#"{"z": ":present", "a": ":present", "m": ":present"}"#)
                .unwrap();
        assert_eq!(selector.to_string(), "z,a,m");
    }

    #[test]
    fn test_mapping_mode_json_and_yaml_agree() {
        let json =
            Selector::from_mapping_str(r#"{"app": ["in", "web"], "tier": ":present"}"#).unwrap();
        let yaml = Selector::from_mapping_str("app: [in, web]\ntier: :present\n").unwrap();
        assert_eq!(json, yaml);
    }

    #[test]
    fn test_mapping_mode_rejects_non_mapping() {
        let err = Selector::from_mapping_str(r#"["a", "b"]"#).unwrap_err();
        assert!(matches!(err, SelectorError::InvalidMapping(_)));
    }

    #[test]
    fn test_mapping_mode_tagged_empty_list_errors() {
        let err = Selector::from_mapping_str(r#"{"app": ["in"]}"#).unwrap_err();
        assert!(matches!(err, SelectorError::InvalidTermKind { .. }));
    }

    #[test]
    fn test_builder_present_then_values() {
        let mut builder = Selector::builder();
        builder.add("foo", &[]).unwrap();
        builder.add("bar", &vals(&["a", "b"])).unwrap();
        assert_eq!(builder.build().to_string(), "foo,bar in (a, b)");
    }

    #[test]
    fn test_builder_absent_is_skipped_in_render() {
        let mut builder = Selector::builder();
        builder.present("bar").unwrap();
        builder.absent("hidden").unwrap();
        builder.add_in("foo", &vals(&["x"])).unwrap();
        let selector = builder.build();
        assert_eq!(selector.terms().len(), 3);
        assert_eq!(selector.to_string(), "bar,foo in (x)");
    }

    #[test]
    fn test_builder_explicit_operators_require_values() {
        let mut builder = Selector::builder();
        assert!(matches!(
            builder.add_in("app", &[]).unwrap_err(),
            SelectorError::InvalidTermKind { .. }
        ));
        assert!(matches!(
            builder.add_not_in("app", &[]).unwrap_err(),
            SelectorError::InvalidTermKind { .. }
        ));
    }

    #[test]
    fn test_add_appends_duplicate_keys() {
        let mut builder = Selector::builder();
        builder.add("app", &vals(&["a"])).unwrap();
        builder.add("app", &vals(&["b"])).unwrap();
        assert_eq!(builder.build().to_string(), "app in (a),app in (b)");
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut builder = Selector::builder();
        builder.add("app", &vals(&["a"])).unwrap();
        builder.add("tier", &vals(&["web"])).unwrap();
        builder.set("app", &vals(&["b"])).unwrap();
        // Position of the replaced term is preserved
        assert_eq!(builder.build().to_string(), "app in (b),tier in (web)");
    }

    #[test]
    fn test_set_appends_when_key_is_new() {
        let mut builder = Selector::builder();
        builder.set("app", &vals(&["a"])).unwrap();
        assert_eq!(builder.build().to_string(), "app in (a)");
    }

    #[test]
    fn test_merge_appends_after_existing_terms() {
        let mapping =
            Selector::from_mapping_str(r#"{"t1": "a", "t2": ["in", "b", "c"]}"#).unwrap();

        let mut builder = Selector::builder();
        builder.add("t3", &vals(&["z"])).unwrap();
        builder.merge(&mapping);
        assert_eq!(
            builder.build().to_string(),
            "t3 in (z),t1 in (a),t2 in (b, c)"
        );
    }

    #[test]
    fn test_merge_carries_fragments() {
        let mapping = Selector::from_mapping_str(r#"{"bar": ":present", "___": "x!=y"}"#).unwrap();

        let mut builder = Selector::builder();
        builder.present("foo").unwrap();
        builder.merge(&mapping);
        assert_eq!(builder.build().to_string(), "foo,bar,x!=y");
    }

    #[test]
    fn test_fragments_render_after_terms() {
        let mut builder = Selector::builder();
        builder.raw("env notin (dev)");
        builder.present("app").unwrap();
        assert_eq!(builder.build().to_string(), "app,env notin (dev)");
    }

    #[test]
    fn test_empty_selector_renders_empty_string() {
        assert_eq!(Selector::builder().build().to_string(), "");
    }

    #[test]
    fn test_render_is_idempotent() {
        let selector =
            Selector::from_mapping_str(r#"{"app": ["notin", "mine"], "___": "x!=y"}"#).unwrap();
        let first = selector.to_string();
        let second = selector.to_string();
        assert_eq!(first, second);
        assert_eq!(first, "app notin (mine),x!=y");
    }

    #[test]
    fn test_snapshot_leaves_builder_usable() {
        let mut builder = Selector::builder();
        builder.present("app").unwrap();
        let preview = builder.snapshot();
        assert_eq!(preview.to_string(), "app");

        builder.add("tier", &vals(&["web"])).unwrap();
        assert_eq!(builder.build().to_string(), "app,tier in (web)");
        // The earlier snapshot is unaffected
        assert_eq!(preview.to_string(), "app");
    }
}
