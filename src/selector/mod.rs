// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Selector string construction for the Kubernetes API.
//!
//! Label selectors are built from terms (`key`, `key in (a, b)`,
//! `key notin (a, b)`) plus opaque raw fragments; field selectors from
//! dot-path expressions (`status.phase==Running`). Both follow the same
//! two-state lifecycle: a mutable builder, then a sealed value whose
//! rendering is pure and safe to share.

mod builder;
mod error;
mod fields;
mod term;

pub use builder::{RAW_SENTINEL_KEY, Selector, SelectorBuilder};
pub use error::SelectorError;
pub use fields::{FieldExpr, FieldOperator, FieldPath, FieldSelector, FieldSelectorBuilder};
pub use term::{ABSENT_SENTINEL, PRESENT_SENTINEL, Term, TermKind, to_display_string};

use serde::Serialize;

/// Parameters to push down to the Kubernetes API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApiSelectors {
    /// Label selector string (e.g., "app in (nginx),version")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_selector: Option<String>,
    /// Field selector string (e.g., "status.phase==Running")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_selector: Option<String>,
}

impl ApiSelectors {
    /// Wrap rendered selectors, mapping empty renders to `None`.
    pub fn new(label_selector: Option<String>, field_selector: Option<String>) -> ApiSelectors {
        ApiSelectors {
            label_selector: label_selector.filter(|s| !s.is_empty()),
            field_selector: field_selector.filter(|s| !s.is_empty()),
        }
    }
}
