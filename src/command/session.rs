// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

use anyhow::{Context, Result};
use tracing::debug;

use super::ast::{Directive, RenderTarget};
use crate::selector::{
    ApiSelectors, FieldOperator, FieldSelectorBuilder, Selector, SelectorBuilder,
};

/// A selector building session: one label draft and one field draft,
/// mutated by directives until reset.
///
/// The session renders previews on demand; the drafts stay open so a
/// script or REPL session can keep accumulating afterwards.
#[derive(Debug, Default)]
pub struct SelectorSession {
    labels: SelectorBuilder,
    fields: FieldSelectorBuilder,
}

/// What a directive produced, for the caller to print.
#[derive(Debug, PartialEq)]
pub enum Outcome {
    /// A one-line confirmation (the clause just added, a merge summary).
    Ack(String),
    /// Draft listing rows for `show`: (kind, key/path, values).
    Listing(Vec<ListingRow>),
    /// Rendered selector strings for `render`.
    Rendered(ApiSelectors),
    /// The draft was discarded.
    Reset,
    /// The caller should switch its output format.
    OutputChanged(String),
}

#[derive(Debug, PartialEq)]
pub struct ListingRow {
    pub kind: String,
    pub key: String,
    pub values: String,
}

impl SelectorSession {
    pub fn new() -> SelectorSession {
        SelectorSession::default()
    }

    pub fn apply(&mut self, directive: &Directive) -> Result<Outcome> {
        match directive {
            Directive::Present { key } => {
                self.labels.present(key)?;
                Ok(Outcome::Ack(key.clone()))
            }
            Directive::Absent { key } => {
                self.labels.absent(key)?;
                Ok(Outcome::Ack(format!("{} (absent, renders as nothing)", key)))
            }
            Directive::Add { key, values } => {
                self.labels.add(key, values)?;
                Ok(Outcome::Ack(self.last_label_clause()))
            }
            Directive::Set { key, values } => {
                self.labels.set(key, values)?;
                Ok(Outcome::Ack(format!("{} (set)", key)))
            }
            Directive::In { key, values } => {
                self.labels.add_in(key, values)?;
                Ok(Outcome::Ack(self.last_label_clause()))
            }
            Directive::NotIn { key, values } => {
                self.labels.add_not_in(key, values)?;
                Ok(Outcome::Ack(self.last_label_clause()))
            }
            Directive::Raw { text } => {
                self.labels.raw(text.clone());
                Ok(Outcome::Ack(text.clone()))
            }
            Directive::Merge { doc } => {
                let other = Selector::from_mapping_str(doc)
                    .context("Could not build selector from mapping")?;
                let terms = other.terms().len();
                let fragments = other.fragments().len();
                self.labels.merge(&other);
                debug!(terms, fragments, "merged mapping selector into session");
                Ok(Outcome::Ack(format!(
                    "merged {} term{}{}",
                    terms,
                    if terms == 1 { "" } else { "s" },
                    if fragments > 0 {
                        format!(", {} fragment{}", fragments, if fragments == 1 { "" } else { "s" })
                    } else {
                        String::new()
                    }
                )))
            }
            Directive::Field { path, op, value } => {
                match op {
                    FieldOperator::Equals => self.fields.eq(path, value)?,
                    FieldOperator::NotEquals => self.fields.ne(path, value)?,
                };
                let clause = self
                    .fields
                    .exprs()
                    .last()
                    .map(ToString::to_string)
                    .unwrap_or_default();
                Ok(Outcome::Ack(clause))
            }
            Directive::Show => Ok(Outcome::Listing(self.listing())),
            Directive::Render { target } => Ok(Outcome::Rendered(self.render(*target))),
            Directive::Reset => {
                self.labels = SelectorBuilder::new();
                self.fields = FieldSelectorBuilder::new();
                Ok(Outcome::Reset)
            }
            Directive::Output { format } => Ok(Outcome::OutputChanged(format.clone())),
        }
    }

    /// Render the requested selectors from the current draft state.
    pub fn render(&self, target: RenderTarget) -> ApiSelectors {
        let labels = match target {
            RenderTarget::Labels | RenderTarget::All => {
                Some(self.labels.snapshot().to_string())
            }
            RenderTarget::Fields => None,
        };
        let fields = match target {
            RenderTarget::Fields | RenderTarget::All => {
                Some(self.fields.snapshot().to_string())
            }
            RenderTarget::Labels => None,
        };
        ApiSelectors::new(labels, fields)
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() && self.fields.is_empty()
    }

    fn listing(&self) -> Vec<ListingRow> {
        let mut rows = Vec::new();
        for term in self.labels.terms() {
            rows.push(ListingRow {
                kind: term.kind.to_string(),
                key: term.key.clone(),
                values: term.values.join(", "),
            });
        }
        for fragment in self.labels.fragments() {
            rows.push(ListingRow {
                kind: "raw".to_string(),
                key: String::new(),
                values: fragment.clone(),
            });
        }
        for expr in self.fields.exprs() {
            rows.push(ListingRow {
                kind: "field".to_string(),
                key: expr.path.to_string(),
                values: format!("{} {}", expr.op, expr.value),
            });
        }
        rows
    }

    fn last_label_clause(&self) -> String {
        self.labels
            .terms()
            .last()
            .and_then(|t| t.render())
            .unwrap_or_default()
    }
}
