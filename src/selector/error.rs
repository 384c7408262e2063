// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

use thiserror::Error;

use super::term::TermKind;

/// Errors produced while constructing selector terms and field expressions.
///
/// Construction is deliberately permissive: loose value shapes degrade to an
/// implicit `in` term instead of failing. The exceptions below are structural
/// problems that would otherwise render a malformed clause.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectorError {
    /// An explicit `in`/`notin` operator was given with no values.
    #[error("`{key}` uses an explicit `{kind}` operator but has no values")]
    InvalidTermKind { key: String, kind: TermKind },

    /// A term key must be a non-empty string.
    #[error("selector term key must not be empty")]
    EmptyKey,

    /// A field expression path must have at least one non-empty segment.
    #[error("field expression path must not be empty")]
    EmptyFieldPath,

    /// A mapping document could not be read as an ordered mapping.
    #[error("invalid selector mapping: {0}")]
    InvalidMapping(String),
}
