// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

use crate::selector::FieldOperator;

/// One selector-building directive, as typed at the REPL or read from a
/// script line.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// `present <key>` - bare-key term
    Present { key: String },
    /// `absent <key>` - suppressed key, renders as nothing
    Absent { key: String },
    /// `add <key> [value...]` - append, implicit classification
    Add { key: String, values: Vec<String> },
    /// `set <key> [value...]` - replace the first same-key term in place
    Set { key: String, values: Vec<String> },
    /// `in <key> <value...>` - explicit in term
    In { key: String, values: Vec<String> },
    /// `notin <key> <value...>` - explicit notin term
    NotIn { key: String, values: Vec<String> },
    /// `raw <text>` - verbatim passthrough fragment
    Raw { text: String },
    /// `merge <mapping doc>` - merge a mapping-built selector
    Merge { doc: String },
    /// `field <path> <op> <value>` - append a field expression
    Field {
        path: String,
        op: FieldOperator,
        value: String,
    },
    /// `show` - list the draft terms, fragments and field expressions
    Show,
    /// `render [labels|fields|all]` - print the selector string(s)
    Render { target: RenderTarget },
    /// `reset` - discard the draft and start a new building session
    Reset,
    /// `output <raw|json|yaml>` - switch the output format
    Output { format: String },
}

/// What `render` should print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderTarget {
    #[default]
    Labels,
    Fields,
    All,
}
