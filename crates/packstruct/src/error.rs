// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types shared by every layer of the codec.

use thiserror::Error;

/// Errors raised while declaring record types, building records, or moving
/// them to and from bytes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StructError {
    /// The type catalog has no entry under this name.
    #[error("unknown type: {0}")]
    UnknownType(String),

    /// A list value does not have the element count its array declares.
    #[error("value shape mismatch at `{path}`: expected {expected} elements, got {found}")]
    ValueShapeMismatch {
        path: String,
        expected: usize,
        found: usize,
    },

    /// A value cannot be packed into its slot.
    #[error("cannot encode `{path}`: {reason}")]
    Encoding { path: String, reason: String },

    /// A decode buffer does not have exactly the layout's size.
    #[error("buffer size mismatch: layout needs {expected} bytes, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// Value-based construction left these fields without a value.
    #[error("missing values for fields: {}", .0.join(", "))]
    MissingValue(Vec<String>),

    /// Value-based construction supplied names the layout does not declare.
    #[error("values supplied for undeclared fields: {}", .0.join(", "))]
    ExtraValue(Vec<String>),

    /// A field name is declared twice (directly or through `extends`).
    #[error("record `{record}` declares field `{field}` more than once")]
    DuplicateField { record: String, field: String },

    /// `repeat(0)`, or a count whose total width does not fit in `usize`.
    #[error("invalid repeat count {0}")]
    InvalidRepeat(usize),

    /// The fields of a record add up to more bytes than `usize` can address.
    #[error("record `{0}` is too large to lay out")]
    LayoutOverflow(String),

    /// Field access by a name the layout does not contain.
    #[error("record `{record}` has no field `{field}`")]
    UnknownField { record: String, field: String },

    /// Malformed representation text.
    #[error("parse error at offset {offset}: {reason}")]
    Parse { offset: usize, reason: String },

    /// Malformed schema document.
    #[error("schema error: {0}")]
    Schema(String),

    /// Malformed configuration override.
    #[error("configuration error: {0}")]
    Config(String),
}

impl StructError {
    pub(crate) fn encoding(path: &str, reason: impl Into<String>) -> Self {
        Self::Encoding {
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn parse(offset: usize, reason: impl Into<String>) -> Self {
        Self::Parse {
            offset,
            reason: reason.into(),
        }
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, StructError>;
