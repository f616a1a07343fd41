// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Record types and record instances.
//!
//! A [`RecordType`] is declared once through a [`RecordTypeBuilder`] and
//! shared as `Arc<RecordType>`. Its layout is fixed at declaration time.
//! A [`Record`] is one instance: a value for every field in the layout,
//! obtained either by decoding bytes or from an explicit value mapping.

mod builder;
mod instance;

pub use builder::RecordTypeBuilder;
pub use instance::Record;

use crate::catalog::ByteOrder;
use crate::layout::Layout;
use crate::value::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// A declared record type.
#[derive(Debug)]
pub struct RecordType {
    name: String,
    layout: Layout,
    constants: HashMap<String, Value>,
    parent: Option<Arc<RecordType>>,
}

impl PartialEq for RecordType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.layout == other.layout
    }
}

impl RecordType {
    /// Start declaring a record type.
    pub fn builder(name: impl Into<String>) -> RecordTypeBuilder {
        RecordTypeBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.layout.byte_order()
    }

    /// Total encoded size in bytes.
    pub fn size(&self) -> usize {
        self.layout.size()
    }

    /// The type this one extends, if any.
    pub fn parent(&self) -> Option<&Arc<RecordType>> {
        self.parent.as_ref()
    }

    /// Field names in layout order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.layout.names()
    }

    /// A non-field attribute declared on this type or inherited.
    pub fn constant(&self, name: &str) -> Option<&Value> {
        self.constants.get(name)
    }

    /// Identity first, structural equality as fallback.
    pub fn same_type(&self, other: &RecordType) -> bool {
        std::ptr::eq(self, other) || self == other
    }

    /// Whether `ancestor` is this type or one of its parents.
    pub fn extends(&self, ancestor: &RecordType) -> bool {
        if self.same_type(ancestor) {
            return true;
        }
        self.parent.as_ref().is_some_and(|p| p.extends(ancestor))
    }
}
