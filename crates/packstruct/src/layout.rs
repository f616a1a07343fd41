// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Layout builder.
//!
//! Turns the members declared on a record type into its packed byte layout:
//! field order, offsets and total size. Fields are concatenated with no
//! padding or alignment.

use crate::catalog::ByteOrder;
use crate::descriptor::FieldDescriptor;
use crate::error::{Result, StructError};
use crate::value::Value;
use std::collections::HashMap;

/// Something declared on a record type.
#[derive(Debug, Clone)]
pub enum Member {
    /// Takes part in the layout.
    Field(FieldDescriptor),
    /// A named attribute of the type that is not part of the layout.
    Constant(Value),
}

/// A field placed in a layout.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutField {
    pub name: String,
    pub descriptor: FieldDescriptor,
    /// Byte offset from the start of the record.
    pub offset: usize,
}

impl LayoutField {
    pub fn width(&self) -> usize {
        self.descriptor.width()
    }

    /// Byte range covered by the field.
    pub fn range(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.width()
    }
}

/// Resolved layout of a record type.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    fields: Vec<LayoutField>,
    byte_order: ByteOrder,
    size: usize,
}

impl Layout {
    pub fn fields(&self) -> &[LayoutField] {
        &self.fields
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Total size in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in layout order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn field(&self, name: &str) -> Option<&LayoutField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn offset_of(&self, name: &str) -> Option<usize> {
        self.field(name).map(|f| f.offset)
    }
}

/// Build the layout for `record` from its directly declared members.
///
/// Only [`Member::Field`] entries are laid out. They are ordered by creation
/// stamp (name only breaks ties between clones of one descriptor) and
/// appended after the parent's fields when `parent` is given. A name that
/// appears in both parent and child is rejected.
pub fn build_layout(
    record: &str,
    members: &HashMap<String, Member>,
    parent: Option<&Layout>,
    byte_order: ByteOrder,
) -> Result<Layout> {
    let mut declared: Vec<(&String, &FieldDescriptor)> = members
        .iter()
        .filter_map(|(name, member)| match member {
            Member::Field(descriptor) => Some((name, descriptor)),
            Member::Constant(_) => None,
        })
        .collect();
    declared.sort_by(|(a_name, a), (b_name, b)| {
        a.creation_order()
            .cmp(&b.creation_order())
            .then_with(|| a_name.cmp(b_name))
    });

    let mut fields: Vec<LayoutField> = parent.map(|p| p.fields.clone()).unwrap_or_default();
    let mut offset = parent.map_or(0, |p| p.size);

    for (name, descriptor) in declared {
        if fields.iter().any(|f| &f.name == name) {
            return Err(StructError::DuplicateField {
                record: record.to_string(),
                field: name.clone(),
            });
        }
        fields.push(LayoutField {
            name: name.clone(),
            descriptor: descriptor.clone(),
            offset,
        });
        offset = offset
            .checked_add(descriptor.width())
            .ok_or_else(|| StructError::LayoutOverflow(record.to_string()))?;
    }

    log::debug!(
        "[layout] {}: {} fields, {} bytes, {} endian",
        record,
        fields.len(),
        offset,
        byte_order
    );

    Ok(Layout {
        fields,
        byte_order,
        size: offset,
    })
}
