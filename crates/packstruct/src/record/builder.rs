// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builder API for RecordType.

use crate::catalog::{ByteOrder, PrimitiveKind};
use crate::descriptor::FieldDescriptor;
use crate::error::{Result, StructError};
use crate::layout::{build_layout, Member};
use crate::record::RecordType;
use crate::value::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Builder for declaring a [`RecordType`].
///
/// Members are collected in a map, so the call order of `field` does not
/// decide the layout: fields are laid out by the creation stamp of their
/// descriptors (ties broken by name). Creating each descriptor inline, in
/// the order the fields should appear, gives the expected layout.
///
/// ```
/// use packstruct::{ByteOrder, FieldDescriptor, RecordType};
///
/// let point = RecordType::builder("Point")
///     .field("x", FieldDescriptor::named("int16")?)
///     .field("y", FieldDescriptor::named("int16")?)
///     .build()?;
///
/// let shape = RecordType::builder("Shape")
///     .byte_order(ByteOrder::Big)
///     .field("name", FieldDescriptor::named("string")?.repeat(8)?)
///     .field("numpoints", FieldDescriptor::named("int32")?)
///     .field("points", FieldDescriptor::embedded(point.clone()).repeat(4)?)
///     .build()?;
///
/// assert_eq!(shape.size(), 8 + 4 + 4 * 4);
/// # Ok::<(), packstruct::StructError>(())
/// ```
#[derive(Debug)]
pub struct RecordTypeBuilder {
    name: String,
    byte_order: Option<ByteOrder>,
    parent: Option<Arc<RecordType>>,
    members: HashMap<String, Member>,
    redeclared: Option<String>,
}

impl RecordTypeBuilder {
    /// Create a new builder for a record type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            byte_order: None,
            parent: None,
            members: HashMap::new(),
            redeclared: None,
        }
    }

    /// Set the byte order. Defaults to the parent's, else little-endian.
    pub fn byte_order(mut self, order: ByteOrder) -> Self {
        self.byte_order = Some(order);
        self
    }

    /// Extend `parent`: its fields come first, in its order.
    pub fn extends(mut self, parent: &Arc<RecordType>) -> Self {
        self.parent = Some(parent.clone());
        self
    }

    /// Add a field.
    pub fn field(self, name: impl Into<String>, descriptor: FieldDescriptor) -> Self {
        self.member(name.into(), Member::Field(descriptor))
    }

    /// Add a primitive field.
    pub fn primitive(self, name: impl Into<String>, kind: PrimitiveKind) -> Self {
        self.field(name, FieldDescriptor::scalar(kind))
    }

    /// Add an embedded record field.
    pub fn embed(self, name: impl Into<String>, record_type: &Arc<RecordType>) -> Self {
        self.field(name, FieldDescriptor::embedded(record_type.clone()))
    }

    /// Attach a named attribute that is not part of the layout.
    pub fn constant(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.member(name.into(), Member::Constant(value.into()))
    }

    fn member(mut self, name: String, member: Member) -> Self {
        if self.members.contains_key(&name) && self.redeclared.is_none() {
            self.redeclared = Some(name.clone());
        }
        self.members.insert(name, member);
        self
    }

    /// Resolve the layout and freeze the type.
    pub fn build(self) -> Result<Arc<RecordType>> {
        if let Some(field) = self.redeclared {
            return Err(StructError::DuplicateField {
                record: self.name,
                field,
            });
        }

        let byte_order = self
            .byte_order
            .or_else(|| self.parent.as_ref().map(|p| p.byte_order()))
            .unwrap_or_default();
        let layout = build_layout(
            &self.name,
            &self.members,
            self.parent.as_ref().map(|p| p.layout()),
            byte_order,
        )?;

        let mut constants = self
            .parent
            .as_ref()
            .map(|p| p.constants.clone())
            .unwrap_or_default();
        for (name, member) in self.members {
            if let Member::Constant(value) = member {
                constants.insert(name, value);
            }
        }

        Ok(Arc::new(RecordType {
            name: self.name,
            layout,
            constants,
            parent: self.parent,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point() -> Arc<RecordType> {
        RecordType::builder("Point")
            .primitive("x", PrimitiveKind::I16)
            .primitive("y", PrimitiveKind::I16)
            .build()
            .unwrap()
    }

    #[test]
    fn test_default_byte_order_is_little() {
        assert_eq!(point().byte_order(), ByteOrder::Little);
    }

    #[test]
    fn test_child_inherits_byte_order() {
        let parent = RecordType::builder("P")
            .byte_order(ByteOrder::Big)
            .primitive("a", PrimitiveKind::U8)
            .build()
            .unwrap();
        let child = RecordType::builder("C")
            .extends(&parent)
            .primitive("b", PrimitiveKind::U8)
            .build()
            .unwrap();
        assert_eq!(child.byte_order(), ByteOrder::Big);
        assert!(child.extends(&parent));
        assert!(!parent.extends(&child));
    }

    #[test]
    fn test_inheritance_layout() {
        let base = point();
        let p3 = RecordType::builder("Point3D")
            .extends(&base)
            .primitive("z", PrimitiveKind::I16)
            .build()
            .unwrap();
        assert_eq!(p3.field_names().collect::<Vec<_>>(), ["x", "y", "z"]);
        assert_eq!(p3.size(), base.size() + 2);
        assert_eq!(base.field_names().count(), 2);
    }

    #[test]
    fn test_redeclared_parent_field_rejected() {
        let base = point();
        let err = RecordType::builder("Bad")
            .extends(&base)
            .primitive("y", PrimitiveKind::I32)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            StructError::DuplicateField {
                record: "Bad".into(),
                field: "y".into(),
            }
        );
    }

    #[test]
    fn test_redeclared_own_field_rejected() {
        let err = RecordType::builder("Twice")
            .primitive("a", PrimitiveKind::U8)
            .constant("a", 1)
            .build()
            .unwrap_err();
        assert!(matches!(err, StructError::DuplicateField { .. }));
    }

    #[test]
    fn test_constants_inherit_and_stay_out_of_layout() {
        let base = RecordType::builder("Header")
            .constant("MAGIC", 0xCAFEu32)
            .primitive("len", PrimitiveKind::U16)
            .build()
            .unwrap();
        let child = RecordType::builder("Packet")
            .extends(&base)
            .constant("KIND", "data")
            .primitive("payload", PrimitiveKind::U32)
            .build()
            .unwrap();
        assert_eq!(child.constant("MAGIC"), Some(&Value::Int(0xCAFE)));
        assert_eq!(child.constant("KIND"), Some(&Value::from("data")));
        assert_eq!(child.size(), 6);
        assert!(base.constant("KIND").is_none());
    }

    #[test]
    fn test_equal_declarations_are_same_type() {
        let a = point();
        let b = point();
        assert!(a.same_type(&b));
        let other = RecordType::builder("Other")
            .primitive("x", PrimitiveKind::I16)
            .primitive("y", PrimitiveKind::I16)
            .build()
            .unwrap();
        assert!(!a.same_type(&other));
    }
}
