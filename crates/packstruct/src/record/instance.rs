// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Record instances: decode, construct, access, serialize.

use crate::error::{Result, StructError};
use crate::record::RecordType;
use crate::value::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// One instance of a [`RecordType`].
///
/// Holds exactly one value per layout field, in layout order. The set of
/// field names is fixed by the type; the values are freely mutable through
/// [`Record::set`] and are only checked against their slots when the record
/// is serialized.
#[derive(Clone)]
pub struct Record {
    record_type: Arc<RecordType>,
    values: Vec<Value>,
}

impl Record {
    /// Decode `buf`, which must be exactly `record_type.size()` bytes.
    pub fn from_bytes(record_type: &Arc<RecordType>, buf: &[u8]) -> Result<Self> {
        let layout = record_type.layout();
        if buf.len() != layout.size() {
            return Err(StructError::BufferSizeMismatch {
                expected: layout.size(),
                actual: buf.len(),
            });
        }

        let order = layout.byte_order();
        let mut values = Vec::with_capacity(layout.len());
        for field in layout.fields() {
            let value = field.descriptor.decode(order, &buf[field.range()])?;
            log::trace!(
                "[record] decode {}.{} @{}: {:?}",
                record_type.name(),
                field.name,
                field.offset,
                value
            );
            values.push(value);
        }

        Ok(Self {
            record_type: record_type.clone(),
            values,
        })
    }

    /// Decode `buf`, then overwrite individual fields.
    ///
    /// Overrides are applied last-write-wins with no validation. Names that
    /// are not fields of the type are skipped.
    pub fn from_bytes_with<I, K, V>(
        record_type: &Arc<RecordType>,
        buf: &[u8],
        overrides: I,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut record = Self::from_bytes(record_type, buf)?;
        for (name, value) in overrides {
            let name = name.as_ref();
            match record_type.layout().index_of(name) {
                Some(index) => record.values[index] = value.into(),
                None => log::debug!(
                    "[record] {}: ignoring override for unknown field `{}`",
                    record_type.name(),
                    name
                ),
            }
        }
        Ok(record)
    }

    /// Decode an all-zero buffer.
    pub fn zeroed(record_type: &Arc<RecordType>) -> Result<Self> {
        Self::from_bytes(record_type, &vec![0u8; record_type.size()])
    }

    /// Build an instance from a complete name → value mapping.
    ///
    /// The supplied names must be exactly the layout's names. Missing names
    /// are reported before extra ones. Scalar values are stored as given;
    /// embedded slots must already hold records of the declared type.
    ///
    /// ```
    /// use packstruct::{PrimitiveKind, Record, RecordType, StructError};
    ///
    /// let point = RecordType::builder("Point")
    ///     .primitive("x", PrimitiveKind::I16)
    ///     .primitive("y", PrimitiveKind::I16)
    ///     .build()?;
    ///
    /// let p = Record::from_values(&point, [("x", 1), ("y", 2)])?;
    /// assert_eq!(p.to_bytes()?, [1, 0, 2, 0]);
    ///
    /// let err = Record::from_values(&point, [("x", 1)]).unwrap_err();
    /// assert_eq!(err, StructError::MissingValue(vec!["y".into()]));
    /// # Ok::<(), StructError>(())
    /// ```
    pub fn from_values<I, K, V>(record_type: &Arc<RecordType>, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut supplied: HashMap<String, Value> = HashMap::new();
        let mut supplied_order: Vec<String> = Vec::new();
        for (name, value) in values {
            let name = name.into();
            if supplied.insert(name.clone(), value.into()).is_none() {
                supplied_order.push(name);
            }
        }

        let layout = record_type.layout();
        let missing: Vec<String> = layout
            .names()
            .filter(|name| !supplied.contains_key(*name))
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(StructError::MissingValue(missing));
        }
        let extra: Vec<String> = supplied_order
            .into_iter()
            .filter(|name| layout.index_of(name).is_none())
            .collect();
        if !extra.is_empty() {
            return Err(StructError::ExtraValue(extra));
        }

        let mut ordered = Vec::with_capacity(layout.len());
        for field in layout.fields() {
            let value = supplied.remove(&field.name).unwrap_or(Value::None);
            field.descriptor.validate_nested(&value, &field.name)?;
            ordered.push(value);
        }

        Ok(Self {
            record_type: record_type.clone(),
            values: ordered,
        })
    }

    pub fn record_type(&self) -> &Arc<RecordType> {
        &self.record_type
    }

    pub fn type_name(&self) -> &str {
        self.record_type.name()
    }

    /// Current value of a field.
    pub fn get(&self, name: &str) -> Result<&Value> {
        let index = self.index(name)?;
        Ok(&self.values[index])
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut Value> {
        let index = self.index(name)?;
        Ok(&mut self.values[index])
    }

    /// Replace a field's value. The value is not checked until serialization.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let index = self.index(name)?;
        self.values[index] = value.into();
        Ok(())
    }

    /// Values in layout order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// `(name, value)` pairs in layout order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.record_type.layout().names().zip(self.values.iter())
    }

    /// Encode every field in layout order.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.record_type.size());
        self.encode_into("", &mut out)?;
        Ok(out)
    }

    /// Encoded bytes of a single field.
    pub fn field_bytes(&self, name: &str) -> Result<Vec<u8>> {
        let index = self.index(name)?;
        let field = &self.record_type.layout().fields()[index];
        let mut out = Vec::with_capacity(field.width());
        field.descriptor.encode(
            self.record_type.byte_order(),
            &self.values[index],
            &field.name,
            &mut out,
        )?;
        Ok(out)
    }

    /// Append the encoding to `out`. Nested field paths are `prefix.field`.
    pub(crate) fn encode_into(&self, prefix: &str, out: &mut Vec<u8>) -> Result<()> {
        let order = self.record_type.byte_order();
        for (field, value) in self.record_type.layout().fields().iter().zip(&self.values) {
            let path = if prefix.is_empty() {
                field.name.clone()
            } else {
                format!("{}.{}", prefix, field.name)
            };
            log::trace!("[record] encode {} @{}", path, out.len());
            field.descriptor.encode(order, value, &path, out)?;
        }
        Ok(())
    }

    /// Textual form that parses back into an equal record.
    pub fn repr(&self) -> String {
        crate::repr::format_record(self)
    }

    fn index(&self, name: &str) -> Result<usize> {
        self.record_type
            .layout()
            .index_of(name)
            .ok_or_else(|| StructError::UnknownField {
                record: self.record_type.name().to_string(),
                field: name.to_string(),
            })
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.record_type.same_type(&other.record_type) && self.values == other.values
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(self.record_type.name());
        for (name, value) in self.fields() {
            s.field(name, value);
        }
        s.finish()
    }
}
