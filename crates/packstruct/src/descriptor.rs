// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Field descriptors: the shape of one field, independent of any value.
//!
//! A descriptor is a scalar from the catalog, a fixed-count array of another
//! descriptor, or an embedded record type. Every descriptor is stamped with a
//! creation-order id when it is constructed; the layout builder sorts on that
//! id to recover declaration order from an unordered member map.

use crate::catalog::{self, ByteOrder, PrimitiveKind};
use crate::error::{Result, StructError};
use crate::record::{Record, RecordType};
use crate::value::Value;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Monotonic source of creation-order ids.
///
/// The process-wide instance behind [`creation_clock`] stamps every
/// descriptor. Ids are unique under concurrent declaration; *ordering*
/// between two declarations is only meaningful when they happen on one
/// thread, which is how record types are declared.
#[derive(Debug)]
pub struct CreationClock {
    next: AtomicU64,
}

impl CreationClock {
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Hand out the next id.
    pub fn tick(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// Restart numbering at 1.
    ///
    /// Only call this while no record type is being declared: descriptors
    /// stamped before and after a reset no longer sort in creation order.
    pub fn reset(&self) {
        self.next.store(1, Ordering::SeqCst);
    }
}

impl Default for CreationClock {
    fn default() -> Self {
        Self::new()
    }
}

static CREATION_CLOCK: CreationClock = CreationClock::new();

/// The clock that stamps every [`FieldDescriptor`].
pub fn creation_clock() -> &'static CreationClock {
    &CREATION_CLOCK
}

/// Restart the process-wide creation order at 1.
///
/// Meant for deterministic test setups; see [`CreationClock::reset`].
pub fn reset_creation_order() {
    CREATION_CLOCK.reset();
}

/// Shape variants a field can take.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// One catalog primitive (fixed-width strings included).
    Scalar(PrimitiveKind),
    /// `count` consecutive values of `base`.
    Array {
        base: Box<FieldDescriptor>,
        count: usize,
    },
    /// A complete record type, coded with its own byte order.
    Embedded(Arc<RecordType>),
}

/// One field's shape plus its creation-order stamp.
///
/// Equality ignores the stamp.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    order: u64,
    shape: Shape,
}

impl PartialEq for FieldDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.shape == other.shape
    }
}

impl FieldDescriptor {
    fn stamped(shape: Shape) -> Self {
        Self {
            order: creation_clock().tick(),
            shape,
        }
    }

    /// Create a scalar field.
    pub fn scalar(kind: PrimitiveKind) -> Self {
        Self::stamped(Shape::Scalar(kind))
    }

    /// Create a scalar field from a catalog name (`"int16"`, `"Short"`, ...).
    pub fn named(type_name: &str) -> Result<Self> {
        Ok(Self::scalar(catalog::resolve(type_name)?))
    }

    /// Create a field embedding another record type.
    pub fn embedded(record_type: Arc<RecordType>) -> Self {
        Self::stamped(Shape::Embedded(record_type))
    }

    /// Repeat this field `count` times.
    ///
    /// Strings widen to a single string of width `count`; every other shape
    /// becomes an array, so repeating twice builds a two-dimensional array
    /// whose outer count is the last one applied.
    pub fn repeat(&self, count: usize) -> Result<Self> {
        if count == 0 || self.base_width().checked_mul(count).is_none() {
            return Err(StructError::InvalidRepeat(count));
        }
        let shape = match self.shape {
            Shape::Scalar(PrimitiveKind::String { .. }) => {
                Shape::Scalar(PrimitiveKind::String { len: count })
            }
            Shape::Scalar(PrimitiveKind::PascalString { .. }) => {
                Shape::Scalar(PrimitiveKind::PascalString { len: count })
            }
            _ => Shape::Array {
                base: Box::new(self.clone()),
                count,
            },
        };
        Ok(Self::stamped(shape))
    }

    /// Width of one repeated element: strings widen, so theirs is one byte.
    fn base_width(&self) -> usize {
        match self.shape {
            Shape::Scalar(PrimitiveKind::String { .. })
            | Shape::Scalar(PrimitiveKind::PascalString { .. }) => 1,
            _ => self.width(),
        }
    }

    /// Creation-order stamp.
    pub fn creation_order(&self) -> u64 {
        self.order
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Byte width of the field.
    pub fn width(&self) -> usize {
        match &self.shape {
            Shape::Scalar(kind) => kind.width(),
            Shape::Array { base, count } => base.width() * count,
            Shape::Embedded(record_type) => record_type.size(),
        }
    }

    /// Whether an embedded record appears anywhere in this shape.
    pub fn contains_embedded(&self) -> bool {
        match &self.shape {
            Shape::Scalar(_) => false,
            Shape::Array { base, .. } => base.contains_embedded(),
            Shape::Embedded(_) => true,
        }
    }

    /// Decode exactly `width()` bytes.
    ///
    /// Embedded records ignore `order` and use their own.
    pub fn decode(&self, order: ByteOrder, raw: &[u8]) -> Result<Value> {
        if raw.len() != self.width() {
            return Err(StructError::BufferSizeMismatch {
                expected: self.width(),
                actual: raw.len(),
            });
        }
        match &self.shape {
            Shape::Scalar(kind) => Ok(kind.decode(order, raw)),
            Shape::Array { base, count } => {
                // Element width may be zero (an embedded record with no fields).
                let step = base.width();
                let items = (0..*count)
                    .map(|i| base.decode(order, &raw[i * step..(i + 1) * step]))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Value::List(items))
            }
            Shape::Embedded(record_type) => {
                Ok(Value::Record(Record::from_bytes(record_type, raw)?))
            }
        }
    }

    /// Encode `value`, appending exactly `width()` bytes to `out`.
    ///
    /// `path` locates the slot in error messages. Embedded records ignore
    /// `order` and use their own.
    pub fn encode(
        &self,
        order: ByteOrder,
        value: &Value,
        path: &str,
        out: &mut Vec<u8>,
    ) -> Result<()> {
        match &self.shape {
            Shape::Scalar(kind) => kind.encode(order, value, path, out),
            Shape::Array { base, count } => {
                let items = match value {
                    Value::List(items) => items,
                    other => {
                        return Err(StructError::encoding(
                            path,
                            format!("expected a list of {}, got {}", count, other.kind_name()),
                        ))
                    }
                };
                if items.len() != *count {
                    return Err(StructError::ValueShapeMismatch {
                        path: path.to_string(),
                        expected: *count,
                        found: items.len(),
                    });
                }
                for (i, item) in items.iter().enumerate() {
                    base.encode(order, item, &format!("{}[{}]", path, i), out)?;
                }
                Ok(())
            }
            Shape::Embedded(record_type) => {
                let record = self.expect_record(record_type, value, path)?;
                record.encode_into(path, out)
            }
        }
    }

    /// Check that every embedded slot reachable in `value` holds a record of
    /// the declared type. Scalars and non-list array values are not checked.
    pub(crate) fn validate_nested(&self, value: &Value, path: &str) -> Result<()> {
        match &self.shape {
            Shape::Scalar(_) => Ok(()),
            Shape::Array { base, .. } => {
                if !base.contains_embedded() {
                    return Ok(());
                }
                if let Value::List(items) = value {
                    for (i, item) in items.iter().enumerate() {
                        base.validate_nested(item, &format!("{}[{}]", path, i))?;
                    }
                }
                Ok(())
            }
            Shape::Embedded(record_type) => {
                self.expect_record(record_type, value, path).map(|_| ())
            }
        }
    }

    fn expect_record<'a>(
        &self,
        record_type: &Arc<RecordType>,
        value: &'a Value,
        path: &str,
    ) -> Result<&'a Record> {
        match value {
            Value::Record(record) if record.record_type().same_type(record_type) => Ok(record),
            Value::Record(record) => Err(StructError::encoding(
                path,
                format!(
                    "expected a {} record, got a {} record",
                    record_type.name(),
                    record.record_type().name()
                ),
            )),
            other => Err(StructError::encoding(
                path,
                format!(
                    "expected a {} record, got {}",
                    record_type.name(),
                    other.kind_name()
                ),
            )),
        }
    }
}

impl fmt::Display for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.shape {
            Shape::Scalar(kind) => write!(f, "{}", kind),
            Shape::Array { base, count } => write!(f, "{}[{}]", base, count),
            Shape::Embedded(record_type) => write!(f, "{}", record_type.name()),
        }
    }
}
