// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # packstruct - declarative packed binary records
//!
//! Describe a fixed-layout binary record as named, typed fields and get,
//! from that one description, its byte layout, a decoder and an encoder that
//! round-trips exactly.
//!
//! Fields are catalog primitives, fixed-size (and multi-dimensional) arrays,
//! or embedded records that keep their own byte order. Records are packed:
//! no padding or alignment is ever inserted.
//!
//! ## Quick Start
//!
//! ```rust
//! use packstruct::{ByteOrder, FieldDescriptor, Record, RecordType, Value};
//!
//! # fn main() -> packstruct::Result<()> {
//! let point = RecordType::builder("Point")
//!     .field("x", FieldDescriptor::named("int16")?)
//!     .field("y", FieldDescriptor::named("int16")?)
//!     .build()?;
//!
//! let shape = RecordType::builder("Shape")
//!     .byte_order(ByteOrder::Big)
//!     .field("name", FieldDescriptor::named("string")?.repeat(8)?)
//!     .field("numpoints", FieldDescriptor::named("int32")?)
//!     .field("points", FieldDescriptor::embedded(point.clone()).repeat(4)?)
//!     .build()?;
//!
//! let pt = |x: i16, y: i16| Record::from_values(&point, [("x", x), ("y", y)]);
//! let triangle = Record::from_values(
//!     &shape,
//!     [
//!         ("name", Value::from("Triangle")),
//!         ("numpoints", Value::from(3)),
//!         ("points", Value::from(vec![pt(0, 0)?, pt(5, 5)?, pt(10, 0)?, pt(0, 0)?])),
//!     ],
//! )?;
//!
//! let bytes = triangle.to_bytes()?;
//! assert_eq!(&bytes[..12], b"Triangle\x00\x00\x00\x03");
//! // Points keep their own little-endian order inside a big-endian shape.
//! assert_eq!(&bytes[16..20], [5, 0, 5, 0]);
//!
//! assert_eq!(Record::from_bytes(&shape, &bytes)?, triangle);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! | Module | Role |
//! |--------|------|
//! | [`catalog`] | Primitive kinds, their names, widths and pack rules |
//! | [`descriptor`] | Field shapes: scalar, array, embedded record |
//! | [`layout`] | Ordered, packed field offsets for a record type |
//! | [`record`] | Record types, their builder, and instances |
//! | [`repr`] | Reconstructible text form of records |
//! | [`registry`] | Name → record type lookup |
//! | [`schema`] | Record types declared in TOML (feature `schema`) |
//! | [`config`] | Environment-driven defaults |

pub mod catalog;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod layout;
pub mod record;
pub mod registry;
pub mod repr;
#[cfg(feature = "schema")]
pub mod schema;
pub mod value;


pub use catalog::{ByteOrder, PrimitiveKind};
pub use config::CodecConfig;
pub use descriptor::{reset_creation_order, FieldDescriptor, Shape};
pub use error::{Result, StructError};
pub use layout::{Layout, LayoutField};
pub use record::{Record, RecordType, RecordTypeBuilder};
pub use registry::{TypeLookup, TypeRegistry};
pub use repr::{parse_record, parse_record_with, parse_value, parse_value_with};
#[cfg(feature = "schema")]
pub use schema::{load_schema, load_schema_file, parse_type_expr, SchemaFile};
pub use value::Value;
