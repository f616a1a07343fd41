// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Declarative schema files.
//!
//! Record types can be declared in TOML instead of code. Each `[[record]]`
//! table names a type, optionally its byte order and a parent to extend, and
//! lists its fields in layout order. Field types are catalog names or names
//! of records declared earlier in the file, followed by any number of
//! `[n]` repeats.
//!
//! ```toml
//! byte_order = "little"        # default for records that do not say
//!
//! [[record]]
//! name = "Point"
//! fields = [
//!     { name = "x", type = "int16" },
//!     { name = "y", type = "int16" },
//! ]
//!
//! [[record]]
//! name = "Shape"
//! byte_order = "big"
//! constants = { MAX_POINTS = 4 }
//! fields = [
//!     { name = "name", type = "string[8]" },
//!     { name = "numpoints", type = "int32" },
//!     { name = "points", type = "Point[4]" },
//! ]
//! ```

use crate::catalog::{self, ByteOrder};
use crate::config::CodecConfig;
use crate::descriptor::FieldDescriptor;
use crate::error::{Result, StructError};
use crate::record::RecordType;
use crate::registry::{TypeLookup, TypeRegistry};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Parsed schema file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaFile {
    /// Byte order for records that do not declare one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub byte_order: Option<String>,

    /// Record declarations, in file order.
    #[serde(default, rename = "record")]
    pub records: Vec<RecordDecl>,
}

/// One `[[record]]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordDecl {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub byte_order: Option<String>,

    /// Name of a previously declared record to extend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,

    #[serde(default)]
    pub fields: Vec<FieldDecl>,

    /// Non-field attributes of the type.
    #[serde(default, skip_serializing_if = "toml::Table::is_empty")]
    pub constants: toml::Table,
}

/// One entry of a record's `fields` array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: String,

    /// Type expression such as `int16`, `string[8]` or `Point[4]`.
    #[serde(rename = "type")]
    pub type_expr: String,
}

impl SchemaFile {
    /// Parse schema text.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| StructError::Schema(e.to_string()))
    }

    /// Load a schema from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| StructError::Schema(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_toml(&content)
    }

    /// Declare every record type, in file order.
    pub fn build(&self, config: &CodecConfig) -> Result<TypeRegistry> {
        let default_order = match &self.byte_order {
            Some(order) => parse_byte_order(order, "schema")?,
            None => config.default_byte_order,
        };

        let mut registry = TypeRegistry::new();
        for decl in &self.records {
            if registry.contains(&decl.name) {
                return Err(StructError::Schema(format!(
                    "record `{}` declared twice",
                    decl.name
                )));
            }
            let record_type = decl.build(&registry, default_order)?;
            registry.register(record_type);
        }

        log::debug!("[schema] loaded {} record types", registry.len());
        Ok(registry)
    }
}

impl RecordDecl {
    fn build(&self, types: &dyn TypeLookup, default_order: ByteOrder) -> Result<Arc<RecordType>> {
        let mut builder = RecordType::builder(&self.name);

        match (&self.byte_order, &self.extends) {
            (Some(order), _) => builder = builder.byte_order(parse_byte_order(order, &self.name)?),
            // Children inherit the parent's order unless they state one.
            (None, Some(_)) => {}
            (None, None) => builder = builder.byte_order(default_order),
        }

        if let Some(parent_name) = &self.extends {
            let parent = types.lookup(parent_name).ok_or_else(|| {
                StructError::Schema(format!(
                    "record `{}` extends unknown record `{}`",
                    self.name, parent_name
                ))
            })?;
            builder = builder.extends(&parent);
        }

        for field in &self.fields {
            builder = builder.field(&field.name, parse_type_expr(&field.type_expr, types)?);
        }

        for (name, value) in &self.constants {
            builder = builder.constant(name, constant_value(value)?);
        }

        builder.build()
    }
}

/// Load a registry from schema text.
pub fn load_schema(text: &str, config: &CodecConfig) -> Result<TypeRegistry> {
    SchemaFile::from_toml(text)?.build(config)
}

/// Load a registry from a schema file.
pub fn load_schema_file<P: AsRef<Path>>(path: P, config: &CodecConfig) -> Result<TypeRegistry> {
    SchemaFile::from_file(path)?.build(config)
}

/// Resolve a type expression (`base[n][m]...`) into a field descriptor.
///
/// `base` is looked up in the catalog first, then in `types`.
pub fn parse_type_expr(expr: &str, types: &dyn TypeLookup) -> Result<FieldDescriptor> {
    let expr = expr.trim();
    let (base, mut rest) = match expr.find('[') {
        Some(i) => (expr[..i].trim(), &expr[i..]),
        None => (expr, ""),
    };
    if base.is_empty() {
        return Err(StructError::Schema(format!(
            "missing base type in `{}`",
            expr
        )));
    }

    let mut descriptor = match catalog::resolve(base) {
        Ok(kind) => FieldDescriptor::scalar(kind),
        Err(_) => match types.lookup(base) {
            Some(record_type) => FieldDescriptor::embedded(record_type),
            None => return Err(StructError::UnknownType(base.to_string())),
        },
    };

    while !rest.is_empty() {
        let (inner, end) = rest
            .strip_prefix('[')
            .and_then(|r| r.find(']').map(|end| (r, end)))
            .ok_or_else(|| StructError::Schema(format!("malformed repeat in `{}`", expr)))?;
        let count: usize = inner[..end].trim().parse().map_err(|_| {
            StructError::Schema(format!(
                "invalid repeat count `{}` in `{}`",
                &inner[..end],
                expr
            ))
        })?;
        descriptor = descriptor.repeat(count)?;
        rest = inner[end + 1..].trim_start();
    }

    Ok(descriptor)
}

fn parse_byte_order(text: &str, owner: &str) -> Result<ByteOrder> {
    text.parse()
        .map_err(|_| StructError::Schema(format!("{}: unknown byte order `{}`", owner, text)))
}

fn constant_value(value: &toml::Value) -> Result<Value> {
    match value {
        toml::Value::Integer(v) => Ok(Value::Int(i128::from(*v))),
        toml::Value::Float(v) => Ok(Value::Float(*v)),
        toml::Value::Boolean(v) => Ok(Value::Bool(*v)),
        toml::Value::String(v) => Ok(Value::Bytes(v.as_bytes().to_vec())),
        toml::Value::Array(items) => items
            .iter()
            .map(constant_value)
            .collect::<Result<Vec<_>>>()
            .map(Value::List),
        other => Err(StructError::Schema(format!(
            "unsupported constant of type {}",
            other.type_str()
        ))),
    }
}
