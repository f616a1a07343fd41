// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Primitive type catalog.
//!
//! Maps scalar type names to a [`PrimitiveKind`], which knows its byte width
//! and how to pack/unpack a [`Value`] under a [`ByteOrder`]. Widths are the
//! standard (packed) sizes, never the host's native C sizes.
//!
//! Two naming schemes resolve to the same kinds:
//!
//! | Semantic | Alternate | Width |
//! |----------|-----------|-------|
//! | `char` | `Char` | 1 |
//! | `bool` | `Bool` | 1 |
//! | `int8` / `uint8` | `Byte` / `UnsignedByte` | 1 |
//! | `int16` / `uint16` | `Short` / `UnsignedShort` | 2 |
//! | `int32` / `uint32` | `Int`, `Long` / `UnsignedInt`, `UnsignedLong` | 4 |
//! | `int64` / `uint64` | `LongLong` / `UnsignedLongLong` | 8 |
//! | `float32` / `float64` | `Float` / `Double` | 4 / 8 |
//! | `string` | `String` | 1 (widen with `repeat`) |
//! | `pascal_string` | `PascalString` | 1 (widen with `repeat`) |

use crate::error::{Result, StructError};
use crate::value::Value;
use std::fmt;
use std::str::FromStr;

/// Byte order used to pack multi-byte primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ByteOrder {
    #[default]
    Little,
    Big,
    /// Host byte order. The layout stays packed.
    Native,
}

impl ByteOrder {
    /// Resolve `Native` to the host's concrete order.
    pub fn resolve(self) -> ByteOrder {
        match self {
            Self::Native if cfg!(target_endian = "big") => Self::Big,
            Self::Native => Self::Little,
            other => other,
        }
    }

    /// Whether multi-byte values are stored least significant byte first.
    pub fn is_little(self) -> bool {
        self.resolve() == Self::Little
    }
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Little => write!(f, "little"),
            Self::Big => write!(f, "big"),
            Self::Native => write!(f, "native"),
        }
    }
}

impl FromStr for ByteOrder {
    type Err = StructError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "little" | "le" | "<" => Ok(Self::Little),
            "big" | "be" | "network" | ">" | "!" => Ok(Self::Big),
            "native" | "@" | "=" => Ok(Self::Native),
            other => Err(StructError::Config(format!("unknown byte order: {}", other))),
        }
    }
}

/// Scalar kinds known to the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Char,
    Bool,
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    /// Opaque byte string of fixed width, zero padded or truncated.
    String { len: usize },
    /// Length-prefixed byte string of fixed total width.
    PascalString { len: usize },
}

const CATALOG: &[(&str, PrimitiveKind)] = &[
    ("char", PrimitiveKind::Char),
    ("bool", PrimitiveKind::Bool),
    ("int8", PrimitiveKind::I8),
    ("uint8", PrimitiveKind::U8),
    ("int16", PrimitiveKind::I16),
    ("uint16", PrimitiveKind::U16),
    ("int32", PrimitiveKind::I32),
    ("uint32", PrimitiveKind::U32),
    ("int64", PrimitiveKind::I64),
    ("uint64", PrimitiveKind::U64),
    ("float32", PrimitiveKind::F32),
    ("float64", PrimitiveKind::F64),
    ("string", PrimitiveKind::String { len: 1 }),
    ("pascal_string", PrimitiveKind::PascalString { len: 1 }),
    ("Char", PrimitiveKind::Char),
    ("Bool", PrimitiveKind::Bool),
    ("Byte", PrimitiveKind::I8),
    ("UnsignedByte", PrimitiveKind::U8),
    ("Short", PrimitiveKind::I16),
    ("UnsignedShort", PrimitiveKind::U16),
    ("Int", PrimitiveKind::I32),
    ("UnsignedInt", PrimitiveKind::U32),
    ("Long", PrimitiveKind::I32),
    ("UnsignedLong", PrimitiveKind::U32),
    ("LongLong", PrimitiveKind::I64),
    ("UnsignedLongLong", PrimitiveKind::U64),
    ("Float", PrimitiveKind::F32),
    ("Double", PrimitiveKind::F64),
    ("String", PrimitiveKind::String { len: 1 }),
    ("PascalString", PrimitiveKind::PascalString { len: 1 }),
];

/// The full name table, in lookup order.
pub fn catalog() -> &'static [(&'static str, PrimitiveKind)] {
    CATALOG
}

/// Look up a scalar type by name.
pub fn resolve(name: &str) -> Result<PrimitiveKind> {
    CATALOG
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, kind)| *kind)
        .ok_or_else(|| StructError::UnknownType(name.to_string()))
}

impl PrimitiveKind {
    /// Byte width of one value.
    pub fn width(&self) -> usize {
        match self {
            Self::Char | Self::Bool | Self::I8 | Self::U8 => 1,
            Self::I16 | Self::U16 => 2,
            Self::I32 | Self::U32 | Self::F32 => 4,
            Self::I64 | Self::U64 | Self::F64 => 8,
            Self::String { len } | Self::PascalString { len } => *len,
        }
    }

    pub fn is_signed(&self) -> bool {
        matches!(
            self,
            Self::I8 | Self::I16 | Self::I32 | Self::I64 | Self::F32 | Self::F64
        )
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    /// String-like kinds widen instead of becoming arrays on `repeat`.
    pub fn is_blob(&self) -> bool {
        matches!(self, Self::String { .. } | Self::PascalString { .. })
    }

    /// Canonical semantic name (without width for blobs).
    pub fn name(&self) -> &'static str {
        match self {
            Self::Char => "char",
            Self::Bool => "bool",
            Self::I8 => "int8",
            Self::U8 => "uint8",
            Self::I16 => "int16",
            Self::U16 => "uint16",
            Self::I32 => "int32",
            Self::U32 => "uint32",
            Self::I64 => "int64",
            Self::U64 => "uint64",
            Self::F32 => "float32",
            Self::F64 => "float64",
            Self::String { .. } => "string",
            Self::PascalString { .. } => "pascal_string",
        }
    }

    fn int_range(&self) -> Option<(i128, i128)> {
        let range = match self {
            Self::I8 => (i128::from(i8::MIN), i128::from(i8::MAX)),
            Self::U8 => (0, i128::from(u8::MAX)),
            Self::I16 => (i128::from(i16::MIN), i128::from(i16::MAX)),
            Self::U16 => (0, i128::from(u16::MAX)),
            Self::I32 => (i128::from(i32::MIN), i128::from(i32::MAX)),
            Self::U32 => (0, i128::from(u32::MAX)),
            Self::I64 => (i128::from(i64::MIN), i128::from(i64::MAX)),
            Self::U64 => (0, i128::from(u64::MAX)),
            _ => return None,
        };
        Some(range)
    }

    /// Unpack one value from exactly `width()` bytes.
    pub fn decode(&self, order: ByteOrder, raw: &[u8]) -> Value {
        match self {
            Self::Char => Value::Bytes(raw[..1].to_vec()),
            Self::Bool => Value::Bool(raw[0] != 0),
            Self::F32 => {
                let mut b = [0u8; 4];
                b.copy_from_slice(&raw[..4]);
                let v = if order.is_little() {
                    f32::from_le_bytes(b)
                } else {
                    f32::from_be_bytes(b)
                };
                Value::Float(f64::from(v))
            }
            Self::F64 => {
                let mut b = [0u8; 8];
                b.copy_from_slice(&raw[..8]);
                let v = if order.is_little() {
                    f64::from_le_bytes(b)
                } else {
                    f64::from_be_bytes(b)
                };
                Value::Float(v)
            }
            Self::String { len } => Value::Bytes(raw[..*len].to_vec()),
            Self::PascalString { len: 0 } => Value::Bytes(Vec::new()),
            Self::PascalString { len } => {
                let n = usize::from(raw[0]).min(len - 1);
                Value::Bytes(raw[1..1 + n].to_vec())
            }
            int_kind => {
                let width = int_kind.width();
                let mut acc: u128 = 0;
                for i in 0..width {
                    let byte = if order.is_little() {
                        raw[width - 1 - i]
                    } else {
                        raw[i]
                    };
                    acc = (acc << 8) | u128::from(byte);
                }
                let bits = width * 8;
                let value = if int_kind.is_signed() && (acc >> (bits - 1)) & 1 == 1 {
                    (acc as i128) - (1i128 << bits)
                } else {
                    acc as i128
                };
                Value::Int(value)
            }
        }
    }

    /// Pack one value, appending exactly `width()` bytes to `out`.
    ///
    /// `path` names the slot for error messages.
    pub fn encode(
        &self,
        order: ByteOrder,
        value: &Value,
        path: &str,
        out: &mut Vec<u8>,
    ) -> Result<()> {
        match self {
            Self::Char => match value {
                Value::Bytes(b) if b.len() == 1 => out.push(b[0]),
                other => {
                    return Err(StructError::encoding(
                        path,
                        format!("char requires a 1-byte value, got {}", describe(other)),
                    ))
                }
            },
            Self::Bool => match value {
                Value::Bool(b) => out.push(u8::from(*b)),
                Value::Int(i) => out.push(u8::from(*i != 0)),
                other => {
                    return Err(StructError::encoding(
                        path,
                        format!("bool requires a bool, got {}", describe(other)),
                    ))
                }
            },
            Self::F32 => {
                let v = float_of(value, path)?;
                let narrow = v as f32;
                if v.is_finite() && narrow.is_infinite() {
                    return Err(StructError::encoding(
                        path,
                        format!("{} is too large for float32", v),
                    ));
                }
                if order.is_little() {
                    out.extend_from_slice(&narrow.to_le_bytes());
                } else {
                    out.extend_from_slice(&narrow.to_be_bytes());
                }
            }
            Self::F64 => {
                let v = float_of(value, path)?;
                if order.is_little() {
                    out.extend_from_slice(&v.to_le_bytes());
                } else {
                    out.extend_from_slice(&v.to_be_bytes());
                }
            }
            Self::String { len } => {
                let bytes = blob_of(value, path)?;
                let take = bytes.len().min(*len);
                out.extend_from_slice(&bytes[..take]);
                out.resize(out.len() + (*len - take), 0);
            }
            Self::PascalString { len } => {
                let bytes = blob_of(value, path)?;
                if *len == 0 {
                    return Ok(());
                }
                let take = bytes.len().min(len - 1).min(255);
                out.push(take as u8);
                out.extend_from_slice(&bytes[..take]);
                out.resize(out.len() + (len - 1 - take), 0);
            }
            int_kind => {
                let v = int_of(value, path)?;
                let (min, max) = int_kind.int_range().unwrap_or((0, 0));
                if v < min || v > max {
                    return Err(StructError::encoding(
                        path,
                        format!("{} is out of range for {}", v, int_kind.name()),
                    ));
                }
                let width = int_kind.width();
                let le = (v as u128).to_le_bytes();
                if order.is_little() {
                    out.extend_from_slice(&le[..width]);
                } else {
                    out.extend(le[..width].iter().rev());
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String { len } | Self::PascalString { len } => {
                write!(f, "{}[{}]", self.name(), len)
            }
            _ => write!(f, "{}", self.name()),
        }
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Bytes(b) => format!("{} bytes", b.len()),
        other => other.kind_name().to_string(),
    }
}

fn int_of(value: &Value, path: &str) -> Result<i128> {
    match value {
        Value::Int(i) => Ok(*i),
        Value::Bool(b) => Ok(i128::from(*b)),
        // Floats truncate toward zero; i128 bounds saturate and the range check rejects them.
        Value::Float(f) if f.is_finite() => Ok(f.trunc() as i128),
        Value::Float(f) => Err(StructError::encoding(
            path,
            format!("{} cannot be converted to an integer", f),
        )),
        other => Err(StructError::encoding(
            path,
            format!("expected an integer, got {}", describe(other)),
        )),
    }
}

fn float_of(value: &Value, path: &str) -> Result<f64> {
    match value {
        Value::Float(f) => Ok(*f),
        Value::Int(i) => Ok(*i as f64),
        other => Err(StructError::encoding(
            path,
            format!("expected a float, got {}", describe(other)),
        )),
    }
}

fn blob_of<'a>(value: &'a Value, path: &str) -> Result<&'a [u8]> {
    match value {
        Value::Bytes(b) => Ok(b),
        other => Err(StructError::encoding(
            path,
            format!("expected bytes, got {}", describe(other)),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pack(kind: PrimitiveKind, order: ByteOrder, value: Value) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        kind.encode(order, &value, "v", &mut out)?;
        Ok(out)
    }

    #[test]
    fn test_resolve_both_naming_schemes() {
        assert_eq!(resolve("int16").unwrap(), PrimitiveKind::I16);
        assert_eq!(resolve("Short").unwrap(), PrimitiveKind::I16);
        assert_eq!(resolve("UnsignedLong").unwrap().width(), 4);
        assert_eq!(resolve("Double").unwrap(), PrimitiveKind::F64);
        assert_eq!(
            resolve("int128"),
            Err(StructError::UnknownType("int128".into()))
        );
    }

    #[test]
    fn test_widths() {
        for (name, kind) in catalog() {
            let expected = match kind.name() {
                "int64" | "uint64" | "float64" => 8,
                "int32" | "uint32" | "float32" => 4,
                "int16" | "uint16" => 2,
                _ => 1,
            };
            assert_eq!(kind.width(), expected, "width of {}", name);
        }
    }

    #[test]
    fn test_int_byte_orders() {
        let le = pack(PrimitiveKind::I32, ByteOrder::Little, Value::Int(3)).unwrap();
        assert_eq!(le, [3, 0, 0, 0]);
        let be = pack(PrimitiveKind::I32, ByteOrder::Big, Value::Int(3)).unwrap();
        assert_eq!(be, [0, 0, 0, 3]);
        let neg = pack(PrimitiveKind::I16, ByteOrder::Big, Value::Int(-2)).unwrap();
        assert_eq!(neg, [0xFF, 0xFE]);
        assert_eq!(
            PrimitiveKind::I16.decode(ByteOrder::Big, &neg),
            Value::Int(-2)
        );
        assert_eq!(
            PrimitiveKind::U16.decode(ByteOrder::Big, &neg),
            Value::Int(0xFFFE)
        );
    }

    #[test]
    fn test_u64_extremes() {
        let bytes = pack(PrimitiveKind::U64, ByteOrder::Little, Value::from(u64::MAX)).unwrap();
        assert_eq!(bytes, [0xFF; 8]);
        assert_eq!(
            PrimitiveKind::U64.decode(ByteOrder::Little, &bytes),
            Value::from(u64::MAX)
        );
        assert_eq!(
            PrimitiveKind::I64.decode(ByteOrder::Little, &bytes),
            Value::Int(-1)
        );
    }

    #[test]
    fn test_int_range_is_checked() {
        let err = pack(PrimitiveKind::U8, ByteOrder::Little, Value::Int(256)).unwrap_err();
        assert!(matches!(err, StructError::Encoding { .. }));
        let err = pack(PrimitiveKind::U32, ByteOrder::Little, Value::Int(-1)).unwrap_err();
        assert!(matches!(err, StructError::Encoding { .. }));
    }

    #[test]
    fn test_float_truncates_into_int_slot() {
        let bytes = pack(PrimitiveKind::I16, ByteOrder::Little, Value::Float(1.5)).unwrap();
        assert_eq!(bytes, [1, 0]);
        let bytes = pack(PrimitiveKind::I16, ByteOrder::Little, Value::Float(-1.9)).unwrap();
        assert_eq!(bytes, [0xFF, 0xFF]);
        assert!(pack(PrimitiveKind::I16, ByteOrder::Little, Value::Float(f64::NAN)).is_err());
    }

    #[test]
    fn test_none_is_rejected() {
        let err = pack(PrimitiveKind::I16, ByteOrder::Little, Value::None).unwrap_err();
        assert_eq!(
            err,
            StructError::Encoding {
                path: "v".into(),
                reason: "expected an integer, got none".into(),
            }
        );
    }

    #[test]
    fn test_floats() {
        let bytes = pack(PrimitiveKind::F32, ByteOrder::Big, Value::Float(1.0)).unwrap();
        assert_eq!(bytes, [0x3F, 0x80, 0, 0]);
        assert_eq!(
            PrimitiveKind::F32.decode(ByteOrder::Big, &bytes),
            Value::Float(1.0)
        );
        let bytes = pack(PrimitiveKind::F64, ByteOrder::Little, Value::Int(2)).unwrap();
        assert_eq!(f64::from_le_bytes(bytes.try_into().unwrap()), 2.0);
        assert!(pack(PrimitiveKind::F32, ByteOrder::Little, Value::Float(1e300)).is_err());
    }

    #[test]
    fn test_string_pads_and_truncates() {
        let kind = PrimitiveKind::String { len: 4 };
        assert_eq!(
            pack(kind, ByteOrder::Little, Value::from("ab")).unwrap(),
            b"ab\0\0"
        );
        assert_eq!(
            pack(kind, ByteOrder::Little, Value::from("abcdef")).unwrap(),
            b"abcd"
        );
        assert_eq!(
            kind.decode(ByteOrder::Little, b"ab\0\0"),
            Value::from(&b"ab\0\0"[..])
        );
    }

    #[test]
    fn test_pascal_string() {
        let kind = PrimitiveKind::PascalString { len: 5 };
        let bytes = pack(kind, ByteOrder::Little, Value::from("hello")).unwrap();
        assert_eq!(bytes, b"\x04hell");
        assert_eq!(kind.decode(ByteOrder::Little, &bytes), Value::from("hell"));
        let bytes = pack(kind, ByteOrder::Little, Value::from("hi")).unwrap();
        assert_eq!(bytes, b"\x02hi\0\0");
        // A corrupt prefix never reads past the field.
        assert_eq!(kind.decode(ByteOrder::Little, b"\xFFabcd"), Value::from("abcd"));
    }

    #[test]
    fn test_char_and_bool() {
        let kind = PrimitiveKind::Char;
        assert_eq!(pack(kind, ByteOrder::Little, Value::from("X")).unwrap(), b"X");
        assert!(pack(kind, ByteOrder::Little, Value::from("XY")).is_err());
        assert_eq!(
            PrimitiveKind::Bool.decode(ByteOrder::Little, &[2]),
            Value::Bool(true)
        );
    }

    #[test]
    fn test_byte_order_parsing() {
        assert_eq!("<".parse::<ByteOrder>().unwrap(), ByteOrder::Little);
        assert_eq!("BIG".parse::<ByteOrder>().unwrap(), ByteOrder::Big);
        assert_eq!("@".parse::<ByteOrder>().unwrap(), ByteOrder::Native);
        assert!("middle".parse::<ByteOrder>().is_err());
        assert_ne!(ByteOrder::Native.resolve(), ByteOrder::Native);
    }
}
