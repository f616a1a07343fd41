// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Golden vectors: binary reference files for byte-exact layout verification.
//
// Default mode: VERIFY -- compares encoded bytes against existing .bin files.
// Regeneration: set env GOLDEN_REGEN=1 to overwrite .bin + .hex files.
//
// Each test encodes a known deterministic record and verifies byte-exact
// roundtrip: encode -> decode -> re-encode == original bytes.

#![allow(clippy::float_cmp)]
#![allow(clippy::unreadable_literal)]

use packstruct::{ByteOrder, FieldDescriptor, Record, RecordType, Value};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

const GOLDEN_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/golden");

fn is_regen_mode() -> bool {
    std::env::var("GOLDEN_REGEN").is_ok()
}

fn golden_path(name: &str, ext: &str) -> PathBuf {
    PathBuf::from(GOLDEN_DIR).join(format!("{name}.{ext}"))
}

fn write_golden(name: &str, bytes: &[u8]) {
    fs::write(golden_path(name, "bin"), bytes).unwrap();

    let mut hex = String::new();
    for (i, chunk) in bytes.chunks(16).enumerate() {
        use std::fmt::Write;
        write!(hex, "{:08x}  ", i * 16).unwrap();
        for (j, b) in chunk.iter().enumerate() {
            if j == 8 {
                hex.push(' ');
            }
            write!(hex, "{b:02x} ").unwrap();
        }
        for _ in chunk.len()..16 {
            hex.push_str("   ");
        }
        if chunk.len() <= 8 {
            hex.push(' ');
        }
        hex.push_str(" |");
        for b in chunk {
            if b.is_ascii_graphic() || *b == b' ' {
                hex.push(*b as char);
            } else {
                hex.push('.');
            }
        }
        hex.push_str("|\n");
    }
    fs::write(golden_path(name, "hex"), &hex).unwrap();
}

fn check_golden(name: &str, encoded: &[u8]) {
    if is_regen_mode() {
        write_golden(name, encoded);
        return;
    }
    let expected = fs::read(golden_path(name, "bin")).unwrap_or_else(|e| {
        panic!("Golden vector {name}.bin not found ({e}). Run with GOLDEN_REGEN=1 to generate.")
    });
    assert_eq!(
        encoded,
        &expected[..],
        "{name}: encoded bytes differ from golden .bin ({} bytes encoded vs {} expected)",
        encoded.len(),
        expected.len()
    );
}

/// Core golden vector test function.
///
/// - Encodes `record` to bytes and checks them against `name.bin`
/// - Always: decode must give back `record`, and re-encoding must be
///   byte-identical
fn golden_test(name: &str, record: &Record) -> Vec<u8> {
    let encoded = record.to_bytes().unwrap();
    check_golden(name, &encoded);

    let decoded = Record::from_bytes(record.record_type(), &encoded).unwrap();
    assert_eq!(&decoded, record, "{name}: roundtrip value mismatch");

    let re_encoded = decoded.to_bytes().unwrap();
    assert_eq!(re_encoded, encoded, "{name}: re-encoded bytes differ from original");

    encoded
}

/// Variant for records whose encoding is lossy (truncated strings).
/// Verifies encode + decode + re-encode byte stability only.
fn golden_test_bytes_only(name: &str, record: &Record) -> Vec<u8> {
    let encoded = record.to_bytes().unwrap();
    check_golden(name, &encoded);

    let decoded = Record::from_bytes(record.record_type(), &encoded).unwrap();
    assert_eq!(decoded.to_bytes().unwrap(), encoded, "{name}: not byte-stable");

    encoded
}

fn field(name: &str) -> FieldDescriptor {
    FieldDescriptor::named(name).unwrap()
}

fn point_type() -> Arc<RecordType> {
    RecordType::builder("Point")
        .field("x", field("int16"))
        .field("y", field("int16"))
        .build()
        .unwrap()
}

fn triangle(order: ByteOrder) -> Record {
    let point = point_type();
    let shape = RecordType::builder("Shape")
        .byte_order(order)
        .field("name", field("string").repeat(8).unwrap())
        .field("numpoints", field("int32"))
        .field("points", FieldDescriptor::embedded(point.clone()).repeat(4).unwrap())
        .build()
        .unwrap();
    let pts: Vec<Record> = [(0, 0), (5, 5), (10, 0), (0, 0)]
        .into_iter()
        .map(|(x, y)| Record::from_values(&point, [("x", x), ("y", y)]).unwrap())
        .collect();
    Record::from_values(
        &shape,
        [
            ("name", Value::from("Triangle")),
            ("numpoints", Value::from(3)),
            ("points", Value::from(pts)),
        ],
    )
    .unwrap()
}

#[test]
fn golden_point_le() {
    let p = Record::from_values(&point_type(), [("x", 1), ("y", 2)]).unwrap();
    let bytes = golden_test("point_le", &p);
    assert_eq!(bytes, [0x01, 0x00, 0x02, 0x00]);
}

#[test]
fn golden_shape_triangle_le() {
    let bytes = golden_test("shape_triangle_le", &triangle(ByteOrder::Little));
    assert_eq!(bytes.len(), 28);
    assert_eq!(&bytes[8..12], [3, 0, 0, 0]);
}

#[test]
fn golden_shape_triangle_be() {
    let bytes = golden_test("shape_triangle_be", &triangle(ByteOrder::Big));
    assert_eq!(&bytes[..12], b"Triangle\x00\x00\x00\x03");
    // Points stay little-endian.
    assert_eq!(&bytes[20..24], [0x0A, 0x00, 0x00, 0x00]);
}

#[test]
fn golden_tictactoe() {
    let ty = RecordType::builder("TicTacToe")
        .field("board", field("Char").repeat(3).unwrap().repeat(3).unwrap())
        .build()
        .unwrap();
    let row = |s: &[u8]| Value::List(s.iter().map(|b| Value::Bytes(vec![*b])).collect());
    let game = Record::from_values(
        &ty,
        [(
            "board",
            Value::List(vec![row(b"X.O"), row(b".X."), row(b"..O")]),
        )],
    )
    .unwrap();
    let bytes = golden_test("tictactoe", &game);
    assert_eq!(bytes, b"X.O.X...O");
}

#[test]
fn golden_point3d_le() {
    let point = point_type();
    let point3 = RecordType::builder("Point3D")
        .extends(&point)
        .field("z", field("int16"))
        .build()
        .unwrap();
    let p = Record::from_values(&point3, [("x", 1), ("y", 2), ("z", 3)]).unwrap();
    golden_test("point3d_le", &p);
}

#[test]
fn golden_primitives_be() {
    let ty = RecordType::builder("Primitives")
        .byte_order(ByteOrder::Big)
        .field("c", field("char"))
        .field("flag", field("bool"))
        .field("i8", field("int8"))
        .field("u8", field("uint8"))
        .field("i16", field("int16"))
        .field("u16", field("uint16"))
        .field("i32", field("int32"))
        .field("u32", field("uint32"))
        .field("i64", field("int64"))
        .field("u64", field("uint64"))
        .field("f32", field("float32"))
        .field("f64", field("float64"))
        .field("s", field("string").repeat(4).unwrap())
        .field("p", field("pascal_string").repeat(6).unwrap())
        .build()
        .unwrap();
    assert_eq!(ty.size(), 54);

    let r = Record::from_values(
        &ty,
        [
            ("c", Value::from("A")),
            ("flag", Value::Bool(true)),
            ("i8", Value::from(-2i8)),
            ("u8", Value::from(200u8)),
            ("i16", Value::from(-300i16)),
            ("u16", Value::from(60000u16)),
            ("i32", Value::from(-70000i32)),
            ("u32", Value::from(4_000_000_000u32)),
            ("i64", Value::from(-5i64)),
            ("u64", Value::from((1u64 << 63) + 1)),
            ("f32", Value::from(1.5f32)),
            ("f64", Value::from(-0.25f64)),
            ("s", Value::from(&b"ab\0\0"[..])),
            ("p", Value::from("hey")),
        ],
    )
    .unwrap();
    golden_test("primitives_be", &r);
}

#[test]
fn golden_pascal_truncated() {
    let ty = RecordType::builder("Label")
        .field("text", field("PascalString").repeat(4).unwrap())
        .build()
        .unwrap();
    let r = Record::from_values(&ty, [("text", "abcdef")]).unwrap();
    let bytes = golden_test_bytes_only("pascal_truncated", &r);
    assert_eq!(bytes, [3, b'a', b'b', b'c']);

    let decoded = Record::from_bytes(&ty, &bytes).unwrap();
    assert_eq!(decoded.get("text").unwrap().as_str(), Some("abc"));
}
