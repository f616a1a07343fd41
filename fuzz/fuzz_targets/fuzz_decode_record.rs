// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use libfuzzer_sys::fuzz_target;
use packstruct::{ByteOrder, FieldDescriptor, PrimitiveKind, Record, RecordType};
use std::sync::{Arc, OnceLock};

fn point() -> Arc<RecordType> {
    RecordType::builder("Point")
        .primitive("x", PrimitiveKind::I16)
        .primitive("y", PrimitiveKind::I16)
        .build()
        .unwrap()
}

/// Only slots whose decoded value re-encodes to the same bytes.
fn exact() -> &'static Arc<RecordType> {
    static EXACT: OnceLock<Arc<RecordType>> = OnceLock::new();
    EXACT.get_or_init(|| {
        RecordType::builder("Shape")
            .byte_order(ByteOrder::Big)
            .field("name", FieldDescriptor::named("string").unwrap().repeat(8).unwrap())
            .primitive("mark", PrimitiveKind::Char)
            .primitive("ratio", PrimitiveKind::F64)
            .primitive("count", PrimitiveKind::U64)
            .primitive("delta", PrimitiveKind::I32)
            .field("points", FieldDescriptor::embedded(point()).repeat(3).unwrap())
            .build()
            .unwrap()
    })
}

/// Bool, pascal-string and float32 slots normalise their bytes on decode.
fn lossy() -> &'static Arc<RecordType> {
    static LOSSY: OnceLock<Arc<RecordType>> = OnceLock::new();
    LOSSY.get_or_init(|| {
        RecordType::builder("Label")
            .field("text", FieldDescriptor::named("pascal_string").unwrap().repeat(8).unwrap())
            .primitive("flag", PrimitiveKind::Bool)
            .primitive("ratio", PrimitiveKind::F32)
            .build()
            .unwrap()
    })
}

fuzz_target!(|data: &[u8]| {
    for record_type in [exact(), lossy()] {
        // Arbitrary lengths must be rejected, never panic.
        let _ = Record::from_bytes(record_type, data);
    }

    let shape = exact();
    if data.len() >= shape.size() {
        let input = &data[..shape.size()];
        let record = Record::from_bytes(shape, input).unwrap();
        assert_eq!(record.to_bytes().unwrap(), input);
        let _ = record.repr();
    }

    let label = lossy();
    if data.len() >= label.size() {
        let record = Record::from_bytes(label, &data[..label.size()]).unwrap();
        assert_eq!(record.to_bytes().unwrap().len(), label.size());
        let _ = record.repr();
    }
});
