// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use libfuzzer_sys::fuzz_target;
use packstruct::{
    parse_value_with, CodecConfig, FieldDescriptor, PrimitiveKind, RecordType, TypeRegistry,
};
use std::sync::OnceLock;

fn registry() -> &'static TypeRegistry {
    static REGISTRY: OnceLock<TypeRegistry> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let point = RecordType::builder("Point")
            .primitive("x", PrimitiveKind::I16)
            .primitive("y", PrimitiveKind::I16)
            .build()
            .unwrap();
        let path = RecordType::builder("Path")
            .field("tag", FieldDescriptor::named("string").unwrap().repeat(4).unwrap())
            .field("hops", FieldDescriptor::embedded(point).repeat(2).unwrap())
            .build()
            .unwrap();
        [path].into_iter().collect()
    })
}

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let config = CodecConfig {
        max_repr_depth: 16,
        ..CodecConfig::default()
    };
    if let Ok(value) = parse_value_with(text, registry(), &config) {
        // Anything that parses formats back to text that parses again.
        let again = parse_value_with(&value.to_string(), registry(), &config);
        assert!(again.is_ok());
    }
});
