// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use libfuzzer_sys::fuzz_target;
use packstruct::{load_schema, CodecConfig, Record};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(registry) = load_schema(text, &CodecConfig::default()) else {
        return;
    };
    for record_type in registry.iter() {
        // Cap allocation for absurd repeat counts.
        if record_type.size() > 1 << 16 {
            continue;
        }
        if let Ok(record) = Record::zeroed(record_type) {
            let _ = record.to_bytes();
        }
    }
});
