// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codec configuration.
//!
//! Defaults can be overridden from the environment:
//!
//! - `PACKSTRUCT_BYTE_ORDER`: byte order for schema-declared record types that
//!   do not state one (`little`, `big`, `native`, or `<`, `>`, `@`; default
//!   little)
//! - `PACKSTRUCT_MAX_REPR_DEPTH`: nesting limit when parsing representation
//!   text (default 64)
//!
//! Record types declared with [`RecordTypeBuilder`](crate::RecordTypeBuilder)
//! never consult this configuration.
//!
//! # Example
//!
//! ```bash
//! export PACKSTRUCT_BYTE_ORDER=big
//! export PACKSTRUCT_MAX_REPR_DEPTH=16
//! ```

use crate::catalog::ByteOrder;
use crate::error::{Result, StructError};
use std::env;

/// Environment variable names
pub const ENV_BYTE_ORDER: &str = "PACKSTRUCT_BYTE_ORDER";
pub const ENV_MAX_REPR_DEPTH: &str = "PACKSTRUCT_MAX_REPR_DEPTH";

pub const DEFAULT_MAX_REPR_DEPTH: usize = 64;

/// Runtime configuration for schema loading and representation parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecConfig {
    /// Byte order for schema record types that do not declare one
    pub default_byte_order: ByteOrder,

    /// Maximum list/record nesting accepted by the representation parser
    pub max_repr_depth: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            default_byte_order: ByteOrder::Little,
            max_repr_depth: DEFAULT_MAX_REPR_DEPTH,
        }
    }
}

impl CodecConfig {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_overrides(|key| env::var(key).ok())?;
        Ok(config)
    }

    /// Apply overrides from `lookup`, keyed by the `ENV_*` names.
    ///
    /// Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(order) = var(ENV_BYTE_ORDER) {
            self.default_byte_order = order.parse().map_err(|_| {
                StructError::Config(format!("{}: invalid value `{}`", ENV_BYTE_ORDER, order))
            })?;
        }

        if let Some(depth) = var(ENV_MAX_REPR_DEPTH) {
            let parsed: usize = depth.trim().parse().map_err(|_| {
                StructError::Config(format!("{}: invalid value `{}`", ENV_MAX_REPR_DEPTH, depth))
            })?;
            if parsed == 0 {
                return Err(StructError::Config(format!(
                    "{}: must be at least 1",
                    ENV_MAX_REPR_DEPTH
                )));
            }
            self.max_repr_depth = parsed;
        }

        log::debug!(
            "[config] byte order {}, max repr depth {}",
            self.default_byte_order,
            self.max_repr_depth
        );
        Ok(())
    }
}
