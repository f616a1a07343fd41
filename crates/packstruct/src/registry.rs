// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Name → record type lookup.
//!
//! The representation parser, the schema loader and the CLI all need to go
//! from a record type's name back to its declaration. [`TypeLookup`] is the
//! seam they depend on; [`TypeRegistry`] is the ordinary implementation.

use crate::descriptor::Shape;
use crate::record::RecordType;
use std::collections::HashMap;
use std::sync::Arc;

/// Resolves record type names.
pub trait TypeLookup {
    /// Look up a record type by name. Returns `None` if the name is unknown.
    fn lookup(&self, name: &str) -> Option<Arc<RecordType>>;
}

/// Record types keyed by name, remembering registration order.
#[derive(Debug, Default, Clone)]
pub struct TypeRegistry {
    types: HashMap<String, Arc<RecordType>>,
    order: Vec<String>,
}

impl TypeRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `record_type` under its name, along with every record type
    /// it embeds or extends that is not registered yet.
    ///
    /// Returns the type previously registered under the same name, if any.
    pub fn register(&mut self, record_type: Arc<RecordType>) -> Option<Arc<RecordType>> {
        if let Some(parent) = record_type.parent() {
            self.register_dependency(parent);
        }
        for field in record_type.layout().fields() {
            let mut shape = field.descriptor.shape();
            while let Shape::Array { base, .. } = shape {
                shape = base.shape();
            }
            if let Shape::Embedded(inner) = shape {
                self.register_dependency(inner);
            }
        }
        self.insert(record_type)
    }

    fn register_dependency(&mut self, record_type: &Arc<RecordType>) {
        if !self.types.contains_key(record_type.name()) {
            self.register(record_type.clone());
        }
    }

    fn insert(&mut self, record_type: Arc<RecordType>) -> Option<Arc<RecordType>> {
        let name = record_type.name().to_string();
        let previous = self.types.insert(name.clone(), record_type);
        if previous.is_none() {
            self.order.push(name);
        }
        previous
    }

    pub fn get(&self, name: &str) -> Option<&Arc<RecordType>> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Registered types, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<RecordType>> {
        self.order.iter().filter_map(|name| self.types.get(name))
    }

    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if no types are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeLookup for TypeRegistry {
    fn lookup(&self, name: &str) -> Option<Arc<RecordType>> {
        self.types.get(name).cloned()
    }
}

impl TypeLookup for HashMap<String, Arc<RecordType>> {
    fn lookup(&self, name: &str) -> Option<Arc<RecordType>> {
        self.get(name).cloned()
    }
}

impl FromIterator<Arc<RecordType>> for TypeRegistry {
    fn from_iter<I: IntoIterator<Item = Arc<RecordType>>>(iter: I) -> Self {
        let mut registry = Self::new();
        for record_type in iter {
            registry.register(record_type);
        }
        registry
    }
}
