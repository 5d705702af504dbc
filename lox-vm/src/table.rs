// lox-vm - Bytecode compiler and virtual machine for the Lox programming language
// Copyright (c) 2025 The lox contributors. MIT licensed.

//! Global variable table.

use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::value::Value;

/// A mapping from variable name to value, compared by string content.
#[derive(Debug, Clone, Default)]
pub struct Table {
    entries: FxHashMap<Rc<str>, Value>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a value by name.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Insert or overwrite an entry. Returns `true` if the key was new.
    pub fn set(&mut self, key: Rc<str>, value: Value) -> bool {
        self.entries.insert(key, value).is_none()
    }

    /// Remove an entry. Returns `true` if a key was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Copy every entry of this table into `to`, overwriting existing keys.
    pub fn add_all(&self, to: &mut Table) {
        for (key, value) in &self.entries {
            to.set(Rc::clone(key), value.clone());
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
