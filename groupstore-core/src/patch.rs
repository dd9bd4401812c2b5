//! Sparse patches over JSON documents.
//!
//! A patch names only the keys it changes. Each named key carries a
//! [`PatchValue`]: a new value to set, an explicit delete marker, or
//! `Unspecified`, which behaves exactly like leaving the key out.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::resource::Document;

/// What a patch does to a single key.
#[derive(Debug, Clone, PartialEq)]
pub enum PatchValue {
    /// Insert or overwrite the key with this value.
    Set(Value),
    /// Remove the key.
    Delete,
    /// Leave the key as it is.
    Unspecified,
}

impl From<Value> for PatchValue {
    fn from(value: Value) -> Self {
        PatchValue::Set(value)
    }
}

/// A sparse set of per-key changes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourcePatch {
    entries: BTreeMap<String, PatchValue>,
}

impl ResourcePatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries
            .insert(key.into(), PatchValue::Set(value.into()));
        self
    }

    /// Marks `key` for deletion.
    pub fn delete(mut self, key: impl Into<String>) -> Self {
        self.entries.insert(key.into(), PatchValue::Delete);
        self
    }

    /// Records an arbitrary entry, replacing any earlier one for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: PatchValue) {
        self.entries.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&PatchValue> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PatchValue)> {
        self.entries.iter()
    }

    /// True when applying the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.entries
            .values()
            .all(|v| matches!(v, PatchValue::Unspecified))
    }

    /// Applies the patch to `data`, returning the patched document.
    ///
    /// Depends only on its two inputs.
    pub fn apply(&self, mut data: Document) -> Document {
        for (key, value) in &self.entries {
            match value {
                PatchValue::Set(v) => {
                    data.insert(key.clone(), v.clone());
                }
                PatchValue::Delete => {
                    data.remove(key);
                }
                PatchValue::Unspecified => {}
            }
        }
        data
    }
}

impl<K: Into<String>> FromIterator<(K, PatchValue)> for ResourcePatch {
    fn from_iter<I: IntoIterator<Item = (K, PatchValue)>>(iter: I) -> Self {
        let mut patch = ResourcePatch::new();
        for (key, value) in iter {
            patch.insert(key, value);
        }
        patch
    }
}
