//! Attribute set and change bookkeeping.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Attribute value. `None` means the key is present without a value.
pub type AttrValue = Option<String>;

/// Insertion-ordered key/value attribute set.
///
/// Equality ignores order; iteration (and therefore serialization) follows
/// insertion order. Empty string values are stored as `None`, since the
/// fragment cannot tell the two apart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes {
    entries: IndexMap<String, AttrValue>,
}

fn normalize(value: AttrValue) -> AttrValue {
    value.filter(|v| !v.is_empty())
}

impl Attributes {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Builder form of [`Attributes::insert`] with a value.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, Some(value.into()));
        self
    }

    /// Builder form of [`Attributes::insert`] with a null value.
    pub fn with_null(mut self, key: impl Into<String>) -> Self {
        self.insert(key, None);
        self
    }

    /// Insert or overwrite a key, returning the previous value if it existed.
    pub fn insert(&mut self, key: impl Into<String>, value: AttrValue) -> Option<AttrValue> {
        self.entries.insert(key.into(), normalize(value))
    }

    /// Remove a key, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<AttrValue> {
        self.entries.shift_remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merge `other` into `self`, overwriting existing values.
    ///
    /// Keys missing from `other` are left alone. Returns one [`Change`] per key
    /// whose value actually changed, in `other`'s order.
    pub fn merge(&mut self, other: &Attributes) -> ChangeSet {
        let mut changes = ChangeSet::new();
        for (key, value) in other.iter() {
            let value = normalize(value.clone());
            let old = self.entries.get(key).cloned();
            if old.as_ref() == Some(&value) {
                continue;
            }
            self.entries.insert(key.to_string(), value.clone());
            changes.push(Change {
                key: key.to_string(),
                old,
                new: Some(value),
            });
        }
        changes
    }

    /// Remove every key that `other` does not contain.
    pub fn retain_keys_of(&mut self, other: &Attributes) -> ChangeSet {
        let stale: Vec<String> = self
            .entries
            .keys()
            .filter(|key| !other.contains_key(key))
            .cloned()
            .collect();

        let mut changes = ChangeSet::new();
        for key in stale {
            if let Some(old) = self.entries.shift_remove(&key) {
                changes.push(Change::removed(key, old));
            }
        }
        changes
    }
}

impl<K: Into<String>> FromIterator<(K, AttrValue)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, AttrValue)>>(iter: I) -> Self {
        let mut attributes = Attributes::new();
        for (key, value) in iter {
            attributes.insert(key, value);
        }
        attributes
    }
}

/// One key's transition. The outer `Option` on `old`/`new` is `None` when the
/// key was absent on that side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Change {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old: Option<AttrValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new: Option<AttrValue>,
}

impl Change {
    pub fn removed(key: impl Into<String>, old: AttrValue) -> Self {
        Self {
            key: key.into(),
            old: Some(old),
            new: None,
        }
    }

    pub fn is_removal(&self) -> bool {
        self.new.is_none()
    }

    /// The new value flattened to a string slice, if any.
    pub fn new_value(&self) -> Option<&str> {
        self.new.as_ref().and_then(|v| v.as_deref())
    }
}

/// Changes produced by a single mutating call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ChangeSet {
    changes: Vec<Change>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, change: Change) {
        self.changes.push(change);
    }

    pub fn extend(&mut self, other: ChangeSet) {
        self.changes.extend(other.changes);
    }

    pub fn get(&self, key: &str) -> Option<&Change> {
        self.changes.iter().find(|c| c.key == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.changes.iter().map(|c| c.key.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Change> {
        self.changes.iter()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

impl<'a> IntoIterator for &'a ChangeSet {
    type Item = &'a Change;
    type IntoIter = std::slice::Iter<'a, Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.iter()
    }
}
