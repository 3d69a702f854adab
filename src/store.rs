//! Fragment Store
//!
//! [`HashSyncStore`] keeps an [`Attributes`] set and the host's navigation
//! fragment consistent in both directions:
//!
//! - **Attribute changes** (`set`, `unset`, or a reconciliation that changed
//!   something) rewrite the fragment with the serialized attributes.
//! - **Navigation** (the host reports the fragment changed) re-parses the
//!   fragment and reconciles the attributes against it.
//!
//! Writing the fragment raises a navigation notification of its own. The
//! equality guard at the top of [`HashSyncStore::on_navigation`] is what stops
//! that notification from feeding back into another write.
//!
//! One store is constructed per page session and owned by whatever needs it.

use std::sync::mpsc::Receiver;

use tracing::{debug, trace};

use crate::attributes::{AttrValue, Attributes, Change, ChangeSet};
use crate::codec;
use crate::config::StoreConfig;
use crate::error::HashSyncError;
use crate::events::{EventBus, EventFilter, StoreEvent};
use crate::host::Host;

/// Options for mutating calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetOptions {
    /// Suppress events and the fragment write.
    pub silent: bool,
}

impl SetOptions {
    pub fn silent() -> Self {
        Self { silent: true }
    }
}

/// Outcome of a navigation reaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    /// The fragment already matched the attributes.
    Skipped,
    /// The attributes were re-derived from the fragment.
    Applied(ChangeSet),
}

impl Reconciliation {
    pub fn is_skipped(&self) -> bool {
        matches!(self, Reconciliation::Skipped)
    }

    pub fn changes(&self) -> Option<&ChangeSet> {
        match self {
            Reconciliation::Skipped => None,
            Reconciliation::Applied(changes) => Some(changes),
        }
    }
}

/// Whether the fragment currently encodes the attribute set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Reconciled,
    Diverging,
}

/// Check that a key can be written to the fragment verbatim.
pub fn validate_key(key: &str) -> Result<(), HashSyncError> {
    let reason = if key.is_empty() {
        "key is empty"
    } else if key.contains(codec::PAIR_SEPARATOR) {
        "key contains '&'"
    } else if key.contains(codec::VALUE_SEPARATOR) {
        "key contains '='"
    } else if key.contains(codec::FRAGMENT_MARKER) {
        "key contains '#'"
    } else {
        return Ok(());
    };
    Err(HashSyncError::InvalidKey {
        key: key.to_string(),
        reason,
    })
}

pub struct HashSyncStore<H: Host> {
    host: H,
    attributes: Attributes,
    changed: ChangeSet,
    bus: EventBus,
    config: StoreConfig,
}

impl<H: Host> HashSyncStore<H> {
    pub fn new(host: H) -> Self {
        Self::with_config(host, StoreConfig::default())
    }

    /// Build the store from the host's current fragment. Nothing is written
    /// back and no events are emitted.
    pub fn with_config(host: H, config: StoreConfig) -> Self {
        let attributes = codec::parse(&host.fragment());
        debug!(
            hash = %host.fragment(),
            keys = attributes.len(),
            "Initialized fragment store"
        );
        Self {
            host,
            attributes,
            changed: ChangeSet::new(),
            bus: EventBus::new(),
            config,
        }
    }

    /// Stored value for `key`: `None` if absent, `Some(None)` if present
    /// without a value.
    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.attributes.get(key)
    }

    /// Stored value flattened to a string slice.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| v.as_deref())
    }

    /// The raw fragment as the host reports it right now, even if a
    /// navigation has not been reconciled yet.
    pub fn hash(&self) -> String {
        self.host.fragment()
    }

    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Merge `attributes` into the store. Keys not mentioned are kept.
    ///
    /// Every key is validated before anything is mutated.
    pub fn set(
        &mut self,
        attributes: &Attributes,
        options: SetOptions,
    ) -> Result<ChangeSet, HashSyncError> {
        for key in attributes.keys() {
            validate_key(key)?;
        }
        let changes = self.attributes.merge(attributes);
        self.commit(&changes, &changes, options);
        Ok(changes)
    }

    pub fn unset(&mut self, key: &str, options: SetOptions) -> Result<ChangeSet, HashSyncError> {
        validate_key(key)?;
        let mut changes = ChangeSet::new();
        if let Some(old) = self.attributes.remove(key) {
            changes.push(Change::removed(key, old));
        }
        self.commit(&changes, &changes, options);
        Ok(changes)
    }

    /// Serialization of the current attributes.
    pub fn build(&self) -> String {
        codec::serialize(&self.attributes)
    }

    pub fn pairs(&self) -> Vec<String> {
        codec::pairs(&self.attributes)
    }

    /// Encoded pairs for the keys touched by the most recent mutating call.
    /// Removed keys encode as the bare key.
    pub fn changed_pairs(&self) -> Vec<String> {
        self.changed
            .iter()
            .map(|change| codec::encode_pair(&change.key, change.new_value()))
            .collect()
    }

    pub fn subscribe(&mut self, filter: EventFilter) -> Receiver<StoreEvent> {
        self.bus.subscribe(filter)
    }

    pub fn state(&self) -> SyncState {
        if self.is_reconciled() {
            SyncState::Reconciled
        } else {
            SyncState::Diverging
        }
    }

    /// Write the serialized attributes to the fragment if they differ.
    /// Returns whether a write happened.
    pub fn sync(&mut self) -> bool {
        self.write_hash()
    }

    /// React to a navigation notification from the host.
    ///
    /// Keys missing from the new fragment are dropped without per-key events,
    /// the parsed fragment is merged with per-key events, and the whole
    /// reconciliation produces at most one aggregate event. A `hashchange`
    /// event follows whether or not anything changed.
    pub fn on_navigation(&mut self) -> Reconciliation {
        let hash = self.host.fragment();

        // Self-triggered notifications land here. Removing this check loops forever.
        if self.is_reconciled() {
            trace!(hash = %hash, "Fragment matches attributes, skipping reconciliation");
            return Reconciliation::Skipped;
        }

        let parsed = codec::parse(&hash);
        let mut changes = self.attributes.retain_keys_of(&parsed);
        let merged = self.attributes.merge(&parsed);
        changes.extend(merged.clone());

        self.commit(&merged, &changes, SetOptions::default());
        self.bus.emit(&StoreEvent::HashChange { hash: hash.clone() });

        debug!(
            hash = %hash,
            changed = changes.len(),
            "Reconciled attributes from fragment"
        );
        Reconciliation::Applied(changes)
    }

    /// Run the navigation reaction once per notification queued by the host.
    /// Returns the number of notifications handled.
    pub fn dispatch_pending(&mut self) -> usize {
        let mut handled = 0;
        loop {
            let pending = self.host.take_navigations();
            if pending == 0 {
                break;
            }
            for _ in 0..pending {
                self.on_navigation();
            }
            handled += pending;
        }
        handled
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    fn is_reconciled(&self) -> bool {
        codec::strip_marker(&self.host.fragment()) == self.build()
    }

    /// Record a mutation and, unless silent, notify and rewrite the fragment.
    /// `per_key` is the subset of `aggregate` that gets `change:<key>` events.
    fn commit(&mut self, per_key: &ChangeSet, aggregate: &ChangeSet, options: SetOptions) {
        self.changed = aggregate.clone();
        if options.silent || aggregate.is_empty() {
            return;
        }

        for change in per_key {
            self.bus.emit(&StoreEvent::Attribute(change.clone()));
        }
        self.bus.emit(&StoreEvent::Changes {
            changes: aggregate.clone(),
        });

        self.write_hash();
    }

    fn write_hash(&mut self) -> bool {
        if self.is_reconciled() {
            return false;
        }

        let hash = self.build();
        // Clearing the fragment scrolls the viewport to the top.
        let saved = if hash.is_empty() && self.config.preserve_scroll_on_empty {
            Some(self.host.scroll_offset())
        } else {
            None
        };

        self.host.set_fragment(&hash);

        if let Some(offset) = saved {
            self.host.set_scroll_offset(offset);
        }
        trace!(hash = %hash, "Wrote fragment");
        true
    }
}

impl<H: Host + std::fmt::Debug> std::fmt::Debug for HashSyncStore<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashSyncStore")
            .field("host", &self.host)
            .field("attributes", &self.attributes)
            .field("bus", &self.bus)
            .finish()
    }
}
