//! Hashsync: URL Fragment State Synchronization
//!
//! Mirrors a flat key/value attribute set into the address-bar fragment
//! (`#page=2&debug&q=hello%20world`) and back. Changing an attribute rewrites
//! the fragment; an external fragment change (navigation, manual edit,
//! back/forward) is reconciled into the attributes.

pub mod attributes;
pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod events;
pub mod host;
pub mod logging;
pub mod store;

pub use attributes::{AttrValue, Attributes, Change, ChangeSet};
pub use error::HashSyncError;
pub use events::{EventBus, EventFilter, StoreEvent};
pub use host::{Host, MemoryHost, ScrollOffset};
pub use store::{HashSyncStore, Reconciliation, SetOptions, SyncState};
