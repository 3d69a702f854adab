//! Shared test utilities for integration tests
//!
//! Serializes access to process environment variables so config tests that
//! set `HASHSYNC_*` or `XDG_CONFIG_HOME` do not race each other.

use std::sync::Mutex;
use tempfile::TempDir;

use hashsync::{Attributes, HashSyncStore, MemoryHost};

/// Global mutex to serialize environment variable access across all tests
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Run `f` with the given variables set, restoring the previous values after.
///
/// `XDG_CONFIG_HOME` is always pointed into `test_dir` so a developer's own
/// config file never leaks into a test.
pub fn with_env<F, R>(test_dir: &TempDir, vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());

    let mut names: Vec<&str> = vars.iter().map(|(name, _)| *name).collect();
    names.push("XDG_CONFIG_HOME");
    let saved: Vec<(String, Option<String>)> = names
        .iter()
        .map(|name| (name.to_string(), std::env::var(name).ok()))
        .collect();

    std::env::set_var("XDG_CONFIG_HOME", test_dir.path());
    for (name, value) in vars {
        std::env::set_var(name, value);
    }

    let result = f();

    for (name, value) in saved {
        match value {
            Some(value) => std::env::set_var(&name, value),
            None => std::env::remove_var(&name),
        }
    }

    result
}

/// Store over a host that was loaded with `hash`.
pub fn store_at(hash: &str) -> HashSyncStore<MemoryHost> {
    HashSyncStore::new(MemoryHost::with_fragment(hash))
}

/// Shorthand for building attributes from `(key, value)` pairs.
pub fn attrs(pairs: &[(&str, Option<&str>)]) -> Attributes {
    pairs
        .iter()
        .map(|(key, value)| (*key, value.map(str::to_string)))
        .collect()
}
