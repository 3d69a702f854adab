//! Replay a scripted session against a [`MemoryHost`].
//!
//! Each step is applied, then every navigation notification the host queued is
//! dispatched back into the store, the same way a browser would deliver
//! `hashchange` after the script yields.

use std::str::FromStr;

use serde::Serialize;
use tracing::debug;

use crate::attributes::Attributes;
use crate::codec;
use crate::config::StoreConfig;
use crate::error::HashSyncError;
use crate::events::{EventFilter, StoreEvent};
use crate::host::{Host, MemoryHost, ScrollOffset};
use crate::store::{HashSyncStore, SetOptions};

/// One scripted action.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplayStep {
    /// `set:<pairs>` merges fragment-encoded pairs.
    Set(Attributes),
    /// `unset:<key>`
    Unset(String),
    /// `navigate:<hash>` simulates an external fragment change.
    Navigate(String),
    /// `scroll:<y>` moves the viewport.
    Scroll(f64),
}

impl FromStr for ReplayStep {
    type Err = HashSyncError;

    fn from_str(step: &str) -> Result<Self, Self::Err> {
        let (action, argument) = step
            .split_once(':')
            .ok_or_else(|| HashSyncError::invalid_step(step, "expected <action>:<argument>"))?;

        match action {
            "set" => Ok(ReplayStep::Set(codec::parse(argument))),
            "unset" if argument.is_empty() => {
                Err(HashSyncError::invalid_step(step, "unset needs a key"))
            }
            "unset" => Ok(ReplayStep::Unset(argument.to_string())),
            "navigate" => Ok(ReplayStep::Navigate(argument.to_string())),
            "scroll" => argument
                .parse::<f64>()
                .map(ReplayStep::Scroll)
                .map_err(|e| HashSyncError::invalid_step(step, e.to_string())),
            other => Err(HashSyncError::invalid_step(
                step,
                format!("unknown action '{}'", other),
            )),
        }
    }
}

/// An event tagged with the 1-based step that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayEvent {
    pub step: usize,
    pub event: StoreEvent,
}

/// Everything observable after a replay.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub events: Vec<ReplayEvent>,
    pub attributes: Attributes,
    pub hash: String,
    pub scroll: ScrollOffset,
    pub writes: Vec<String>,
}

pub fn replay(
    initial: &str,
    steps: &[ReplayStep],
    config: StoreConfig,
) -> Result<ReplayReport, HashSyncError> {
    let mut store = HashSyncStore::with_config(MemoryHost::with_fragment(initial), config);
    let receiver = store.subscribe(EventFilter::All);
    let mut events = Vec::new();

    for (index, step) in steps.iter().enumerate() {
        let step_number = index + 1;
        debug!(step = step_number, ?step, "Replaying step");

        match step {
            ReplayStep::Set(attributes) => {
                store.set(attributes, SetOptions::default())?;
            }
            ReplayStep::Unset(key) => {
                store.unset(key, SetOptions::default())?;
            }
            ReplayStep::Navigate(hash) => store.host_mut().navigate(hash),
            ReplayStep::Scroll(y) => store.host_mut().set_scroll_offset(ScrollOffset::vertical(*y)),
        }

        store.dispatch_pending();
        events.extend(receiver.try_iter().map(|event| ReplayEvent {
            step: step_number,
            event,
        }));
    }

    Ok(ReplayReport {
        events,
        attributes: store.attributes().clone(),
        hash: store.hash(),
        scroll: store.host().scroll_offset(),
        writes: store.host().writes().to_vec(),
    })
}
