//! Store events and the in-process event bus.
//!
//! Subscribers receive events over `std::sync::mpsc` channels. Events are sent
//! while a reaction runs and read by the consumer afterwards, so a subscriber
//! can never re-enter the store halfway through a reconciliation.

use std::sync::mpsc::{channel, Receiver, Sender};

use serde::Serialize;

use crate::attributes::{Change, ChangeSet};

/// Notification emitted by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreEvent {
    /// A single key changed value (`change:<key>`).
    Attribute(Change),
    /// Aggregate notification covering one mutating call (`change`).
    Changes { changes: ChangeSet },
    /// An external navigation was reconciled (`hashchange`).
    HashChange { hash: String },
}

impl StoreEvent {
    /// Conventional event name, e.g. `change:page`, `change`, `hashchange`.
    pub fn name(&self) -> String {
        match self {
            StoreEvent::Attribute(change) => format!("change:{}", change.key),
            StoreEvent::Changes { .. } => "change".to_string(),
            StoreEvent::HashChange { .. } => "hashchange".to_string(),
        }
    }
}

/// Which events a subscriber receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventFilter {
    All,
    /// Per-key change events for one key.
    Key(String),
    /// Aggregate change events.
    Changes,
    HashChange,
}

impl EventFilter {
    pub fn key(key: impl Into<String>) -> Self {
        EventFilter::Key(key.into())
    }

    pub fn matches(&self, event: &StoreEvent) -> bool {
        match (self, event) {
            (EventFilter::All, _) => true,
            (EventFilter::Key(key), StoreEvent::Attribute(change)) => change.key == *key,
            (EventFilter::Changes, StoreEvent::Changes { .. }) => true,
            (EventFilter::HashChange, StoreEvent::HashChange { .. }) => true,
            _ => false,
        }
    }
}

struct Subscriber {
    filter: EventFilter,
    sender: Sender<StoreEvent>,
}

#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Subscriber>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, filter: EventFilter) -> Receiver<StoreEvent> {
        let (sender, receiver) = channel();
        self.subscribers.push(Subscriber { filter, sender });
        receiver
    }

    /// Deliver `event` to every matching subscriber and return how many got it.
    /// Subscribers whose receiver was dropped are removed.
    pub fn emit(&mut self, event: &StoreEvent) -> usize {
        let mut delivered = 0;
        self.subscribers.retain(|subscriber| {
            if !subscriber.filter.matches(event) {
                return true;
            }
            match subscriber.sender.send(event.clone()) {
                Ok(()) => {
                    delivered += 1;
                    true
                }
                Err(_) => false,
            }
        });
        delivered
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
