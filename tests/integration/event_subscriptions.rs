//! Subscriber-facing notification contract.

use hashsync::{Attributes, Change, EventFilter, SetOptions, StoreEvent};

use super::test_utils::store_at;

#[test]
fn test_key_subscription_sees_old_and_new_values() {
    let mut store = store_at("page=1");
    let page = store.subscribe(EventFilter::key("page"));

    store
        .set(
            &Attributes::new().with("page", "2").with("sort", "asc"),
            SetOptions::default(),
        )
        .unwrap();

    let events: Vec<StoreEvent> = page.try_iter().collect();
    assert_eq!(
        events,
        vec![StoreEvent::Attribute(Change {
            key: "page".to_string(),
            old: Some(Some("1".to_string())),
            new: Some(Some("2".to_string())),
        })]
    );
}

#[test]
fn test_aggregate_fires_once_per_set_call() {
    let mut store = store_at("");
    let aggregate = store.subscribe(EventFilter::Changes);

    store
        .set(
            &Attributes::new().with("a", "1").with("b", "2").with("c", "3"),
            SetOptions::default(),
        )
        .unwrap();
    store
        .set(&Attributes::new().with("a", "1"), SetOptions::default())
        .unwrap();

    let events: Vec<StoreEvent> = aggregate.try_iter().collect();
    assert_eq!(events.len(), 1);
    match &events[0] {
        StoreEvent::Changes { changes } => {
            assert_eq!(changes.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[test]
fn test_silent_set_emits_nothing() {
    let mut store = store_at("");
    let all = store.subscribe(EventFilter::All);

    store
        .set(&Attributes::new().with("a", "1"), SetOptions::silent())
        .unwrap();
    store.unset("a", SetOptions::silent()).unwrap();

    assert_eq!(all.try_iter().count(), 0);
}

#[test]
fn test_hashchange_carries_raw_fragment() {
    let mut store = store_at("");
    let hashchange = store.subscribe(EventFilter::HashChange);

    store.host_mut().navigate("x=%2F");
    store.dispatch_pending();

    let events: Vec<StoreEvent> = hashchange.try_iter().collect();
    assert_eq!(
        events,
        vec![StoreEvent::HashChange {
            hash: "#x=%2F".to_string()
        }]
    );
    assert_eq!(store.value("x"), Some("/"));
}

#[test]
fn test_dropping_a_receiver_unsubscribes() {
    let mut store = store_at("");
    let kept = store.subscribe(EventFilter::All);
    drop(store.subscribe(EventFilter::All));

    store
        .set(&Attributes::new().with("a", "1"), SetOptions::default())
        .unwrap();

    assert_eq!(kept.try_iter().count(), 2);
}
