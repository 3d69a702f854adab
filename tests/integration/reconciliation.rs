//! Fragment -> attribute direction: the navigation reaction and its guard.

use hashsync::{EventFilter, Reconciliation, SetOptions, StoreEvent};

use super::test_utils::{attrs, store_at};

#[test]
fn test_unset_on_reconcile_fires_one_aggregate() {
    let mut store = store_at("a=1&b=2");
    let aggregate = store.subscribe(EventFilter::Changes);

    store.host_mut().navigate("a=1");
    store.dispatch_pending();

    assert_eq!(store.attributes(), &attrs(&[("a", Some("1"))]));
    let events: Vec<StoreEvent> = aggregate.try_iter().collect();
    assert_eq!(events.len(), 1);
    match &events[0] {
        StoreEvent::Changes { changes } => {
            assert_eq!(changes.len(), 1);
            assert!(changes.get("b").unwrap().is_removal());
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[test]
fn test_removed_keys_get_no_per_key_event() {
    let mut store = store_at("a=1&b=2");
    let all = store.subscribe(EventFilter::All);

    store.host_mut().navigate("a=5");
    store.dispatch_pending();

    let names: Vec<String> = all.try_iter().map(|e| e.name()).collect();
    assert_eq!(names, vec!["change:a", "change", "hashchange"]);
}

#[test]
fn test_hashchange_fires_even_without_value_changes() {
    // Non-canonical spelling of the same attributes.
    let mut store = store_at("b=&a=1");
    let hashchange = store.subscribe(EventFilter::HashChange);
    let aggregate = store.subscribe(EventFilter::Changes);

    let first = store.on_navigation();
    let second = store.on_navigation();

    assert_eq!(first, Reconciliation::Applied(Default::default()));
    assert_eq!(second, Reconciliation::Applied(Default::default()));
    assert_eq!(hashchange.try_iter().count(), 2);
    assert_eq!(aggregate.try_iter().count(), 0);
}

#[test]
fn test_repeated_reaction_has_no_net_changes() {
    let mut store = store_at("a=1");
    store.host_mut().navigate("a=2&b");

    let first = store.on_navigation();
    let second = store.on_navigation();

    assert_eq!(first.changes().map(|c| c.len()), Some(2));
    assert!(second.is_skipped());
    assert_eq!(store.attributes(), &attrs(&[("a", Some("2")), ("b", None)]));
}

#[test]
fn test_self_triggered_navigation_does_not_loop() {
    let mut store = store_at("");
    let all = store.subscribe(EventFilter::All);

    for page in 1..=5 {
        let page = page.to_string();
        store
            .set(
                &attrs(&[("page", Some(page.as_str()))]),
                SetOptions::default(),
            )
            .unwrap();
        assert_eq!(store.dispatch_pending(), 1);
    }

    assert_eq!(store.host().writes().len(), 5);
    assert!(all.try_iter().all(|e| !matches!(e, StoreEvent::HashChange { .. })));
}

#[test]
fn test_back_and_forward_round_trip() {
    let mut store = store_at("view=list");
    let hashchange = store.subscribe(EventFilter::HashChange);

    store
        .set(&attrs(&[("view", Some("grid")), ("item", Some("7"))]), SetOptions::default())
        .unwrap();
    store.dispatch_pending();

    // Back
    store.host_mut().navigate("#view=list");
    store.dispatch_pending();
    assert_eq!(store.attributes(), &attrs(&[("view", Some("list"))]));

    // Forward
    store.host_mut().navigate("#view=grid&item=7");
    store.dispatch_pending();
    assert_eq!(
        store.attributes(),
        &attrs(&[("view", Some("grid")), ("item", Some("7"))])
    );

    assert_eq!(hashchange.try_iter().count(), 2);
}

#[test]
fn test_navigation_to_empty_fragment_clears_attributes() {
    let mut store = store_at("a=1&b");
    let hashchange = store.subscribe(EventFilter::HashChange);

    store.host_mut().navigate("");
    store.dispatch_pending();

    assert!(store.attributes().is_empty());
    assert_eq!(store.hash(), "");
    let events: Vec<StoreEvent> = hashchange.try_iter().collect();
    assert_eq!(
        events,
        vec![StoreEvent::HashChange {
            hash: String::new()
        }]
    );
}

#[test]
fn test_malformed_navigation_degrades_gracefully() {
    let mut store = store_at("");

    store.host_mut().navigate("#&&=x&a=%E0%A4%A&b=&c");
    store.dispatch_pending();

    assert!(store.has("a"));
    assert_eq!(store.get("b"), Some(&None));
    assert_eq!(store.get("c"), Some(&None));
    assert!(!store.has(""));
}

#[test]
fn test_changed_pairs_cover_reconciliation() {
    let mut store = store_at("a=1&b=2");

    store.host_mut().navigate("a=1&c=x%20y");
    store.dispatch_pending();

    let mut changed = store.changed_pairs();
    changed.sort();
    assert_eq!(changed, vec!["b".to_string(), "c=x%20y".to_string()]);
}
