//! Property-based tests for the navigation reaction

use hashsync::codec::serialize;
use hashsync::{Attributes, EventFilter, HashSyncStore, MemoryHost, SetOptions, StoreEvent, SyncState};
use proptest::prelude::*;

fn attributes_strategy() -> impl Strategy<Value = Attributes> {
    proptest::collection::vec(
        (
            "[a-z]{1,4}",
            prop_oneof![Just(None::<String>), "[a-z0-9 &=]{1,6}".prop_map(Some)],
        ),
        0..6,
    )
    .prop_map(|pairs| pairs.into_iter().collect::<Attributes>())
}

proptest! {
    #[test]
    fn test_navigation_converges(
        initial in attributes_strategy(),
        target in attributes_strategy(),
    ) {
        // Same keys and values in a different order change nothing, so the
        // non-canonical fragment is left as the user typed it.
        prop_assume!(initial != target);

        let mut store = HashSyncStore::new(MemoryHost::with_fragment(&serialize(&initial)));
        let aggregate = store.subscribe(EventFilter::Changes);

        store.host_mut().navigate(&serialize(&target));
        store.dispatch_pending();

        prop_assert_eq!(store.attributes(), &target);
        prop_assert_eq!(store.state(), SyncState::Reconciled);
        prop_assert_eq!(aggregate.try_iter().count(), 1);
        prop_assert!(store.on_navigation().is_skipped());
    }

    #[test]
    fn test_set_then_dispatch_never_emits_hashchange(
        initial in attributes_strategy(),
        update in attributes_strategy(),
    ) {
        let mut store = HashSyncStore::new(MemoryHost::with_fragment(&serialize(&initial)));
        let all = store.subscribe(EventFilter::All);

        store.set(&update, SetOptions::default()).unwrap();
        store.dispatch_pending();

        prop_assert_eq!(store.state(), SyncState::Reconciled);
        let hashchanges = all
            .try_iter()
            .filter(|e| matches!(e, StoreEvent::HashChange { .. }))
            .count();
        prop_assert_eq!(hashchanges, 0);
    }
}
