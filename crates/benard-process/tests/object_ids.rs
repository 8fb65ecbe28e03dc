//! Integration test: object identity across managers and creation
//! paths.
//!
//! Ids are minted from one process-wide counter, so no two referents
//! ever share one, no matter which manager created them or whether
//! they were constructed remotely or sent in whole.

use std::collections::HashSet;

use benard_core::Args;
use benard_process::{Manager, ManagerConfig, ObjectId};
use benard_test_utils::{standard_registry, Counter};

#[test]
fn ids_are_unique_across_managers_and_creation_paths() {
    let registry = standard_registry();
    let mut first = Manager::start(registry.clone(), ManagerConfig::default())
        .expect("worker thread failed to spawn");
    let mut second = Manager::start(registry, ManagerConfig::default())
        .expect("worker thread failed to spawn");

    let mut seen: HashSet<ObjectId> = HashSet::new();
    for i in 0..20i64 {
        let constructed = first
            .construct("Counter", Args::new().arg(i))
            .expect("construct failed");
        let sent = second.send(Counter { value: i }).expect("send failed");
        assert!(seen.insert(constructed.object()), "id reused");
        assert!(seen.insert(sent.object()), "id reused");
    }
    assert_eq!(seen.len(), 40);
    first.stop();
    second.stop();
}

#[test]
fn ids_grow_monotonically_within_a_manager() {
    let mut manager = Manager::start(standard_registry(), ManagerConfig::default())
        .expect("worker thread failed to spawn");
    let mut previous = None;
    for _ in 0..10 {
        let proxy = manager
            .construct("Counter", Args::new().arg(0i64))
            .expect("construct failed");
        if let Some(previous) = previous {
            assert!(proxy.object() > previous);
        }
        previous = Some(proxy.object());
    }
    manager.stop();
}
