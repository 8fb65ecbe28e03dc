//! Integration test: full construct → cast → call → observe lifecycle.
//!
//! Verifies that async casts and sync calls on the same proxy are
//! applied in send order: three fire-and-forget increments followed by
//! a sync increment must make the sync reply reflect all four.

use benard_core::{Args, Value};
use benard_process::{Manager, ManagerConfig, RemoteError};
use benard_test_utils::{standard_registry, Counter};

fn manager() -> Manager {
    Manager::start(standard_registry(), ManagerConfig::default())
        .expect("worker thread failed to spawn")
}

#[test]
fn casts_are_applied_before_a_later_sync_call() {
    let mut manager = manager();
    let proxy = manager
        .construct("Counter", Args::new().arg(5i64))
        .expect("construct failed");

    for _ in 0..3 {
        proxy.cast("increment", Args::new()).expect("cast failed");
    }
    // The sync call travels the same channel, so it lands after the
    // three casts and observes their effects.
    let value = proxy.call("increment", Args::new()).expect("call failed");
    assert_eq!(value, Value::Int(9));

    let value = proxy.call("value", Args::new()).expect("call failed");
    assert_eq!(value, Value::Int(9));
    assert_eq!(proxy.job_count(), 5);
    manager.stop();
}

#[test]
fn send_moves_a_local_value_into_the_worker() {
    let mut manager = manager();
    let proxy = manager.send(Counter { value: 40 }).expect("send failed");
    let value = proxy.call("add", Args::new().arg(2i64)).expect("call failed");
    assert_eq!(value, Value::Int(42));
    manager.stop();
}

#[test]
fn sending_an_unregistered_type_is_rejected_locally() {
    struct NotRegistered;
    let mut manager = manager();
    let err = manager.send(NotRegistered).unwrap_err();
    assert!(matches!(err, RemoteError::NoSuchType { .. }));
    manager.stop();
}

#[test]
fn proxies_to_distinct_objects_are_independent() {
    let mut manager = manager();
    let a = manager
        .construct("Counter", Args::new().arg(0i64))
        .expect("construct failed");
    let b = manager
        .construct("Counter", Args::new().arg(100i64))
        .expect("construct failed");
    assert_ne!(a.object(), b.object());

    a.cast("increment", Args::new()).expect("cast failed");
    assert_eq!(a.call("value", Args::new()).unwrap(), Value::Int(1));
    assert_eq!(b.call("value", Args::new()).unwrap(), Value::Int(100));
    manager.stop();
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        // Worker-applied order must match send order for any mix of
        // casts, so the final sync read equals a local fold.
        #![proptest_config(ProptestConfig::with_cases(16))]
        #[test]
        fn cast_sequences_fold_like_local_arithmetic(
            start in -1_000i64..1_000,
            deltas in prop::collection::vec(-50i64..50, 0..20),
        ) {
            let mut manager = manager();
            let proxy = manager
                .construct("Counter", Args::new().arg(start))
                .expect("construct failed");
            for delta in &deltas {
                proxy.cast("add", Args::new().arg(*delta)).expect("cast failed");
            }
            let expected = start + deltas.iter().sum::<i64>();
            let value = proxy.call("value", Args::new()).expect("call failed");
            prop_assert_eq!(value, Value::Int(expected));
            manager.stop();
        }
    }
}

#[test]
fn cloned_proxies_reach_the_same_object() {
    let mut manager = manager();
    let proxy = manager
        .construct("Counter", Args::new().arg(0i64))
        .expect("construct failed");
    let clone = proxy.clone();
    proxy.cast("increment", Args::new()).expect("cast failed");
    clone.cast("increment", Args::new()).expect("cast failed");
    assert_eq!(proxy.call("value", Args::new()).unwrap(), Value::Int(2));
    manager.stop();
}
