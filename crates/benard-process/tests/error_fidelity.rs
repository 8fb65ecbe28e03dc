//! Integration test: worker-side failures arrive typed and intact.
//!
//! A sync caller must be able to tell an unknown typecode from an
//! unknown object from an unknown method from a fault raised inside
//! the method body, and the fault must keep its kind and message
//! across the thread boundary.

use benard_core::Args;
use benard_process::{Manager, ManagerConfig, RemoteError};
use benard_test_utils::standard_registry;

fn manager() -> Manager {
    Manager::start(standard_registry(), ManagerConfig::default())
        .expect("worker thread failed to spawn")
}

#[test]
fn method_fault_keeps_kind_and_message() {
    let mut manager = manager();
    let proxy = manager
        .construct("Flaky", Args::new())
        .expect("construct failed");
    let err = proxy.call("boom", Args::new()).unwrap_err();
    match err {
        RemoteError::Invocation(fault) => {
            assert_eq!(fault.kind, "DivergenceError");
            assert_eq!(fault.message, "flow became unstable");
        }
        other => panic!("expected Invocation, got {other}"),
    }
    // The worker survives a sync fault.
    proxy.call("noop", Args::new()).expect("worker died");
    manager.stop();
}

#[test]
fn construction_failure_surfaces_at_the_construct_site() {
    let mut manager = manager();
    let err = manager
        .construct("Flaky", Args::new().kw("broken", true))
        .unwrap_err();
    match err {
        RemoteError::Invocation(fault) => assert_eq!(fault.kind, "AssemblyError"),
        other => panic!("expected Invocation, got {other}"),
    }
    manager.stop();
}

#[test]
fn unknown_typecode_is_no_such_type() {
    let mut manager = manager();
    let err = manager.construct("Vortex", Args::new()).unwrap_err();
    assert!(matches!(err, RemoteError::NoSuchType { typecode } if typecode == "Vortex"));
    manager.stop();
}

#[test]
fn unknown_method_names_the_object_it_missed_on() {
    let mut manager = manager();
    let proxy = manager
        .construct("Counter", Args::new().arg(0i64))
        .expect("construct failed");
    let err = proxy.call("decrement", Args::new()).unwrap_err();
    match err {
        RemoteError::NoSuchMethod { object, method } => {
            assert_eq!(object, proxy.object());
            assert_eq!(method, "decrement");
        }
        other => panic!("expected NoSuchMethod, got {other}"),
    }
    manager.stop();
}

#[test]
fn bad_argument_types_fault_inside_the_body() {
    let mut manager = manager();
    let proxy = manager
        .construct("Counter", Args::new().arg(0i64))
        .expect("construct failed");
    let err = proxy.call("add", Args::new().arg("three")).unwrap_err();
    match err {
        RemoteError::Invocation(fault) => assert_eq!(fault.kind, "ArgumentError"),
        other => panic!("expected Invocation, got {other}"),
    }
    manager.stop();
}
