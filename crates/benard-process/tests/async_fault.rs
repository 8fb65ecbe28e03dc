//! Integration test: async failures are fatal, not silent.
//!
//! A failed fire-and-forget method has no reply channel, so the worker
//! terminates instead of discarding the error. Every later interaction
//! then reports the disconnect, and the join-side report names the
//! fault as the exit reason.

use std::time::Duration;

use benard_core::Args;
use benard_process::{ExitReason, Manager, ManagerConfig, RemoteError};
use benard_test_utils::standard_registry;

#[test]
fn async_fault_terminates_the_worker() {
    let mut manager = Manager::start(standard_registry(), ManagerConfig::default())
        .expect("worker thread failed to spawn");
    let proxy = manager
        .construct("Flaky", Args::new())
        .expect("construct failed");

    proxy.cast("boom", Args::new()).expect("cast failed");

    // The fault lands asynchronously; poll until the worker is gone.
    let mut disconnected = false;
    for _ in 0..100 {
        match proxy.call("noop", Args::new()) {
            Err(RemoteError::Disconnected) => {
                disconnected = true;
                break;
            }
            Err(RemoteError::Timeout) => unreachable!("no call timeout configured"),
            _ => std::thread::sleep(Duration::from_millis(10)),
        }
    }
    assert!(disconnected, "worker survived an async fault");

    let report = manager.stop().expect("no report");
    assert_eq!(report.reason, ExitReason::AsyncFault);
}

#[test]
fn sync_use_of_the_same_method_is_survivable() {
    let mut manager = Manager::start(standard_registry(), ManagerConfig::default())
        .expect("worker thread failed to spawn");
    let proxy = manager
        .construct("Flaky", Args::new())
        .expect("construct failed");

    // Called sync, the same failure is just a reply.
    assert!(proxy.call("boom", Args::new()).is_err());
    proxy.call("noop", Args::new()).expect("worker died");

    let report = manager.stop().expect("no report");
    assert_eq!(report.reason, ExitReason::Stopped);
}
