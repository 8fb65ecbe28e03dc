//! Bénard: an actor-style process layer and packet streaming protocol
//! for driving long-running simulations from an interactive caller.
//!
//! This is the top-level facade crate that re-exports the public API
//! from the sub-crates. For most users, adding `benard` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use benard::prelude::*;
//!
//! // A type the worker can host.
//! struct Counter {
//!     value: i64,
//! }
//!
//! fn make(args: Args) -> Result<Counter, InvokeFault> {
//!     Ok(Counter {
//!         value: args.get(0)?.as_int()?,
//!     })
//! }
//!
//! fn increment(counter: &mut Counter, _args: Args) -> Result<Value, InvokeFault> {
//!     counter.value += 1;
//!     Ok(Value::Int(counter.value))
//! }
//!
//! // Register it, start a worker, and talk to it through a proxy.
//! let mut registry = TypeRegistry::new();
//! registry.register(
//!     "Counter",
//!     make,
//!     MethodTable::new().with("increment", increment),
//! );
//!
//! let mut manager = Manager::start(Arc::new(registry), ManagerConfig::default())?;
//! let proxy = manager.construct("Counter", Args::new().arg(40i64))?;
//!
//! proxy.cast("increment", Args::new())?; // fire-and-forget
//! let value = proxy.call("increment", Args::new())?; // blocking round-trip
//! assert_eq!(value, Value::Int(42));
//!
//! manager.stop();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in
//! the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `benard-core` | Ids, values, arrays, packets, error enums |
//! | [`packet`] | `benard-packet` | Packet interface, queue draining, fan-out, evolvers |
//! | [`process`] | `benard-process` | Manager, worker, proxies, registries |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Shared vocabulary types (`benard-core`).
///
/// Identifiers, the [`types::Value`]/[`types::Args`] call payload
/// model, [`types::Array`]/[`types::Packet`] snapshot data, and the
/// error enums that cross the worker boundary.
pub use benard_core as types;

/// Packet streaming protocol (`benard-packet`).
///
/// The [`packet::PacketInterface`] producer/consumer contract, queue
/// consumption disciplines, fan-out delivery, and the
/// [`packet::Evolver`] collaborator contract.
pub use benard_packet as packet;

/// Manager/worker actor layer (`benard-process`).
///
/// The [`process::Manager`], its worker thread, [`process::Proxy`]
/// handles, and the [`process::TypeRegistry`].
pub use benard_process as process;

pub mod prelude {
    //! Commonly used items, re-exported in one place.

    pub use benard_core::{
        Args, Array, DeliveryMode, InvokeFault, ObjectId, Packet, PacketError, RemoteError, Value,
    };
    pub use benard_packet::{
        ensure_finite, EvolveError, Evolver, PacketInterface, PacketMultiplex, ReadQueue,
    };
    pub use benard_process::{
        ExitReason, Manager, ManagerConfig, MethodTable, Proxy, Referent, TypeRegistry,
        WorkerReport,
    };
}
