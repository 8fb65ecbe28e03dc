//! Manager/worker actor layer for the Bénard convection toolkit.
//!
//! A [`Manager`] owns a dedicated worker thread that hosts *referents*:
//! values constructed from a [`TypeRegistry`] or moved in whole. The
//! caller holds a [`Proxy`] per referent and invokes methods either
//! synchronously (blocking on a per-call reply channel) or
//! asynchronously (fire-and-forget). All state lives on exactly one
//! side of the channel; nothing is shared.
//!
//! # Architecture
//!
//! ```text
//! Caller Thread(s)                Worker Thread
//!     |                               |
//!     |--construct()----------------->| registry.construct()
//!     |   [requests: unbounded]       | objects.insert(id, referent)
//!     |<--Reply::Id via reply tx------|
//!     |                               |
//!     |--proxy.call()---------------->| referent.dispatch()
//!     |   blocks on its reply rx      |
//!     |<--Reply::Return / Error-------|
//!     |                               |
//!     |--proxy.cast()---------------->| referent.dispatch()
//!     |   returns immediately         |   Err => loop exits (fatal)
//!     |                               |
//!     |--stop()---------------------->| loop exits, queued requests
//!     |   joins, gets WorkerReport    | are never read
//! ```
//!
//! Failures of async methods have no reply channel to travel on, so
//! they are fatal to the worker: the fault is logged and the loop
//! terminates, turning every later call into
//! [`RemoteError`](benard_core::RemoteError)`::Disconnected` instead of
//! silently losing the error.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod dispatch;
pub mod manager;
pub mod message;
pub mod proxy;
pub mod registry;
pub mod worker;

pub use benard_core::{Args, DeliveryMode, InvokeFault, ObjectId, RemoteError, Value};
pub use dispatch::{MethodFn, MethodTable, Referent, TableReferent};
pub use manager::{Manager, ManagerConfig, SpawnError};
pub use message::{Reply, ReplySlot, Request};
pub use proxy::Proxy;
pub use registry::{CtorFn, TypeRegistry};
pub use worker::{ExitReason, WorkerReport};
