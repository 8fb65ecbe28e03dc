//! Strongly-typed identifiers and the delivery-mode vocabulary.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique [`ObjectId`] allocation.
static OBJECT_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Identifies a referent living inside a worker's registry.
///
/// Minted by the manager when it constructs or transfers a remote
/// object; the worker stores the referent under this id and every
/// subsequent method message names it. Ids are process-unique and
/// strictly increasing, so two managers in the same process can never
/// collide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u64);

impl ObjectId {
    /// Allocate a fresh, unique object id.
    ///
    /// Each call returns an id that has never been returned before
    /// within this process. Thread-safe.
    pub fn next() -> Self {
        Self(OBJECT_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ObjectId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Monotonic per-proxy call counter.
///
/// Informational only: a proxy increments it for every message it
/// sends, which gives log output a stable way to refer to "the n-th
/// call on this proxy". Nothing in the protocol keys off it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobId(pub u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a method call travels: blocking round-trip or fire-and-forget.
///
/// `Sync` calls carry a reply channel and block the caller until the
/// worker posts exactly one reply on it. `Async` calls return as soon
/// as the message is enqueued; their only success signal is the
/// referent's own side effects (typically packets arriving on a result
/// queue), and their failures terminate the worker loop rather than
/// vanish.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeliveryMode {
    /// Block on a per-call reply channel.
    Sync,
    /// Return immediately; no success reply will ever arrive.
    Async,
}

impl fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sync => write!(f, "sync"),
            Self::Async => write!(f, "async"),
        }
    }
}
