//! Wire messages between the manager side and the worker thread.
//!
//! Every request that expects an answer carries its own bounded(1)
//! reply sender. That sender is the correlation token: the worker posts
//! exactly one reply on it and the caller blocks on the matching
//! receiver, so any number of callers may have requests in flight at
//! once without replies crossing over.

use std::fmt;

use crossbeam_channel::Sender;

use benard_core::{Args, DeliveryMode, ObjectId, RemoteError, Value};

use crate::dispatch::Referent;

/// A single answer from the worker.
#[derive(Debug)]
pub enum Reply {
    /// Construction or transfer succeeded; the referent lives under this id.
    Id(ObjectId),
    /// A sync method call returned this value.
    Return(Value),
    /// The request failed on the worker side.
    Error(RemoteError),
}

/// Where (and whether) a method reply should go.
#[derive(Debug, Clone)]
pub enum ReplySlot {
    /// Post exactly one [`Reply`] on this channel.
    Sync(Sender<Reply>),
    /// Fire-and-forget: no reply will ever be posted. Failures are
    /// escalated by the worker loop instead.
    Async,
}

impl ReplySlot {
    /// The delivery mode this slot encodes.
    pub fn mode(&self) -> DeliveryMode {
        match self {
            Self::Sync(_) => DeliveryMode::Sync,
            Self::Async => DeliveryMode::Async,
        }
    }
}

/// A request travelling from the manager side to the worker.
pub enum Request {
    /// Construct a registered type inside the worker.
    ///
    /// Construction is always awaited, so the reply sender is plain:
    /// the worker answers [`Reply::Id`] or [`Reply::Error`].
    Init {
        /// Registered typecode to construct.
        typecode: String,
        /// Id minted by the manager for the new referent.
        object: ObjectId,
        /// Constructor arguments.
        args: Args,
        /// Correlation channel for the single reply.
        reply: Sender<Reply>,
    },
    /// Transfer an already-built referent into the worker.
    SendValue {
        /// Id minted by the manager for the referent.
        object: ObjectId,
        /// The referent itself, moved across the channel.
        value: Box<dyn Referent>,
        /// Correlation channel for the single reply.
        reply: Sender<Reply>,
    },
    /// Invoke a method on a live referent.
    Method {
        /// Target referent.
        object: ObjectId,
        /// Method name, resolved against the referent's table.
        method: String,
        /// Call arguments.
        args: Args,
        /// Sync reply channel, or async fire-and-forget.
        reply: ReplySlot,
    },
    /// Shut the worker loop down. Requests queued behind this one are
    /// never read.
    Stop,
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init {
                typecode, object, ..
            } => f
                .debug_struct("Init")
                .field("typecode", typecode)
                .field("object", object)
                .finish_non_exhaustive(),
            Self::SendValue { object, .. } => f
                .debug_struct("SendValue")
                .field("object", object)
                .finish_non_exhaustive(),
            Self::Method { object, method, .. } => f
                .debug_struct("Method")
                .field("object", object)
                .field("method", method)
                .finish_non_exhaustive(),
            Self::Stop => f.write_str("Stop"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_slot_reports_its_mode() {
        let (tx, _rx) = crossbeam_channel::bounded(1);
        assert_eq!(ReplySlot::Sync(tx).mode(), DeliveryMode::Sync);
        assert_eq!(ReplySlot::Async.mode(), DeliveryMode::Async);
    }

    #[test]
    fn request_debug_names_the_variant() {
        let rendered = format!("{:?}", Request::Stop);
        assert_eq!(rendered, "Stop");
    }
}
