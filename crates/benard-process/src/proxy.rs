//! The caller-side handle to a remote object.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::Sender;
use tracing::debug;

use benard_core::{Args, DeliveryMode, JobId, ObjectId, RemoteError, Value};

use crate::message::{Reply, ReplySlot, Request};

/// Handle to one referent hosted by a worker.
///
/// Cloning is cheap and allowed: every sync call carries its own reply
/// channel, so clones (and other proxies on the same manager) may have
/// calls in flight concurrently. Clones share the job counter; the
/// delivery-mode flag is per clone.
#[derive(Clone, Debug)]
pub struct Proxy {
    object: ObjectId,
    requests: Sender<Request>,
    mode: DeliveryMode,
    call_timeout: Option<Duration>,
    jobs: Arc<AtomicU64>,
}

impl Proxy {
    pub(crate) fn new(
        object: ObjectId,
        requests: Sender<Request>,
        call_timeout: Option<Duration>,
    ) -> Self {
        Self {
            object,
            requests,
            mode: DeliveryMode::Sync,
            call_timeout,
            jobs: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Id of the referent this proxy names.
    pub fn object(&self) -> ObjectId {
        self.object
    }

    /// Current delivery mode used by [`invoke`](Proxy::invoke).
    pub fn mode(&self) -> DeliveryMode {
        self.mode
    }

    /// Switch the delivery mode used by [`invoke`](Proxy::invoke).
    pub fn set_mode(&mut self, mode: DeliveryMode) {
        self.mode = mode;
    }

    /// Messages sent so far through this proxy and its clones.
    pub fn job_count(&self) -> u64 {
        self.jobs.load(Ordering::Relaxed)
    }

    /// Invoke `method` synchronously: block until the worker replies.
    pub fn call(&self, method: &str, args: Args) -> Result<Value, RemoteError> {
        let (reply_tx, reply_rx) = crossbeam_channel::bounded(1);
        self.dispatch(method, args, ReplySlot::Sync(reply_tx))?;
        let reply = match self.call_timeout {
            Some(timeout) => reply_rx.recv_timeout(timeout).map_err(|err| match err {
                crossbeam_channel::RecvTimeoutError::Timeout => RemoteError::Timeout,
                crossbeam_channel::RecvTimeoutError::Disconnected => RemoteError::Disconnected,
            })?,
            None => reply_rx.recv().map_err(|_| RemoteError::Disconnected)?,
        };
        match reply {
            Reply::Return(value) => Ok(value),
            Reply::Error(err) => Err(err),
            // A method call never replies with an id.
            Reply::Id(_) => Err(RemoteError::Disconnected),
        }
    }

    /// Invoke `method` asynchronously: fire-and-forget.
    ///
    /// `Ok(())` means the message was enqueued, nothing more. A failure
    /// inside the worker has no channel to come back on and terminates
    /// the worker loop instead; later calls then see
    /// [`RemoteError::Disconnected`].
    pub fn cast(&self, method: &str, args: Args) -> Result<(), RemoteError> {
        self.dispatch(method, args, ReplySlot::Async)
    }

    /// Invoke `method` following the current delivery mode.
    ///
    /// Returns `Some(value)` for a sync round-trip, `None` once an
    /// async message is enqueued.
    pub fn invoke(&self, method: &str, args: Args) -> Result<Option<Value>, RemoteError> {
        match self.mode {
            DeliveryMode::Sync => self.call(method, args).map(Some),
            DeliveryMode::Async => self.cast(method, args).map(|()| None),
        }
    }

    fn dispatch(&self, method: &str, args: Args, reply: ReplySlot) -> Result<(), RemoteError> {
        let job = JobId(self.jobs.fetch_add(1, Ordering::Relaxed) + 1);
        debug!(object = %self.object, %method, %job, mode = %reply.mode(), "dispatch");
        self.requests
            .send(Request::Method {
                object: self.object,
                method: method.to_string(),
                args,
                reply,
            })
            .map_err(|_| RemoteError::Disconnected)
    }
}
