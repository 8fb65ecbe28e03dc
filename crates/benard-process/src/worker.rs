//! The worker loop: sole owner of the live referents.
//!
//! The worker thread owns its referent map exclusively (moved in via
//! `thread::spawn`). No locks anywhere — requests arrive on a crossbeam
//! channel and every reply travels back on the per-request channel the
//! caller enclosed.

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError};
use indexmap::IndexMap;
use tracing::{debug, error};

use benard_core::{Args, ObjectId, RemoteError, Value};

use crate::dispatch::Referent;
use crate::message::{Reply, ReplySlot, Request};
use crate::registry::TypeRegistry;

/// Why the worker loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// A `Stop` request was read.
    Stopped,
    /// Every request sender was dropped.
    Disconnected,
    /// No request arrived within the configured receive timeout.
    IdleTimeout,
    /// An async method failed; with no reply channel to carry the
    /// error, the loop terminates instead of losing it.
    AsyncFault,
}

/// Final accounting returned through the worker's join handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerReport {
    /// Requests read off the channel, `Stop` included.
    pub handled: u64,
    /// Why the loop ended.
    pub reason: ExitReason,
}

/// State held by the worker thread's main loop.
pub(crate) struct WorkerState {
    requests: Receiver<Request>,
    registry: Arc<TypeRegistry>,
    recv_timeout: Option<Duration>,
    objects: IndexMap<ObjectId, Box<dyn Referent>>,
}

impl WorkerState {
    pub fn new(
        requests: Receiver<Request>,
        registry: Arc<TypeRegistry>,
        recv_timeout: Option<Duration>,
    ) -> Self {
        Self {
            requests,
            registry,
            recv_timeout,
            objects: IndexMap::new(),
        }
    }

    /// Main request loop. Runs until stopped, disconnected, idle past
    /// the timeout, or an async method fails.
    pub fn run(mut self) -> WorkerReport {
        let mut handled = 0u64;
        let reason = loop {
            let request = match self.receive() {
                Ok(request) => request,
                Err(reason) => break reason,
            };
            handled += 1;
            match request {
                Request::Init {
                    typecode,
                    object,
                    args,
                    reply,
                } => {
                    let answer = match self.registry.construct(&typecode, args) {
                        Ok(referent) => {
                            debug!(%object, %typecode, "referent constructed");
                            self.objects.insert(object, referent);
                            Reply::Id(object)
                        }
                        Err(err) => Reply::Error(err),
                    };
                    // Best-effort reply, the caller may have given up.
                    let _ = reply.send(answer);
                }
                Request::SendValue {
                    object,
                    value,
                    reply,
                } => {
                    debug!(%object, typecode = value.typecode(), "referent adopted");
                    self.objects.insert(object, value);
                    let _ = reply.send(Reply::Id(object));
                }
                Request::Method {
                    object,
                    method,
                    args,
                    reply,
                } => {
                    let outcome = self.invoke(object, &method, args);
                    match reply {
                        ReplySlot::Sync(tx) => {
                            let answer = match outcome {
                                Ok(value) => Reply::Return(value),
                                Err(err) => Reply::Error(err),
                            };
                            let _ = tx.send(answer);
                        }
                        ReplySlot::Async => {
                            if let Err(err) = outcome {
                                error!(%object, %method, %err, "async method failed");
                                break ExitReason::AsyncFault;
                            }
                        }
                    }
                }
                Request::Stop => break ExitReason::Stopped,
            }
        };
        debug!(handled, ?reason, live = self.objects.len(), "worker exiting");
        WorkerReport { handled, reason }
    }

    fn receive(&self) -> Result<Request, ExitReason> {
        match self.recv_timeout {
            Some(timeout) => self.requests.recv_timeout(timeout).map_err(|err| match err {
                RecvTimeoutError::Timeout => {
                    error!(?timeout, "no request within the receive timeout");
                    ExitReason::IdleTimeout
                }
                RecvTimeoutError::Disconnected => ExitReason::Disconnected,
            }),
            None => self.requests.recv().map_err(|_| ExitReason::Disconnected),
        }
    }

    fn invoke(&mut self, object: ObjectId, method: &str, args: Args) -> Result<Value, RemoteError> {
        match self.objects.get_mut(&object) {
            Some(referent) => referent.dispatch(object, method, args),
            None => Err(RemoteError::NoSuchObject { object }),
        }
    }
}
