//! User-facing [`Manager`]: owns the worker thread and hands out
//! proxies.

use std::fmt;
use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, error};

use benard_core::{Args, ObjectId, RemoteError};

use crate::dispatch::Referent;
use crate::message::{Reply, Request};
use crate::proxy::Proxy;
use crate::registry::TypeRegistry;
use crate::worker::{WorkerReport, WorkerState};

// ── Errors ───────────────────────────────────────────────────────

/// The manager could not be started.
#[derive(Debug)]
pub enum SpawnError {
    /// A [`ManagerConfig`] field is unusable.
    InvalidConfig(String),
    /// The worker OS thread could not be spawned.
    Thread(io::Error),
}

impl fmt::Display for SpawnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig(reason) => write!(f, "invalid manager config: {reason}"),
            Self::Thread(err) => write!(f, "failed to spawn worker thread: {err}"),
        }
    }
}

impl std::error::Error for SpawnError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidConfig(_) => None,
            Self::Thread(err) => Some(err),
        }
    }
}

// ── Config ───────────────────────────────────────────────────────

/// Tunables for [`Manager::start`].
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// Name given to the worker OS thread.
    pub thread_name: String,
    /// Worker-side receive timeout. `None` blocks forever; `Some`
    /// makes a silent manager fatal to the worker.
    pub recv_timeout: Option<Duration>,
    /// How long sync callers wait for a reply before giving up with
    /// [`RemoteError::Timeout`]. `None` blocks forever.
    pub call_timeout: Option<Duration>,
}

impl ManagerConfig {
    fn validate(&self) -> Result<(), SpawnError> {
        if self.thread_name.is_empty() {
            return Err(SpawnError::InvalidConfig(
                "thread_name must not be empty".to_string(),
            ));
        }
        if self.recv_timeout == Some(Duration::ZERO) {
            return Err(SpawnError::InvalidConfig(
                "recv_timeout must be nonzero".to_string(),
            ));
        }
        if self.call_timeout == Some(Duration::ZERO) {
            return Err(SpawnError::InvalidConfig(
                "call_timeout must be nonzero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            thread_name: "benard-worker".to_string(),
            recv_timeout: None,
            call_timeout: None,
        }
    }
}

// ── Manager ──────────────────────────────────────────────────────

/// Owns one worker thread and the request channel feeding it.
///
/// Remote objects are created with [`construct`](Manager::construct)
/// (built inside the worker) or [`send`](Manager::send) (built locally,
/// moved in); both return a [`Proxy`]. Dropping the manager stops the
/// worker.
pub struct Manager {
    requests: Option<Sender<Request>>,
    worker: Option<JoinHandle<WorkerReport>>,
    registry: Arc<TypeRegistry>,
    call_timeout: Option<Duration>,
}

impl Manager {
    /// Validate the config, spawn the worker thread, and return the
    /// running manager.
    pub fn start(registry: Arc<TypeRegistry>, config: ManagerConfig) -> Result<Self, SpawnError> {
        config.validate()?;
        let (requests, request_rx) = crossbeam_channel::unbounded();
        let worker_registry = Arc::clone(&registry);
        let recv_timeout = config.recv_timeout;
        let worker = thread::Builder::new()
            .name(config.thread_name.clone())
            .spawn(move || WorkerState::new(request_rx, worker_registry, recv_timeout).run())
            .map_err(SpawnError::Thread)?;
        debug!(thread = %config.thread_name, types = registry.len(), "worker started");
        Ok(Self {
            requests: Some(requests),
            worker: Some(worker),
            registry,
            call_timeout: config.call_timeout,
        })
    }

    /// The shared type registry.
    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    /// Whether the worker thread has not been stopped yet.
    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Construct a registered type inside the worker and proxy it.
    ///
    /// Blocks until the worker answers. A constructor fault or an
    /// unknown typecode comes back as the error, raised here at the
    /// construction site rather than on some later call.
    pub fn construct(&self, typecode: &str, args: Args) -> Result<Proxy, RemoteError> {
        let requests = self.requests.as_ref().ok_or(RemoteError::Disconnected)?;
        let object = ObjectId::next();
        let (reply_tx, reply_rx) = crossbeam_channel::bounded(1);
        requests
            .send(Request::Init {
                typecode: typecode.to_string(),
                object,
                args,
                reply: reply_tx,
            })
            .map_err(|_| RemoteError::Disconnected)?;
        self.await_id(&reply_rx)?;
        Ok(Proxy::new(object, requests.clone(), self.call_timeout))
    }

    /// Move a locally-built value into the worker and proxy it.
    ///
    /// The value is wrapped in the method table registered for its
    /// runtime type; an unregistered type is rejected here.
    pub fn send<T: Send + 'static>(&self, value: T) -> Result<Proxy, RemoteError> {
        let boxed = self.registry.adopt(value)?;
        self.send_boxed(boxed)
    }

    /// Move an already-wrapped referent into the worker and proxy it.
    pub fn send_boxed(&self, value: Box<dyn Referent>) -> Result<Proxy, RemoteError> {
        let requests = self.requests.as_ref().ok_or(RemoteError::Disconnected)?;
        let object = ObjectId::next();
        let (reply_tx, reply_rx) = crossbeam_channel::bounded(1);
        requests
            .send(Request::SendValue {
                object,
                value,
                reply: reply_tx,
            })
            .map_err(|_| RemoteError::Disconnected)?;
        self.await_id(&reply_rx)?;
        Ok(Proxy::new(object, requests.clone(), self.call_timeout))
    }

    /// Stop the worker and join it.
    ///
    /// Requests already queued behind the stop are never executed.
    /// Idempotent: the report is returned once, later calls are `None`.
    pub fn stop(&mut self) -> Option<WorkerReport> {
        if let Some(requests) = self.requests.take() {
            // Send may fail if the worker already exited on its own.
            let _ = requests.send(Request::Stop);
        }
        let worker = self.worker.take()?;
        match worker.join() {
            Ok(report) => {
                debug!(handled = report.handled, reason = ?report.reason, "worker joined");
                Some(report)
            }
            Err(_) => {
                error!("worker thread panicked");
                None
            }
        }
    }

    fn await_id(&self, reply_rx: &Receiver<Reply>) -> Result<ObjectId, RemoteError> {
        let reply = match self.call_timeout {
            Some(timeout) => reply_rx.recv_timeout(timeout).map_err(|err| match err {
                crossbeam_channel::RecvTimeoutError::Timeout => RemoteError::Timeout,
                crossbeam_channel::RecvTimeoutError::Disconnected => RemoteError::Disconnected,
            })?,
            None => reply_rx.recv().map_err(|_| RemoteError::Disconnected)?,
        };
        match reply {
            Reply::Id(id) => Ok(id),
            Reply::Error(err) => Err(err),
            // Construction never yields a return value; a reply of the
            // wrong kind means the worker has gone wrong.
            Reply::Return(_) => Err(RemoteError::Disconnected),
        }
    }
}

impl Drop for Manager {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}
