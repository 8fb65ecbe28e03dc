//! Error types shared across the process and packet layers.
//!
//! Failures that cross the worker boundary travel as structured data,
//! never as re-thrown native panics: a referent's own error is
//! serialized into an [`InvokeFault`] (its type name and message
//! preserved), and everything a remote call can go wrong with is one
//! variant of [`RemoteError`].

use std::error::Error;
use std::fmt;

use crate::id::ObjectId;

// ── InvokeFault ────────────────────────────────────────────────────

/// A referent-side failure, serialized for transport.
///
/// Carries the collaborator's own error taxonomy as data: `kind` is the
/// original error's type name, `message` its rendered description. The
/// caller re-surfaces it as [`RemoteError::Invocation`] without the
/// worker process sharing any exception object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvokeFault {
    /// The original error's type name (e.g. `"DivergenceError"`).
    pub kind: String,
    /// The original error's message.
    pub message: String,
}

impl InvokeFault {
    /// Build a fault from a kind and message.
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Serialize any error, using its `Display` rendering as the message.
    pub fn from_error(kind: impl Into<String>, err: &dyn Error) -> Self {
        Self::new(kind, err.to_string())
    }
}

impl fmt::Display for InvokeFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl Error for InvokeFault {}

// ── RemoteError ────────────────────────────────────────────────────

/// Everything a manager or proxy call can surface.
///
/// The `NoSuch*` variants mean "the remote side had no such
/// capability"; [`Invocation`](Self::Invocation) means "the capability
/// existed and failed", carrying the original error as data. The
/// channel-level variants cover a worker that is gone or too slow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RemoteError {
    /// The typecode was never registered.
    NoSuchType {
        /// The unregistered typecode.
        typecode: String,
    },
    /// No referent is stored under this id.
    NoSuchObject {
        /// The unknown object id.
        object: ObjectId,
    },
    /// The referent's dispatch table has no entry for this method.
    NoSuchMethod {
        /// The referent the call named.
        object: ObjectId,
        /// The missing method name.
        method: String,
    },
    /// The referent's constructor or method failed.
    Invocation(InvokeFault),
    /// The worker has exited or was never reachable.
    Disconnected,
    /// A sync reply did not arrive within the configured timeout.
    Timeout,
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSuchType { typecode } => {
                write!(f, "typecode '{typecode}' is not registered")
            }
            Self::NoSuchObject { object } => {
                write!(f, "no referent stored under id {object}")
            }
            Self::NoSuchMethod { object, method } => {
                write!(f, "referent {object} has no method '{method}'")
            }
            Self::Invocation(fault) => write!(f, "remote invocation failed: {fault}"),
            Self::Disconnected => write!(f, "worker has shut down"),
            Self::Timeout => write!(f, "timed out waiting for a reply"),
        }
    }
}

impl Error for RemoteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invocation(fault) => Some(fault),
            _ => None,
        }
    }
}

impl From<InvokeFault> for RemoteError {
    fn from(fault: InvokeFault) -> Self {
        Self::Invocation(fault)
    }
}

// ── PacketError ────────────────────────────────────────────────────

/// Failures while applying a packet onto local state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PacketError {
    /// The packet lacks a key the consumer's data list requires.
    MissingKey {
        /// The absent variable name.
        name: String,
    },
    /// The consumer does not expose a variable under this name.
    UnknownKey {
        /// The unexpected variable name.
        name: String,
    },
    /// The value for a key contains NaN or infinite entries.
    NonFinite {
        /// The offending variable name.
        name: String,
        /// How many entries were non-finite.
        count: usize,
    },
    /// An array's shape does not match its buffer or its destination.
    ShapeMismatch {
        /// The variable name, empty when the array was free-standing.
        name: String,
        /// The declared shape.
        shape: Vec<usize>,
        /// The actual buffer length.
        len: usize,
    },
}

impl fmt::Display for PacketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingKey { name } => write!(f, "packet is missing key '{name}'"),
            Self::UnknownKey { name } => write!(f, "no state variable named '{name}'"),
            Self::NonFinite { name, count } => {
                write!(f, "'{name}' must be finite; {count} entries are not")
            }
            Self::ShapeMismatch { name, shape, len } => {
                if name.is_empty() {
                    write!(f, "shape {shape:?} does not cover a buffer of length {len}")
                } else {
                    write!(f, "'{name}': shape {shape:?} does not cover a buffer of length {len}")
                }
            }
        }
    }
}

impl Error for PacketError {}

impl From<PacketError> for InvokeFault {
    fn from(err: PacketError) -> Self {
        InvokeFault::new("PacketError", err.to_string())
    }
}

// ── ArgError ───────────────────────────────────────────────────────

/// Argument extraction failures inside a referent's constructor or
/// method handler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArgError {
    /// A positional argument was absent.
    MissingPositional {
        /// The absent index.
        index: usize,
    },
    /// A keyword argument was absent.
    MissingKeyword {
        /// The absent keyword name.
        name: String,
    },
    /// An argument had the wrong value kind.
    WrongType {
        /// What the handler required.
        expected: &'static str,
        /// What the message carried.
        found: &'static str,
    },
}

impl fmt::Display for ArgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingPositional { index } => {
                write!(f, "missing positional argument {index}")
            }
            Self::MissingKeyword { name } => write!(f, "missing keyword argument '{name}'"),
            Self::WrongType { expected, found } => {
                write!(f, "expected a {expected} argument, found {found}")
            }
        }
    }
}

impl Error for ArgError {}

impl From<ArgError> for InvokeFault {
    fn from(err: ArgError) -> Self {
        InvokeFault::new("ArgumentError", err.to_string())
    }
}
