//! Call payloads: the [`Value`] tagged union and the [`Args`] bundle.
//!
//! Every argument handed to a remote constructor or method, and every
//! value a sync call returns, crosses the worker boundary as a
//! [`Value`]. The union is deliberately small — this subsystem moves
//! state snapshots and control parameters, not arbitrary object graphs.
//! The one unusual member is [`Value::PacketSender`]: the sending half
//! of a packet queue, which is how the driving application hands a
//! result queue into a worker-side evolver.

use std::fmt;

use crossbeam_channel::Sender;
use indexmap::IndexMap;

use crate::array::Array;
use crate::error::ArgError;
use crate::packet::Packet;

/// A single call argument or return value.
#[derive(Clone, Debug)]
pub enum Value {
    /// The absence of a value; what methods without a result return.
    None,
    /// A boolean flag.
    Bool(bool),
    /// A signed integer (counts, chunk sizes, iteration numbers).
    Int(i64),
    /// A floating-point scalar (times, safety factors).
    Float(f64),
    /// A string (names, modes).
    Text(String),
    /// A state array.
    Array(Array),
    /// A full state snapshot.
    Packet(Packet),
    /// The sending half of a packet queue.
    PacketSender(Sender<Packet>),
    /// A homogeneous or mixed list of values.
    List(Vec<Value>),
}

impl Value {
    /// A short name for this value's kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Array(_) => "array",
            Self::Packet(_) => "packet",
            Self::PacketSender(_) => "packet sender",
            Self::List(_) => "list",
        }
    }

    /// Extract a boolean.
    pub fn as_bool(&self) -> Result<bool, ArgError> {
        match self {
            Self::Bool(v) => Ok(*v),
            other => Err(wrong("bool", other)),
        }
    }

    /// Extract an integer.
    pub fn as_int(&self) -> Result<i64, ArgError> {
        match self {
            Self::Int(v) => Ok(*v),
            other => Err(wrong("int", other)),
        }
    }

    /// Extract a float. Integers coerce losslessly enough for the
    /// control parameters this layer carries.
    pub fn as_float(&self) -> Result<f64, ArgError> {
        match self {
            Self::Float(v) => Ok(*v),
            Self::Int(v) => Ok(*v as f64),
            other => Err(wrong("float", other)),
        }
    }

    /// Borrow a string.
    pub fn as_text(&self) -> Result<&str, ArgError> {
        match self {
            Self::Text(v) => Ok(v),
            other => Err(wrong("text", other)),
        }
    }

    /// Borrow an array.
    pub fn as_array(&self) -> Result<&Array, ArgError> {
        match self {
            Self::Array(v) => Ok(v),
            other => Err(wrong("array", other)),
        }
    }

    /// Borrow a packet.
    pub fn as_packet(&self) -> Result<&Packet, ArgError> {
        match self {
            Self::Packet(v) => Ok(v),
            other => Err(wrong("packet", other)),
        }
    }

    /// Borrow a packet sender.
    pub fn as_packet_sender(&self) -> Result<&Sender<Packet>, ArgError> {
        match self {
            Self::PacketSender(v) => Ok(v),
            other => Err(wrong("packet sender", other)),
        }
    }

    /// Borrow a list.
    pub fn as_list(&self) -> Result<&[Value], ArgError> {
        match self {
            Self::List(v) => Ok(v),
            other => Err(wrong("list", other)),
        }
    }
}

fn wrong(expected: &'static str, found: &Value) -> ArgError {
    ArgError::WrongType {
        expected,
        found: found.kind(),
    }
}

// Senders compare by channel identity; everything else structurally.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::None, Self::None) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Packet(a), Self::Packet(b)) => a == b,
            (Self::PacketSender(a), Self::PacketSender(b)) => a.same_channel(b),
            (Self::List(a), Self::List(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v:?}"),
            Self::Array(v) => write!(f, "{v}"),
            Self::Packet(v) => write!(f, "{v}"),
            Self::PacketSender(_) => write!(f, "<packet sender>"),
            Self::List(v) => {
                write!(f, "[")?;
                for (i, item) in v.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Self::None
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(v.into())
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Self::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Array> for Value {
    fn from(v: Array) -> Self {
        Self::Array(v)
    }
}

impl From<Packet> for Value {
    fn from(v: Packet) -> Self {
        Self::Packet(v)
    }
}

impl From<Sender<Packet>> for Value {
    fn from(v: Sender<Packet>) -> Self {
        Self::PacketSender(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::List(v)
    }
}

// ── Args ───────────────────────────────────────────────────────────

/// The argument bundle carried by `Init` and `Method` messages:
/// positional values plus order-preserving keyword values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Args {
    positional: Vec<Value>,
    keyword: IndexMap<String, Value>,
}

impl Args {
    /// An empty argument bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument (builder style).
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Set a keyword argument (builder style).
    pub fn kw(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keyword.insert(name.into(), value.into());
        self
    }

    /// The positional argument at `index`.
    pub fn get(&self, index: usize) -> Result<&Value, ArgError> {
        self.positional
            .get(index)
            .ok_or(ArgError::MissingPositional { index })
    }

    /// The keyword argument under `name`.
    pub fn named(&self, name: &str) -> Result<&Value, ArgError> {
        self.keyword.get(name).ok_or_else(|| ArgError::MissingKeyword {
            name: name.to_string(),
        })
    }

    /// The keyword argument under `name`, if present.
    pub fn opt_named(&self, name: &str) -> Option<&Value> {
        self.keyword.get(name)
    }

    /// Number of positional arguments.
    pub fn len(&self) -> usize {
        self.positional.len()
    }

    /// Whether the bundle carries no arguments at all.
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keyword.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_enforce_kinds() {
        let v = Value::Int(7);
        assert_eq!(v.as_int().unwrap(), 7);
        assert_eq!(v.as_float().unwrap(), 7.0);
        assert!(matches!(
            v.as_text(),
            Err(ArgError::WrongType {
                expected: "text",
                found: "int"
            })
        ));
    }

    #[test]
    fn args_positional_and_keyword() {
        let args = Args::new().arg(1.5).arg("linear").kw("chunks", 100usize);
        assert_eq!(args.get(0).unwrap().as_float().unwrap(), 1.5);
        assert_eq!(args.get(1).unwrap().as_text().unwrap(), "linear");
        assert_eq!(args.named("chunks").unwrap().as_int().unwrap(), 100);
        assert!(args.named("missing").is_err());
        assert!(args.get(2).is_err());
    }

    #[test]
    fn sender_equality_is_channel_identity() {
        let (tx, _rx) = crossbeam_channel::unbounded::<Packet>();
        let a = Value::PacketSender(tx.clone());
        let b = Value::PacketSender(tx);
        let (other, _rx2) = crossbeam_channel::unbounded::<Packet>();
        assert_eq!(a, b);
        assert_ne!(a, Value::PacketSender(other));
    }
}
