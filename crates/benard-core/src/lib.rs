//! Core types for the Bénard convection toolkit.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by the process layer and the packet layer:
//! object identifiers, the [`Value`]/[`Args`] call payload model, the
//! [`Array`]/[`Packet`] snapshot data model, and the error enums that
//! cross the worker boundary.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod array;
pub mod error;
pub mod id;
pub mod packet;
pub mod value;

pub use array::Array;
pub use error::{ArgError, InvokeFault, PacketError, RemoteError};
pub use id::{DeliveryMode, JobId, ObjectId};
pub use packet::Packet;
pub use value::{Args, Value};
