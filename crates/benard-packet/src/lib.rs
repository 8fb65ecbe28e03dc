//! Packet streaming protocol for the Bénard convection toolkit.
//!
//! A simulated system or evolver exposes a flat table of named state
//! arrays (its *data list*). This crate defines how such a table is
//! snapshotted into a [`Packet`], transported over FIFO queues, and
//! applied back onto a consumer's local state:
//!
//! - [`PacketInterface`] — the producer/consumer contract plus the
//!   per-value validation hook,
//! - [`BufferedDrain`] — coalescing queue consumption for display
//!   consumers that must not fall behind,
//! - [`PacketMultiplex`] — fan-out delivery so a slow consumer cannot
//!   block a fast one,
//! - [`Evolver`] — the PDE-evolver collaborator contract with its
//!   chunked evolve-to-queue drivers.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod evolver;
pub mod fanout;
pub mod interface;
pub mod queue;

pub use benard_core::{Array, Packet, PacketError};
pub use evolver::{EvolveError, Evolver};
pub use fanout::PacketMultiplex;
pub use interface::{ensure_finite, PacketInterface};
pub use queue::{BufferedDrain, ReadQueue};

#[cfg(test)]
mod test_state;
