//! The evolver collaborator contract and its chunked streaming drivers.
//!
//! An evolver advances a PDE system in time. This crate does not care
//! how (finite differences, spectral transforms — all external); it
//! cares that the evolver is a packet producer that can be driven in
//! chunks, emitting one snapshot per chunk onto whatever queues the
//! driving application supplied.

use std::error::Error;
use std::fmt;

use crossbeam_channel::Sender;
use tracing::debug;

use benard_core::{InvokeFault, Packet};

use crate::fanout::PacketMultiplex;
use crate::interface::PacketInterface;

// ── EvolveError ────────────────────────────────────────────────────

/// Failures while advancing the simulation.
#[derive(Clone, Debug, PartialEq)]
pub enum EvolveError {
    /// The solution left the finite domain.
    Diverged {
        /// Simulation time at which divergence was detected.
        time: f64,
    },
    /// A numerical precondition was violated (bad timestep, singular
    /// solve, …).
    Numerical {
        /// Description of the failure.
        reason: String,
    },
}

impl fmt::Display for EvolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Diverged { time } => write!(f, "solution diverged at t={time}"),
            Self::Numerical { reason } => write!(f, "numerical failure: {reason}"),
        }
    }
}

impl Error for EvolveError {}

impl From<EvolveError> for InvokeFault {
    fn from(err: EvolveError) -> Self {
        let kind = match &err {
            EvolveError::Diverged { .. } => "DivergenceError",
            EvolveError::Numerical { .. } => "NumericalError",
        };
        InvokeFault::new(kind, err.to_string())
    }
}

// ── Evolver ────────────────────────────────────────────────────────

/// A time-stepping simulation that exposes its state as packets.
pub trait Evolver: PacketInterface {
    /// Current simulation time (nondimensional).
    fn time(&self) -> f64;

    /// Advance toward `target_time` by at most `chunk_size` steps.
    fn advance(&mut self, target_time: f64, chunk_size: usize) -> Result<(), EvolveError>;

    /// Evolve in chunks, handing a fresh packet to `emit` after each.
    ///
    /// Runs until `target_time` is reached or `chunks` chunks have been
    /// taken, whichever comes first. Returns the number of chunks
    /// completed.
    fn evolve_with<F>(
        &mut self,
        target_time: f64,
        chunk_size: usize,
        chunks: usize,
        mut emit: F,
    ) -> Result<usize, EvolveError>
    where
        Self: Sized,
        F: FnMut(usize, Packet),
    {
        let mut completed = 0usize;
        for i in 0..chunks {
            if self.time() >= target_time {
                break;
            }
            self.advance(target_time, chunk_size)?;
            debug!(chunk = i, time = self.time(), "chunk evolved");
            emit(i, self.create_packet());
            completed = i + 1;
        }
        Ok(completed)
    }

    /// Evolve in chunks, pushing each packet onto one queue.
    ///
    /// A dropped consumer is not an error; the evolution simply keeps
    /// running without a listener.
    fn evolve_queue(
        &mut self,
        target_time: f64,
        chunk_size: usize,
        chunks: usize,
        queue: &Sender<Packet>,
    ) -> Result<usize, EvolveError>
    where
        Self: Sized,
    {
        self.evolve_with(target_time, chunk_size, chunks, |_, packet| {
            let _ = queue.send(packet);
        })
    }

    /// Evolve in chunks, publishing each packet through a multiplex.
    fn evolve_multiplexed(
        &mut self,
        target_time: f64,
        chunk_size: usize,
        chunks: usize,
        fanout: &PacketMultiplex,
    ) -> Result<usize, EvolveError>
    where
        Self: Sized,
    {
        self.evolve_with(target_time, chunk_size, chunks, |_, packet| {
            fanout.publish(&packet);
        })
    }
}
