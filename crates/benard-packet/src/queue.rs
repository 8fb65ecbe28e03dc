//! Queue consumption: unbuffered draining and coalescing iteration.
//!
//! Completion is implicit in "no more packets arrive": an empty queue
//! or an elapsed receive timeout is the producer's end-of-stream
//! signal, never an error. Two consumption disciplines exist:
//!
//! - [`read_queue`](ReadQueue::read_queue) applies every packet in
//!   arrival order — the writer's discipline, where nothing may be
//!   skipped.
//! - [`iterate_queue_buffered`](ReadQueue::iterate_queue_buffered)
//!   coalesces: each step drains up to `buffer − 1` packets without
//!   blocking, then blocks for one more. A display consumer that falls
//!   behind skips straight to the most recent state instead of
//!   rendering every intermediate frame, while the final blocking
//!   receive keeps it from busy-polling when the producer is the slow
//!   side.

use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, TryRecvError};
use tracing::debug;

use benard_core::{Packet, PacketError};

use crate::interface::PacketInterface;

/// Queue-draining extensions to [`PacketInterface`].
///
/// Blanket-implemented for every sized packet state; a separate trait
/// only because the buffered iterator needs `Self: Sized`.
pub trait ReadQueue: PacketInterface + Sized {
    /// Apply every packet from the queue until it runs dry.
    ///
    /// Blocks up to `timeout` for each packet; a timeout or a
    /// disconnected producer ends the loop normally. Returns the number
    /// of packets applied. Validation failures abort the drain and
    /// propagate.
    fn read_queue(&mut self, queue: &Receiver<Packet>, timeout: Duration) -> Result<usize, PacketError> {
        let mut applied = 0usize;
        loop {
            match queue.recv_timeout(timeout) {
                Ok(packet) => {
                    self.read_packet(&packet)?;
                    applied += 1;
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        debug!(applied, "packet queue drained");
        Ok(applied)
    }

    /// Iterate over the queue, coalescing backlogged packets.
    ///
    /// Each [`next()`](Iterator::next) applies up to `buffer − 1`
    /// packets without blocking, then exactly one blocking receive with
    /// `timeout`, and yields `Ok(n)` with the total applied in that
    /// step (`n ≥ 1`). The iterator ends when the blocking receive
    /// times out or the producer disconnects; a backlog drained in
    /// that final step is still yielded first.
    fn iterate_queue_buffered<'a>(
        &'a mut self,
        queue: &'a Receiver<Packet>,
        timeout: Duration,
        buffer: usize,
    ) -> BufferedDrain<'a, Self> {
        BufferedDrain {
            state: self,
            queue,
            timeout,
            buffer: buffer.max(1),
            done: false,
        }
    }
}

impl<S: PacketInterface + Sized> ReadQueue for S {}

/// Coalescing queue iterator returned by
/// [`iterate_queue_buffered`](ReadQueue::iterate_queue_buffered).
pub struct BufferedDrain<'a, S: PacketInterface> {
    state: &'a mut S,
    queue: &'a Receiver<Packet>,
    timeout: Duration,
    buffer: usize,
    done: bool,
}

impl<S: PacketInterface> Iterator for BufferedDrain<'_, S> {
    type Item = Result<usize, PacketError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        // Non-blocking drain of the backlog, `buffer − 1` at most.
        let mut coalesced = 0usize;
        for _ in 1..self.buffer {
            match self.queue.try_recv() {
                Ok(packet) => {
                    if let Err(e) = self.state.read_packet(&packet) {
                        return Some(Err(e));
                    }
                    coalesced += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        // One blocking receive; its timeout is the end-of-stream signal.
        match self.queue.recv_timeout(self.timeout) {
            Ok(packet) => match self.state.read_packet(&packet) {
                Ok(()) => Some(Ok(coalesced + 1)),
                Err(e) => Some(Err(e)),
            },
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                self.done = true;
                // A final partial backlog still counts as a step.
                if coalesced > 0 {
                    Some(Ok(coalesced))
                } else {
                    None
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_state::SampleState;

    const SHORT: Duration = Duration::from_millis(20);

    fn packet_with_time(t: f64) -> Packet {
        let mut p = Packet::new();
        p.insert("temperature", vec![t, t]);
        p.insert("time", t);
        p
    }

    #[test]
    fn read_queue_applies_in_order_until_empty() {
        let (tx, rx) = crossbeam_channel::unbounded();
        for t in 1..=4 {
            tx.send(packet_with_time(t as f64)).unwrap();
        }
        let mut state = SampleState::new(vec![0.0, 0.0], 0.0);
        let applied = state.read_queue(&rx, SHORT).unwrap();
        assert_eq!(applied, 4);
        assert_eq!(state.time, 4.0);
    }

    #[test]
    fn read_queue_on_empty_queue_terminates_cleanly() {
        let (_tx, rx) = crossbeam_channel::unbounded::<Packet>();
        let mut state = SampleState::new(vec![7.0], 0.25);
        let before = state.clone();
        let applied = state.read_queue(&rx, SHORT).unwrap();
        assert_eq!(applied, 0);
        assert_eq!(state, before);
    }

    #[test]
    fn read_queue_ends_when_producer_disconnects() {
        let (tx, rx) = crossbeam_channel::unbounded();
        tx.send(packet_with_time(1.0)).unwrap();
        drop(tx);
        let mut state = SampleState::new(vec![0.0, 0.0], 0.0);
        let applied = state.read_queue(&rx, Duration::from_secs(5)).unwrap();
        assert_eq!(applied, 1);
    }

    #[test]
    fn read_queue_propagates_validation_failure() {
        let (tx, rx) = crossbeam_channel::unbounded();
        tx.send(packet_with_time(1.0)).unwrap();
        tx.send(packet_with_time(f64::NAN)).unwrap();
        let mut state = SampleState::new(vec![0.0, 0.0], 0.0);
        let err = state.read_queue(&rx, SHORT).unwrap_err();
        assert!(matches!(err, PacketError::NonFinite { .. }));
    }

    #[test]
    fn buffered_step_coalesces_to_the_third_packet() {
        // Five packets queued, buffer = 3: two non-blocking drains
        // consume packets 1 and 2, the blocking receive consumes 3.
        let (tx, rx) = crossbeam_channel::unbounded();
        for t in 1..=5 {
            tx.send(packet_with_time(t as f64)).unwrap();
        }
        let mut state = SampleState::new(vec![0.0, 0.0], 0.0);
        let step = state.iterate_queue_buffered(&rx, SHORT, 3).next();
        assert_eq!(step, Some(Ok(3)));
        assert_eq!(state.time, 3.0);
    }

    #[test]
    fn buffered_iteration_drains_everything_then_ends() {
        let (tx, rx) = crossbeam_channel::unbounded();
        for t in 1..=5 {
            tx.send(packet_with_time(t as f64)).unwrap();
        }
        drop(tx);
        let mut state = SampleState::new(vec![0.0, 0.0], 0.0);
        let steps: Vec<_> = state
            .iterate_queue_buffered(&rx, SHORT, 3)
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        // First step coalesces 3, second coalesces the remaining 2.
        assert_eq!(steps, vec![3, 2]);
        assert_eq!(state.time, 5.0);
    }

    #[test]
    fn buffered_step_with_single_packet_blocks_for_it() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let handle = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(30));
            tx.send(packet_with_time(9.0)).unwrap();
        });
        let mut state = SampleState::new(vec![0.0, 0.0], 0.0);
        let step = state
            .iterate_queue_buffered(&rx, Duration::from_secs(2), 4)
            .next();
        assert_eq!(step, Some(Ok(1)));
        assert_eq!(state.time, 9.0);
        handle.join().unwrap();
    }

    #[test]
    fn buffered_iteration_on_empty_queue_yields_nothing() {
        let (_tx, rx) = crossbeam_channel::unbounded::<Packet>();
        let mut state = SampleState::new(vec![0.0], 0.0);
        assert!(state.iterate_queue_buffered(&rx, SHORT, 3).next().is_none());
    }

    #[test]
    fn buffered_iteration_surfaces_validation_errors() {
        let (tx, rx) = crossbeam_channel::unbounded();
        tx.send(packet_with_time(f64::NAN)).unwrap();
        let mut state = SampleState::new(vec![0.0, 0.0], 0.0);
        let step = state.iterate_queue_buffered(&rx, SHORT, 3).next();
        assert!(matches!(step, Some(Err(PacketError::NonFinite { .. }))));
    }
}
