//! Multiplexed packet delivery: one producer, several independent queues.
//!
//! A producer that serves both a writer and a live viewer must not let
//! the slow consumer block the fast one, so each consumer gets its own
//! queue and the producer clones the packet per destination. Sharing a
//! mutable snapshot across consumers is exactly what this type exists
//! to prevent.

use crossbeam_channel::{Receiver, Sender};
use tracing::debug;

use benard_core::Packet;

/// A set of packet queues fed from one producer.
#[derive(Clone, Debug, Default)]
pub struct PacketMultiplex {
    senders: Vec<Sender<Packet>>,
}

impl PacketMultiplex {
    /// An empty multiplex with no consumers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a fresh unbounded queue, keep its sending half, and return
    /// the receiving half for the new consumer.
    pub fn add_consumer(&mut self) -> Receiver<Packet> {
        let (tx, rx) = crossbeam_channel::unbounded();
        self.senders.push(tx);
        rx
    }

    /// Adopt an existing queue's sending half.
    pub fn attach(&mut self, sender: Sender<Packet>) {
        self.senders.push(sender);
    }

    /// Number of attached consumers.
    pub fn consumer_count(&self) -> usize {
        self.senders.len()
    }

    /// Push one packet to every consumer, cloning per destination.
    ///
    /// Consumers whose receiving half has been dropped are skipped.
    /// Returns the number of queues the packet actually reached.
    pub fn publish(&self, packet: &Packet) -> usize {
        let mut delivered = 0usize;
        for sender in &self.senders {
            if sender.send(packet.clone()).is_ok() {
                delivered += 1;
            }
        }
        if delivered < self.senders.len() {
            debug!(
                delivered,
                consumers = self.senders.len(),
                "some packet consumers have disconnected"
            );
        }
        delivered
    }
}
