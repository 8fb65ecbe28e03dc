//! The producer/consumer contract for packet exchange.
//!
//! Any object that can enumerate a fixed, ordered list of variable
//! names and expose/accept each by name can play both packet roles:
//! `create_packet` snapshots the full data list, `read_packet` applies
//! a snapshot back, running the validation hook per value before
//! assignment.

use benard_core::{Array, Packet, PacketError};

/// The capability set a packet producer/consumer must provide.
///
/// The three required methods are the storage seam: how the state is
/// actually held (plain vectors, an array engine, a view onto a larger
/// history buffer) is invisible to the protocol. The provided methods
/// implement the protocol itself and should not normally be overridden.
pub trait PacketInterface {
    /// The fixed, ordered list of variable names this state exposes.
    ///
    /// The list is a compile-time property of the state type: every
    /// packet it produces contains exactly these keys, in this order,
    /// and every packet it reads must supply all of them.
    fn data_list(&self) -> &'static [&'static str];

    /// Export the current value of one named variable.
    ///
    /// Returns `None` only if `name` is not in the data list.
    fn export(&self, name: &str) -> Option<Array>;

    /// Accept a new value for one named variable.
    ///
    /// Fails with [`PacketError::UnknownKey`] for names outside the
    /// data list, or [`PacketError::ShapeMismatch`] when the value
    /// cannot replace the stored one.
    fn import(&mut self, name: &str, value: Array) -> Result<(), PacketError>;

    /// Validation hook run on every value before [`import`](Self::import).
    ///
    /// The default accepts everything; states whose variables must stay
    /// finite delegate to [`ensure_finite`].
    fn validate(&self, _name: &str, _value: &Array) -> Result<(), PacketError> {
        Ok(())
    }

    /// Snapshot the full data list into a fresh packet.
    fn create_packet(&self) -> Packet {
        let mut packet = Packet::new();
        for name in self.data_list() {
            if let Some(value) = self.export(name) {
                packet.insert(*name, value);
            }
        }
        packet
    }

    /// Apply an incoming packet onto this state, key by key.
    ///
    /// Iterates this consumer's own data list, so a packet carrying
    /// extra keys is harmless and a packet lacking one fails with
    /// [`PacketError::MissingKey`]. Application is deliberately not
    /// atomic across keys: a validation failure on the n-th key leaves
    /// the first n−1 keys applied.
    fn read_packet(&mut self, packet: &Packet) -> Result<(), PacketError> {
        for name in self.data_list() {
            let value = packet
                .get(name)
                .ok_or_else(|| PacketError::MissingKey {
                    name: name.to_string(),
                })?
                .clone();
            self.validate(name, &value)?;
            self.import(name, value)?;
        }
        Ok(())
    }
}

/// Reject any array containing NaN or infinite entries.
///
/// The standard body for [`PacketInterface::validate`] on states whose
/// variables are physical fields: a non-finite entry means the producer
/// diverged, and silently storing it would poison every later snapshot.
pub fn ensure_finite(name: &str, value: &Array) -> Result<(), PacketError> {
    let count = value.non_finite_count();
    if count > 0 {
        return Err(PacketError::NonFinite {
            name: name.to_string(),
            count,
        });
    }
    Ok(())
}
