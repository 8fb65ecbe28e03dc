//! In-crate test fixture: a two-variable state with finite validation.

use benard_core::{Array, PacketError};

use crate::interface::{ensure_finite, PacketInterface};

/// A minimal packet state: one field array plus the current time.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleState {
    pub temperature: Vec<f64>,
    pub time: f64,
}

impl SampleState {
    pub fn new(temperature: Vec<f64>, time: f64) -> Self {
        Self { temperature, time }
    }
}

impl PacketInterface for SampleState {
    fn data_list(&self) -> &'static [&'static str] {
        &["temperature", "time"]
    }

    fn export(&self, name: &str) -> Option<Array> {
        match name {
            "temperature" => Some(Array::from_vec(self.temperature.clone())),
            "time" => Some(Array::scalar(self.time)),
            _ => None,
        }
    }

    fn import(&mut self, name: &str, value: Array) -> Result<(), PacketError> {
        match name {
            "temperature" => {
                self.temperature = value.into_data();
                Ok(())
            }
            "time" => match value.as_scalar() {
                Some(t) => {
                    self.time = t;
                    Ok(())
                }
                None => Err(PacketError::ShapeMismatch {
                    name: name.to_string(),
                    shape: value.shape().to_vec(),
                    len: value.len(),
                }),
            },
            _ => Err(PacketError::UnknownKey {
                name: name.to_string(),
            }),
        }
    }

    fn validate(&self, name: &str, value: &Array) -> Result<(), PacketError> {
        ensure_finite(name, value)
    }
}
