//! The array value carried inside packets.
//!
//! [`Array`] is a flat, shape-tagged `f64` buffer — the smallest thing
//! that can stand in for a simulation state variable (a temperature
//! grid, a vorticity field, or a bare scalar like the current time)
//! while crossing a queue by value.

use std::fmt;

use smallvec::SmallVec;

use crate::error::PacketError;

/// Shape vector for an [`Array`].
///
/// Uses `SmallVec<[usize; 4]>` so up to 4-dimensional state arrays
/// carry their shape without a heap allocation.
pub type Shape = SmallVec<[usize; 4]>;

/// A shape-tagged, owned `f64` buffer.
///
/// Arrays are the only value kind a packet may hold. They are plain
/// data: cloning one copies the buffer, which is exactly what
/// multiplexed delivery requires (no sharing of mutable state between
/// consumers).
#[derive(Clone, Debug, PartialEq)]
pub struct Array {
    shape: Shape,
    data: Vec<f64>,
}

impl Array {
    /// A 0-dimensional array holding one value.
    pub fn scalar(value: f64) -> Self {
        Self {
            shape: Shape::new(),
            data: vec![value],
        }
    }

    /// A 1-dimensional array over the given buffer.
    pub fn from_vec(data: Vec<f64>) -> Self {
        let mut shape = Shape::new();
        shape.push(data.len());
        Self { shape, data }
    }

    /// An array with an explicit shape.
    ///
    /// Fails with [`PacketError::ShapeMismatch`] if the product of the
    /// shape's extents does not equal the buffer length.
    pub fn with_shape(shape: impl IntoIterator<Item = usize>, data: Vec<f64>) -> Result<Self, PacketError> {
        let shape: Shape = shape.into_iter().collect();
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(PacketError::ShapeMismatch {
                name: String::new(),
                shape: shape.to_vec(),
                len: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// The array's shape. Empty for scalars.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the array holds no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The flat element buffer.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// The single element of a scalar array, if it is one.
    pub fn as_scalar(&self) -> Option<f64> {
        if self.data.len() == 1 {
            Some(self.data[0])
        } else {
            None
        }
    }

    /// Whether every element is finite (no NaN, no ±inf).
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }

    /// Number of non-finite elements.
    pub fn non_finite_count(&self) -> usize {
        self.data.iter().filter(|v| !v.is_finite()).count()
    }

    /// Consume the array, returning its flat buffer.
    pub fn into_data(self) -> Vec<f64> {
        self.data
    }
}

impl From<f64> for Array {
    fn from(v: f64) -> Self {
        Self::scalar(v)
    }
}

impl From<Vec<f64>> for Array {
    fn from(v: Vec<f64>) -> Self {
        Self::from_vec(v)
    }
}

impl fmt::Display for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(v) = self.as_scalar() {
            write!(f, "{v}")
        } else {
            write!(f, "array(shape={:?}, len={})", self.shape(), self.len())
        }
    }
}
