use crate::core::utils::atomic::AtomicF64;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the three Cartesian axes of a particle's coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// The component index of this axis in a `Point3`/`Vector3`.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        f.write_str(label)
    }
}

impl FromStr for Axis {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "x" | "0" => Ok(Axis::X),
            "y" | "1" => Ok(Axis::Y),
            "z" | "2" => Ok(Axis::Z),
            _ => Err(()),
        }
    }
}

/// Per-axis derivative accumulators of one particle.
///
/// Only ever added to during a pass; reset between passes by the model.
#[derive(Debug, Clone, Default)]
pub(crate) struct DerivativeSlots([AtomicF64; 3]);

impl DerivativeSlots {
    #[inline]
    pub(crate) fn add(&self, axis: Axis, amount: f64) {
        self.0[axis.index()].fetch_add(amount);
    }

    pub(crate) fn to_vector(&self) -> Vector3<f64> {
        Vector3::new(self.0[0].load(), self.0[1].load(), self.0[2].load())
    }

    pub(crate) fn reset(&self) {
        for slot in &self.0 {
            slot.store(0.0);
        }
    }
}

/// A point particle with Cartesian coordinates and accumulated derivatives.
///
/// Derivatives are transient evaluation output and are not serialized; a restored
/// particle starts with zeroed derivative slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    /// Human-readable label, used by scene files and log output.
    pub name: String,
    /// Current position of the particle.
    pub coordinates: Point3<f64>,
    #[serde(skip)]
    pub(crate) derivatives: DerivativeSlots,
}

impl Particle {
    pub fn new(name: &str, coordinates: Point3<f64>) -> Self {
        Self {
            name: name.to_string(),
            coordinates,
            derivatives: DerivativeSlots::default(),
        }
    }

    /// The accumulated score derivative with respect to this particle's coordinates.
    pub fn derivatives(&self) -> Vector3<f64> {
        self.derivatives.to_vector()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_indices_match_vector_components() {
        let point = Point3::new(1.0, 2.0, 3.0);
        assert_eq!(point[Axis::X.index()], 1.0);
        assert_eq!(point[Axis::Y.index()], 2.0);
        assert_eq!(point[Axis::Z.index()], 3.0);
    }

    #[test]
    fn axis_parses_names_and_indices_case_insensitively() {
        assert_eq!(Axis::from_str("x"), Ok(Axis::X));
        assert_eq!(Axis::from_str("Y"), Ok(Axis::Y));
        assert_eq!(Axis::from_str("2"), Ok(Axis::Z));
        assert_eq!(Axis::from_str("w"), Err(()));
    }

    #[test]
    fn axis_display_round_trips_through_from_str() {
        for axis in Axis::ALL {
            assert_eq!(Axis::from_str(&axis.to_string()), Ok(axis));
        }
    }

    #[test]
    fn new_particle_has_zero_derivatives() {
        let particle = Particle::new("p", Point3::new(1.0, 2.0, 3.0));
        assert_eq!(particle.name, "p");
        assert_eq!(particle.derivatives(), Vector3::zeros());
    }

    #[test]
    fn derivative_slots_add_per_axis_and_reset() {
        let particle = Particle::new("p", Point3::origin());
        particle.derivatives.add(Axis::Z, 2.0);
        particle.derivatives.add(Axis::Z, 1.0);
        particle.derivatives.add(Axis::X, -4.0);
        assert_eq!(particle.derivatives(), Vector3::new(-4.0, 0.0, 3.0));

        particle.derivatives.reset();
        assert_eq!(particle.derivatives(), Vector3::zeros());
    }
}
