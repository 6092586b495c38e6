use super::ids::ParticleIndex;
use super::particle::{Axis, Particle};
use crate::core::scoring::accumulator::DerivativeAccumulator;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

/// A model object a restraint may depend on.
///
/// Reported by [`Restraint::inputs`](crate::core::scoring::restraint::Restraint::inputs)
/// so the engine can tell which restraints are affected by a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModelObject {
    Particle(ParticleIndex),
}

impl ModelObject {
    /// The particle this object refers to, if it is a particle.
    pub fn particle(&self) -> Option<ParticleIndex> {
        match self {
            ModelObject::Particle(index) => Some(*index),
        }
    }
}

/// The particle store restraints read from and write derivatives into.
///
/// Reading coordinates and adding derivatives only need `&self`, so one model can be
/// shared by every restraint of a parallel evaluation pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Model {
    /// Primary storage for particles, keyed by stable arena indices.
    particles: SlotMap<ParticleIndex, Particle>,
}

impl Model {
    /// Creates a new, empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a particle and returns its index.
    ///
    /// # Arguments
    ///
    /// * `name` - A human-readable label for the particle.
    /// * `coordinates` - The initial position of the particle.
    pub fn add_particle(&mut self, name: &str, coordinates: Point3<f64>) -> ParticleIndex {
        self.particles.insert(Particle::new(name, coordinates))
    }

    /// Removes a particle, invalidating its index.
    ///
    /// Restraints still bound to the index must be released by their owner before the
    /// next evaluation pass.
    pub fn remove_particle(&mut self, index: ParticleIndex) -> Option<Particle> {
        self.particles.remove(index)
    }

    /// Returns `true` if `index` refers to a live particle of this model.
    pub fn contains(&self, index: ParticleIndex) -> bool {
        self.particles.contains_key(index)
    }

    pub fn particle(&self, index: ParticleIndex) -> Option<&Particle> {
        self.particles.get(index)
    }

    pub fn particles_iter(&self) -> impl Iterator<Item = (ParticleIndex, &Particle)> {
        self.particles.iter()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Finds the first particle carrying the given name.
    pub fn find_particle_by_name(&self, name: &str) -> Option<ParticleIndex> {
        self.particles
            .iter()
            .find(|(_, particle)| particle.name == name)
            .map(|(index, _)| index)
    }

    /// The handle restraints report as their dependency on this particle.
    ///
    /// # Return
    ///
    /// Returns `None` if the particle does not exist.
    pub fn particle_handle(&self, index: ParticleIndex) -> Option<ModelObject> {
        self.contains(index).then_some(ModelObject::Particle(index))
    }

    pub fn coordinates(&self, index: ParticleIndex) -> Option<Point3<f64>> {
        self.particles.get(index).map(|particle| particle.coordinates)
    }

    /// Moves a particle. Returns `None` if the particle does not exist.
    pub fn set_coordinates(
        &mut self,
        index: ParticleIndex,
        coordinates: Point3<f64>,
    ) -> Option<()> {
        let particle = self.particles.get_mut(index)?;
        particle.coordinates = coordinates;
        Some(())
    }

    /// Reads one coordinate component of a particle.
    ///
    /// # Panics
    ///
    /// Panics if `index` is stale. Restraints only read particles they were
    /// constructed with, so a stale index means the particle was removed while a
    /// restraint bound to it was still active.
    #[inline]
    pub fn coordinate(&self, index: ParticleIndex, axis: Axis) -> f64 {
        self.expect_particle(index).coordinates[axis.index()]
    }

    /// Adds `amount`, scaled by the accumulator's weight, to one derivative component.
    ///
    /// Safe to call concurrently for the same particle and axis.
    ///
    /// # Panics
    ///
    /// Panics if `index` is stale, like [`Model::coordinate`].
    #[inline]
    pub fn add_to_derivative(
        &self,
        index: ParticleIndex,
        axis: Axis,
        amount: f64,
        accumulator: &DerivativeAccumulator,
    ) {
        self.expect_particle(index)
            .derivatives
            .add(axis, accumulator.weight() * amount);
    }

    pub fn derivatives(&self, index: ParticleIndex) -> Option<Vector3<f64>> {
        self.particles.get(index).map(Particle::derivatives)
    }

    /// Resets every particle's derivative slots to zero.
    pub fn zero_derivatives(&self) {
        for particle in self.particles.values() {
            particle.derivatives.reset();
        }
    }

    fn expect_particle(&self, index: ParticleIndex) -> &Particle {
        match self.particles.get(index) {
            Some(particle) => particle,
            None => panic!(
                "particle {index:?} is not part of the model; a restraint outlived the particle it is bound to"
            ),
        }
    }
}
