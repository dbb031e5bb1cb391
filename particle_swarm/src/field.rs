//! The particle population.
//!
//! The field is rebuilt wholesale on resize: a new random population sized
//! for the new canvas, never a patch-up of the old particles.

use rand::Rng;

use crate::canvas::{Canvas, Extent};
use crate::particle::{Particle, Physics, SpawnRange};
use crate::shared::GestureSnapshot;

pub struct ParticleField {
    particles:  Vec<Particle>,
    population: usize,
    spawn:      SpawnRange,
}

impl ParticleField {
    pub fn new<R: Rng + ?Sized>(population: usize, spawn: SpawnRange, extent: Extent, rng: &mut R) -> Self {
        let mut field = ParticleField {
            particles: Vec::with_capacity(population),
            population,
            spawn,
        };
        field.reinitialize(extent, rng);
        field
    }

    /// Replace every particle with a fresh one on an `extent` canvas.
    pub fn reinitialize<R: Rng + ?Sized>(&mut self, extent: Extent, rng: &mut R) {
        self.particles.clear();
        for _ in 0..self.population {
            self.particles.push(Particle::spawn(rng, extent, &self.spawn));
        }
    }

    /// Update then draw each particle, in order.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        snap:    &GestureSnapshot,
        physics: &Physics,
        canvas:  &mut Canvas,
        rng:     &mut R,
    ) {
        let extent = canvas.extent();
        for p in self.particles.iter_mut() {
            *p = p.step(snap, extent, physics, rng);
            p.draw(canvas);
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }
}
