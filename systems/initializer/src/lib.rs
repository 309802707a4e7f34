#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Population seeding operators.
//!
//! Genotype initializers append freshly randomized genotypes to a buffer;
//! agent initializers wrap those genotypes into [`Specimen`] agents owned
//! by a shared [`Population`] that locators can then place.

mod genotype;
mod population;

use std::rc::Rc;

use rand::Rng;
use tracing::debug;

pub use genotype::{
    gen_permutation, Bounds, FloatGenotype, FloatInitializer, PermutationGenotype,
    PermutationInitializer, PointGenotype, PointInitializer,
};
pub use population::{AgentAddress, Population, Specimen};

/// Builds a population of agents carrying two-dimensional point genotypes.
pub fn emas_initializer<R: Rng + ?Sized>(
    energy: f64,
    size: usize,
    bounds: Bounds,
    rng: &mut R,
) -> Rc<Population<PointGenotype>> {
    let mut genotypes = Vec::with_capacity(size);
    PointInitializer::new(size, bounds).process(rng, &mut genotypes);
    populate(genotypes, energy)
}

/// Builds a population of agents carrying `dims`-dimensional float genotypes.
pub fn float_emas_initializer<R: Rng + ?Sized>(
    dims: usize,
    energy: f64,
    size: usize,
    bounds: Bounds,
    rng: &mut R,
) -> Rc<Population<FloatGenotype>> {
    let mut genotypes = Vec::with_capacity(size);
    FloatInitializer::new(dims, size, bounds).process(rng, &mut genotypes);
    populate(genotypes, energy)
}

/// Builds a population of agents carrying job-order permutations of `length`.
pub fn flow_shop_agents_initializer<R: Rng + ?Sized>(
    size: usize,
    length: usize,
    energy: f64,
    rng: &mut R,
) -> Rc<Population<PermutationGenotype>> {
    let mut genotypes = Vec::with_capacity(size);
    PermutationInitializer::new(length, size).process(rng, &mut genotypes);
    populate(genotypes, energy)
}

fn populate<G>(genotypes: Vec<G>, energy: f64) -> Rc<Population<G>> {
    let population = Population::new();
    for genotype in genotypes {
        let _ = population.spawn(genotype, energy);
    }
    debug!(size = population.len(), energy, "seeded population");
    population
}
