pub mod compatibility;
pub mod crossover;
pub mod forward;
pub mod mutation;
pub mod topology;

use crate::config::{MutationConfig, NetworkConfig, SpeciationConfig};
use crate::error::Result;
use crate::innovation::InnovationRegistry;
pub use kittener_data::{Genome, Link, Node, NodeKind, BIAS_NODE_ID};
use rand::Rng;

pub use forward::sigmoid;

/// Trait defining the evolutionary operations on a genome.
///
/// Every operation that can create structure takes the run's
/// [`InnovationRegistry`] explicitly.
pub trait GenomeLogic {
    fn new_minimal_with_rng<R: Rng>(
        num_inputs: usize,
        num_outputs: usize,
        config: &NetworkConfig,
        registry: &mut InnovationRegistry,
        rng: &mut R,
    ) -> Self;

    /// One forward pass; fails if `inputs` does not match the input arity.
    fn feed_forward(&mut self, inputs: &[f32], config: &NetworkConfig) -> Result<Vec<f32>>;

    fn mutate_with_config<R: Rng>(
        &mut self,
        config: &MutationConfig,
        registry: &mut InnovationRegistry,
        rng: &mut R,
    );

    fn add_link(
        &mut self,
        from_id: usize,
        to_id: usize,
        weight: f32,
        registry: &mut InnovationRegistry,
    ) -> Result<usize>;

    fn split_link(&mut self, link_idx: usize, registry: &mut InnovationRegistry) -> Option<usize>;

    fn is_fully_connected(&self) -> bool;

    fn crossover_with_rng<R: Rng>(&self, other: &Self, rng: &mut R) -> Self;

    fn compatibility_distance(&self, other: &Self, config: &SpeciationConfig) -> f64;

    fn is_compatible(&self, other: &Self, config: &SpeciationConfig, threshold: f64) -> bool;
}

impl GenomeLogic for Genome {
    fn new_minimal_with_rng<R: Rng>(
        num_inputs: usize,
        num_outputs: usize,
        config: &NetworkConfig,
        registry: &mut InnovationRegistry,
        rng: &mut R,
    ) -> Self {
        topology::create_minimal_with_rng(num_inputs, num_outputs, config, registry, rng)
    }

    fn feed_forward(&mut self, inputs: &[f32], config: &NetworkConfig) -> Result<Vec<f32>> {
        forward::feed_forward(self, inputs, config)
    }

    fn mutate_with_config<R: Rng>(
        &mut self,
        config: &MutationConfig,
        registry: &mut InnovationRegistry,
        rng: &mut R,
    ) {
        mutation::mutate_with_config(self, config, registry, rng);
    }

    fn add_link(
        &mut self,
        from_id: usize,
        to_id: usize,
        weight: f32,
        registry: &mut InnovationRegistry,
    ) -> Result<usize> {
        topology::add_link(self, from_id, to_id, weight, registry)
    }

    fn split_link(&mut self, link_idx: usize, registry: &mut InnovationRegistry) -> Option<usize> {
        mutation::split_link(self, link_idx, registry)
    }

    fn is_fully_connected(&self) -> bool {
        topology::is_fully_connected(self)
    }

    fn crossover_with_rng<R: Rng>(&self, other: &Self, rng: &mut R) -> Self {
        crossover::crossover_with_rng(self, other, rng)
    }

    fn compatibility_distance(&self, other: &Self, config: &SpeciationConfig) -> f64 {
        compatibility::compatibility_distance(self, other, config)
    }

    fn is_compatible(&self, other: &Self, config: &SpeciationConfig, threshold: f64) -> bool {
        compatibility::is_compatible(self, other, config, threshold)
    }
}
