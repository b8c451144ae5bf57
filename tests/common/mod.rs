pub mod macros;

use kittener_core::config::NeatConfig;
use kittener_core::{Genome, GenomeLogic, InnovationRegistry, Population};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[allow(dead_code)]
pub struct PopulationBuilder {
    config: NeatConfig,
    fitness: Vec<f64>,
}

#[allow(dead_code)]
impl PopulationBuilder {
    pub fn new() -> Self {
        let mut config = NeatConfig::default();
        config.population.size = 20;
        config.population.inputs = 2;
        config.population.outputs = 1;
        config.population.seed = Some(42);
        Self {
            config,
            fitness: Vec::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.population.seed = Some(seed);
        self
    }

    pub fn with_size(mut self, size: usize) -> Self {
        self.config.population.size = size;
        self
    }

    pub fn with_arity(mut self, inputs: usize, outputs: usize) -> Self {
        self.config.population.inputs = inputs;
        self.config.population.outputs = outputs;
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut NeatConfig),
    {
        modifier(&mut self.config);
        self
    }

    /// Fitness assigned to genome `i` right after construction.
    pub fn with_fitness(mut self, fitness: &[f64]) -> Self {
        self.fitness = fitness.to_vec();
        self
    }

    pub fn build(self) -> Population {
        let mut pop = Population::new(self.config).expect("Failed to create population");
        for (i, &f) in self.fitness.iter().enumerate() {
            pop.assign_fitness(i, f).expect("Fitness index out of range");
        }
        pop
    }
}

/// A minimal genome and the registry it was built against.
#[allow(dead_code)]
pub fn minimal_genome(inputs: usize, outputs: usize, seed: u64) -> (Genome, InnovationRegistry) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut registry = InnovationRegistry::new(inputs + outputs);
    let genome = Genome::new_minimal_with_rng(
        inputs,
        outputs,
        &Default::default(),
        &mut registry,
        &mut rng,
    );
    (genome, registry)
}

/// Scores every genome with a deterministic function of its structure.
#[allow(dead_code)]
pub fn score_by_structure(pop: &mut Population) {
    for i in 0..pop.len() {
        let g = pop.genome(i).expect("genome");
        let fitness = 1.0 + g.enabled_link_count() as f64 + g.hidden_count() as f64 * 0.5;
        pop.assign_fitness(i, fitness).expect("fitness");
    }
}
