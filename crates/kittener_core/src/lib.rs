//! # Kittener Core
//!
//! A NEAT (NeuroEvolution of Augmenting Topologies) engine: networks that
//! start minimal and grow structure over generations, grouped into species
//! to protect new structure while it is still being tuned.
//!
//! This crate contains:
//! - Genome logic: construction, forward pass, mutation, crossover and
//!   compatibility distance over the arena genomes of `kittener_data`
//! - The run-wide innovation registry that aligns genes across lineages
//! - Species with fitness sharing, staleness, culling and reproduction
//! - The population driver with adaptive speciation and exact resizing
//! - Configuration, error types, metrics and structured logging
//!
//! ## Example
//!
//! ```
//! use kittener_core::config::NeatConfig;
//! use kittener_core::Population;
//!
//! let mut config = NeatConfig::default();
//! config.population.size = 20;
//! config.population.inputs = 2;
//! config.population.outputs = 1;
//! config.population.seed = Some(42);
//!
//! let mut population = Population::new(config).unwrap();
//! for i in 0..population.len() {
//!     let out = population.get_output(i, &[0.0, 1.0]).unwrap();
//!     population.assign_fitness(i, f64::from(out[0])).unwrap();
//! }
//! let report = population.advance_generation();
//! assert_eq!(population.len(), 20);
//! assert_eq!(report.generation, 0);
//! ```

/// Configuration management for evolution parameters
pub mod config;
/// Error types
pub mod error;
/// Genome construction, evaluation and genetic operators
pub mod genome;
/// Run-wide innovation bookkeeping
pub mod innovation;
/// Run counters and structured logging
pub mod metrics;
/// Generational driver
pub mod population;
/// Species clustering and reproduction
pub mod species;

pub use config::NeatConfig;
pub use error::{NeatError, Result};
pub use genome::GenomeLogic;
pub use innovation::InnovationRegistry;
pub use kittener_data::{Genome, Link, Node, NodeKind};
pub use metrics::{init_logging, Metrics};
pub use population::{GenerationReport, Population, SpeciesSummary};
pub use species::Species;
