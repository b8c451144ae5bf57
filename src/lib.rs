//! # Kittener
//!
//! Headless driver around `kittener_core`: built-in evaluation tasks that
//! play the role of a simulation layer, and a display palette for species.

pub mod palette;
pub mod tasks;

pub use kittener_core::{
    config, init_logging, GenerationReport, Genome, GenomeLogic, NeatConfig, NeatError,
    Population,
};
pub use tasks::{Task, TaskKind};
