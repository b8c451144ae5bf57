//! Plain gene data shared by the Kittener crates.
//!
//! Everything here is inert data: nodes, links and genomes as they are
//! stored, cloned and compared. The behaviour (activation, mutation,
//! crossover, speciation) lives in `kittener_core`.

pub mod data;

pub use data::genome::{Genome, Link, Node, NodeKind, BIAS_NODE_ID};
