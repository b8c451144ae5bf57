//! Evaluation tasks: stand-ins for the simulation layer that scores genomes.
//!
//! A task only talks to the population through its public surface: it feeds
//! input vectors in, reads decisions out and assigns one scalar fitness per
//! genome before the caller advances the generation.

pub mod dodge;
pub mod xor;

use kittener_core::{Population, Result};
use serde::{Deserialize, Serialize};

pub use dodge::DodgeTask;
pub use xor::XorTask;

pub trait Task {
    fn name(&self) -> &'static str;
    /// Length of the input vector the task feeds each genome.
    fn inputs(&self) -> usize;
    /// Length of the output vector the task reads back.
    fn outputs(&self) -> usize;
    /// Scores every genome of the current generation.
    fn evaluate(&mut self, population: &mut Population) -> Result<()>;
    /// Raw fitness at which the task counts as solved, if it has one.
    fn target_fitness(&self) -> Option<f64> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Xor,
    Dodge,
}

impl TaskKind {
    #[must_use]
    pub fn build(self, seed: u64) -> Box<dyn Task> {
        match self {
            TaskKind::Xor => Box::new(XorTask),
            TaskKind::Dodge => Box::new(DodgeTask::new(seed)),
        }
    }
}

/// Index of the largest value; the first one wins ties.
#[must_use]
pub fn arg_max(values: &[f32]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate() {
        if v > values[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arg_max() {
        assert_eq!(arg_max(&[0.1, 0.9, 0.3]), 1);
        assert_eq!(arg_max(&[0.5, 0.5]), 0);
        assert_eq!(arg_max(&[]), 0);
    }

    #[test]
    fn test_task_arity() {
        let xor = TaskKind::Xor.build(0);
        assert_eq!((xor.inputs(), xor.outputs()), (2, 1));
        let dodge = TaskKind::Dodge.build(0);
        assert_eq!(dodge.outputs(), 5);
        assert_eq!(dodge.name(), "dodge");
    }
}
