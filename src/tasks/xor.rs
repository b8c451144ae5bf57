use super::Task;
use kittener_core::{Population, Result};

const CASES: [([f32; 2], f32); 4] = [
    ([0.0, 0.0], 0.0),
    ([0.0, 1.0], 1.0),
    ([1.0, 0.0], 1.0),
    ([1.0, 1.0], 0.0),
];

/// The XOR benchmark. Fitness is `(4 - total error)^2`, 16 for a perfect network.
#[derive(Debug, Default, Clone, Copy)]
pub struct XorTask;

impl XorTask {
    /// Sum of absolute errors of one genome over the four cases.
    pub fn error(population: &mut Population, index: usize) -> Result<f32> {
        let mut error = 0.0;
        for (inputs, target) in CASES {
            let out = population.get_output(index, &inputs)?;
            error += (out[0] - target).abs();
        }
        Ok(error)
    }
}

impl Task for XorTask {
    fn name(&self) -> &'static str {
        "xor"
    }

    fn inputs(&self) -> usize {
        2
    }

    fn outputs(&self) -> usize {
        1
    }

    fn evaluate(&mut self, population: &mut Population) -> Result<()> {
        for i in 0..population.len() {
            let error = Self::error(population, i)?;
            let fitness = f64::from(4.0 - error).powi(2);
            population.assign_fitness(i, fitness)?;
        }
        Ok(())
    }

    fn target_fitness(&self) -> Option<f64> {
        Some(15.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kittener_core::NeatConfig;

    #[test]
    fn test_xor_fitness_in_range() {
        let mut config = NeatConfig::default();
        config.population.size = 10;
        config.population.inputs = 2;
        config.population.outputs = 1;
        config.population.seed = Some(3);
        let mut pop = Population::new(config).expect("population");
        XorTask.evaluate(&mut pop).expect("evaluate");
        for g in pop.genomes() {
            assert!(g.fitness > 0.0 && g.fitness <= 16.0);
        }
    }
}
