//! Species: clusters of structurally similar genomes.
//!
//! A species keeps a frozen representative for distance comparisons and a
//! member list that is rebuilt from scratch every generation. Fitness is
//! shared inside the species so one large cluster cannot dominate the
//! offspring quotas.

use crate::config::MutationConfig;
use crate::genome::GenomeLogic;
use crate::innovation::InnovationRegistry;
use kittener_data::Genome;
use rand::seq::SliceRandom;
use rand::Rng;

#[derive(Debug, Clone)]
pub struct Species {
    pub id: usize,
    /// Clone of the founding genome; only ever read.
    pub representative: Genome,
    pub members: Vec<Genome>,
    /// Mean shared fitness of the members this generation.
    pub avg_fitness: f64,
    /// Best `avg_fitness` this species has reached.
    pub best_avg_fitness: f64,
    /// Generations since `best_avg_fitness` last improved.
    pub staleness: u32,
}

impl Species {
    #[must_use]
    pub fn new(id: usize, representative: Genome) -> Self {
        Self {
            id,
            representative,
            members: Vec::new(),
            avg_fitness: 0.0,
            best_avg_fitness: f64::NEG_INFINITY,
            staleness: 0,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Divides each member's raw fitness by the member count and records the mean.
    pub fn share_fitness(&mut self) {
        if self.members.is_empty() {
            self.avg_fitness = 0.0;
            return;
        }
        let count = self.members.len() as f64;
        let mut total = 0.0;
        for member in &mut self.members {
            member.fitness /= count;
            total += member.fitness;
        }
        self.avg_fitness = total / count;
    }

    pub fn update_staleness(&mut self, double_when_empty: bool) {
        if self.avg_fitness > self.best_avg_fitness {
            self.best_avg_fitness = self.avg_fitness;
            self.staleness = 0;
        } else if double_when_empty && self.members.is_empty() {
            self.staleness += 2;
        } else {
            self.staleness += 1;
        }
    }

    /// Keeps the fittest `ceil(len * fraction)` members.
    pub fn cull(&mut self, fraction: f64) {
        self.sort_members();
        let keep = (self.members.len() as f64 * fraction).ceil() as usize;
        self.members.truncate(keep);
    }

    fn sort_members(&mut self) {
        self.members.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));
    }

    #[must_use]
    pub fn best_member(&self) -> Option<&Genome> {
        self.members.iter().max_by(|a, b| a.fitness.total_cmp(&b.fitness))
    }

    /// Breeds exactly `count` offspring from the current members.
    ///
    /// The first offspring is an unmutated copy of the best member; the rest
    /// come from crossover of two random members or a copy of one, and are
    /// mutated. All offspring start with zero fitness. An empty species
    /// produces nothing.
    pub fn reproduce<R: Rng>(
        &self,
        count: usize,
        config: &MutationConfig,
        registry: &mut InnovationRegistry,
        rng: &mut R,
    ) -> Vec<Genome> {
        let Some(best) = self.best_member() else {
            return Vec::new();
        };
        let mut offspring = Vec::with_capacity(count);
        if count == 0 {
            return offspring;
        }

        let mut elite = best.clone();
        elite.fitness = 0.0;
        offspring.push(elite);

        while offspring.len() < count {
            let mut child = if rng.gen::<f64>() < config.crossover_rate {
                match (self.members.choose(rng), self.members.choose(rng)) {
                    (Some(a), Some(b)) => a.crossover_with_rng(b, rng),
                    _ => best.clone(),
                }
            } else {
                self.members.choose(rng).unwrap_or(best).clone()
            };
            child.mutate_with_config(config, registry, rng);
            child.fitness = 0.0;
            offspring.push(child);
        }
        offspring
    }
}
