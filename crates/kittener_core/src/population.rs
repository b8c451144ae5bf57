//! Population: the generational driver.
//!
//! Owns every genome of the current generation, the species list, the run's
//! innovation registry and RNG. The caller scores genomes through
//! [`Population::get_output`] and [`Population::assign_fitness`], then calls
//! [`Population::advance_generation`], which speciates, shares fitness, drops
//! stale species, culls, reproduces and resizes back to exactly N genomes.

use crate::config::{NeatConfig, SpeciationConfig, SpeciationPolicy};
use crate::error::{NeatError, Result};
use crate::genome::GenomeLogic;
use crate::innovation::InnovationRegistry;
use crate::metrics::Metrics;
use crate::species::Species;
use kittener_data::Genome;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Instant;

/// Per-species line of a [`GenerationReport`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SpeciesSummary {
    pub id: usize,
    pub members: usize,
    pub avg_fitness: f64,
    pub staleness: u32,
}

/// What happened during one call to [`Population::advance_generation`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GenerationReport {
    /// Generation that was just evaluated.
    pub generation: u64,
    /// Species alive after stale removal.
    pub species: Vec<SpeciesSummary>,
    /// Compatibility threshold after adaptation.
    pub compatibility_threshold: f64,
    /// Highest raw fitness assigned this generation.
    pub best_fitness: f64,
    /// Sum of species average fitness divided by N.
    pub average_fitness: f64,
    /// Every species was stale and a fallback kept the run alive.
    pub collapsed: bool,
}

impl GenerationReport {
    #[must_use]
    pub fn species_count(&self) -> usize {
        self.species.len()
    }
}

pub struct Population {
    config: NeatConfig,
    genomes: Vec<Genome>,
    species: Vec<Species>,
    registry: InnovationRegistry,
    rng: ChaCha8Rng,
    generation: u64,
    threshold: f64,
    average_fitness: f64,
    next_species_id: usize,
    pub metrics: Metrics,
}

impl std::fmt::Debug for Population {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Population")
            .field("size", &self.genomes.len())
            .field("species", &self.species.len())
            .field("generation", &self.generation)
            .field("threshold", &self.threshold)
            .finish_non_exhaustive()
    }
}

impl Population {
    /// Validates `config` and creates N minimal genomes.
    pub fn new(config: NeatConfig) -> Result<Self> {
        config.validate()?;
        let rng = match config.population.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let p = &config.population;
        let registry = InnovationRegistry::new(p.inputs + p.outputs);

        let mut pop = Self {
            threshold: config.speciation.compatibility_threshold,
            config,
            genomes: Vec::new(),
            species: Vec::new(),
            registry,
            rng,
            generation: 0,
            average_fitness: 0.0,
            next_species_id: 0,
            metrics: Metrics::new(),
        };
        let size = pop.config.population.size;
        let genomes = (0..size).map(|_| pop.fresh_genome()).collect();
        pop.genomes = genomes;

        tracing::info!(
            size = pop.genomes.len(),
            inputs = pop.config.population.inputs,
            outputs = pop.config.population.outputs,
            fingerprint = %pop.config.fingerprint(),
            "Population created"
        );
        Ok(pop)
    }

    fn fresh_genome(&mut self) -> Genome {
        let p = &self.config.population;
        Genome::new_minimal_with_rng(
            p.inputs,
            p.outputs,
            &self.config.network,
            &mut self.registry,
            &mut self.rng,
        )
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.genomes.len() {
            return Err(NeatError::GenomeIndex {
                index,
                len: self.genomes.len(),
            });
        }
        Ok(())
    }

    /// Sets the raw fitness of one genome for the current generation.
    pub fn assign_fitness(&mut self, index: usize, fitness: f64) -> Result<()> {
        self.check_index(index)?;
        self.genomes[index].fitness = fitness;
        Ok(())
    }

    /// Runs one forward pass of the genome at `index`.
    pub fn get_output(&mut self, index: usize, inputs: &[f32]) -> Result<Vec<f32>> {
        self.check_index(index)?;
        self.genomes[index].feed_forward(inputs, &self.config.network)
    }

    /// One forward pass per genome, `inputs[i]` feeding genome `i`.
    pub fn evaluate_all(&mut self, inputs: &[Vec<f32>]) -> Result<Vec<Vec<f32>>> {
        if inputs.len() != self.genomes.len() {
            return Err(NeatError::InputArity {
                expected: self.genomes.len(),
                got: inputs.len(),
            });
        }
        let network = &self.config.network;

        #[cfg(feature = "parallel")]
        let outputs = {
            use rayon::prelude::*;
            self.genomes
                .par_iter_mut()
                .zip(inputs.par_iter())
                .map(|(genome, input)| genome.feed_forward(input, network))
                .collect()
        };
        #[cfg(not(feature = "parallel"))]
        let outputs = self
            .genomes
            .iter_mut()
            .zip(inputs)
            .map(|(genome, input)| genome.feed_forward(input, network))
            .collect();
        outputs
    }

    #[must_use]
    pub fn current_generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.genomes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.genomes.is_empty()
    }

    #[must_use]
    pub fn genomes(&self) -> &[Genome] {
        &self.genomes
    }

    pub fn genome(&self, index: usize) -> Result<&Genome> {
        self.check_index(index)?;
        Ok(&self.genomes[index])
    }

    /// Genome with the highest fitness assigned so far this generation.
    #[must_use]
    pub fn best_genome(&self) -> Option<&Genome> {
        self.genomes
            .iter()
            .max_by(|a, b| a.fitness.total_cmp(&b.fitness))
    }

    #[must_use]
    pub fn species(&self) -> &[Species] {
        &self.species
    }

    #[must_use]
    pub fn compatibility_threshold(&self) -> f64 {
        self.threshold
    }

    /// Average population fitness computed by the last generational step.
    #[must_use]
    pub fn average_fitness(&self) -> f64 {
        self.average_fitness
    }

    #[must_use]
    pub fn registry(&self) -> &InnovationRegistry {
        &self.registry
    }

    #[must_use]
    pub fn config(&self) -> &NeatConfig {
        &self.config
    }

    /// Id of the closest compatible species for the genome at `index`, if any.
    pub fn species_of(&self, index: usize) -> Result<Option<usize>> {
        let genome = self.genome(index)?;
        let config = &self.config.speciation;
        let distances = self
            .species
            .iter()
            .enumerate()
            .map(|(i, s)| (i, genome.compatibility_distance(&s.representative, config)));
        let slot = pick_species(distances, self.threshold, SpeciationPolicy::BestMatch);
        Ok(slot.map(|slot| self.species[slot].id))
    }

    /// Runs one full generational step and returns a summary of it.
    pub fn advance_generation(&mut self) -> GenerationReport {
        let started = Instant::now();
        let size = self.config.population.size;
        let prior = std::mem::take(&mut self.genomes);

        let champion = prior
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.fitness.total_cmp(&b.fitness))
            .map(|(i, g)| (i, g.fitness));
        let best_fitness = champion.map_or(0.0, |(_, f)| f);

        let slots = self.speciate(prior);
        let champion_species = champion.map(|(i, _)| self.species[slots[i]].id);
        self.adapt_threshold();

        let double_empty = self.config.selection.double_empty_staleness;
        for species in &mut self.species {
            species.share_fitness();
            species.update_staleness(double_empty);
            tracing::debug!(
                species = species.id,
                members = species.len(),
                avg_fitness = species.avg_fitness,
                staleness = species.staleness,
                "Species scored"
            );
        }

        let (collapsed, survivors) = self.remove_stale_species(champion_species);
        let summaries: Vec<SpeciesSummary> = self
            .species
            .iter()
            .map(|s| SpeciesSummary {
                id: s.id,
                members: s.len(),
                avg_fitness: s.avg_fitness,
                staleness: s.staleness,
            })
            .collect();

        self.average_fitness = self.species.iter().map(|s| s.avg_fitness).sum::<f64>() / size as f64;

        let cull_fraction = self.config.selection.cull_fraction;
        for species in &mut self.species {
            species.cull(cull_fraction);
        }

        let (offspring, elite) = match survivors {
            Some(survivors) => {
                let flags = vec![false; survivors.len()];
                (survivors, flags)
            }
            None => self.reproduce_species(),
        };
        let next = self.resize(offspring, elite);

        for species in &mut self.species {
            species.members.clear();
        }
        self.genomes = next;
        debug_assert_eq!(self.genomes.len(), size);

        let report = GenerationReport {
            generation: self.generation,
            species: summaries,
            compatibility_threshold: self.threshold,
            best_fitness,
            average_fitness: self.average_fitness,
            collapsed,
        };
        self.generation += 1;

        let elapsed = started.elapsed();
        self.metrics.record_generation(elapsed, report.species_count());
        tracing::info!(
            generation = report.generation,
            species = report.species_count(),
            threshold = self.threshold,
            best_fitness = best_fitness,
            average_fitness = self.average_fitness,
            duration_ms = elapsed.as_millis() as u64,
            "Generation advanced"
        );
        report
    }

    /// Moves every genome into a species and returns each genome's species slot.
    fn speciate(&mut self, genomes: Vec<Genome>) -> Vec<usize> {
        for species in &mut self.species {
            species.members.clear();
        }

        let config = &self.config.speciation;
        let existing = self.species.len();
        let distances = representative_distances(&genomes, &self.species, config);

        let mut slots = Vec::with_capacity(genomes.len());
        for (genome, row) in genomes.into_iter().zip(distances) {
            // species founded earlier in this pass were not part of the parallel scan
            let founded = self.species[existing..].iter().enumerate().map(|(i, s)| {
                (
                    existing + i,
                    genome.compatibility_distance(&s.representative, config),
                )
            });
            let candidates = row.into_iter().enumerate().chain(founded);

            let slot = match pick_species(candidates, self.threshold, config.policy) {
                Some(slot) => slot,
                None => {
                    let id = self.next_species_id;
                    self.next_species_id += 1;
                    self.species.push(Species::new(id, genome.clone()));
                    self.metrics.increment_counter("species_created");
                    self.species.len() - 1
                }
            };
            self.species[slot].members.push(genome);
            slots.push(slot);
        }
        slots
    }

    /// Nudges the threshold toward the target number of non-empty species.
    fn adapt_threshold(&mut self) {
        let s = &self.config.speciation;
        if !s.adaptive {
            return;
        }
        let occupied = self.species.iter().filter(|sp| !sp.is_empty()).count();
        if occupied < s.target_species {
            self.threshold -= s.threshold_step;
        } else if occupied > s.target_species {
            self.threshold += s.threshold_step;
        }
        self.threshold = self.threshold.max(s.min_threshold);
    }

    /// Drops stale species. When every species is stale, either keeps the
    /// best occupied one or, with `retain_best_on_collapse` off, dissolves all species
    /// and returns the truncated prior population as survivors.
    fn remove_stale_species(&mut self, champion: Option<usize>) -> (bool, Option<Vec<Genome>>) {
        let sel = &self.config.selection;
        let is_stale = |s: &Species| {
            s.staleness >= sel.staleness_threshold && !(sel.protect_champion && Some(s.id) == champion)
        };

        if !self.species.iter().all(|s| is_stale(s)) {
            let before = self.species.len();
            self.species.retain(|s| !is_stale(s));
            self.metrics
                .add_to_counter("species_extinct", (before - self.species.len()) as u64);
            return (false, None);
        }

        self.metrics.log_event("collapse", "every species is stale");
        if sel.retain_best_on_collapse {
            let best = self
                .species
                .iter()
                .enumerate()
                .max_by(|(_, a), (_, b)| {
                    // a species with members always beats an empty one
                    (!a.is_empty())
                        .cmp(&!b.is_empty())
                        .then_with(|| a.avg_fitness.total_cmp(&b.avg_fitness))
                })
                .map(|(i, _)| i);
            if let Some(best) = best {
                let kept = self.species.swap_remove(best);
                self.metrics
                    .add_to_counter("species_extinct", self.species.len() as u64);
                self.species = vec![kept];
            }
            return (true, None);
        }

        let mut survivors: Vec<Genome> = self
            .species
            .drain(..)
            .flat_map(|s| s.members)
            .collect();
        survivors.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));
        let keep = (survivors.len() as f64 * sel.cull_fraction).ceil() as usize;
        survivors.truncate(keep);
        (true, Some(survivors))
    }

    /// Offspring of every species, with a flag marking each species' elite.
    fn reproduce_species(&mut self) -> (Vec<Genome>, Vec<bool>) {
        let quotas = self.offspring_quotas();
        let mut offspring = Vec::with_capacity(self.config.population.size);
        let mut elite = Vec::with_capacity(self.config.population.size);

        for (species, quota) in self.species.iter().zip(quotas) {
            let kids = species.reproduce(
                quota,
                &self.config.mutation,
                &mut self.registry,
                &mut self.rng,
            );
            for (i, kid) in kids.into_iter().enumerate() {
                elite.push(i == 0);
                offspring.push(kid);
            }
        }
        self.metrics
            .add_to_counter("offspring", offspring.len() as u64);

        if offspring.is_empty() {
            // no species earned a quota; restart from the culled members
            offspring = self
                .species
                .iter()
                .flat_map(|s| s.members.iter().cloned())
                .collect();
            elite = vec![false; offspring.len()];
        }
        (offspring, elite)
    }

    /// Offspring count per species, each capped at N; `resize` trims any excess.
    fn offspring_quotas(&self) -> Vec<usize> {
        let size = self.config.population.size;
        let avg = self.average_fitness;
        if avg.is_finite() && avg > 0.0 {
            return self
                .species
                .iter()
                .map(|s| (s.avg_fitness / avg).round().clamp(0.0, size as f64) as usize)
                .collect();
        }

        let occupied = self.species.iter().filter(|s| !s.is_empty()).count();
        let share = size / occupied.max(1);
        self.species
            .iter()
            .map(|s| if s.is_empty() { 0 } else { share })
            .collect()
    }

    /// Brings the batch to exactly N: random non-elite removals when over,
    /// mutated copies of random genomes when under.
    fn resize(&mut self, mut genomes: Vec<Genome>, elite: Vec<bool>) -> Vec<Genome> {
        let size = self.config.population.size;

        if genomes.len() > size {
            let excess = genomes.len() - size;
            let mut removable: Vec<usize> = (0..genomes.len()).filter(|&i| !elite[i]).collect();
            if removable.len() < excess {
                removable = (0..genomes.len()).collect();
            }
            let doomed: HashSet<usize> = removable
                .choose_multiple(&mut self.rng, excess)
                .copied()
                .collect();
            genomes = genomes
                .into_iter()
                .enumerate()
                .filter(|(i, _)| !doomed.contains(i))
                .map(|(_, g)| g)
                .collect();
        }

        if genomes.is_empty() {
            genomes.push(self.fresh_genome());
        }
        while genomes.len() < size {
            let pick = self.rng.gen_range(0..genomes.len());
            let mut clone = genomes[pick].clone();
            clone.mutate_with_config(&self.config.mutation, &mut self.registry, &mut self.rng);
            genomes.push(clone);
        }

        for genome in &mut genomes {
            genome.fitness = 0.0;
        }
        genomes
    }
}

/// Distances from every genome to every current representative.
fn representative_distances(
    genomes: &[Genome],
    species: &[Species],
    config: &SpeciationConfig,
) -> Vec<Vec<f64>> {
    let row = |genome: &Genome| -> Vec<f64> {
        species
            .iter()
            .map(|s| genome.compatibility_distance(&s.representative, config))
            .collect()
    };

    #[cfg(feature = "parallel")]
    let rows = {
        use rayon::prelude::*;
        genomes.par_iter().map(row).collect()
    };
    #[cfg(not(feature = "parallel"))]
    let rows = genomes.iter().map(row).collect();
    rows
}

/// Chooses a species slot among `(slot, distance)` candidates in slot order.
fn pick_species<I>(candidates: I, threshold: f64, policy: SpeciationPolicy) -> Option<usize>
where
    I: IntoIterator<Item = (usize, f64)>,
{
    let mut compatible = candidates.into_iter().filter(|&(_, d)| d <= threshold);
    match policy {
        SpeciationPolicy::FirstMatch => compatible.next().map(|(slot, _)| slot),
        SpeciationPolicy::BestMatch => compatible
            .fold(None, |best: Option<(usize, f64)>, (slot, d)| match best {
                Some((_, bd)) if bd <= d => best,
                _ => Some((slot, d)),
            })
            .map(|(slot, _)| slot),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(size: usize, seed: u64) -> NeatConfig {
        let mut config = NeatConfig::default();
        config.population.size = size;
        config.population.inputs = 2;
        config.population.outputs = 2;
        config.population.seed = Some(seed);
        config
    }

    #[test]
    fn test_new_rejects_bad_config() {
        let mut bad = config(10, 1);
        bad.population.size = 0;
        assert!(matches!(Population::new(bad), Err(NeatError::Config(_))));
    }

    #[test]
    fn test_index_errors() {
        let mut pop = Population::new(config(3, 1)).expect("population");
        assert_eq!(
            pop.assign_fitness(3, 1.0),
            Err(NeatError::GenomeIndex { index: 3, len: 3 })
        );
        assert!(pop.get_output(7, &[0.0, 0.0]).is_err());
        assert_eq!(
            pop.get_output(0, &[0.0]),
            Err(NeatError::InputArity {
                expected: 2,
                got: 1
            })
        );
    }

    #[test]
    fn test_pick_species_policies() {
        let candidates = vec![(0, 0.9), (1, 0.2), (2, 0.2), (3, 5.0)];
        assert_eq!(
            pick_species(candidates.clone(), 1.0, SpeciationPolicy::FirstMatch),
            Some(0)
        );
        assert_eq!(
            pick_species(candidates.clone(), 1.0, SpeciationPolicy::BestMatch),
            Some(1)
        );
        assert_eq!(
            pick_species(candidates, 0.1, SpeciationPolicy::BestMatch),
            None
        );
    }

    #[test]
    fn test_first_generation_speciates_identical_topologies_together() {
        let mut c = config(20, 4);
        c.speciation.compatibility_threshold = 1000.0;
        c.speciation.adaptive = false;
        let mut pop = Population::new(c).expect("population");
        let report = pop.advance_generation();
        assert_eq!(report.species_count(), 1);
        assert_eq!(report.species[0].members, 20);
        assert_eq!(report.generation, 0);
        assert_eq!(pop.current_generation(), 1);
        assert_eq!(pop.len(), 20);
        assert_eq!(pop.species_of(0).expect("index"), Some(report.species[0].id));
    }

    #[test]
    fn test_adaptive_threshold_moves_toward_target() {
        let mut c = config(10, 2);
        c.speciation.compatibility_threshold = 1000.0;
        c.speciation.target_species = 5;
        c.speciation.threshold_step = 10.0;
        let mut pop = Population::new(c).expect("population");
        pop.advance_generation();
        assert_eq!(pop.compatibility_threshold(), 990.0);

        let mut c = config(10, 2);
        c.speciation.compatibility_threshold = 0.2;
        c.speciation.min_threshold = 0.15;
        c.speciation.target_species = 5;
        let mut pop = Population::new(c).expect("population");
        pop.advance_generation();
        assert!(pop.compatibility_threshold() >= 0.15);
    }

    #[test]
    fn test_evaluate_all_matches_get_output() {
        let mut pop = Population::new(config(6, 9)).expect("population");
        let inputs: Vec<Vec<f32>> = (0..6).map(|i| vec![i as f32 * 0.1, 1.0]).collect();
        let batch = pop.evaluate_all(&inputs).expect("batch");
        for (i, input) in inputs.iter().enumerate() {
            assert_eq!(batch[i], pop.get_output(i, input).expect("single"));
        }
        assert!(pop.evaluate_all(&inputs[..2]).is_err());
    }

    /// Three genomes on a threshold so tight that each one only matches the
    /// species whose representative is its own clone.
    fn isolated(seed: u64, protect_champion: bool) -> Population {
        let mut c = config(3, seed);
        c.speciation.adaptive = false;
        c.speciation.compatibility_threshold = 1e-6;
        c.selection.staleness_threshold = 3;
        c.selection.protect_champion = protect_champion;
        Population::new(c).expect("population")
    }

    fn stale_species(id: usize, representative: Genome) -> Species {
        let mut species = Species::new(id, representative);
        species.best_avg_fitness = 1e9;
        species.staleness = 5;
        species
    }

    fn seed_species(pop: &mut Population, stale: &[bool]) {
        pop.species = stale
            .iter()
            .enumerate()
            .map(|(i, &is_stale)| {
                let rep = pop.genomes[i].clone();
                if is_stale {
                    stale_species(i, rep)
                } else {
                    Species::new(i, rep)
                }
            })
            .collect();
        pop.next_species_id = stale.len();
    }

    fn species_ids(report: &GenerationReport) -> Vec<usize> {
        report.species.iter().map(|s| s.id).collect()
    }

    #[test]
    fn test_stale_species_are_removed_but_champion_survives() {
        let mut pop = isolated(21, true);
        seed_species(&mut pop, &[true, true, false]);
        for (i, f) in [10.0, 1.0, 1.0].into_iter().enumerate() {
            pop.assign_fitness(i, f).expect("index");
        }

        let report = pop.advance_generation();
        assert!(!report.collapsed);
        assert_eq!(species_ids(&report), vec![0, 2]);
        assert_eq!(report.species[0].staleness, 6);
        assert_eq!(pop.metrics.counter("species_extinct"), 1);
        assert_eq!(pop.len(), 3);
    }

    #[test]
    fn test_unprotected_champion_species_goes_stale_too() {
        let mut pop = isolated(21, false);
        seed_species(&mut pop, &[true, true, false]);
        for (i, f) in [10.0, 1.0, 1.0].into_iter().enumerate() {
            pop.assign_fitness(i, f).expect("index");
        }

        let report = pop.advance_generation();
        assert!(!report.collapsed);
        assert_eq!(species_ids(&report), vec![2]);
        assert_eq!(pop.metrics.counter("species_extinct"), 2);
        assert_eq!(pop.len(), 3);
    }

    #[test]
    fn test_collapse_never_keeps_an_empty_species() {
        let mut c = config(1, 31);
        c.speciation.adaptive = false;
        c.speciation.compatibility_threshold = 1e-6;
        c.selection.staleness_threshold = 3;
        c.selection.protect_champion = false;
        let mut pop = Population::new(c).expect("population");
        let stranger = Population::new(config(1, 32)).expect("population").genomes[0].clone();
        let original = pop.genomes[0].clone();

        pop.species = vec![stale_species(0, original.clone()), stale_species(1, stranger)];
        pop.next_species_id = 2;
        pop.assign_fitness(0, -5.0).expect("index");

        let report = pop.advance_generation();
        assert!(report.collapsed);
        assert_eq!(species_ids(&report), vec![0]);
        assert_eq!(report.species[0].members, 1);
        assert_eq!(pop.len(), 1);
        assert_eq!(pop.genomes[0].links, original.links);
    }

    #[test]
    fn test_quotas_are_capped_at_population_size() {
        let mut pop = isolated(41, true);
        pop.species = (0..3)
            .map(|i| Species::new(i, pop.genomes[i].clone()))
            .collect();
        for (species, avg) in pop.species.iter_mut().zip([1e6, -(1e6 - 1e-3), 0.0]) {
            species.avg_fitness = avg;
        }
        pop.average_fitness = 1e-3 / 3.0;

        let quotas = pop.offspring_quotas();
        assert_eq!(quotas, vec![3, 0, 0]);
    }

    #[test]
    fn test_mixed_sign_fitness_advances_to_exact_size() {
        let mut pop = isolated(43, true);
        for (i, f) in [1e6, -(1e6 - 1e-3), 0.0].into_iter().enumerate() {
            pop.assign_fitness(i, f).expect("index");
        }
        let report = pop.advance_generation();
        assert_eq!(report.species_count(), 3);
        assert_eq!(pop.len(), 3);
        assert_eq!(pop.metrics.counter("offspring"), 3);
    }

    #[test]
    fn test_generation_recorded_in_metrics() {
        let mut pop = Population::new(config(8, 3)).expect("population");
        let report = pop.advance_generation();
        assert_eq!(pop.metrics.generation_count(), 1);
        assert_eq!(pop.metrics.species_count(), report.species_count() as u64);
    }

    #[test]
    fn test_collapse_keeps_best_species() {
        let mut c = config(12, 5);
        c.selection.staleness_threshold = 1;
        c.selection.protect_champion = false;
        c.speciation.adaptive = false;
        c.speciation.compatibility_threshold = 1000.0;
        let mut pop = Population::new(c).expect("population");
        pop.advance_generation();
        let report = pop.advance_generation();
        assert!(report.collapsed);
        assert_eq!(report.species_count(), 1);
        assert_eq!(pop.len(), 12);
        assert_eq!(pop.metrics.counter("collapse"), 1);
    }

    #[test]
    fn test_collapse_fallback_truncates_whole_population() {
        let mut c = config(12, 6);
        c.selection.staleness_threshold = 1;
        c.selection.protect_champion = false;
        c.selection.retain_best_on_collapse = false;
        c.speciation.adaptive = false;
        c.speciation.compatibility_threshold = 1000.0;
        let mut pop = Population::new(c).expect("population");
        pop.advance_generation();
        let report = pop.advance_generation();
        assert!(report.collapsed);
        assert!(pop.species().is_empty());
        assert_eq!(pop.len(), 12);
        assert!(pop.genomes().iter().all(|g| g.fitness == 0.0));
    }
}
