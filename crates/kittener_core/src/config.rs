//! Configuration management for evolution parameters.
//!
//! Strongly-typed configuration mapping onto `config.toml`. Every
//! coefficient used by the engine lives here so a run can be reproduced
//! from its config and seed alone.
//!
//! ## Configuration Hierarchy
//!
//! 1. Default values (hardcoded in `Default` impl)
//! 2. `config.toml` file (overrides defaults)
//! 3. Command line flags of the `kittener` binary
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [population]
//! size = 150
//! inputs = 3
//! outputs = 5
//! seed = 42
//!
//! [mutation]
//! add_node_rate = 0.05
//!
//! [speciation]
//! policy = "best_match"
//! ```

use serde::{Deserialize, Serialize};

/// Size and arity of the population.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct PopulationConfig {
    /// Target population size N, constant across generations.
    pub size: usize,
    pub inputs: usize,
    pub outputs: usize,
    /// Seed for the population RNG; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            size: 150,
            inputs: 2,
            outputs: 1,
            seed: None,
        }
    }
}

/// Activation constants.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct NetworkConfig {
    /// Constant output of the bias node.
    pub bias_value: f32,
    /// Give the bias links of a fresh genome `bias_link_weight` instead of a
    /// random weight.
    pub pin_bias_links: bool,
    pub bias_link_weight: f32,
    /// Value every accumulated input is reset to around a forward pass.
    pub activation_reset: f32,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bias_value: 1.0,
            pin_bias_links: true,
            bias_link_weight: 1.0,
            activation_reset: 0.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct MutationConfig {
    /// Per-link chance of a weight mutation.
    pub weight_rate: f64,
    /// Chance that a weight mutation redraws the weight instead of perturbing it.
    pub weight_reset_rate: f64,
    /// Standard deviation of the Gaussian weight perturbation.
    pub weight_perturb_scale: f32,
    pub toggle_rate: f64,
    pub add_link_rate: f64,
    pub add_node_rate: f64,
    /// Chance that an offspring comes from crossover rather than cloning.
    pub crossover_rate: f64,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            weight_rate: 0.8,
            weight_reset_rate: 0.1,
            weight_perturb_scale: 0.02,
            toggle_rate: 0.05,
            add_link_rate: 0.15,
            add_node_rate: 0.05,
            crossover_rate: 0.75,
        }
    }
}

/// How a genome picks among several compatible species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpeciationPolicy {
    /// First compatible species in creation order wins.
    FirstMatch,
    /// The compatible species with the smallest distance wins.
    #[default]
    BestMatch,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SpeciationConfig {
    pub disjoint_coefficient: f64,
    pub weight_coefficient: f64,
    /// Genomes whose larger link count is below this use N = 1.
    pub small_genome_threshold: usize,
    /// Weight-difference term used when two genomes share no link.
    pub no_match_penalty: f64,
    /// Initial compatibility threshold.
    pub compatibility_threshold: f64,
    /// Nudge the threshold toward `target_species` every generation.
    pub adaptive: bool,
    pub target_species: usize,
    pub threshold_step: f64,
    pub min_threshold: f64,
    pub policy: SpeciationPolicy,
}

impl Default for SpeciationConfig {
    fn default() -> Self {
        Self {
            disjoint_coefficient: 1.0,
            weight_coefficient: 0.5,
            small_genome_threshold: 20,
            no_match_penalty: 100.0,
            compatibility_threshold: 1.0,
            adaptive: true,
            target_species: 8,
            threshold_step: 0.05,
            min_threshold: 0.1,
            policy: SpeciationPolicy::BestMatch,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SelectionConfig {
    /// Fraction of each species kept after culling.
    pub cull_fraction: f64,
    /// Species at or above this staleness are removed.
    pub staleness_threshold: u32,
    /// Never remove the species holding the generation's best genome for staleness.
    pub protect_champion: bool,
    /// When every species is stale, keep the best one instead of falling back
    /// to whole-population truncation.
    pub retain_best_on_collapse: bool,
    /// Species without members age twice as fast.
    pub double_empty_staleness: bool,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            cull_fraction: 0.5,
            staleness_threshold: 15,
            protect_champion: true,
            retain_best_on_collapse: true,
            double_empty_staleness: true,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct NeatConfig {
    pub population: PopulationConfig,
    pub network: NetworkConfig,
    pub mutation: MutationConfig,
    pub speciation: SpeciationConfig,
    pub selection: SelectionConfig,
}

fn is_probability(p: f64) -> bool {
    (0.0..=1.0).contains(&p)
}

impl NeatConfig {
    /// Validates all configuration parameters.
    ///
    /// Returns `Ok(())` if all parameters are valid, or `Err` with a description
    /// of the first validation failure.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.population.size > 0, "Population size must be positive");
        anyhow::ensure!(
            self.population.size <= 100_000,
            "Population size too large (max 100000)"
        );
        anyhow::ensure!(self.population.inputs > 0, "Input count must be positive");
        anyhow::ensure!(self.population.outputs > 0, "Output count must be positive");

        anyhow::ensure!(
            self.network.bias_value.is_finite(),
            "Bias value must be finite"
        );
        anyhow::ensure!(
            (-1.0..=1.0).contains(&self.network.bias_link_weight),
            "Bias link weight must be in [-1.0, 1.0]"
        );

        let m = &self.mutation;
        anyhow::ensure!(is_probability(m.weight_rate), "Weight rate must be in [0.0, 1.0]");
        anyhow::ensure!(
            is_probability(m.weight_reset_rate),
            "Weight reset rate must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            m.weight_perturb_scale >= 0.0,
            "Weight perturbation scale must be non-negative"
        );
        anyhow::ensure!(is_probability(m.toggle_rate), "Toggle rate must be in [0.0, 1.0]");
        anyhow::ensure!(
            is_probability(m.add_link_rate),
            "Add-link rate must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            is_probability(m.add_node_rate),
            "Add-node rate must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            is_probability(m.crossover_rate),
            "Crossover rate must be in [0.0, 1.0]"
        );

        let s = &self.speciation;
        anyhow::ensure!(
            s.disjoint_coefficient >= 0.0 && s.weight_coefficient >= 0.0,
            "Compatibility coefficients must be non-negative"
        );
        anyhow::ensure!(
            s.compatibility_threshold > 0.0,
            "Compatibility threshold must be positive"
        );
        anyhow::ensure!(s.min_threshold > 0.0, "Minimum threshold must be positive");
        anyhow::ensure!(
            s.threshold_step >= 0.0,
            "Threshold step must be non-negative"
        );
        anyhow::ensure!(
            !s.adaptive || s.target_species > 0,
            "Target species must be positive when the threshold is adaptive"
        );

        anyhow::ensure!(
            self.selection.cull_fraction > 0.0 && self.selection.cull_fraction <= 1.0,
            "Cull fraction must be in (0.0, 1.0]"
        );
        anyhow::ensure!(
            self.selection.staleness_threshold > 0,
            "Staleness threshold must be positive"
        );

        Ok(())
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Digest of every parameter that changes evolutionary dynamics.
    /// The seed is left out so differently seeded runs share a fingerprint.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(
            format!(
                "{}:{}:{}",
                self.population.size, self.population.inputs, self.population.outputs
            )
            .as_bytes(),
        );
        hasher.update(format!("{:?}", self.network).as_bytes());
        hasher.update(format!("{:?}", self.mutation).as_bytes());
        hasher.update(format!("{:?}", self.speciation).as_bytes());
        hasher.update(format!("{:?}", self.selection).as_bytes());
        hex::encode(hasher.finalize())
    }
}
