use crate::config::SpeciationConfig;
use kittener_data::Genome;

fn sorted_genes(genome: &Genome) -> Vec<(usize, f32)> {
    let mut genes: Vec<(usize, f32)> = genome
        .links
        .iter()
        .map(|l| (l.innovation, l.weight))
        .collect();
    genes.sort_unstable_by_key(|&(innovation, _)| innovation);
    genes
}

/// `c_d * disjoint / N + c_w * mean |w_a - w_b|` over links aligned by innovation id.
///
/// Genes are walked in innovation order on both sides, so the result is
/// bit-for-bit symmetric.
#[must_use]
pub fn compatibility_distance(genome: &Genome, other: &Genome, config: &SpeciationConfig) -> f64 {
    let (a, b) = (sorted_genes(genome), sorted_genes(other));
    let (mut i, mut j) = (0, 0);
    let mut matching = 0usize;
    let mut weight_diff = 0.0f64;

    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                weight_diff += f64::from((a[i].1 - b[j].1).abs());
                matching += 1;
                i += 1;
                j += 1;
            }
        }
    }

    let disjoint = a.len() + b.len() - 2 * matching;
    let largest = a.len().max(b.len());
    let n = if largest < config.small_genome_threshold {
        1.0
    } else {
        largest as f64
    };
    let avg_weight_diff = if matching == 0 {
        config.no_match_penalty
    } else {
        weight_diff / matching as f64
    };

    config.disjoint_coefficient * disjoint as f64 / n + config.weight_coefficient * avg_weight_diff
}

#[must_use]
pub fn is_compatible(
    genome: &Genome,
    other: &Genome,
    config: &SpeciationConfig,
    threshold: f64,
) -> bool {
    compatibility_distance(genome, other, config) <= threshold
}
