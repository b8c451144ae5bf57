use super::topology::{self, push_link};
use crate::config::MutationConfig;
use crate::innovation::InnovationRegistry;
use kittener_data::{Genome, Link, Node, NodeKind};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::StandardNormal;

/// Applies one round of mutation. Each kind is rolled independently.
pub fn mutate_with_config<R: Rng>(
    genome: &mut Genome,
    config: &MutationConfig,
    registry: &mut InnovationRegistry,
    rng: &mut R,
) {
    for link in &mut genome.links {
        if rng.gen::<f64>() < config.weight_rate {
            mutate_weight(link, config, rng);
        }
    }

    if rng.gen::<f64>() < config.toggle_rate {
        enable_first_disabled(genome);
    }

    if rng.gen::<f64>() < config.add_link_rate {
        add_link_mutation(genome, registry, rng);
    }

    if rng.gen::<f64>() < config.add_node_rate {
        add_node_mutation(genome, registry, rng);
    }
}

/// Redraws the weight with a small chance, otherwise nudges it by Gaussian noise.
pub fn mutate_weight<R: Rng>(link: &mut Link, config: &MutationConfig, rng: &mut R) {
    if rng.gen::<f64>() < config.weight_reset_rate {
        link.weight = rng.gen_range(-1.0..=1.0);
    } else {
        let noise: f32 = rng.sample(StandardNormal);
        link.weight = (link.weight + noise * config.weight_perturb_scale).clamp(-1.0, 1.0);
    }
}

/// Re-enables the first disabled link in creation order.
pub fn enable_first_disabled(genome: &mut Genome) -> Option<usize> {
    let idx = genome.links.iter().position(|l| !l.enabled)?;
    genome.links[idx].enabled = true;
    Some(idx)
}

/// Adds a random link between two unconnected nodes on different layers,
/// oriented toward the higher layer. No-op on a saturated genome.
pub fn add_link_mutation<R: Rng>(
    genome: &mut Genome,
    registry: &mut InnovationRegistry,
    rng: &mut R,
) -> Option<usize> {
    if topology::is_fully_connected(genome) {
        return None;
    }

    let n = genome.nodes.len();
    let mut candidates = Vec::new();
    for a in 0..n {
        for b in (a + 1)..n {
            let (la, lb) = (genome.nodes[a].layer, genome.nodes[b].layer);
            if la == lb || genome.is_connected(a, b) {
                continue;
            }
            candidates.push(if la < lb { (a, b) } else { (b, a) });
        }
    }

    let &(from, to) = candidates.choose(rng)?;
    let innovation = registry.innovation_id(genome.nodes[from].id, genome.nodes[to].id);
    let weight = rng.gen_range(-1.0..=1.0);
    Some(push_link(genome, from, to, weight, innovation))
}

/// Splits a random enabled link that does not leave the bias node.
pub fn add_node_mutation<R: Rng>(
    genome: &mut Genome,
    registry: &mut InnovationRegistry,
    rng: &mut R,
) -> Option<usize> {
    let bias = genome.bias_index();
    let candidates: Vec<usize> = genome
        .links
        .iter()
        .enumerate()
        .filter(|(_, l)| l.enabled && l.from != bias)
        .map(|(i, _)| i)
        .collect();
    let &idx = candidates.choose(rng)?;
    split_link(genome, idx, registry)
}

/// Replaces `source -> target` with `source -> new -> target`.
///
/// The old link is disabled, the incoming link gets weight 1, the outgoing
/// link inherits the old weight and the bias feeds the new node with weight 0.
/// Returns the new node's arena index, or `None` when the link is disabled,
/// leaves the bias, or was already split in this genome.
pub fn split_link(
    genome: &mut Genome,
    link_idx: usize,
    registry: &mut InnovationRegistry,
) -> Option<usize> {
    let link = genome.links.get(link_idx)?.clone();
    let bias = genome.bias_index();
    if !link.enabled || link.from == bias {
        return None;
    }
    let node_id = registry.split_node_id(link.innovation);
    if genome.node_index(node_id).is_some() {
        return None;
    }

    genome.links[link_idx].enabled = false;
    let source_layer = genome.nodes[link.from].layer;
    let target_layer = genome.nodes[link.to].layer;
    let layer = (source_layer + target_layer).div_ceil(2);
    if layer == target_layer {
        topology::shift_layers(genome, layer, 1);
    }

    let new_idx = genome.nodes.len();
    genome.nodes.push(Node::new(node_id, NodeKind::Hidden, layer));

    let source_id = genome.nodes[link.from].id;
    let target_id = genome.nodes[link.to].id;
    let bias_id = genome.nodes[bias].id;

    let inn = registry.innovation_id(source_id, node_id);
    push_link(genome, link.from, new_idx, 1.0, inn);
    let inn = registry.innovation_id(node_id, target_id);
    push_link(genome, new_idx, link.to, link.weight, inn);
    let inn = registry.innovation_id(bias_id, node_id);
    push_link(genome, bias, new_idx, 0.0, inn);

    Some(new_idx)
}
