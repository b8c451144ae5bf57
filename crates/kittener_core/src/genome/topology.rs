use crate::config::NetworkConfig;
use crate::error::{NeatError, Result};
use crate::innovation::InnovationRegistry;
use kittener_data::{Genome, Link, Node, NodeKind, BIAS_NODE_ID};
use rand::Rng;

/// Builds the minimal genome: inputs and bias on layer 0, outputs on layer 1,
/// every layer-0 node linked to every output.
pub fn create_minimal_with_rng<R: Rng>(
    num_inputs: usize,
    num_outputs: usize,
    config: &NetworkConfig,
    registry: &mut InnovationRegistry,
    rng: &mut R,
) -> Genome {
    let mut nodes = Vec::with_capacity(num_inputs + 1 + num_outputs);
    for i in 0..num_inputs {
        nodes.push(Node::new(i, NodeKind::Input, 0));
    }
    let mut bias = Node::new(BIAS_NODE_ID, NodeKind::Bias, 0);
    bias.output = config.bias_value;
    nodes.push(bias);
    for o in 0..num_outputs {
        nodes.push(Node::new(num_inputs + o, NodeKind::Output, 1));
    }

    let mut genome = Genome {
        nodes,
        links: Vec::with_capacity((num_inputs + 1) * num_outputs),
        layers: 2,
        fitness: 0.0,
        num_inputs,
        num_outputs,
    };

    let bias_idx = genome.bias_index();
    for from in 0..=num_inputs {
        for to in genome.output_indices() {
            let weight = if config.pin_bias_links && from == bias_idx {
                config.bias_link_weight
            } else {
                rng.gen_range(-1.0..=1.0)
            };
            let innovation = registry.innovation_id(genome.nodes[from].id, genome.nodes[to].id);
            push_link(&mut genome, from, to, weight, innovation);
        }
    }
    genome
}

/// Appends an enabled link between two arena indices. Callers check validity.
pub(crate) fn push_link(
    genome: &mut Genome,
    from: usize,
    to: usize,
    weight: f32,
    innovation: usize,
) -> usize {
    let idx = genome.links.len();
    genome.links.push(Link {
        innovation,
        from,
        to,
        weight,
        enabled: true,
    });
    genome.nodes[from].outgoing.push(idx);
    idx
}

/// Rejects links that would break the layered, duplicate-free graph.
pub fn check_link(genome: &Genome, from: usize, to: usize) -> Result<()> {
    let (src, dst) = (&genome.nodes[from], &genome.nodes[to]);
    if from == to {
        return Err(NeatError::bad_link(src.id, dst.id, "self loop"));
    }
    if src.layer == dst.layer {
        return Err(NeatError::bad_link(src.id, dst.id, "same layer"));
    }
    if src.layer > dst.layer {
        return Err(NeatError::bad_link(src.id, dst.id, "backward"));
    }
    if genome.is_connected(from, to) {
        return Err(NeatError::bad_link(src.id, dst.id, "already connected"));
    }
    Ok(())
}

/// Adds a link between two nodes given by id, returning its arena index.
pub fn add_link(
    genome: &mut Genome,
    from_id: usize,
    to_id: usize,
    weight: f32,
    registry: &mut InnovationRegistry,
) -> Result<usize> {
    let from = genome
        .node_index(from_id)
        .ok_or(NeatError::UnknownNode(from_id))?;
    let to = genome
        .node_index(to_id)
        .ok_or(NeatError::UnknownNode(to_id))?;
    check_link(genome, from, to)?;
    let innovation = registry.innovation_id(from_id, to_id);
    Ok(push_link(genome, from, to, weight, innovation))
}

/// Number of links a genome with the current layering can hold.
#[must_use]
pub fn max_link_count(genome: &Genome) -> usize {
    let mut per_layer = vec![0usize; genome.layers as usize];
    for node in &genome.nodes {
        per_layer[node.layer as usize] += 1;
    }
    let mut above = genome.nodes.len();
    let mut total = 0;
    for count in per_layer {
        above -= count;
        total += count * above;
    }
    total
}

#[must_use]
pub fn is_fully_connected(genome: &Genome) -> bool {
    let max = max_link_count(genome);
    debug_assert!(genome.links.len() <= max, "more links than layer pairs");
    genome.links.len() >= max
}

/// Moves every node on `from_layer` or above up by `by` layers.
pub(crate) fn shift_layers(genome: &mut Genome, from_layer: u32, by: u32) {
    for node in genome.nodes.iter_mut().filter(|n| n.layer >= from_layer) {
        node.layer += by;
    }
    genome.layers += by;
}
