use crate::config::NetworkConfig;
use crate::error::{NeatError, Result};
use kittener_data::Genome;

#[inline]
#[must_use]
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Node indices sorted by layer; ties keep arena order.
#[must_use]
pub fn activation_order(genome: &Genome) -> Vec<usize> {
    let mut order: Vec<usize> = (0..genome.nodes.len()).collect();
    order.sort_by_key(|&i| genome.nodes[i].layer);
    order
}

fn reset_inputs(genome: &mut Genome, value: f32) {
    for node in &mut genome.nodes {
        node.input_sum = value;
    }
}

fn activate(genome: &mut Genome, idx: usize) {
    let node = &genome.nodes[idx];
    let output = if node.layer == 0 {
        node.output
    } else {
        sigmoid(node.input_sum)
    };
    genome.nodes[idx].output = output;

    for k in 0..genome.nodes[idx].outgoing.len() {
        let link = &genome.links[genome.nodes[idx].outgoing[k]];
        if link.enabled {
            let (to, weight) = (link.to, link.weight);
            genome.nodes[to].input_sum += weight * output;
        }
    }
}

/// One forward pass. Returns the output nodes' values in construction order.
pub fn feed_forward(genome: &mut Genome, inputs: &[f32], config: &NetworkConfig) -> Result<Vec<f32>> {
    if inputs.len() != genome.num_inputs {
        return Err(NeatError::InputArity {
            expected: genome.num_inputs,
            got: inputs.len(),
        });
    }

    reset_inputs(genome, config.activation_reset);
    for (node, &value) in genome.nodes.iter_mut().zip(inputs) {
        node.output = value;
    }
    let bias = genome.bias_index();
    genome.nodes[bias].output = config.bias_value;

    for idx in activation_order(genome) {
        activate(genome, idx);
    }

    let outputs = genome
        .output_indices()
        .map(|i| genome.nodes[i].output)
        .collect();
    reset_inputs(genome, config.activation_reset);
    Ok(outputs)
}
