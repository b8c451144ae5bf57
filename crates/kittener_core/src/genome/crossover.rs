use super::topology::{check_link, push_link};
use kittener_data::{Genome, Link, Node, NodeKind};
use rand::Rng;
use std::collections::{HashMap, HashSet};

/// Orders two parents as (primary, secondary).
///
/// Higher fitness wins; on equal fitness the deeper genome wins; on a full tie
/// the receiver stays primary.
#[must_use]
pub fn order_parents<'a>(genome: &'a Genome, other: &'a Genome) -> (&'a Genome, &'a Genome) {
    if other.fitness > genome.fitness
        || (other.fitness == genome.fitness && other.layers > genome.layers)
    {
        (other, genome)
    } else {
        (genome, other)
    }
}

pub fn crossover_with_rng<R: Rng>(genome: &Genome, other: &Genome, rng: &mut R) -> Genome {
    let (primary, secondary) = order_parents(genome, other);
    let mut child = primary.clone();
    child.fitness = 0.0;

    let matching: HashMap<usize, &Link> =
        secondary.links.iter().map(|l| (l.innovation, l)).collect();

    for link in &mut child.links {
        if let Some(theirs) = matching.get(&link.innovation) {
            if rng.gen_bool(0.5) {
                link.weight = theirs.weight;
                link.enabled = theirs.enabled;
            }
        }
    }

    if genome.fitness == other.fitness {
        merge_disjoint(&mut child, secondary);
    }
    child
}

/// Copies hidden nodes and links the secondary parent has and the child lacks.
fn merge_disjoint(child: &mut Genome, secondary: &Genome) {
    for node in secondary.nodes.iter().filter(|n| n.kind == NodeKind::Hidden) {
        if child.node_index(node.id).is_some() {
            continue;
        }
        // the primary is never shallower than the secondary on a fitness tie
        debug_assert!(node.layer < child.layers - 1);
        child.nodes.push(Node::new(node.id, NodeKind::Hidden, node.layer));
    }

    let known: HashSet<usize> = child.links.iter().map(|l| l.innovation).collect();
    for link in &secondary.links {
        if known.contains(&link.innovation) {
            continue;
        }
        let from_id = secondary.nodes[link.from].id;
        let to_id = secondary.nodes[link.to].id;
        let (Some(from), Some(to)) = (child.node_index(from_id), child.node_index(to_id)) else {
            continue;
        };
        if check_link(child, from, to).is_err() {
            continue;
        }
        let idx = push_link(child, from, to, link.weight, link.innovation);
        child.links[idx].enabled = link.enabled;
    }
}
