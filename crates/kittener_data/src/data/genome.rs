use serde::{Deserialize, Serialize};

/// Reserved id of the bias node. Never handed out by the innovation registry.
pub const BIAS_NODE_ID: usize = usize::MAX;

/// Role of a node inside a genome.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Sensor node on layer 0, fed from the caller's input vector.
    Input,
    /// Constant-output node on layer 0.
    Bias,
    /// Node created by splitting a link.
    Hidden,
    /// Decision node on the last layer.
    Output,
}

/// A vertex of the genome graph.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Node {
    /// Node identifier, stable across genomes for the same structural role.
    pub id: usize,
    /// Role of the node.
    pub kind: NodeKind,
    /// Layer index; 0 holds inputs and the bias, the highest layer holds outputs.
    pub layer: u32,
    /// Weighted sum accumulated from incoming links during a pass.
    pub input_sum: f32,
    /// Value emitted after activation.
    pub output: f32,
    /// Indices into [`Genome::links`] of links leaving this node.
    pub outgoing: Vec<usize>,
}

impl Node {
    #[must_use]
    pub fn new(id: usize, kind: NodeKind, layer: u32) -> Self {
        Self {
            id,
            kind,
            layer,
            input_sum: 0.0,
            output: 0.0,
            outgoing: Vec::new(),
        }
    }
}

/// A directed, weighted edge between two nodes of the same genome.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Link {
    /// Historical marking shared by every genome holding the same (source, target) pair.
    pub innovation: usize,
    /// Index of the source node in [`Genome::nodes`].
    pub from: usize,
    /// Index of the target node in [`Genome::nodes`].
    pub to: usize,
    /// Connection weight.
    pub weight: f32,
    /// Whether the link carries signal.
    pub enabled: bool,
}

/// A candidate network: an arena of nodes and the links between them.
///
/// Links refer to nodes by arena index, so cloning a genome is a plain copy.
/// Nodes are never removed, which keeps those indices stable for the
/// genome's lifetime.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Genome {
    /// All nodes; inputs first, then the bias, then outputs, then hidden nodes.
    pub nodes: Vec<Node>,
    /// All links, enabled or not, in creation order.
    pub links: Vec<Link>,
    /// Number of layers (highest layer index + 1).
    pub layers: u32,
    /// Fitness for the current generation.
    pub fitness: f64,
    /// Input arity.
    pub num_inputs: usize,
    /// Output arity.
    pub num_outputs: usize,
}

impl Genome {
    /// Arena index of the bias node.
    #[must_use]
    pub fn bias_index(&self) -> usize {
        self.num_inputs
    }

    /// Arena indices of the output nodes, in construction order.
    pub fn output_indices(&self) -> std::ops::Range<usize> {
        let start = self.num_inputs + 1;
        start..start + self.num_outputs
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    #[must_use]
    pub fn enabled_link_count(&self) -> usize {
        self.links.iter().filter(|l| l.enabled).count()
    }

    #[must_use]
    pub fn hidden_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Hidden)
            .count()
    }

    #[must_use]
    pub fn layer_count(&self) -> u32 {
        self.layers
    }

    /// Arena index of the node with the given id.
    #[must_use]
    pub fn node_index(&self, id: usize) -> Option<usize> {
        self.nodes.iter().position(|n| n.id == id)
    }

    /// The link carrying the given innovation id, if present.
    #[must_use]
    pub fn link_by_innovation(&self, innovation: usize) -> Option<&Link> {
        self.links.iter().find(|l| l.innovation == innovation)
    }

    /// True if a link already joins the two nodes in either direction.
    #[must_use]
    pub fn is_connected(&self, a: usize, b: usize) -> bool {
        let joins = |from: usize, to: usize| {
            self.nodes[from]
                .outgoing
                .iter()
                .any(|&l| self.links[l].to == to)
        };
        joins(a, b) || joins(b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_one() -> Genome {
        let mut nodes = vec![
            Node::new(0, NodeKind::Input, 0),
            Node::new(1, NodeKind::Input, 0),
            Node::new(BIAS_NODE_ID, NodeKind::Bias, 0),
            Node::new(2, NodeKind::Output, 1),
        ];
        let links = vec![Link {
            innovation: 0,
            from: 0,
            to: 3,
            weight: 0.5,
            enabled: true,
        }];
        nodes[0].outgoing.push(0);
        Genome {
            nodes,
            links,
            layers: 2,
            fitness: 0.0,
            num_inputs: 2,
            num_outputs: 1,
        }
    }

    #[test]
    fn test_index_layout() {
        let g = two_by_one();
        assert_eq!(g.bias_index(), 2);
        assert_eq!(g.output_indices(), 3..4);
        assert_eq!(g.node_index(BIAS_NODE_ID), Some(2));
        assert_eq!(g.node_index(42), None);
    }

    #[test]
    fn test_is_connected_either_direction() {
        let g = two_by_one();
        assert!(g.is_connected(0, 3));
        assert!(g.is_connected(3, 0));
        assert!(!g.is_connected(1, 3));
    }

    #[test]
    fn test_json_roundtrip_keeps_genes() {
        let g = two_by_one();
        let json = serde_json::to_string(&g).expect("serialize");
        let back: Genome = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(g, back);
    }
}
