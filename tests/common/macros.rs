/// Asserts that the population holds exactly the expected number of genomes.
#[macro_export]
macro_rules! assert_population {
    ($pop:expr, $count:expr) => {
        assert_eq!($pop.len(), $count, "Population size mismatch");
    };
}

/// Asserts that every link of a genome runs from a lower layer to a higher
/// one and that each node's outgoing list matches the link table.
#[macro_export]
macro_rules! assert_layered {
    ($genome:expr) => {
        let g = &$genome;
        for (idx, link) in g.links.iter().enumerate() {
            assert!(
                g.nodes[link.from].layer < g.nodes[link.to].layer,
                "Link {} runs {} -> {} against the layering",
                link.innovation,
                g.nodes[link.from].layer,
                g.nodes[link.to].layer
            );
            assert!(
                g.nodes[link.from].outgoing.contains(&idx),
                "Link {} missing from its source's outgoing list",
                link.innovation
            );
        }
        for node in &g.nodes {
            assert!(node.layer < g.layers, "Node {} beyond last layer", node.id);
        }
    };
}
