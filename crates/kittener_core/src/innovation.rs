use std::collections::HashMap;

/// Run-wide record of structural innovations.
///
/// Maps a (source id, target id) pair to the innovation id of the link
/// joining them, and a split link's innovation id to the id of the hidden
/// node created by splitting it. Two genomes that grow the same structure
/// independently therefore carry the same markings, which is what crossover
/// and compatibility distance align on.
///
/// One instance lives for the whole run and is passed explicitly to every
/// operation that can create structure. It only ever grows.
#[derive(Debug, Clone)]
pub struct InnovationRegistry {
    links: HashMap<(usize, usize), usize>,
    splits: HashMap<usize, usize>,
    next_node_id: usize,
}

impl InnovationRegistry {
    /// Creates an empty registry whose hidden node ids start at `first_hidden_id`
    /// (inputs + outputs, so they never collide with fixed node ids).
    #[must_use]
    pub fn new(first_hidden_id: usize) -> Self {
        Self {
            links: HashMap::new(),
            splits: HashMap::new(),
            next_node_id: first_hidden_id,
        }
    }

    /// Innovation id of the link `from -> to`, allocating the next one if the
    /// pair has never been seen in this run.
    pub fn innovation_id(&mut self, from: usize, to: usize) -> usize {
        let next = self.links.len();
        *self.links.entry((from, to)).or_insert(next)
    }

    /// Innovation id of a known pair, without allocating.
    #[must_use]
    pub fn lookup(&self, from: usize, to: usize) -> Option<usize> {
        self.links.get(&(from, to)).copied()
    }

    /// Id of the hidden node that splits the link with the given innovation id.
    pub fn split_node_id(&mut self, innovation: usize) -> usize {
        if let Some(&id) = self.splits.get(&innovation) {
            return id;
        }
        let id = self.next_node_id;
        self.next_node_id += 1;
        self.splits.insert(innovation, id);
        id
    }

    /// Number of distinct link innovations recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Number of hidden nodes ever created by splits.
    #[must_use]
    pub fn split_count(&self) -> usize {
        self.splits.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_innovation_ids_are_sequential_and_stable() {
        let mut reg = InnovationRegistry::new(10);
        assert_eq!(reg.innovation_id(0, 5), 0);
        assert_eq!(reg.innovation_id(1, 5), 1);
        assert_eq!(reg.innovation_id(0, 5), 0);
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn test_innovation_pairs_are_ordered() {
        let mut reg = InnovationRegistry::new(10);
        let a = reg.innovation_id(3, 7);
        let b = reg.innovation_id(7, 3);
        assert_ne!(a, b);
        assert_eq!(reg.lookup(3, 7), Some(a));
        assert_eq!(reg.lookup(9, 9), None);
    }

    #[test]
    fn test_split_node_ids_start_after_fixed_nodes() {
        let mut reg = InnovationRegistry::new(5);
        let first = reg.split_node_id(2);
        let second = reg.split_node_id(3);
        assert_eq!(first, 5);
        assert_eq!(second, 6);
        assert_eq!(reg.split_node_id(2), first);
        assert_eq!(reg.split_count(), 2);
    }
}
