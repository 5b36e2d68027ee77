//! Builds the huffman merge tree from a frequency table.
//!
//! Nodes live in an arena (a Vec) and refer to their children by index. Leaves are
//! pushed first, in ascending symbol order, and every merge appends its parent after
//! both children, so a child index is always smaller than its parent's index.
//!
//! Tie-break policy: the min-heap is keyed on (weight, sequence), where sequence is
//! the order in which a node was pushed. On equal weight the earlier node pops
//! first. The first node popped becomes the left child, the second the right child.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use log::{debug, trace};

use crate::error::{Error, Result};
use crate::tools::freq_count::FreqTable;

/// One arena entry. A leaf has a symbol and no children, an internal node has both
/// children and no symbol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub weight: u64,
    pub symbol: Option<u8>,
    pub left: Option<usize>,
    pub right: Option<usize>,
}

impl Node {
    /// Create a new leaf
    pub fn leaf(symbol: u8, weight: u64) -> Node {
        Node {
            weight,
            symbol: Some(symbol),
            left: None,
            right: None,
        }
    }

    /// Create a new internal node over two existing nodes
    pub fn kids(weight: u64, left: usize, right: usize) -> Node {
        Node {
            weight,
            symbol: None,
            left: Some(left),
            right: Some(right),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.symbol.is_some()
    }
}

#[derive(Clone, Debug)]
pub struct HuffmanTree {
    pub(crate) nodes: Vec<Node>,
    pub(crate) root: usize,
}

impl HuffmanTree {
    /// Build the tree for a frequency table. Fails with EmptyInput if the table has no symbols.
    pub fn build(table: &FreqTable) -> Result<HuffmanTree> {
        let distinct = table.distinct();
        if distinct == 0 {
            return Err(Error::EmptyInput);
        }

        // A strict binary tree over k leaves has 2k - 1 nodes.
        let mut nodes: Vec<Node> = Vec::with_capacity(2 * distinct - 1);
        let mut heap = BinaryHeap::with_capacity(distinct);
        let mut seq: u64 = 0;

        for (sym, weight) in table.iter() {
            heap.push(Reverse((weight, seq, nodes.len())));
            nodes.push(Node::leaf(sym, weight));
            seq += 1;
        }

        // Pare the heap down to one node, merging the two lightest each time.
        while heap.len() > 1 {
            let (Some(Reverse((l_weight, _, left))), Some(Reverse((r_weight, _, right)))) =
                (heap.pop(), heap.pop())
            else {
                return Err(Error::malformed("merge heap ran dry mid-merge"));
            };
            let weight = l_weight + r_weight;
            trace!(
                "merge node {} ({}) + node {} ({}) -> node {} ({})",
                left,
                l_weight,
                right,
                r_weight,
                nodes.len(),
                weight
            );
            heap.push(Reverse((weight, seq, nodes.len())));
            nodes.push(Node::kids(weight, left, right));
            seq += 1;
        }

        // One node is left on the heap and it is the root.
        let root = match heap.pop() {
            Some(Reverse((_, _, idx))) => idx,
            None => return Err(Error::malformed("merge heap drained before a root was left")),
        };
        let tree = HuffmanTree { nodes, root };
        debug!(
            "Built huffman tree: {} symbols, {} nodes, depth {}",
            distinct,
            tree.len(),
            tree.depth()
        );
        Ok(tree)
    }

    /// Index of the root node.
    pub fn root(&self) -> usize {
        self.root
    }

    pub fn node(&self, idx: usize) -> Option<&Node> {
        self.nodes.get(idx)
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Sum of all leaf weights. Equal to the input length for a tree built by build().
    pub fn leaf_weight_sum(&self) -> u64 {
        self.nodes
            .iter()
            .filter(|node| node.is_leaf())
            .map(|node| node.weight)
            .sum()
    }

    /// Length of the longest root-to-leaf path (0 for a lone leaf).
    pub fn depth(&self) -> usize {
        // Parents always follow their children in the arena, so walking backwards
        // from the root visits every parent before its kids.
        let mut depths = vec![0_usize; self.nodes.len()];
        let mut max = 0;
        for idx in (0..self.nodes.len()).rev() {
            let node = &self.nodes[idx];
            for kid in [node.left, node.right].into_iter().flatten() {
                if kid < idx {
                    depths[kid] = depths[idx] + 1;
                    max = max.max(depths[kid]);
                }
            }
        }
        max
    }
}
