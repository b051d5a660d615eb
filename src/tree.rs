//! Huffman prefix tree and its greedy construction.
//!
//! Each node is owned by exactly one parent and the tree owns its root, so
//! dropping a [`HuffmanTree`] releases every node once. Depth never exceeds
//! 255 (256 leaves at most), which bounds the recursion of `Drop` and of the
//! traversals below.
//!
//! ## Tie-breaking
//! The priority queue orders nodes by `(weight, sequence)`. Leaves receive
//! sequence numbers in ascending symbol order and every merged node the next
//! free number, so equal weights pop in insertion order. The first node
//! popped becomes the left child (bit 0), the second the right child (bit 1).

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::trace;

use crate::frequency::FrequencyTable;

/// A node of the prefix tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HuffNode {
    /// Terminal node carrying a symbol.
    Leaf { symbol: u8 },
    /// Branch node; every internal node has exactly two children.
    Internal {
        left: Box<HuffNode>,
        right: Box<HuffNode>,
    },
}

impl HuffNode {
    /// Join two subtrees under a new internal node.
    pub fn merge(left: Self, right: Self) -> Self {
        HuffNode::Internal {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// True for a leaf node.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffNode::Leaf { .. })
    }
}

/// Heap entry pairing a subtree with its weight and insertion sequence.
#[derive(Debug)]
struct Weighted {
    weight: u64,
    sequence: usize,
    node: HuffNode,
}

impl PartialEq for Weighted {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight && self.sequence == other.sequence
    }
}

impl Eq for Weighted {}

impl PartialOrd for Weighted {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Weighted {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap, we want the lightest on top.
        other
            .weight
            .cmp(&self.weight)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// A rooted Huffman prefix tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HuffmanTree {
    root: HuffNode,
}

impl HuffmanTree {
    /// Wrap an already-built root.
    pub fn from_root(root: HuffNode) -> Self {
        Self { root }
    }

    /// Build the tree by repeatedly merging the two lightest subtrees.
    ///
    /// Returns `None` when no symbol has a nonzero count. A single distinct
    /// symbol yields a lone leaf whose code length is 0.
    pub fn from_frequencies(frequencies: &FrequencyTable) -> Option<Self> {
        let mut heap: BinaryHeap<Weighted> = frequencies
            .iter_nonzero()
            .enumerate()
            .map(|(sequence, (symbol, count))| Weighted {
                weight: count,
                sequence,
                node: HuffNode::Leaf { symbol },
            })
            .collect();

        let mut next_sequence = heap.len();

        while heap.len() > 1 {
            let (Some(left), Some(right)) = (heap.pop(), heap.pop()) else {
                break;
            };
            trace!(
                left = left.weight,
                right = right.weight,
                "merging subtrees"
            );
            heap.push(Weighted {
                weight: left.weight.saturating_add(right.weight),
                sequence: next_sequence,
                node: HuffNode::merge(left.node, right.node),
            });
            next_sequence += 1;
        }

        heap.pop().map(|entry| Self { root: entry.node })
    }

    /// Root node.
    #[inline]
    pub fn root(&self) -> &HuffNode {
        &self.root
    }

    /// `(symbol, depth)` of every leaf, in preorder (left before right).
    pub fn leaves(&self) -> Vec<(u8, usize)> {
        let mut leaves = Vec::new();
        let mut stack = vec![(&self.root, 0usize)];

        while let Some((node, depth)) = stack.pop() {
            match node {
                HuffNode::Leaf { symbol } => leaves.push((*symbol, depth)),
                HuffNode::Internal { left, right } => {
                    stack.push((&**right, depth + 1));
                    stack.push((&**left, depth + 1));
                }
            }
        }

        leaves
    }

    /// Number of leaves, equal to the number of distinct symbols encoded.
    pub fn leaf_count(&self) -> usize {
        self.leaves().len()
    }

    /// Depth of the deepest leaf.
    pub fn max_depth(&self) -> usize {
        self.leaves()
            .into_iter()
            .map(|(_, depth)| depth)
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(symbol: u8) -> HuffNode {
        HuffNode::Leaf { symbol }
    }

    #[test]
    fn test_empty_frequencies_yield_no_tree() {
        assert!(HuffmanTree::from_frequencies(&FrequencyTable::default()).is_none());
    }

    #[test]
    fn test_single_symbol_is_lone_leaf() {
        let tree = HuffmanTree::from_frequencies(&FrequencyTable::from_bytes(b"zzzz")).unwrap();
        assert_eq!(tree.root(), &leaf(b'z'));
        assert!(tree.root().is_leaf());
        assert_eq!(tree.leaves(), vec![(b'z', 0)]);
        assert_eq!(tree.max_depth(), 0);
    }

    #[test]
    fn test_two_symbols_single_merge() {
        let tree = HuffmanTree::from_frequencies(&FrequencyTable::from_bytes(b"aaab")).unwrap();
        // 'b' is lighter, so it is popped first and becomes the left child.
        assert_eq!(tree.root(), &HuffNode::merge(leaf(b'b'), leaf(b'a')));
        assert!(!tree.root().is_leaf());
        assert_eq!(tree.leaf_count(), 2);
    }

    #[test]
    fn test_ties_break_by_insertion_order() {
        // All weights equal: leaves pop in ascending symbol order.
        let tree = HuffmanTree::from_frequencies(&FrequencyTable::from_bytes(b"abcd")).unwrap();
        let expected = HuffNode::merge(
            HuffNode::merge(leaf(b'a'), leaf(b'b')),
            HuffNode::merge(leaf(b'c'), leaf(b'd')),
        );
        assert_eq!(tree.root(), &expected);
    }

    #[test]
    fn test_leaf_count_matches_distinct_symbols() {
        let data = b"the quick brown fox jumps over the lazy dog";
        let frequencies = FrequencyTable::from_bytes(data);
        let tree = HuffmanTree::from_frequencies(&frequencies).unwrap();
        assert_eq!(tree.leaf_count(), frequencies.distinct());
    }

    #[test]
    fn test_skewed_frequencies_build_deep_tree() {
        // Weights 1, 1, 2, 4, ... force a chain of depth n - 1.
        let mut counts = [0u64; 256];
        counts[0] = 1;
        for symbol in 1..50 {
            counts[symbol] = 1 << (symbol - 1);
        }
        let tree = HuffmanTree::from_frequencies(&FrequencyTable::from(counts)).unwrap();
        assert_eq!(tree.leaf_count(), 50);
        assert_eq!(tree.max_depth(), 49);
    }

    #[test]
    fn test_full_alphabet() {
        let data: Vec<u8> = (0..=255u8).collect();
        let tree = HuffmanTree::from_frequencies(&FrequencyTable::from_bytes(&data)).unwrap();
        assert_eq!(tree.leaf_count(), 256);
        // Uniform weights over 256 symbols give a perfectly balanced tree.
        assert!(tree.leaves().iter().all(|&(_, depth)| depth == 8));
    }

    #[test]
    fn test_huge_weights_saturate() {
        let mut counts = [0u64; 256];
        counts[0] = u64::MAX;
        counts[1] = 2;
        counts[2] = 1;
        let tree = HuffmanTree::from_frequencies(&FrequencyTable::from(counts)).unwrap();
        assert_eq!(tree.leaf_count(), 3);
        // The final merge overflows u64 and saturates.
        let expected = HuffNode::merge(HuffNode::merge(leaf(2), leaf(1)), leaf(0));
        assert_eq!(tree.root(), &expected);
    }
}
