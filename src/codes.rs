//! Per-symbol code derivation.
//!
//! A depth-first walk of the tree accumulates the path from the root; at
//! each leaf that path becomes the symbol's code. Codes are stored in
//! root-to-leaf order, left = 0 and right = 1.

use std::fmt;

use crate::frequency::ALPHABET_SIZE;
use crate::tree::{HuffNode, HuffmanTree};

const CODE_WORDS: usize = 4;
const MAX_CODE_BITS: usize = CODE_WORDS * 64;

/// A variable-length code of up to 256 bits.
///
/// Bit `i` of the code (the `i`-th branch taken from the root) is stored in
/// word `i / 64` at bit position `i % 64`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Code {
    words: [u64; CODE_WORDS],
    len: u16,
}

impl Code {
    /// Number of bits in the code. A lone-leaf tree yields length 0.
    #[inline]
    pub fn len(&self) -> usize {
        usize::from(self.len)
    }

    /// True for the zero-length code.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bit `index` in root-to-leaf order.
    #[inline]
    pub fn bit(&self, index: usize) -> bool {
        debug_assert!(index < self.len());
        (self.words[index / 64] >> (index % 64)) & 1 == 1
    }

    /// Iterate bits in root-to-leaf order.
    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len()).map(move |i| self.bit(i))
    }

    /// `count` bits starting at `offset`, right-justified. The range must not
    /// cross a 64-bit word boundary.
    #[inline]
    pub(crate) fn chunk(&self, offset: usize, count: usize) -> u64 {
        debug_assert!(count > 0 && offset % 64 + count <= 64);
        let word = self.words[offset / 64] >> (offset % 64);
        if count == 64 {
            word
        } else {
            word & ((1u64 << count) - 1)
        }
    }

    /// True if `self` is a prefix of `other` (a code is a prefix of itself).
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        self.len <= other.len && (0..self.len()).all(|i| self.bit(i) == other.bit(i))
    }

    fn push(&mut self, bit: bool) {
        let index = self.len();
        debug_assert!(index < MAX_CODE_BITS);
        let mask = 1u64 << (index % 64);
        if bit {
            self.words[index / 64] |= mask;
        } else {
            self.words[index / 64] &= !mask;
        }
        self.len += 1;
    }

    fn pop(&mut self) {
        debug_assert!(self.len > 0);
        self.len -= 1;
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.bits() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Symbol to code mapping derived from a tree.
#[derive(Clone, Debug)]
pub struct CodeTable {
    codes: [Option<Code>; ALPHABET_SIZE],
}

impl CodeTable {
    /// Derive codes from `tree`. An absent tree gives an empty table.
    pub fn from_tree(tree: Option<&HuffmanTree>) -> Self {
        let mut table = Self {
            codes: [None; ALPHABET_SIZE],
        };

        if let Some(tree) = tree {
            let mut path = Code::default();
            table.assign(tree.root(), &mut path);
        }

        table
    }

    fn assign(&mut self, node: &HuffNode, path: &mut Code) {
        match node {
            HuffNode::Leaf { symbol } => {
                self.codes[usize::from(*symbol)] = Some(*path);
            }
            HuffNode::Internal { left, right } => {
                path.push(false);
                self.assign(left, path);
                path.pop();

                path.push(true);
                self.assign(right, path);
                path.pop();
            }
        }
    }

    /// Code for `symbol`, if the symbol is present in the tree.
    #[inline]
    pub fn get(&self, symbol: u8) -> Option<&Code> {
        self.codes[usize::from(symbol)].as_ref()
    }

    /// Number of symbols with a code.
    pub fn len(&self) -> usize {
        self.codes.iter().flatten().count()
    }

    /// True when no symbol has a code.
    pub fn is_empty(&self) -> bool {
        self.codes.iter().all(Option::is_none)
    }

    /// `(symbol, code)` pairs in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &Code)> + '_ {
        (0..=u8::MAX)
            .zip(self.codes.iter())
            .filter_map(|(symbol, code)| code.as_ref().map(|c| (symbol, c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::FrequencyTable;

    fn table_for(data: &[u8]) -> CodeTable {
        let tree = HuffmanTree::from_frequencies(&FrequencyTable::from_bytes(data));
        CodeTable::from_tree(tree.as_ref())
    }

    #[test]
    fn test_absent_tree_gives_empty_table() {
        let table = CodeTable::from_tree(None);
        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
        assert!(table.get(0).is_none());
    }

    #[test]
    fn test_single_leaf_has_zero_length_code() {
        let table = table_for(b"qqqqq");
        assert_eq!(table.len(), 1);
        let code = table.get(b'q').unwrap();
        assert!(code.is_empty());
        assert_eq!(code.to_string(), "");
    }

    #[test]
    fn test_aaab_codes() {
        let table = table_for(b"aaab");
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(b'b').unwrap().to_string(), "0");
        assert_eq!(table.get(b'a').unwrap().to_string(), "1");
        assert!(table.get(b'c').is_none());
    }

    #[test]
    fn test_codes_are_prefix_free() {
        let data = b"abracadabra, the quick brown fox jumps over the lazy dog!!";
        let table = table_for(data);
        assert_eq!(table.len(), FrequencyTable::from_bytes(data).distinct());

        let codes: Vec<(u8, &Code)> = table.iter().collect();
        for (i, (_, a)) in codes.iter().enumerate() {
            assert!(!a.is_empty());
            for (j, (_, b)) in codes.iter().enumerate() {
                if i != j {
                    assert!(!a.is_prefix_of(b), "{a} is a prefix of {b}");
                }
            }
        }
    }

    #[test]
    fn test_code_length_matches_leaf_depth() {
        let tree =
            HuffmanTree::from_frequencies(&FrequencyTable::from_bytes(b"mississippi river"))
                .unwrap();
        let table = CodeTable::from_tree(Some(&tree));
        for (symbol, depth) in tree.leaves() {
            assert_eq!(table.get(symbol).unwrap().len(), depth);
        }
    }

    #[test]
    fn test_skewed_chain_codes() {
        let mut counts = [0u64; 256];
        counts[0] = 1;
        for symbol in 1..60 {
            counts[symbol] = 1 << (symbol - 1);
        }
        let tree = HuffmanTree::from_frequencies(&FrequencyTable::from(counts)).unwrap();
        let table = CodeTable::from_tree(Some(&tree));

        // Symbols 0 and 1 sit at the bottom of a 59-deep chain; on equal
        // weights the merged chain pops last and lands on the right.
        let deepest = table.get(0).unwrap();
        assert_eq!(deepest.len(), 59);
        assert!(deepest.bits().take(58).all(|bit| bit));
        assert!(!deepest.bit(58));
        assert!(!deepest.is_prefix_of(table.get(1).unwrap()));
    }

    #[test]
    fn test_long_codes_span_words() {
        // Hand-built chain 200 levels deep: every internal node has a leaf
        // on the left and the rest of the chain on the right.
        let mut node = HuffNode::merge(
            HuffNode::Leaf { symbol: 200 },
            HuffNode::Leaf { symbol: 201 },
        );
        for symbol in (0..200u8).rev() {
            node = HuffNode::merge(HuffNode::Leaf { symbol }, node);
        }
        let tree = HuffmanTree::from_root(node);
        let table = CodeTable::from_tree(Some(&tree));

        assert_eq!(table.len(), 202);
        let last = table.get(201).unwrap();
        assert_eq!(last.len(), 201);
        assert!(last.bits().all(|bit| bit));
        let code = table.get(150).unwrap();
        assert_eq!(code.len(), 151);
        assert!(code.bits().take(150).all(|bit| bit));
        assert!(!code.bit(150));
    }
}
