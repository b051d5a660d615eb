//! Tree record codec.
//!
//! A tree is persisted as the preorder sequence of its leaves, each leaf as a
//! `(depth, symbol)` pair. Internal nodes are implicit: reconstruction keeps
//! a stack of finished subtrees tagged with their depth, and whenever the
//! newest subtree sits at the same depth as the one below it the two are
//! siblings and merge into a parent one level up.

use std::io::{Read, Write};

use crate::error::{HuffError, Result};
use crate::frequency::ALPHABET_SIZE;
use crate::tree::{HuffNode, HuffmanTree};

/// Encoded size of one record in bytes.
pub const RECORD_LEN: usize = 2;

/// One leaf of the tree: its depth from the root and its symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TreeRecord {
    pub depth: u8,
    pub symbol: u8,
}

impl TreeRecord {
    /// Byte layout: `[depth, symbol]`.
    pub fn to_bytes(self) -> [u8; RECORD_LEN] {
        [self.depth, self.symbol]
    }

    pub fn from_bytes(bytes: [u8; RECORD_LEN]) -> Self {
        Self {
            depth: bytes[0],
            symbol: bytes[1],
        }
    }

    pub fn write_to<W: Write>(self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.to_bytes())?;
        Ok(())
    }

    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut bytes = [0u8; RECORD_LEN];
        reader
            .read_exact(&mut bytes)
            .map_err(|e| HuffError::from_read(e, "tree records"))?;
        Ok(Self::from_bytes(bytes))
    }
}

/// Preorder leaf records of `tree`.
pub fn serialize_tree(tree: &HuffmanTree) -> Vec<TreeRecord> {
    tree.leaves()
        .into_iter()
        .map(|(symbol, depth)| TreeRecord {
            // A full tree over at most 256 leaves is at most 255 deep.
            depth: u8::try_from(depth).unwrap_or(u8::MAX),
            symbol,
        })
        .collect()
}

/// Rebuild a tree from its preorder leaf records.
///
/// An empty sequence yields `None`. A single record must sit at depth 0 and
/// yields a lone leaf. Any sequence that does not reduce to exactly one root
/// at depth 0 is rejected; partially built subtrees are dropped with the
/// error.
pub fn reconstruct_tree(records: &[TreeRecord]) -> Result<Option<HuffmanTree>> {
    if records.len() > ALPHABET_SIZE {
        return Err(HuffError::CorruptHeader(format!(
            "{} tree records exceed the {ALPHABET_SIZE}-symbol alphabet",
            records.len()
        )));
    }
    if records.is_empty() {
        return Ok(None);
    }

    let mut seen = [false; ALPHABET_SIZE];
    let mut stack: Vec<(u8, HuffNode)> = Vec::with_capacity(records.len());

    for record in records {
        let slot = &mut seen[usize::from(record.symbol)];
        if *slot {
            return Err(HuffError::CorruptTree(format!(
                "symbol {:#04x} appears twice",
                record.symbol
            )));
        }
        *slot = true;

        let mut depth = record.depth;
        let mut node = HuffNode::Leaf {
            symbol: record.symbol,
        };

        while let Some(&(top_depth, _)) = stack.last() {
            if top_depth != depth {
                break;
            }
            if depth == 0 {
                return Err(HuffError::CorruptTree(
                    "more than one node at depth 0".to_string(),
                ));
            }
            let Some((_, left)) = stack.pop() else {
                break;
            };
            node = HuffNode::merge(left, node);
            depth -= 1;
        }

        stack.push((depth, node));
    }

    match stack.pop() {
        Some((0, root)) if stack.is_empty() => Ok(Some(HuffmanTree::from_root(root))),
        _ => Err(HuffError::CorruptTree(format!(
            "records reduce to {} subtrees instead of one root",
            stack.len() + 1
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::FrequencyTable;

    fn record(depth: u8, symbol: u8) -> TreeRecord {
        TreeRecord { depth, symbol }
    }

    fn tree_for(data: &[u8]) -> HuffmanTree {
        HuffmanTree::from_frequencies(&FrequencyTable::from_bytes(data)).unwrap()
    }

    #[test]
    fn test_record_bytes() {
        let r = record(3, b'x');
        assert_eq!(r.to_bytes(), [3, b'x']);
        assert_eq!(TreeRecord::from_bytes([3, b'x']), r);
    }

    #[test]
    fn test_serialize_aaab() {
        let records = serialize_tree(&tree_for(b"aaab"));
        assert_eq!(records, vec![record(1, b'b'), record(1, b'a')]);
    }

    #[test]
    fn test_round_trip_preserves_leaf_depths() {
        let inputs: [&[u8]; 4] = [
            b"aaab",
            b"abracadabra",
            b"the quick brown fox jumps over the lazy dog",
            &[0, 0, 0, 1, 1, 2, 3, 4, 5, 6, 7, 7, 7, 7, 7, 7, 255],
        ];
        for data in inputs {
            let tree = tree_for(data);
            let rebuilt = reconstruct_tree(&serialize_tree(&tree)).unwrap().unwrap();
            assert_eq!(rebuilt.leaves(), tree.leaves());
        }
    }

    #[test]
    fn test_round_trip_full_alphabet() {
        let data: Vec<u8> = (0..=255u8).chain(0..100).chain(0..10).collect();
        let tree = tree_for(&data);
        let records = serialize_tree(&tree);
        assert_eq!(records.len(), 256);
        let rebuilt = reconstruct_tree(&records).unwrap().unwrap();
        assert_eq!(rebuilt.leaves(), tree.leaves());
    }

    #[test]
    fn test_empty_records() {
        assert!(reconstruct_tree(&[]).unwrap().is_none());
    }

    #[test]
    fn test_single_record() {
        let tree = reconstruct_tree(&[record(0, b'z')]).unwrap().unwrap();
        assert_eq!(tree.root(), &HuffNode::Leaf { symbol: b'z' });
    }

    #[test]
    fn test_single_record_below_root_is_corrupt() {
        let result = reconstruct_tree(&[record(1, b'z')]);
        assert!(matches!(result, Err(HuffError::CorruptTree(_))));
    }

    #[test]
    fn test_two_roots_are_corrupt() {
        let result = reconstruct_tree(&[record(0, b'a'), record(0, b'b')]);
        assert!(matches!(result, Err(HuffError::CorruptTree(_))));
    }

    #[test]
    fn test_unreduced_stack_is_corrupt() {
        let result = reconstruct_tree(&[record(1, b'a'), record(2, b'b')]);
        assert!(matches!(result, Err(HuffError::CorruptTree(_))));
    }

    #[test]
    fn test_duplicate_symbol_is_corrupt() {
        let result = reconstruct_tree(&[record(1, b'a'), record(1, b'a')]);
        assert!(matches!(result, Err(HuffError::CorruptTree(_))));
    }

    #[test]
    fn test_too_many_records_is_corrupt_header() {
        let records: Vec<TreeRecord> = (0..257u32)
            .map(|i| record(8, (i % 256) as u8))
            .collect();
        let result = reconstruct_tree(&records);
        assert!(matches!(result, Err(HuffError::CorruptHeader(_))));
    }

    #[test]
    fn test_read_truncated_record() {
        let bytes = [1u8];
        let result = TreeRecord::read_from(&mut &bytes[..]);
        assert!(matches!(result, Err(HuffError::Truncated(_))));
    }
}
