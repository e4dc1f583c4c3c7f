use std::fmt::Write as _;

use tracing::trace;

use crate::bit_vec::BitVec;
use crate::code_table::{Code, CodeTable};
use crate::error::HuffmanError;
use crate::frequency::FrequencyTable;
use crate::min_heap::MinHeap;
use crate::symbol::{self, Symbol};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    pub root: HuffNode,
}

impl HuffmanTree {
    /// Builds the tree by repeatedly merging the two lightest nodes.
    ///
    /// Leaves enter the heap in ascending symbol order, equal weights leave
    /// it first-in first-out, and the first node extracted in each merge
    /// becomes the zero branch. The same table therefore always yields the
    /// same tree on both sides of the codec.
    pub fn from_frequencies(frequencies: &FrequencyTable) -> Result<Self, HuffmanError> {
        let mut heap = MinHeap::with_capacity(frequencies.len());
        for (symbol, weight) in frequencies.iter() {
            heap.insert(HuffNode::new(symbol, weight), weight);
        }

        while heap.heap_size() > 1 {
            let (zero, _) = heap.extract_min()?;
            let (one, _) = heap.extract_min()?;
            let z = HuffNode::merge(zero, one)?;
            let weight = z.weight();
            trace!(weight, "merged nodes");
            heap.insert(z, weight);
        }

        let (root, _) = heap.extract_min()?;
        Ok(HuffmanTree { root })
    }

    pub fn generate_table(&self) -> CodeTable {
        let mut table = CodeTable::new();
        self.root.generate_table(&mut table, &mut BitVec::new());
        table
    }

    /// True when the root itself is a leaf (only the end-of-stream symbol).
    pub fn is_degenerate(&self) -> bool {
        matches!(self.root, HuffNode::Leaf { .. })
    }

    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.root.render(&mut out, 0, "root");
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffNode {
    Leaf {
        weight: u64,
        symbol: Symbol,
    },
    Internal {
        weight: u64,
        zero: Box<HuffNode>,
        one: Box<HuffNode>,
    },
}

impl HuffNode {
    pub fn new(symbol: Symbol, weight: u64) -> Self {
        HuffNode::Leaf { weight, symbol }
    }

    pub fn weight(&self) -> u64 {
        match self {
            HuffNode::Leaf { weight, .. } => *weight,
            HuffNode::Internal { weight, .. } => *weight,
        }
    }

    /// Joins two subtrees under a new internal node. Fails if the combined
    /// weight does not fit in a `u64`.
    pub fn merge(zero: Self, one: Self) -> Result<Self, HuffmanError> {
        let weight = zero.weight().checked_add(one.weight()).ok_or_else(|| {
            HuffmanError::malformed(format!(
                "combined weight of {} and {} overflows u64",
                zero.weight(),
                one.weight()
            ))
        })?;
        Ok(HuffNode::Internal {
            weight,
            zero: Box::new(zero),
            one: Box::new(one),
        })
    }

    fn generate_table(&self, table: &mut CodeTable, path: &mut BitVec) {
        match self {
            HuffNode::Leaf { symbol, .. } => {
                table.insert(*symbol, Code::from(path.clone()));
            }
            HuffNode::Internal { zero, one, .. } => {
                let mut zero_path = path.clone();
                zero_path.push_bit(false);
                zero.generate_table(table, &mut zero_path);

                path.push_bit(true);
                one.generate_table(table, path);
            }
        }
    }

    fn depth(&self) -> usize {
        match self {
            HuffNode::Leaf { .. } => 0,
            HuffNode::Internal { zero, one, .. } => 1 + zero.depth().max(one.depth()),
        }
    }

    fn leaf_count(&self) -> usize {
        match self {
            HuffNode::Leaf { .. } => 1,
            HuffNode::Internal { zero, one, .. } => zero.leaf_count() + one.leaf_count(),
        }
    }

    fn render(&self, out: &mut String, depth: usize, label: &str) {
        let indent = "  ".repeat(depth);
        match self {
            HuffNode::Leaf { symbol, weight } => {
                let _ = writeln!(
                    out,
                    "{}{}: {} [weight: {}]",
                    indent,
                    label,
                    symbol::label(*symbol),
                    weight
                );
            }
            HuffNode::Internal { weight, zero, one } => {
                let _ = writeln!(out, "{}{}: [weight: {}]", indent, label, weight);
                zero.render(out, depth + 1, "0");
                one.render(out, depth + 1, "1");
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::symbol::PSEUDO_EOF;
    use std::collections::BTreeMap;

    fn leaf(symbol: Symbol, weight: u64) -> HuffNode {
        HuffNode::new(symbol, weight)
    }

    #[test]
    fn aaab_merges_b_and_eof_first() {
        let tree = HuffmanTree::from_frequencies(&FrequencyTable::from_bytes(b"aaab")).unwrap();
        let expected = HuffNode::merge(
            HuffNode::merge(leaf(b'b' as Symbol, 1), leaf(PSEUDO_EOF, 1)).unwrap(),
            leaf(b'a' as Symbol, 3),
        )
        .unwrap();
        assert_eq!(tree.root, expected);
        assert_eq!(tree.root.weight(), 5);
        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.leaf_count(), 3);
    }

    #[test]
    fn aaab_codes() {
        let tree = HuffmanTree::from_frequencies(&FrequencyTable::from_bytes(b"aaab")).unwrap();
        let table = tree.generate_table();
        assert_eq!(table.get(b'a' as Symbol).unwrap().to_string(), "1");
        assert_eq!(table.get(b'b' as Symbol).unwrap().to_string(), "00");
        assert_eq!(table.get(PSEUDO_EOF).unwrap().to_string(), "01");
    }

    #[test]
    fn empty_input_is_a_single_leaf() {
        let tree = HuffmanTree::from_frequencies(&FrequencyTable::from_bytes(&[])).unwrap();
        assert!(tree.is_degenerate());
        assert_eq!(tree.root, leaf(PSEUDO_EOF, 1));
        let table = tree.generate_table();
        assert_eq!(table.len(), 1);
        assert!(table.get(PSEUDO_EOF).unwrap().is_empty());
    }

    #[test]
    fn internal_nodes_always_have_two_children() {
        let data: Vec<u8> = (0..4096u32).map(|i| ((i * i) % 97) as u8).collect();
        let table = FrequencyTable::from_bytes(&data);
        let tree = HuffmanTree::from_frequencies(&table).unwrap();
        assert_eq!(tree.leaf_count(), table.len());
        assert_eq!(tree.root.weight(), data.len() as u64 + 1);
    }

    #[test]
    fn same_table_same_tree() {
        let table = FrequencyTable::from_bytes(b"abracadabra, said the wizard");
        let a = HuffmanTree::from_frequencies(&table).unwrap();
        let b = HuffmanTree::from_frequencies(&table.clone()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.generate_table(), b.generate_table());
    }

    #[test]
    fn render_shows_branches() {
        let tree = HuffmanTree::from_frequencies(&FrequencyTable::from_bytes(b"aaab")).unwrap();
        let rendered = tree.render();
        assert_eq!(
            rendered,
            "root: [weight: 5]\n  0: [weight: 2]\n    0: 'b' [weight: 1]\n    \
             1: EOF [weight: 1]\n  1: 'a' [weight: 3]\n"
        );
    }

    #[test]
    fn overflowing_weights_are_rejected() {
        let counts = BTreeMap::from([(b'a' as Symbol, u64::MAX), (PSEUDO_EOF, 1)]);
        let table = FrequencyTable::from_validated(counts);
        assert!(matches!(
            HuffmanTree::from_frequencies(&table),
            Err(HuffmanError::MalformedFrequencyTable(_))
        ));
        assert!(HuffNode::merge(leaf(1, u64::MAX), leaf(2, 1)).is_err());
        let heaviest = HuffNode::merge(leaf(1, u64::MAX - 1), leaf(2, 1)).unwrap();
        assert_eq!(heaviest.weight(), u64::MAX);
    }
}
