use std::collections::BTreeMap;
use std::fmt;

use crate::bit_vec::BitVec;
use crate::frequency::FrequencyTable;
use crate::symbol::Symbol;

/// Path from the root to a leaf: `false` for the zero branch, `true` for the one branch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Code(BitVec);

impl Code {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Only the sole leaf of a single-symbol tree has an empty code.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        self.0.iter()
    }

    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.0.starts_with(&self.0)
    }
}

impl From<BitVec> for Code {
    fn from(bits: BitVec) -> Self {
        Code(bits)
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

/// Symbol to code mapping derived from one tree. Encoding only.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CodeTable {
    codes: BTreeMap<Symbol, Code>,
}

impl CodeTable {
    pub fn new() -> Self {
        CodeTable { codes: BTreeMap::new() }
    }

    pub(crate) fn insert(&mut self, symbol: Symbol, code: Code) {
        self.codes.insert(symbol, code);
    }

    pub fn get(&self, symbol: Symbol) -> Option<&Code> {
        self.codes.get(&symbol)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &Code)> + '_ {
        self.codes.iter().map(|(&s, c)| (s, c))
    }

    pub fn is_prefix_free(&self) -> bool {
        let codes: Vec<&Code> = self.codes.values().collect();
        codes.iter().enumerate().all(|(i, a)| {
            codes.iter().enumerate().all(|(j, b)| i == j || !a.is_prefix_of(b))
        })
    }

    /// Payload length in bits produced by encoding the counted input,
    /// end-of-stream code included. `None` if a symbol has no code.
    pub fn encoded_bits(&self, frequencies: &FrequencyTable) -> Option<u64> {
        frequencies
            .iter()
            .map(|(symbol, count)| self.get(symbol).map(|code| code.len() as u64 * count))
            .sum()
    }
}
