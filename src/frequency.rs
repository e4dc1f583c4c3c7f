use std::collections::BTreeMap;
use std::io::{self, BufReader, Read};

use crate::symbol::{self, Symbol, PSEUDO_EOF};

/// Occurrence counts per symbol, always carrying `PSEUDO_EOF` with count 1.
///
/// Keys are kept ordered so that every walk over the table (serialization,
/// tree construction) sees symbols in ascending order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: BTreeMap<Symbol, u64>,
}

impl FrequencyTable {
    /// Counts every byte until the reader is exhausted, then appends the
    /// end-of-stream entry.
    pub fn from_reader<R: Read>(reader: R) -> io::Result<Self> {
        let mut counts = BTreeMap::new();
        for byte in BufReader::new(reader).bytes() {
            *counts.entry(symbol::from_byte(byte?)).or_insert(0) += 1;
        }
        counts.insert(PSEUDO_EOF, 1);
        Ok(FrequencyTable { counts })
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut counts = bytes.iter().copied().fold(BTreeMap::new(), |mut acc, byte| {
            *acc.entry(symbol::from_byte(byte)).or_insert(0) += 1;
            acc
        });
        counts.insert(PSEUDO_EOF, 1);
        FrequencyTable { counts }
    }

    /// Wraps already-validated counts. Callers guarantee the end-of-stream entry.
    pub(crate) fn from_validated(counts: BTreeMap<Symbol, u64>) -> Self {
        debug_assert_eq!(counts.get(&PSEUDO_EOF), Some(&1));
        FrequencyTable { counts }
    }

    pub fn get(&self, symbol: Symbol) -> Option<u64> {
        self.counts.get(&symbol).copied()
    }

    pub fn contains(&self, symbol: Symbol) -> bool {
        self.counts.contains_key(&symbol)
    }

    /// Number of distinct symbols, end-of-stream included.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Always false: the end-of-stream entry is present from construction.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Symbol, u64)> + '_ {
        self.counts.iter().map(|(&s, &c)| (s, c))
    }

    /// Number of input bytes the table was counted from.
    pub fn input_len(&self) -> u64 {
        self.iter()
            .filter(|&(s, _)| s != PSEUDO_EOF)
            .map(|(_, c)| c)
            .sum()
    }
}
