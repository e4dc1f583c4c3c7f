//! Serialized frequency table that prefixes every compressed artifact.
//!
//! Layout, all integers little-endian:
//!
//! ```text
//! magic   [u8; 4]  "HUFF"
//! count   u32      number of entries, 1..=257
//! entry   u16 symbol, u64 count   (repeated `count` times, ascending symbol)
//! ```

use std::collections::BTreeMap;
use std::io::{self, ErrorKind, Read, Write};

use tracing::warn;

use crate::error::HuffmanError;
use crate::frequency::FrequencyTable;
use crate::symbol::{Symbol, PSEUDO_EOF, SYMBOL_COUNT};

pub const MAGIC: [u8; 4] = *b"HUFF";

const ENTRY_LEN: usize = 2 + 8;

/// Size in bytes of the header for a table with `entries` symbols.
pub fn header_len(entries: usize) -> usize {
    MAGIC.len() + 4 + entries * ENTRY_LEN
}

/// Writes the table and returns the number of bytes written.
pub fn write_frequency_table<W: Write>(
    writer: &mut W,
    table: &FrequencyTable,
) -> io::Result<usize> {
    let mut bytes = Vec::with_capacity(header_len(table.len()));
    bytes.extend_from_slice(&MAGIC);
    bytes.extend_from_slice(&(table.len() as u32).to_le_bytes());

    for (symbol, count) in table.iter() {
        bytes.extend_from_slice(&symbol.to_le_bytes());
        bytes.extend_from_slice(&count.to_le_bytes());
    }

    writer.write_all(&bytes)?;
    Ok(bytes.len())
}

/// Parses a header, leaving the reader positioned at the first payload byte.
pub fn read_frequency_table<R: Read>(reader: &mut R) -> Result<FrequencyTable, HuffmanError> {
    let result = parse(reader);
    if let Err(HuffmanError::MalformedFrequencyTable(msg)) = &result {
        warn!(reason = %msg, "rejected frequency table header");
    }
    result
}

fn parse<R: Read>(reader: &mut R) -> Result<FrequencyTable, HuffmanError> {
    let mut magic = [0u8; 4];
    read_field(reader, &mut magic, "magic")?;
    if magic != MAGIC {
        return Err(HuffmanError::malformed(format!("bad magic {:02x?}", magic)));
    }

    let mut count_bytes = [0u8; 4];
    read_field(reader, &mut count_bytes, "entry count")?;
    let count = u32::from_le_bytes(count_bytes) as usize;
    if count == 0 || count > SYMBOL_COUNT {
        return Err(HuffmanError::malformed(format!(
            "entry count {} out of range 1..={}",
            count, SYMBOL_COUNT
        )));
    }

    let mut counts = BTreeMap::new();
    let mut previous: Option<Symbol> = None;
    let mut total: u64 = 0;
    for index in 0..count {
        let mut symbol_bytes = [0u8; 2];
        read_field(reader, &mut symbol_bytes, "entry symbol")?;
        let symbol = Symbol::from_le_bytes(symbol_bytes);

        let mut freq_bytes = [0u8; 8];
        read_field(reader, &mut freq_bytes, "entry count")?;
        let freq = u64::from_le_bytes(freq_bytes);

        if symbol > PSEUDO_EOF {
            return Err(HuffmanError::malformed(format!(
                "entry {} has invalid symbol {}",
                index, symbol
            )));
        }
        if previous.is_some_and(|p| p >= symbol) {
            return Err(HuffmanError::malformed(format!(
                "entry {} (symbol {}) is out of order or duplicated",
                index, symbol
            )));
        }
        if freq == 0 {
            return Err(HuffmanError::malformed(format!("symbol {} has a zero count", symbol)));
        }
        // The root weight is the sum of all counts and must fit in a u64.
        total = total.checked_add(freq).ok_or_else(|| {
            HuffmanError::malformed(format!("counts overflow u64 at symbol {}", symbol))
        })?;

        previous = Some(symbol);
        counts.insert(symbol, freq);
    }

    match counts.get(&PSEUDO_EOF) {
        Some(1) => Ok(FrequencyTable::from_validated(counts)),
        Some(n) => Err(HuffmanError::malformed(format!(
            "end-of-stream count is {}, expected 1",
            n
        ))),
        None => Err(HuffmanError::malformed("missing end-of-stream entry")),
    }
}

fn read_field<R: Read>(reader: &mut R, buf: &mut [u8], what: &str) -> Result<(), HuffmanError> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => {
            HuffmanError::malformed(format!("header truncated while reading {}", what))
        }
        _ => HuffmanError::Io(e),
    })
}
