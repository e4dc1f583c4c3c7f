use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Read, Seek, SeekFrom, Write};

use tracing::{debug, warn};

use crate::bit_stream::{BitReader, BitWriter};
use crate::code_table::CodeTable;
use crate::error::HuffmanError;
use crate::frequency::FrequencyTable;
use crate::header;
use crate::hufftree::{HuffNode, HuffmanTree};
use crate::symbol::{self, PSEUDO_EOF};

/// Tree and code table for one frequency table.
///
/// A codec is built per call and dropped with it; nothing is shared
/// between compressions.
pub struct HuffmanCodec {
    frequencies: FrequencyTable,
    tree: HuffmanTree,
    encode_table: CodeTable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressStats {
    pub input_bytes: u64,
    pub distinct_symbols: usize,
    pub header_bytes: u64,
    pub payload_bits: u64,
}

impl CompressStats {
    pub fn payload_bytes(&self) -> u64 {
        self.payload_bits.div_ceil(8)
    }

    pub fn output_bytes(&self) -> u64 {
        self.header_bytes + self.payload_bytes()
    }

    /// Output size over input size; `None` for empty input.
    pub fn ratio(&self) -> Option<f64> {
        (self.input_bytes > 0).then(|| self.output_bytes() as f64 / self.input_bytes as f64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecompressStats {
    pub distinct_symbols: usize,
    pub payload_bits: u64,
    pub output_bytes: u64,
}

impl HuffmanCodec {
    pub fn new(frequencies: FrequencyTable) -> Result<Self, HuffmanError> {
        let tree = HuffmanTree::from_frequencies(&frequencies)?;
        let encode_table = tree.generate_table();
        debug!(
            symbols = frequencies.len(),
            depth = tree.depth(),
            "built huffman tree"
        );
        Ok(HuffmanCodec {
            frequencies,
            tree,
            encode_table,
        })
    }

    pub fn frequencies(&self) -> &FrequencyTable {
        &self.frequencies
    }

    pub fn tree(&self) -> &HuffmanTree {
        &self.tree
    }

    pub fn code_table(&self) -> &CodeTable {
        &self.encode_table
    }

    /// Two passes over `input`: count, then rewind to where the input started
    /// and emit the header followed by the packed codes.
    pub fn compress<R, W>(mut input: R, output: W) -> Result<CompressStats, HuffmanError>
    where
        R: Read + Seek,
        W: Write,
    {
        let start = input.stream_position()?;
        let frequencies = FrequencyTable::from_reader(&mut input)?;
        let codec = HuffmanCodec::new(frequencies)?;

        let mut output = output;
        let header_bytes = header::write_frequency_table(&mut output, &codec.frequencies)? as u64;

        input.seek(SeekFrom::Start(start))?;
        let mut bits = BitWriter::new(output);
        let input_bytes = codec.encode_into(BufReader::new(&mut input), &mut bits)?;
        let payload_bits = bits.bits_written();
        bits.finish()?;

        let stats = CompressStats {
            input_bytes,
            distinct_symbols: codec.frequencies.len(),
            header_bytes,
            payload_bits,
        };
        debug!(
            input_bytes,
            header_bytes,
            payload_bits,
            symbols = stats.distinct_symbols,
            "compressed"
        );
        Ok(stats)
    }

    /// Writes the code of every byte in `input`, then the end-of-stream code.
    /// Returns the number of input bytes encoded.
    pub fn encode_into<R: Read, W: Write>(
        &self,
        input: R,
        bits: &mut BitWriter<W>,
    ) -> Result<u64, HuffmanError> {
        let mut count = 0u64;
        for byte in input.bytes() {
            let symbol = symbol::from_byte(byte?);
            let code = self
                .encode_table
                .get(symbol)
                .ok_or(HuffmanError::MissingCode(symbol))?;
            bits.write_code(code)?;
            count += 1;
        }

        let eof = self
            .encode_table
            .get(PSEUDO_EOF)
            .ok_or(HuffmanError::MissingCode(PSEUDO_EOF))?;
        bits.write_code(eof)?;
        Ok(count)
    }

    /// Parses the header, rebuilds the tree and walks it bit by bit until the
    /// end-of-stream leaf. Bytes decoded before a failure stay written.
    pub fn decompress<R, W>(input: R, output: W) -> Result<DecompressStats, HuffmanError>
    where
        R: Read,
        W: Write,
    {
        let mut reader = BufReader::new(input);
        let frequencies = header::read_frequency_table(&mut reader)?;
        let codec = HuffmanCodec::new(frequencies)?;

        let mut bits = BitReader::new(reader);
        let mut output = BufWriter::new(output);
        let output_bytes = codec.decode_into(&mut bits, &mut output)?;
        output.flush()?;

        let stats = DecompressStats {
            distinct_symbols: codec.frequencies.len(),
            payload_bits: bits.bits_read(),
            output_bytes,
        };
        debug!(
            output_bytes,
            payload_bits = stats.payload_bits,
            symbols = stats.distinct_symbols,
            "decompressed"
        );
        Ok(stats)
    }

    /// Returns the number of bytes emitted before the end-of-stream code.
    pub fn decode_into<R: Read, W: Write>(
        &self,
        bits: &mut BitReader<R>,
        output: &mut W,
    ) -> Result<u64, HuffmanError> {
        let root = &self.tree.root;
        let mut current_node = root;
        let mut count = 0u64;

        loop {
            match current_node {
                HuffNode::Leaf { symbol, .. } => {
                    let Some(byte) = symbol::to_byte(*symbol) else {
                        return Ok(count);
                    };
                    output.write_all(&[byte])?;
                    count += 1;
                    current_node = root;
                }
                HuffNode::Internal { zero, one, .. } => {
                    current_node = match bits.read_bit()? {
                        Some(false) => zero,
                        Some(true) => one,
                        None => {
                            let bits_read = bits.bits_read();
                            warn!(bits_read, decoded = count, "payload truncated");
                            return Err(HuffmanError::TruncatedPayload { bits_read });
                        }
                    };
                }
            }
        }
    }

    pub fn compress_bytes(data: &[u8]) -> Result<Vec<u8>, HuffmanError> {
        let mut out = Vec::new();
        Self::compress(Cursor::new(data), &mut out)?;
        Ok(out)
    }

    pub fn decompress_bytes(data: &[u8]) -> Result<Vec<u8>, HuffmanError> {
        let mut out = Vec::new();
        Self::decompress(data, &mut out)?;
        Ok(out)
    }

    pub fn encode_from_file(input: File, output: File) -> Result<CompressStats, HuffmanError> {
        let mut output = BufWriter::new(output);
        let stats = Self::compress(input, &mut output)?;
        output.flush()?;
        Ok(stats)
    }

    pub fn decode_from_file(input: File, output: File) -> Result<DecompressStats, HuffmanError> {
        Self::decompress(input, output)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::header::header_len;

    #[test]
    fn aaab_artifact_layout() {
        let compressed = HuffmanCodec::compress_bytes(b"aaab").unwrap();
        let hl = header_len(3);
        assert_eq!(compressed.len(), hl + 1);
        // 1 1 1 00 01 + one padding bit
        assert_eq!(compressed[hl], 0b1110_0010);
        assert_eq!(HuffmanCodec::decompress_bytes(&compressed).unwrap(), b"aaab");
    }

    #[test]
    fn empty_input_round_trips_with_empty_payload() {
        let mut out = Vec::new();
        let stats = HuffmanCodec::compress(Cursor::new(Vec::<u8>::new()), &mut out).unwrap();
        assert_eq!(stats.payload_bits, 0);
        assert_eq!(stats.distinct_symbols, 1);
        assert_eq!(out.len(), header_len(1));
        assert_eq!(stats.ratio(), None);

        let mut decoded = Vec::new();
        let dstats = HuffmanCodec::decompress(out.as_slice(), &mut decoded).unwrap();
        assert!(decoded.is_empty());
        assert_eq!(dstats.payload_bits, 0);
    }

    #[test]
    fn rewinds_to_entry_position() {
        let mut cursor = Cursor::new(b"skip:payload".to_vec());
        cursor.set_position(5);
        let mut out = Vec::new();
        let stats = HuffmanCodec::compress(&mut cursor, &mut out).unwrap();
        assert_eq!(stats.input_bytes, 7);
        assert_eq!(HuffmanCodec::decompress_bytes(&out).unwrap(), b"payload");
    }

    #[test]
    fn truncated_payload_is_reported() {
        let compressed = HuffmanCodec::compress_bytes(b"aaab").unwrap();
        let truncated = &compressed[..compressed.len() - 1];
        let mut out = Vec::new();
        match HuffmanCodec::decompress(truncated, &mut out) {
            Err(HuffmanError::TruncatedPayload { bits_read }) => assert_eq!(bits_read, 0),
            other => panic!("expected truncation, got {:?}", other),
        }
    }

    #[test]
    fn stats_are_consistent() {
        let data = b"she sells sea shells by the sea shore";
        let mut out = Vec::new();
        let stats = HuffmanCodec::compress(Cursor::new(&data[..]), &mut out).unwrap();
        assert_eq!(stats.input_bytes, data.len() as u64);
        assert_eq!(stats.output_bytes(), out.len() as u64);

        let codec = HuffmanCodec::new(FrequencyTable::from_bytes(data)).unwrap();
        assert_eq!(codec.code_table().encoded_bits(codec.frequencies()), Some(stats.payload_bits));

        let mut decoded = Vec::new();
        let dstats = HuffmanCodec::decompress(out.as_slice(), &mut decoded).unwrap();
        assert_eq!(decoded, data);
        assert_eq!(dstats.output_bytes, data.len() as u64);
        assert!(dstats.payload_bits >= stats.payload_bits);
    }

    #[test]
    fn overflowing_header_counts_are_malformed() {
        let mut crafted = header::MAGIC.to_vec();
        crafted.extend_from_slice(&3u32.to_le_bytes());
        for (symbol, count) in [(97u16, u64::MAX), (98, u64::MAX), (256, 1)] {
            crafted.extend_from_slice(&symbol.to_le_bytes());
            crafted.extend_from_slice(&count.to_le_bytes());
        }
        match HuffmanCodec::decompress_bytes(&crafted) {
            Err(HuffmanError::MalformedFrequencyTable(_)) => {}
            other => panic!("expected malformed table, got {:?}", other),
        }
    }
}
