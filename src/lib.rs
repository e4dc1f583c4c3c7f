//! # huffzip
//!
//! Static two-pass Huffman compression. The first pass counts byte
//! frequencies, the second packs each byte's prefix code behind a header
//! holding the frequency table. The decoder rebuilds the same tree from that
//! table and walks it bit by bit until the end-of-stream code.
//!
//! ## Quick Start
//!
//! ```rust
//! use huffzip::HuffmanCodec;
//!
//! let compressed = HuffmanCodec::compress_bytes(b"abracadabra")?;
//! let restored = HuffmanCodec::decompress_bytes(&compressed)?;
//! assert_eq!(restored, b"abracadabra");
//! # Ok::<(), huffzip::HuffmanError>(())
//! ```
//!
//! Files go through [`HuffmanCodec::encode_from_file`] and
//! [`HuffmanCodec::decode_from_file`]; any `Read + Seek` source and `Write`
//! sink work with [`HuffmanCodec::compress`] and [`HuffmanCodec::decompress`].

pub mod bit_stream;
pub mod code_table;
pub mod error;
pub mod frequency;
pub mod header;
pub mod huffman_codec;
pub mod hufftree;
pub mod symbol;

// Internal modules - not part of public API
mod bit_vec;
mod min_heap;

pub use code_table::{Code, CodeTable};
pub use error::HuffmanError;
pub use frequency::FrequencyTable;
pub use huffman_codec::{CompressStats, DecompressStats, HuffmanCodec};
pub use hufftree::{HuffNode, HuffmanTree};
pub use min_heap::HeapErr;
pub use symbol::{Symbol, PSEUDO_EOF};
