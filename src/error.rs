use std::io;

use thiserror::Error;

use crate::min_heap::HeapErr;
use crate::symbol::Symbol;

#[derive(Error, Debug)]
pub enum HuffmanError {
    #[error("malformed frequency table: {0}")]
    MalformedFrequencyTable(String),

    #[error("payload ended after {bits_read} bits without reaching the end-of-stream code")]
    TruncatedPayload { bits_read: u64 },

    /// The second pass over the input saw a symbol the first pass never counted.
    #[error("symbol {0} has no code; input changed between passes")]
    MissingCode(Symbol),

    #[error("heap error: {0}")]
    Heap(#[from] HeapErr),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl HuffmanError {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        HuffmanError::MalformedFrequencyTable(msg.into())
    }
}
