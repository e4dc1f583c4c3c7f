//! Single-bit sinks and sources over byte streams.
//!
//! Bits are packed MSB-first. `BitWriter::finish` pads the final byte with
//! zeros; readers see those padding bits like any other and rely on the
//! end-of-stream code to know where the payload stops.

use std::io::{self, ErrorKind, Read, Write};

use crate::code_table::Code;

pub struct BitWriter<W: Write> {
    inner: W,
    current: u8,
    filled: u8,
    bits_written: u64,
}

impl<W: Write> BitWriter<W> {
    pub fn new(inner: W) -> Self {
        BitWriter {
            inner,
            current: 0,
            filled: 0,
            bits_written: 0,
        }
    }

    pub fn write_bit(&mut self, bit: bool) -> io::Result<()> {
        if bit {
            self.current |= 1 << (7 - self.filled);
        }
        self.filled += 1;
        self.bits_written += 1;

        if self.filled == 8 {
            self.inner.write_all(&[self.current])?;
            self.current = 0;
            self.filled = 0;
        }
        Ok(())
    }

    pub fn write_code(&mut self, code: &Code) -> io::Result<()> {
        for bit in code.bits() {
            self.write_bit(bit)?;
        }
        Ok(())
    }

    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    /// Flushes the partial byte (zero padded) and hands back the sink.
    pub fn finish(mut self) -> io::Result<W> {
        if self.filled > 0 {
            self.inner.write_all(&[self.current])?;
        }
        self.inner.flush()?;
        Ok(self.inner)
    }
}

pub struct BitReader<R: Read> {
    inner: R,
    current: u8,
    remaining: u8,
    bits_read: u64,
}

impl<R: Read> BitReader<R> {
    pub fn new(inner: R) -> Self {
        BitReader {
            inner,
            current: 0,
            remaining: 0,
            bits_read: 0,
        }
    }

    /// Next bit, or `None` once the source is exhausted.
    pub fn read_bit(&mut self) -> io::Result<Option<bool>> {
        if self.remaining == 0 {
            let mut byte = [0u8; 1];
            loop {
                match self.inner.read(&mut byte) {
                    Ok(0) => return Ok(None),
                    Ok(_) => break,
                    Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                }
            }
            self.current = byte[0];
            self.remaining = 8;
        }

        self.remaining -= 1;
        self.bits_read += 1;
        Ok(Some(self.current & (1 << self.remaining) != 0))
    }

    pub fn bits_read(&self) -> u64 {
        self.bits_read
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}
