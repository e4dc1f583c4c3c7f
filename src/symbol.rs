/// A byte value (0..=255) or the end-of-stream sentinel.
pub type Symbol = u16;

/// Reserved sentinel that terminates every payload. Never a byte value.
pub const PSEUDO_EOF: Symbol = 256;

/// Number of distinct symbols a table can hold: every byte plus the sentinel.
pub const SYMBOL_COUNT: usize = 257;

pub fn from_byte(byte: u8) -> Symbol {
    byte as Symbol
}

/// Returns the byte a symbol stands for, or `None` for the sentinel.
pub fn to_byte(symbol: Symbol) -> Option<u8> {
    u8::try_from(symbol).ok()
}

/// Human readable label used by tree rendering and the CLI.
pub fn label(symbol: Symbol) -> String {
    match to_byte(symbol) {
        None => "EOF".to_string(),
        Some(b) if (0x20..=0x7e).contains(&b) => format!("'{}'", b as char),
        Some(b) => format!("\\x{:02x}", b),
    }
}
