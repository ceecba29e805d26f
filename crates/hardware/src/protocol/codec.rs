//! Field codec.
//!
//! Pure functions that split a command/response word into its four fields and
//! assemble them back. Ranges are inclusive `[high:low]` pairs taken straight from
//! the [`FieldLayout`], so there is no `high + 1` slicing anywhere outside
//! [`FieldRange::width`].
//!
//! Decoding is total: any bit pattern yields a value for every field. Encoding
//! truncates each value to its slot width.

use crate::config::{FieldLayout, FieldRange};

/// The four raw fields of a word, each right-aligned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WordFields {
    /// Opcode bits.
    pub opcode: u64,
    /// Peripheral address.
    pub addr: u64,
    /// Write data (commands) or read data / flags (responses).
    pub data: u64,
    /// Immediate value: step count (commands) or cycle count (responses).
    pub value: u64,
}

impl WordFields {
    /// Returns a copy with every field cut down to its slot width.
    ///
    /// This is exactly what survives a `pack` / `unpack` round trip.
    pub const fn truncated(&self, layout: &FieldLayout) -> Self {
        Self {
            opcode: self.opcode & layout.opcode.mask(),
            addr: self.addr & layout.addr.mask(),
            data: self.data & layout.data.mask(),
            value: self.value & layout.value.mask(),
        }
    }
}

/// Reads the bits of `range` from `word`, right-aligned.
#[inline]
pub const fn extract(word: u64, range: FieldRange) -> u64 {
    match word.checked_shr(range.low) {
        Some(shifted) => shifted & range.mask(),
        None => 0,
    }
}

/// Returns `word` with the bits of `range` replaced by `value`.
///
/// Bits of `value` above the range width are discarded.
#[inline]
pub const fn insert(word: u64, range: FieldRange, value: u64) -> u64 {
    let mask = range.mask();
    let (Some(slot), Some(bits)) = (
        mask.checked_shl(range.low),
        (value & mask).checked_shl(range.low),
    ) else {
        return word;
    };
    (word & !slot) | bits
}

/// Splits a word into its four fields.
pub const fn unpack(word: u64, layout: &FieldLayout) -> WordFields {
    WordFields {
        opcode: extract(word, layout.opcode),
        addr: extract(word, layout.addr),
        data: extract(word, layout.data),
        value: extract(word, layout.value),
    }
}

/// Assembles a word from four fields. Bits outside every field are zero.
pub const fn pack(fields: &WordFields, layout: &FieldLayout) -> u64 {
    let word = insert(0, layout.opcode, fields.opcode);
    let word = insert(word, layout.addr, fields.addr);
    let word = insert(word, layout.data, fields.data);
    insert(word, layout.value, fields.value)
}
