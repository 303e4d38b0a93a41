//! Valid-object bits.
//!
//! One bit per word of linear memory. A bit is set if and only if an object starts at that word
//! in the active semispace (or, during a collection, in from-space or to-space). The collector
//! uses the bits to decide whether a conservative root candidate really points at an object, and
//! to enumerate the objects of a space.

use crate::util::constants::*;
use crate::util::conversions;
use crate::util::Address;

use std::ops::Range;

const LOG_BITS_IN_CELL: usize = 6;
const BITS_IN_CELL: usize = 1 << LOG_BITS_IN_CELL;

/// A bitmap over the words of linear memory.
#[derive(Debug, Default)]
pub struct VOBitmap {
    cells: Vec<u64>,
}

impl VOBitmap {
    /// Create a bitmap covering the first `bytes` bytes of memory.
    pub fn new(bytes: usize) -> Self {
        let mut bitmap = VOBitmap::default();
        bitmap.ensure_covers(bytes);
        bitmap
    }

    /// Extend the bitmap so that it covers the first `bytes` bytes of memory. New bits are clear.
    pub fn ensure_covers(&mut self, bytes: usize) {
        let words = conversions::raw_align_up(bytes, BYTES_IN_WORD) >> LOG_BYTES_IN_WORD;
        let cells = (words + BITS_IN_CELL - 1) >> LOG_BITS_IN_CELL;
        if cells > self.cells.len() {
            self.cells.resize(cells, 0);
        }
    }

    fn locate(addr: Address) -> (usize, u64) {
        debug_assert!(conversions::is_address_aligned(addr));
        let word = addr.as_usize() >> LOG_BYTES_IN_WORD;
        (word >> LOG_BITS_IN_CELL, 1 << (word & (BITS_IN_CELL - 1)))
    }

    pub fn set(&mut self, addr: Address) {
        let (cell, mask) = Self::locate(addr);
        self.cells[cell] |= mask;
    }

    pub fn clear(&mut self, addr: Address) {
        let (cell, mask) = Self::locate(addr);
        self.cells[cell] &= !mask;
    }

    /// Is the bit for `addr` set? Addresses outside the bitmap, or unaligned ones, are never set.
    pub fn is_set(&self, addr: Address) -> bool {
        if !conversions::is_address_aligned(addr) {
            return false;
        }
        let (cell, mask) = Self::locate(addr);
        self.cells.get(cell).is_some_and(|bits| *bits & mask != 0)
    }

    /// Clear every bit in `range`.
    pub fn clear_range(&mut self, range: Range<Address>) {
        let mut addr = range.start;
        while addr < range.end {
            let (cell, _) = Self::locate(addr);
            let cell_start = Address::from_word(
                conversions::words_to_bytes(cell << LOG_BITS_IN_CELL) as crate::util::Word,
            );
            let cell_end = cell_start + conversions::words_to_bytes(BITS_IN_CELL);
            if addr == cell_start && cell_end <= range.end {
                self.cells[cell] = 0;
                addr = cell_end;
            } else {
                self.clear(addr);
                addr += BYTES_IN_WORD;
            }
        }
    }

    /// The addresses of all set bits in `range`, in increasing order.
    pub fn iter_set(&self, range: Range<Address>) -> impl Iterator<Item = Address> + '_ {
        let start = range.start.align_up(BYTES_IN_WORD);
        let end = range.end;
        let first_word = start.as_usize() >> LOG_BYTES_IN_WORD;
        let last_word = end.as_usize() >> LOG_BYTES_IN_WORD;
        (first_word..last_word)
            .filter(move |word| {
                self.cells
                    .get(word >> LOG_BITS_IN_CELL)
                    .is_some_and(|bits| *bits & (1u64 << (word & (BITS_IN_CELL - 1))) != 0)
            })
            .map(|word| Address::from_word(conversions::words_to_bytes(word) as crate::util::Word))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(raw: u32) -> Address {
        Address::from_word(raw)
    }

    #[test]
    fn set_and_clear() {
        let mut bits = VOBitmap::new(BYTES_IN_PAGE);
        assert!(!bits.is_set(addr(0x40)));
        bits.set(addr(0x40));
        assert!(bits.is_set(addr(0x40)));
        assert!(!bits.is_set(addr(0x44)));
        assert!(!bits.is_set(addr(0x41)));
        bits.clear(addr(0x40));
        assert!(!bits.is_set(addr(0x40)));
    }

    #[test]
    fn out_of_range_is_never_set() {
        let bits = VOBitmap::new(64);
        assert!(!bits.is_set(addr(0x1000_0000)));
    }

    #[test]
    fn clear_range_only_touches_range() {
        let mut bits = VOBitmap::new(BYTES_IN_PAGE);
        for raw in (0..0x400).step_by(4) {
            bits.set(addr(raw));
        }
        bits.clear_range(addr(0x8)..addr(0x3f0));
        assert!(bits.is_set(addr(0x4)));
        assert!(!bits.is_set(addr(0x8)));
        assert!(!bits.is_set(addr(0x100)));
        assert!(!bits.is_set(addr(0x3ec)));
        assert!(bits.is_set(addr(0x3f0)));
    }

    #[test]
    fn iterate_in_order() {
        let mut bits = VOBitmap::new(BYTES_IN_PAGE);
        bits.set(addr(0x200));
        bits.set(addr(0x10));
        bits.set(addr(0x104));
        let found: Vec<Address> = bits.iter_set(addr(0x10)..addr(0x200)).collect();
        assert_eq!(found, vec![addr(0x10), addr(0x104)]);
    }
}
