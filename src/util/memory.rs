//! The linear memory supplied by the hosting environment.
//!
//! A [`LinearMemory`] behaves like a wasm32 memory instance: it is byte addressable, starts at
//! address zero, and can only grow, one 64 KiB page at a time, up to a maximum. The runtime places
//! its static data, its native stack and its heap in this memory.

use crate::util::constants::*;
use crate::util::conversions;
use crate::util::{Address, Word};

use std::fmt;

/// The host refused to grow the linear memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryGrowError {
    /// The requested size is larger than the maximum the memory was created with.
    ExceedsMaximum {
        /// The number of pages the memory would have had after growing.
        requested_pages: usize,
        /// The maximum number of pages.
        max_pages: usize,
    },
}

impl fmt::Display for MemoryGrowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryGrowError::ExceedsMaximum {
                requested_pages,
                max_pages,
            } => write!(
                f,
                "cannot grow linear memory to {} pages (maximum {} pages)",
                requested_pages, max_pages
            ),
        }
    }
}

impl std::error::Error for MemoryGrowError {}

/// A growable, zero-initialised, word-backed linear memory.
pub struct LinearMemory {
    words: Vec<Word>,
    max_pages: usize,
}

impl LinearMemory {
    /// Create a memory of `initial_pages` pages that may grow up to the 32-bit limit.
    pub fn new(initial_pages: usize) -> Self {
        Self::with_max_pages(initial_pages, MAX_PAGES)
    }

    /// Create a memory of `initial_pages` pages that may grow up to `max_pages` pages.
    pub fn with_max_pages(initial_pages: usize, max_pages: usize) -> Self {
        let max_pages = max_pages.min(MAX_PAGES);
        assert!(
            initial_pages <= max_pages,
            "initial size ({} pages) exceeds the maximum ({} pages)",
            initial_pages,
            max_pages
        );
        LinearMemory {
            words: vec![0; conversions::pages_to_bytes(initial_pages) >> LOG_BYTES_IN_WORD],
            max_pages,
        }
    }

    pub fn size_in_pages(&self) -> usize {
        self.size_in_bytes() >> LOG_BYTES_IN_PAGE
    }

    pub fn size_in_bytes(&self) -> usize {
        conversions::words_to_bytes(self.words.len())
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    /// Lower the maximum size. The maximum can never drop below the current size.
    pub fn limit_max_pages(&mut self, max_pages: usize) {
        self.max_pages = max_pages.clamp(self.size_in_pages(), self.max_pages);
    }

    /// The first address past the end of the memory.
    pub fn end(&self) -> Address {
        Address::from_word(self.size_in_bytes() as Word)
    }

    /// Does `[start, start + bytes)` lie inside the memory?
    pub fn contains_range(&self, start: Address, bytes: usize) -> bool {
        start
            .checked_add(bytes)
            .is_some_and(|end| end <= self.end())
    }

    /// Grow the memory by `delta_pages` pages. Returns the previous size in pages.
    /// New pages are zeroed.
    pub fn grow(&mut self, delta_pages: usize) -> Result<usize, MemoryGrowError> {
        let old_pages = self.size_in_pages();
        let requested_pages = old_pages + delta_pages;
        if requested_pages > self.max_pages {
            return Err(MemoryGrowError::ExceedsMaximum {
                requested_pages,
                max_pages: self.max_pages,
            });
        }
        self.words.resize(
            conversions::pages_to_bytes(requested_pages) >> LOG_BYTES_IN_WORD,
            0,
        );
        debug!(
            "Linear memory grew from {} to {} pages",
            old_pages, requested_pages
        );
        Ok(old_pages)
    }

    /// Grow the memory, if needed, so that `end` is not past the end of the memory.
    pub fn ensure(&mut self, end: Address) -> Result<(), MemoryGrowError> {
        if end <= self.end() {
            return Ok(());
        }
        let needed = conversions::bytes_to_pages_up(end.as_usize()) - self.size_in_pages();
        self.grow(needed).map(|_| ())
    }

    fn word_index(addr: Address) -> usize {
        debug_assert!(
            conversions::is_address_aligned(addr),
            "unaligned word access at {}",
            addr
        );
        addr.as_usize() >> LOG_BYTES_IN_WORD
    }

    /// Load a word.
    pub fn load(&self, addr: Address) -> Word {
        self.words[Self::word_index(addr)]
    }

    /// Store a word.
    pub fn store(&mut self, addr: Address, value: Word) {
        let index = Self::word_index(addr);
        self.words[index] = value;
    }

    /// Load the address stored at `addr`.
    pub fn load_address(&self, addr: Address) -> Address {
        Address::from_word(self.load(addr))
    }

    /// A byte view of `[start, start + len)`.
    pub fn bytes(&self, start: Address, len: usize) -> &[u8] {
        let bytes: &[u8] = bytemuck::cast_slice(&self.words);
        &bytes[start.as_usize()..start.as_usize() + len]
    }

    /// A mutable byte view of `[start, start + len)`.
    pub fn bytes_mut(&mut self, start: Address, len: usize) -> &mut [u8] {
        let bytes: &mut [u8] = bytemuck::cast_slice_mut(&mut self.words);
        &mut bytes[start.as_usize()..start.as_usize() + len]
    }

    /// Copy `bytes` bytes (a whole number of words) from `src` to `dst`. The regions may overlap.
    pub fn copy(&mut self, src: Address, dst: Address, bytes: usize) {
        let words = conversions::bytes_to_words(bytes);
        let from = Self::word_index(src);
        let to = Self::word_index(dst);
        self.words.copy_within(from..from + words, to);
    }

    /// Fill `bytes` bytes (a whole number of words) starting at `start` with `value`.
    pub fn fill(&mut self, start: Address, bytes: usize, value: Word) {
        let words = conversions::bytes_to_words(bytes);
        let from = Self::word_index(start);
        self.words[from..from + words].fill(value);
    }

    /// Zero `bytes` bytes (a whole number of words) starting at `start`.
    pub fn zero(&mut self, start: Address, bytes: usize) {
        self.fill(start, bytes, 0)
    }
}

impl fmt::Debug for LinearMemory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinearMemory")
            .field("pages", &self.size_in_pages())
            .field("max_pages", &self.max_pages)
            .finish()
    }
}
