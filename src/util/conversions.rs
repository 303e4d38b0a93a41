use crate::util::constants::*;
use crate::util::Address;

/* Alignment */

pub fn is_address_aligned(addr: Address) -> bool {
    addr.is_aligned_to(BYTES_IN_ADDRESS)
}

pub const fn raw_align_up(val: usize, align: usize) -> usize {
    // See https://github.com/rust-lang/rust/blob/e620d0f337d0643c757bab791fc7d88d63217704/src/libcore/alloc.rs#L192
    val.wrapping_add(align).wrapping_sub(1) & !align.wrapping_sub(1)
}

pub const fn raw_align_down(val: usize, align: usize) -> usize {
    val & !align.wrapping_sub(1)
}

pub const fn raw_is_aligned(val: usize, align: usize) -> bool {
    val & align.wrapping_sub(1) == 0
}

/// Round an allocation request up to a whole number of words, and to at least the minimal
/// object size.
pub const fn object_size_up(bytes: usize) -> usize {
    let bytes = raw_align_up(bytes, MIN_ALIGNMENT);
    if bytes < MIN_OBJECT_SIZE {
        MIN_OBJECT_SIZE
    } else {
        bytes
    }
}

/* Conversion */

pub fn pages_to_bytes(pages: usize) -> usize {
    pages << LOG_BYTES_IN_PAGE
}

pub fn bytes_to_pages_up(bytes: usize) -> usize {
    (bytes + BYTES_IN_PAGE - 1) >> LOG_BYTES_IN_PAGE
}

pub fn bytes_to_words(bytes: usize) -> usize {
    debug_assert!(raw_is_aligned(bytes, BYTES_IN_WORD));
    bytes >> LOG_BYTES_IN_WORD
}

pub fn words_to_bytes(words: usize) -> usize {
    words << LOG_BYTES_IN_WORD
}
