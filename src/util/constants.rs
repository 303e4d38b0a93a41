/// log2 of the number of bits in a byte
pub const LOG_BITS_IN_BYTE: u8 = 3;

/// log2 of the number of bytes in a kilobyte
pub const LOG_BYTES_IN_KBYTE: u8 = 10;

// The target is a 32-bit linear memory machine regardless of the host we are compiled for.
// Addresses and tagged words are always 32 bits wide.

/// log2 of the number of bytes in an address
pub const LOG_BYTES_IN_ADDRESS: u8 = 2;
/// The number of bytes in an address
pub const BYTES_IN_ADDRESS: usize = 1 << LOG_BYTES_IN_ADDRESS;

/// log2 of the number of bytes in a word
pub const LOG_BYTES_IN_WORD: u8 = LOG_BYTES_IN_ADDRESS;
/// The number of bytes in a word
pub const BYTES_IN_WORD: usize = 1 << LOG_BYTES_IN_WORD;
/// log2 of the number of bits in a word
pub const LOG_BITS_IN_WORD: usize = LOG_BITS_IN_BYTE as usize + LOG_BYTES_IN_WORD as usize;
/// The number of bits in a word
pub const BITS_IN_WORD: usize = 1 << LOG_BITS_IN_WORD;

/// log2 of the number of bytes in a page of linear memory. Memory only grows in whole pages.
pub const LOG_BYTES_IN_PAGE: u8 = 16;
/// The number of bytes in a page of linear memory (64 KiB)
pub const BYTES_IN_PAGE: usize = 1 << LOG_BYTES_IN_PAGE;

/// The largest number of pages a 32-bit linear memory can hold while keeping its end address
/// representable in an [`crate::util::Address`].
pub const MAX_PAGES: usize = (1 << (BITS_IN_WORD - LOG_BYTES_IN_PAGE as usize)) - 1;

/// log2 of the minimal object size in bytes.
/// Every object is at least two words, so a forwarding pointer always fits.
pub const LOG_MIN_OBJECT_SIZE: u8 = LOG_BYTES_IN_WORD + 1;
/// The minimal object size in bytes
pub const MIN_OBJECT_SIZE: usize = 1 << LOG_MIN_OBJECT_SIZE;

/// Objects are word aligned.
pub const MIN_ALIGNMENT: usize = BYTES_IN_WORD;

/// The bytes at the bottom of linear memory which never hold an object, so that address zero can
/// act as the null reference.
pub const RESERVED_LOW_BYTES: usize = MIN_OBJECT_SIZE;

/// Stress collection is disabled unless the option is set.
pub const DEFAULT_STRESS_FACTOR: usize = usize::MAX;

const_assert_eq!(BYTES_IN_WORD, std::mem::size_of::<crate::util::Word>());
const_assert!(MIN_OBJECT_SIZE >= 2 * BYTES_IN_WORD);
