//! Utilities used by the rest of the crate.

/// Address and word types.
pub mod address;
/// Allocators and allocation errors.
pub mod alloc;
/// Constants for the 32-bit target.
pub mod constants;
/// Calculation, conversion and rounding for memory related numbers.
pub mod conversions;
/// Logger initialization.
pub mod logger;
/// The linear memory provided by the host.
pub mod memory;
/// Forwarding pointers written during collection.
pub mod object_forwarding;
/// Runtime options.
pub mod options;
/// The shadow stack holding the roots.
pub mod shadow_stack;
/// The static data segment holding interned symbols.
pub mod static_data;
/// Collection statistics.
pub mod statistics;
/// Valid-object bits.
pub mod vo_bit;

/// Test fixtures and helpers.
#[cfg(any(test, feature = "test_private"))]
pub mod test_util;

pub use self::address::Address;
pub use self::address::ObjectReference;
pub use self::address::Word;
