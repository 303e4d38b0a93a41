//! The garbage collection plan.
//!
//! A plan decides how the heap is divided into spaces and what a collection does with them. The
//! runtime uses a single plan, [`semispace::SemiSpace`]: two copy spaces of equal size, one of
//! which is evacuated into the other on every collection.

pub mod semispace;
pub mod tracing;

pub use self::semispace::SemiSpace;
