//! Allocation.

pub(crate) mod allocator;
pub use allocator::AllocationError;

mod bumpallocator;
pub use bumpallocator::BumpAllocator;
