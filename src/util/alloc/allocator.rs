use crate::util::memory::MemoryGrowError;

use std::fmt;

/// The reasons why the runtime could not satisfy a request for memory. All of them are fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationError {
    /// The heap would need to grow past the 32-bit address space.
    HeapOutOfMemory {
        /// The size of the request that failed, in bytes.
        requested: usize,
    },
    /// The host refused to grow the linear memory.
    MemoryGrowFailed(MemoryGrowError),
    /// The shadow stack ran into its limit.
    StackOverflow,
}

impl fmt::Display for AllocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocationError::HeapOutOfMemory { requested } => {
                write!(f, "heap exhausted while allocating {} bytes", requested)
            }
            AllocationError::MemoryGrowFailed(e) => write!(f, "out of host memory: {}", e),
            AllocationError::StackOverflow => write!(f, "shadow stack overflow"),
        }
    }
}

impl std::error::Error for AllocationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AllocationError::MemoryGrowFailed(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MemoryGrowError> for AllocationError {
    fn from(e: MemoryGrowError) -> Self {
        AllocationError::MemoryGrowFailed(e)
    }
}

/// Report a fatal memory error. There is no way to continue after running out of memory.
#[cold]
pub fn out_of_memory(err: AllocationError) -> ! {
    error!("Out of memory: {}", err);
    panic!("Out of memory with {:?}!", err);
}
