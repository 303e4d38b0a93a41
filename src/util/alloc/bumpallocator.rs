use crate::util::Address;

/// A bump pointer allocator over one contiguous region.
///
/// The mutator uses one to allocate from the active semispace; the collector uses another to copy
/// objects into to-space. The allocator knows nothing about collection: it only answers whether a
/// request fits below its limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BumpAllocator {
    cursor: Address,
    limit: Address,
}

impl BumpAllocator {
    /// An allocator that cannot allocate until its limit is set.
    pub fn new() -> Self {
        BumpAllocator {
            cursor: Address::ZERO,
            limit: Address::ZERO,
        }
    }

    pub fn set_limit(&mut self, cursor: Address, limit: Address) {
        debug_assert!(cursor <= limit);
        self.cursor = cursor;
        self.limit = limit;
    }

    /// Move the limit, for example when the region grows in place.
    pub fn extend_limit(&mut self, limit: Address) {
        debug_assert!(self.cursor <= limit);
        self.limit = limit;
    }

    pub fn cursor(&self) -> Address {
        self.cursor
    }

    pub fn limit(&self) -> Address {
        self.limit
    }

    /// The number of bytes left before the limit.
    pub fn remaining(&self) -> usize {
        self.limit - self.cursor
    }

    /// Bump allocate `size` bytes. `size` must already be rounded to the object granularity.
    /// Returns `None` if the request does not fit.
    pub fn alloc(&mut self, size: usize) -> Option<Address> {
        let result = self.cursor;
        match result.checked_add(size) {
            Some(new_cursor) if new_cursor <= self.limit => {
                self.cursor = new_cursor;
                trace!(
                    "Bump allocation size: {}, result: {}, new_cursor: {}, limit: {}",
                    size,
                    result,
                    self.cursor,
                    self.limit
                );
                Some(result)
            }
            _ => {
                trace!(
                    "Bump allocation of {} bytes does not fit ({} bytes left)",
                    size,
                    self.remaining()
                );
                None
            }
        }
    }
}

impl Default for BumpAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bump_until_full() {
        let mut allocator = BumpAllocator::new();
        assert_eq!(allocator.alloc(8), None);

        let start = Address::from_word(0x100);
        allocator.set_limit(start, start + 24usize);
        assert_eq!(allocator.alloc(8), Some(start));
        assert_eq!(allocator.alloc(12), Some(start + 8usize));
        assert_eq!(allocator.remaining(), 4);
        assert_eq!(allocator.alloc(8), None);
        // A failed request leaves the cursor alone.
        assert_eq!(allocator.cursor(), start + 20usize);

        allocator.extend_limit(start + 32usize);
        assert_eq!(allocator.alloc(8), Some(start + 20usize));
    }

    #[test]
    fn no_wrap_around() {
        let mut allocator = BumpAllocator::new();
        allocator.set_limit(Address::MAX - 8usize, Address::MAX);
        assert_eq!(allocator.alloc(usize::MAX), None);
    }
}
