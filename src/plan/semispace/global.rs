use super::gc_work::SSGCWork;
use crate::policy::copyspace::CopySpace;
use crate::util::alloc::AllocationError;
use crate::util::constants::*;
use crate::util::conversions;
use crate::util::memory::LinearMemory;
use crate::util::statistics::GcStats;
use crate::util::vo_bit::VOBitmap;
use crate::util::{Address, ObjectReference};

use std::ops::Range;

/// Two copy spaces of equal size. Between collections the mutator allocates into
/// [`SemiSpace::tospace`]. A collection flips the spaces, evacuates the live objects of the
/// previous to-space (now [`SemiSpace::fromspace`]) and abandons it.
#[derive(Debug)]
pub struct SemiSpace {
    hi: bool,
    copyspace0: CopySpace,
    copyspace1: CopySpace,
    heap_base: Address,
    vo_bits: VOBitmap,
}

impl SemiSpace {
    /// Split `[heap_base, heap_base + 2 * semispace_bytes)` into the two spaces. The lower one
    /// is active first.
    pub fn new(heap_base: Address, semispace_bytes: usize) -> Self {
        debug_assert!(conversions::raw_is_aligned(semispace_bytes, BYTES_IN_WORD));
        let copyspace1_start = heap_base + semispace_bytes;
        SemiSpace {
            hi: false,
            copyspace0: CopySpace::new("copyspace0", false, heap_base, semispace_bytes),
            copyspace1: CopySpace::new("copyspace1", true, copyspace1_start, semispace_bytes),
            heap_base,
            vo_bits: VOBitmap::new((copyspace1_start + semispace_bytes).as_usize()),
        }
    }

    pub fn tospace(&self) -> &CopySpace {
        if self.hi {
            &self.copyspace1
        } else {
            &self.copyspace0
        }
    }

    pub fn fromspace(&self) -> &CopySpace {
        if self.hi {
            &self.copyspace0
        } else {
            &self.copyspace1
        }
    }

    fn spaces_mut(&mut self) -> (&mut CopySpace, &mut CopySpace) {
        if self.hi {
            (&mut self.copyspace1, &mut self.copyspace0)
        } else {
            (&mut self.copyspace0, &mut self.copyspace1)
        }
    }

    pub fn vo_bits(&self) -> &VOBitmap {
        &self.vo_bits
    }

    pub(crate) fn vo_bits_mut(&mut self) -> &mut VOBitmap {
        &mut self.vo_bits
    }

    /// Is `object` the start of an object allocated in the active space, below `cursor`?
    pub fn is_live_object(&self, object: ObjectReference, cursor: Address) -> bool {
        let addr = object.to_raw_address();
        self.tospace().start() <= addr && addr < cursor && self.vo_bits.is_set(addr)
    }

    fn prepare(&mut self) {
        // flip the semi-spaces
        self.hi = !self.hi;
        // prepare each of the collected regions
        let hi = self.hi;
        self.copyspace0.prepare(hi);
        self.copyspace1.prepare(!hi);
    }

    fn release(&mut self, memory: &mut LinearMemory, zero: bool) {
        // release the collected region
        let fromspace = if self.hi {
            &mut self.copyspace0
        } else {
            &mut self.copyspace1
        };
        fromspace.release(memory, &mut self.vo_bits, zero);
    }

    /// Run a full collection. Every word in `roots` is a conservative root; the slots of live
    /// roots are updated in place. Returns the end of the evacuated objects in the new active
    /// space, which is where the mutator continues allocating.
    pub fn collect(
        &mut self,
        memory: &mut LinearMemory,
        roots: Range<Address>,
        stats: &mut GcStats,
        zero_on_release: bool,
    ) -> Address {
        self.prepare();
        let (tospace, fromspace) = if self.hi {
            (&self.copyspace1, &self.copyspace0)
        } else {
            (&self.copyspace0, &self.copyspace1)
        };
        trace!(
            "Collecting {} into {}",
            fromspace.name(),
            tospace.name()
        );
        let tospace_range = tospace.range();
        let mut work = SSGCWork::new(
            memory,
            &mut self.vo_bits,
            fromspace,
            tospace_range.clone(),
            stats,
        );
        work.process_roots(roots);
        work.process_closure(tospace_range.start);
        #[cfg(feature = "extreme_assertions")]
        work.verify(tospace_range.clone());
        let (cursor, root_count) = work.finish();

        self.release(memory, zero_on_release);

        let live_bytes = cursor - tospace_range.start;
        stats.record_collection(root_count, live_bytes);
        info!(
            "End of GC #{}: {} of {} bytes live, {} roots",
            stats.collections,
            live_bytes,
            tospace_range.end - tospace_range.start,
            root_count
        );
        debug!("{}", stats);
        cursor
    }

    /// Enlarge both spaces so that the active space can hold at least `required_bytes`.
    ///
    /// The active space grows in place, keeping its objects where they are. The scratch space
    /// moves to the bottom of the heap if it fits below the active space there, and otherwise
    /// right after it, so the two spaces always have the same size.
    pub fn grow(
        &mut self,
        memory: &mut LinearMemory,
        required_bytes: usize,
        min_growth_bytes: usize,
    ) -> Result<(), AllocationError> {
        let out_of_memory = AllocationError::HeapOutOfMemory {
            requested: required_bytes,
        };
        let active = self.tospace();
        let start = active.start();
        let extent = active.extent();
        let new_extent = (extent * 2)
            .max(required_bytes)
            .max(extent.saturating_add(min_growth_bytes))
            .checked_add(BYTES_IN_WORD - 1)
            .ok_or(out_of_memory)?
            & !(BYTES_IN_WORD - 1);

        let active_end = start.checked_add(new_extent).ok_or(out_of_memory)?;
        let scratch_start = match self.heap_base.checked_add(new_extent) {
            Some(end) if end <= start => self.heap_base,
            _ => active_end,
        };
        let scratch_end = scratch_start
            .checked_add(new_extent)
            .ok_or(out_of_memory)?;
        let heap_end = active_end.max(scratch_end);

        memory.ensure(heap_end)?;
        self.vo_bits.ensure_covers(heap_end.as_usize());
        let (tospace, fromspace) = self.spaces_mut();
        tospace.set_range(start, new_extent);
        fromspace.set_range(scratch_start, new_extent);
        info!(
            "Heap grown: semispaces of {} bytes (was {}), active [{}, {}), scratch [{}, {})",
            new_extent, extent, start, active_end, scratch_start, scratch_end
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(raw: u32) -> Address {
        Address::from_word(raw)
    }

    #[test]
    fn initial_layout() {
        let plan = SemiSpace::new(addr(0x1000), 0x100);
        assert_eq!(plan.tospace().range(), addr(0x1000)..addr(0x1100));
        assert_eq!(plan.fromspace().range(), addr(0x1100)..addr(0x1200));
    }

    #[test]
    fn collection_flips_spaces() {
        let mut memory = LinearMemory::new(1);
        let mut stats = GcStats::default();
        let mut plan = SemiSpace::new(addr(0x1000), 0x100);
        let cursor = plan.collect(&mut memory, addr(0x800)..addr(0x800), &mut stats, false);
        assert_eq!(plan.tospace().range(), addr(0x1100)..addr(0x1200));
        assert_eq!(cursor, addr(0x1100));
        assert!(!plan.fromspace().is_from_space());
        assert_eq!(stats.collections, 1);
        assert_eq!(stats.live_bytes, 0);
    }

    #[test]
    fn grow_from_low_half_moves_scratch_up() {
        let mut memory = LinearMemory::new(1);
        let mut plan = SemiSpace::new(addr(0x1000), 0x100);
        plan.grow(&mut memory, 0x120, 0).unwrap();
        assert_eq!(plan.tospace().range(), addr(0x1000)..addr(0x1200));
        assert_eq!(plan.fromspace().range(), addr(0x1200)..addr(0x1400));
    }

    #[test]
    fn grow_from_high_half_keeps_active_in_place() {
        let mut memory = LinearMemory::new(1);
        let mut stats = GcStats::default();
        let mut plan = SemiSpace::new(addr(0x1000), 0x100);
        plan.collect(&mut memory, addr(0x800)..addr(0x800), &mut stats, false);
        plan.grow(&mut memory, 0x100, 0).unwrap();
        assert_eq!(plan.tospace().range(), addr(0x1100)..addr(0x1300));
        assert_eq!(plan.fromspace().range(), addr(0x1300)..addr(0x1500));
        plan.collect(&mut memory, addr(0x800)..addr(0x800), &mut stats, false);
        assert_eq!(plan.tospace().range(), addr(0x1300)..addr(0x1500));
        plan.grow(&mut memory, 0x300, 0).unwrap();
        assert_eq!(plan.tospace().range(), addr(0x1300)..addr(0x1700));
        assert_eq!(plan.fromspace().range(), addr(0x1700)..addr(0x1b00));
    }

    #[test]
    fn grow_respects_minimum() {
        let mut memory = LinearMemory::new(1);
        let mut plan = SemiSpace::new(addr(0x1000), 0);
        plan.grow(&mut memory, 8, BYTES_IN_PAGE).unwrap();
        assert_eq!(plan.tospace().extent(), BYTES_IN_PAGE);
        assert_eq!(plan.fromspace().extent(), BYTES_IN_PAGE);
        assert!(memory.end() >= plan.fromspace().end());
    }

    #[test]
    fn grow_fails_when_host_refuses() {
        let mut memory = LinearMemory::with_max_pages(1, 1);
        let mut plan = SemiSpace::new(addr(0x1000), 0x100);
        let err = plan.grow(&mut memory, BYTES_IN_PAGE, 0).unwrap_err();
        assert!(matches!(err, AllocationError::MemoryGrowFailed(_)));
        // Nothing moved.
        assert_eq!(plan.tospace().range(), addr(0x1000)..addr(0x1100));
    }
}
