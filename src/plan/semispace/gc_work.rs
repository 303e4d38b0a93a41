use crate::object::{self, ObjectKind, Value};
use crate::plan::tracing::{CopyContext, ObjectTracer};
use crate::policy::copyspace::CopySpace;
use crate::util::alloc::BumpAllocator;
use crate::util::constants::BYTES_IN_WORD;
use crate::util::memory::LinearMemory;
use crate::util::object_forwarding;
use crate::util::statistics::GcStats;
use crate::util::vo_bit::VOBitmap;
use crate::util::{Address, ObjectReference};

use std::ops::Range;

/// The state of one semispace collection: root scanning, then the Cheney closure over to-space.
pub(super) struct SSGCWork<'a> {
    memory: &'a mut LinearMemory,
    vo_bits: &'a mut VOBitmap,
    fromspace: &'a CopySpace,
    tospace_start: Address,
    copy: BumpAllocator,
    stats: &'a mut GcStats,
    roots: usize,
}

impl<'a> SSGCWork<'a> {
    pub fn new(
        memory: &'a mut LinearMemory,
        vo_bits: &'a mut VOBitmap,
        fromspace: &'a CopySpace,
        tospace: Range<Address>,
        stats: &'a mut GcStats,
    ) -> Self {
        let mut copy = BumpAllocator::new();
        copy.set_limit(tospace.start, tospace.end);
        SSGCWork {
            memory,
            vo_bits,
            fromspace,
            tospace_start: tospace.start,
            copy,
            stats,
            roots: 0,
        }
    }

    /// Is `addr` the start of an object this collection has already copied?
    fn is_copied_object(&self, addr: Address) -> bool {
        self.tospace_start <= addr && addr < self.copy.cursor() && self.vo_bits.is_set(addr)
    }

    /// Accept a stack word as a root only if it is tagged as a pointer, points into from-space,
    /// and points at the start of an object that has been initialised. A forwarded candidate
    /// must forward to an object already copied into to-space; a raw block that happens to
    /// start with the forwarding marker is not a root.
    fn root_candidate(&self, word: crate::util::Word) -> Option<ObjectReference> {
        let object = Value::decode(word).as_object()?;
        let addr = object.to_raw_address();
        if !self.fromspace.contains(addr) || !self.vo_bits.is_set(addr) {
            return None;
        }
        if object_forwarding::is_forwarded(&*self.memory, object) {
            let target = self.memory.load_address(addr + BYTES_IN_WORD);
            if !self.is_copied_object(target) {
                trace!(
                    "Root candidate {} carries the forwarding marker but {} is not a copy",
                    object,
                    target
                );
                return None;
            }
        } else if object::kind_of(&*self.memory, object).is_none() {
            trace!("Root candidate {} is an uninitialised block", object);
            return None;
        }
        Some(object)
    }

    /// Scan every word in `slots` conservatively, evacuating the objects the roots point at and
    /// updating the root slots.
    pub fn process_roots(&mut self, slots: Range<Address>) {
        let mut candidates = 0;
        let mut slot = slots.start;
        while slot < slots.end {
            candidates += 1;
            let word = self.memory.load(slot);
            if let Some(object) = self.root_candidate(word) {
                let new_object = self.trace_object(object);
                self.memory.store(slot, new_object.value());
                self.roots += 1;
            }
            slot += BYTES_IN_WORD;
        }
        debug!(
            "Scanned {} root candidates in [{}, {}), {} roots",
            candidates, slots.start, slots.end, self.roots
        );
    }

    /// Fix up every object copied so far, copying what they reference, until the scan pointer
    /// catches up with the copy cursor.
    pub fn process_closure(&mut self, scan_start: Address) {
        let mut scan = scan_start;
        while scan < self.copy.cursor() {
            scan = object::scan_object(self, ObjectReference::from_raw_address(scan));
        }
        debug_assert_eq!(scan, self.copy.cursor());
    }

    /// Check that no to-space object still references from-space.
    #[cfg(feature = "extreme_assertions")]
    pub fn verify(&self, tospace: Range<Address>) {
        for addr in self.vo_bits.iter_set(tospace) {
            let object = ObjectReference::from_raw_address(addr);
            let mut slot = object::reference_slots(&*self.memory, object);
            while slot.start < slot.end {
                if let Some(target) = Value::decode(self.memory.load(slot.start)).as_object() {
                    assert!(
                        !self.fromspace.contains(target.to_raw_address()),
                        "{} still references {} in {} after the closure",
                        object,
                        target,
                        self.fromspace.name()
                    );
                }
                slot.start += BYTES_IN_WORD;
            }
        }
    }

    /// The end of the copied objects, and the number of roots found.
    pub fn finish(self) -> (Address, usize) {
        (self.copy.cursor(), self.roots)
    }
}

impl ObjectTracer for SSGCWork<'_> {
    fn trace_object(&mut self, object: ObjectReference) -> ObjectReference {
        let fromspace = self.fromspace;
        fromspace.trace_object(self, object)
    }
}

impl CopyContext for SSGCWork<'_> {
    fn memory(&self) -> &LinearMemory {
        &*self.memory
    }

    fn memory_mut(&mut self) -> &mut LinearMemory {
        &mut *self.memory
    }

    fn alloc_copy(&mut self, bytes: usize) -> Address {
        match self.copy.alloc(bytes) {
            Some(addr) => addr,
            None => panic!(
                "to-space exhausted while copying {} bytes ({} bytes left)",
                bytes,
                self.copy.remaining()
            ),
        }
    }

    fn post_copy(&mut self, new_object: ObjectReference, kind: ObjectKind, bytes: usize) {
        self.vo_bits.set(new_object.to_raw_address());
        self.stats.record_copy(kind, bytes);
    }
}
