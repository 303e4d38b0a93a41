use crate::object;
use crate::plan::tracing::CopyContext;
use crate::util::memory::LinearMemory;
use crate::util::object_forwarding;
use crate::util::vo_bit::VOBitmap;
use crate::util::{Address, ObjectReference};

use std::ops::Range;

/// A contiguous region whose live objects are evacuated when it is collected.
#[derive(Debug)]
pub struct CopySpace {
    name: &'static str,
    start: Address,
    extent: usize,
    from_space: bool,
}

impl CopySpace {
    pub fn new(name: &'static str, from_space: bool, start: Address, extent: usize) -> Self {
        CopySpace {
            name,
            start,
            extent,
            from_space,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn start(&self) -> Address {
        self.start
    }

    pub fn end(&self) -> Address {
        self.start + self.extent
    }

    pub fn extent(&self) -> usize {
        self.extent
    }

    pub fn range(&self) -> Range<Address> {
        self.start..self.end()
    }

    pub fn contains(&self, addr: Address) -> bool {
        self.range().contains(&addr)
    }

    /// Move the space. Only legal while the space holds no live objects, or, for growing the
    /// active space in place, when `start` stays the same.
    pub(crate) fn set_range(&mut self, start: Address, extent: usize) {
        debug!(
            "{}: [{}, {}) -> [{}, {})",
            self.name,
            self.start,
            self.end(),
            start,
            start + extent
        );
        self.start = start;
        self.extent = extent;
    }

    pub fn prepare(&mut self, from_space: bool) {
        self.from_space = from_space;
    }

    /// Abandon every object in the space. The valid-object bits of the space are cleared, and
    /// with `zero` set, so is the memory.
    pub fn release(&mut self, memory: &mut LinearMemory, vo_bits: &mut VOBitmap, zero: bool) {
        vo_bits.clear_range(self.range());
        if zero {
            memory.zero(self.start, self.extent);
        }
        self.from_space = false;
    }

    pub fn is_from_space(&self) -> bool {
        self.from_space
    }

    /// Return the to-space location of `object`, copying it first if this is the first time it
    /// is reached in this collection. Objects outside from-space are returned as they are.
    pub fn trace_object<C: CopyContext>(
        &self,
        context: &mut C,
        object: ObjectReference,
    ) -> ObjectReference {
        if !self.from_space || !self.contains(object.to_raw_address()) {
            return object;
        }
        if let Some(new_object) = object_forwarding::get_forwarded_object(context.memory(), object)
        {
            trace!("{}: {} already forwarded to {}", self.name, object, new_object);
            return new_object;
        }
        let new_object = object::copy_object(context, object);
        trace!("{}: copying [{} -> {}]", self.name, object, new_object);
        new_object
    }
}
