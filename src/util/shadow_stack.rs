//! The shadow stack: the part of the native stack that holds the references of the program.
//!
//! The stack lives in linear memory and grows down from the stack base. Generated code spills
//! every reference it needs to keep across an allocation into a slot of the stack, and reads it
//! back from that slot afterwards, because the collector may have moved the object and rewritten
//! the slot. The collector treats every word in `[sp, base)` as a root candidate.

use crate::util::alloc::AllocationError;
use crate::util::constants::*;
use crate::util::memory::LinearMemory;
use crate::util::{Address, Word};

use std::ops::Range;

/// A saved stack pointer. Restoring it pops every slot pushed since.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackMark(Address);

/// The location of one pushed slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RootSlot(Address);

impl RootSlot {
    pub fn address(self) -> Address {
        self.0
    }
}

#[derive(Debug)]
pub struct ShadowStack {
    base: Address,
    limit: Address,
    sp: Address,
}

impl ShadowStack {
    /// A stack of at most `size` bytes below `base`. The stack never reaches into the reserved
    /// bytes at the bottom of memory.
    pub fn new(base: Address, size: usize) -> Self {
        debug_assert!(base.is_aligned_to(BYTES_IN_WORD));
        let limit = base
            .saturating_sub(size)
            .max(Address::from_word(RESERVED_LOW_BYTES as Word))
            .align_up(BYTES_IN_WORD);
        ShadowStack {
            base,
            limit,
            sp: base,
        }
    }

    pub fn base(&self) -> Address {
        self.base
    }

    pub fn limit(&self) -> Address {
        self.limit
    }

    pub fn sp(&self) -> Address {
        self.sp
    }

    /// The number of words currently on the stack.
    pub fn depth(&self) -> usize {
        (self.base - self.sp) >> LOG_BYTES_IN_WORD
    }

    /// The slots the collector scans.
    pub fn slots(&self) -> Range<Address> {
        self.sp..self.base
    }

    pub fn push(
        &mut self,
        memory: &mut LinearMemory,
        value: Word,
    ) -> Result<RootSlot, AllocationError> {
        if self.sp < self.limit + BYTES_IN_WORD {
            return Err(AllocationError::StackOverflow);
        }
        self.sp -= BYTES_IN_WORD;
        memory.store(self.sp, value);
        Ok(RootSlot(self.sp))
    }

    pub fn pop(&mut self, memory: &LinearMemory) -> Word {
        assert!(self.sp < self.base, "pop from an empty shadow stack");
        let value = memory.load(self.sp);
        self.sp += BYTES_IN_WORD;
        value
    }

    pub fn load(&self, memory: &LinearMemory, slot: RootSlot) -> Word {
        debug_assert!(self.holds(slot), "{:?} is not on the stack", slot);
        memory.load(slot.0)
    }

    pub fn store(&self, memory: &mut LinearMemory, slot: RootSlot, value: Word) {
        debug_assert!(self.holds(slot), "{:?} is not on the stack", slot);
        memory.store(slot.0, value)
    }

    fn holds(&self, slot: RootSlot) -> bool {
        self.slots().contains(&slot.0)
    }

    pub fn mark(&self) -> StackMark {
        StackMark(self.sp)
    }

    /// Pop everything pushed after `mark` was taken.
    pub fn reset(&mut self, mark: StackMark) {
        assert!(
            mark.0 >= self.sp && mark.0 <= self.base,
            "stack mark {} is not below the current frame (sp = {})",
            mark.0,
            self.sp
        );
        self.sp = mark.0;
    }
}
