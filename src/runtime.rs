use crate::object::Value;
use crate::plan::SemiSpace;
use crate::util::alloc::allocator::out_of_memory;
use crate::util::alloc::{AllocationError, BumpAllocator};
use crate::util::constants::*;
use crate::util::conversions;
use crate::util::memory::LinearMemory;
use crate::util::options::Options;
use crate::util::shadow_stack::{RootSlot, ShadowStack, StackMark};
use crate::util::statistics::GcStats;
use crate::util::{Address, ObjectReference};

/// Runtime builder. This is used to set options and other settings before actually creating a
/// runtime instance.
pub struct RuntimeBuilder {
    /// The options for this instance.
    pub options: Options,
}

impl RuntimeBuilder {
    /// Create a runtime builder with default options, overridden by `TAGHEAP_*` environment
    /// variables.
    pub fn new() -> Self {
        RuntimeBuilder {
            options: Options::default(),
        }
    }

    /// Create a runtime builder with default options, ignoring environment variables.
    pub fn new_no_env_vars() -> Self {
        RuntimeBuilder {
            options: Options::new_with_defaults(),
        }
    }

    /// Set an option.
    pub fn set_option(&mut self, name: &str, val: &str) -> bool {
        self.options.set_from_str(name, val)
    }

    /// Set multiple options by a string. The string should be key-value pairs separated by white
    /// spaces, such as `stress_factor=4096 zero_on_release=true`.
    pub fn set_options_bulk_by_str(&mut self, options: &str) -> bool {
        self.options.set_bulk_from_str(options)
    }

    /// Build a runtime on top of `memory`.
    ///
    /// The shadow stack grows down from `stack_base`. The heap starts at `heap_base`, which must
    /// not be below the stack base, and `heap_size` bytes are split into the two semispaces. The
    /// memory is grown to hold both of them.
    pub fn build(
        &self,
        mut memory: LinearMemory,
        stack_base: Address,
        heap_base: Address,
        heap_size: usize,
    ) -> Runtime {
        assert!(
            stack_base.is_aligned_to(BYTES_IN_WORD) && heap_base.is_aligned_to(BYTES_IN_WORD),
            "stack base {} and heap base {} must be word aligned",
            stack_base,
            heap_base
        );
        assert!(
            heap_base >= stack_base,
            "heap base {} is below the stack base {}",
            heap_base,
            stack_base
        );
        assert!(
            heap_base.as_usize() >= RESERVED_LOW_BYTES,
            "heap base {} overlaps the reserved bytes at address zero",
            heap_base
        );
        memory.limit_max_pages(self.options.max_memory_pages);

        let semispace_bytes = conversions::raw_align_down(heap_size / 2, BYTES_IN_WORD);
        let heap_end = heap_base
            .checked_add(2 * semispace_bytes)
            .unwrap_or_else(|| {
                out_of_memory(AllocationError::HeapOutOfMemory {
                    requested: heap_size,
                })
            });
        if let Err(e) = memory.ensure(heap_end) {
            out_of_memory(e.into());
        }

        let plan = SemiSpace::new(heap_base, semispace_bytes);
        let mut allocator = BumpAllocator::new();
        allocator.set_limit(plan.tospace().start(), plan.tospace().end());
        let stack = ShadowStack::new(stack_base, self.options.stack_size);
        info!(
            "Initialized runtime: stack [{}, {}), two semispaces of {} bytes from {}, {} pages of memory",
            stack.limit(),
            stack.base(),
            semispace_bytes,
            heap_base,
            memory.size_in_pages()
        );
        Runtime {
            memory,
            stack,
            plan,
            allocator,
            options: self.options.clone(),
            stats: GcStats::default(),
            allocation_bytes: 0,
        }
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The state of one runtime: its linear memory, the shadow stack, and the heap.
///
/// Every operation that can allocate takes `&mut Runtime`, and any allocation may run a
/// collection that moves objects. A reference that must survive an allocation has to be kept in
/// a root slot ([`Runtime::push_root`]) and read back from it afterwards.
pub struct Runtime {
    memory: LinearMemory,
    stack: ShadowStack,
    plan: SemiSpace,
    allocator: BumpAllocator,
    options: Options,
    stats: GcStats,
    /// Bytes allocated since the last collection, for stress collection.
    allocation_bytes: usize,
}

impl Runtime {
    pub fn memory(&self) -> &LinearMemory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut LinearMemory {
        &mut self.memory
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn stats(&self) -> &GcStats {
        &self.stats
    }

    pub fn plan(&self) -> &SemiSpace {
        &self.plan
    }

    pub fn stack(&self) -> &ShadowStack {
        &self.stack
    }

    /// Allocate a zeroed block of at least `size` bytes. This may run a collection, and if the
    /// collection does not free enough space, grow the heap. Running out of host memory is fatal.
    pub fn alloc(&mut self, size: usize) -> Address {
        if size > Address::MAX.as_usize() {
            out_of_memory(AllocationError::HeapOutOfMemory { requested: size });
        }
        let bytes = conversions::object_size_up(size);

        self.allocation_bytes += bytes;
        if self.options.is_stress_test_gc_enabled()
            && self.allocation_bytes > self.options.stress_factor
        {
            trace!(
                "Stress GC: {} bytes allocated since the last collection",
                self.allocation_bytes
            );
            self.collect();
            self.allocation_bytes = bytes;
        }

        if let Some(addr) = self.try_alloc(bytes) {
            return addr;
        }
        trace!("Active semispace is full, collecting");
        self.collect();
        self.allocation_bytes = bytes;
        if let Some(addr) = self.try_alloc(bytes) {
            return addr;
        }

        if let Err(e) = self.grow_heap(bytes) {
            out_of_memory(e);
        }
        match self.try_alloc(bytes) {
            Some(addr) => addr,
            None => out_of_memory(AllocationError::HeapOutOfMemory { requested: size }),
        }
    }

    fn try_alloc(&mut self, bytes: usize) -> Option<Address> {
        let addr = self.allocator.alloc(bytes)?;
        self.memory.zero(addr, bytes);
        self.plan.vo_bits_mut().set(addr);
        self.stats.record_alloc(bytes);
        Some(addr)
    }

    fn grow_heap(&mut self, bytes: usize) -> Result<(), AllocationError> {
        let required = self.used_bytes() + bytes;
        self.plan
            .grow(&mut self.memory, required, self.options.min_growth_bytes)?;
        self.allocator.extend_limit(self.plan.tospace().end());
        self.stats.record_growth();
        Ok(())
    }

    /// Run a full collection now.
    pub fn collect(&mut self) {
        let cursor = self.plan.collect(
            &mut self.memory,
            self.stack.slots(),
            &mut self.stats,
            self.options.zero_on_release,
        );
        self.allocator
            .set_limit(cursor, self.plan.tospace().end());
        self.allocation_bytes = 0;
    }

    /// The capacity of the active semispace.
    pub fn heap_capacity(&self) -> usize {
        self.plan.tospace().extent()
    }

    /// Bytes allocated in the active semispace.
    pub fn used_bytes(&self) -> usize {
        self.allocator.cursor() - self.plan.tospace().start()
    }

    /// Bytes left in the active semispace before the next collection.
    pub fn free_bytes(&self) -> usize {
        self.allocator.remaining()
    }

    /// Is `addr` inside the active semispace?
    pub fn is_in_heap(&self, addr: Address) -> bool {
        self.plan.tospace().contains(addr)
    }

    /// Is `object` an object allocated in the active semispace?
    pub fn is_live_object(&self, object: ObjectReference) -> bool {
        self.plan.is_live_object(object, self.allocator.cursor())
    }

    /// Visit every object allocated in the active semispace, in address order.
    pub fn enumerate_objects<F: FnMut(ObjectReference)>(&self, mut f: F) {
        let range = self.plan.tospace().start()..self.allocator.cursor();
        for addr in self.plan.vo_bits().iter_set(range) {
            f(ObjectReference::from_raw_address(addr));
        }
    }

    pub fn enter_frame(&self) -> StackMark {
        self.stack.mark()
    }

    /// Pop every root pushed since `mark` was taken.
    pub fn leave_frame(&mut self, mark: StackMark) {
        self.stack.reset(mark)
    }

    /// Push a root. Overflowing the shadow stack is fatal.
    pub fn push_root(&mut self, value: Value) -> RootSlot {
        match self.stack.push(&mut self.memory, value.encode()) {
            Ok(slot) => slot,
            Err(e) => out_of_memory(e),
        }
    }

    pub fn pop_root(&mut self) -> Value {
        Value::decode(self.stack.pop(&self.memory))
    }

    /// Read a root. The value is up to date even if a collection moved the object.
    pub fn root(&self, slot: RootSlot) -> Value {
        Value::decode(self.stack.load(&self.memory, slot))
    }

    pub fn set_root(&mut self, slot: RootSlot, value: Value) {
        self.stack.store(&mut self.memory, slot, value.encode())
    }
}
