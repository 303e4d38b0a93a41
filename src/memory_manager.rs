//! Runtime interface toward generated code.
//!
//! Generated code sees every value as a raw 32-bit word. The functions here decode words into
//! [`Value`]s, call into the rest of the crate, and encode the results back. Nothing else in the
//! crate deals in raw words.
//!
//! A typical embedding:
//! 1. Create a [`LinearMemory`] large enough for the static data segment and the shadow stack.
//! 2. Optionally create a [`RuntimeBuilder`] and set options with [`process()`] or
//!    [`process_bulk()`].
//! 3. Create the runtime with [`runtime_init()`] (or [`initialize()`] for the defaults). The
//!    runtime owns the memory from then on.
//! 4. Allocate with [`alloc()`] and keep live references on the shadow stack
//!    ([`Runtime::push_root`]) across anything that may allocate.

use crate::object::array;
use crate::object::equality;
use crate::object::Value;
use crate::util::memory::LinearMemory;
use crate::util::{Address, ObjectReference, Word};
use crate::{Runtime, RuntimeBuilder};

/// Create a runtime from a builder. This attempts to initialize the logger; an embedder that
/// wants its own logger should install it before calling this.
///
/// Arguments:
/// * `builder`: The builder holding the options.
/// * `memory`: The linear memory. The runtime takes ownership and grows it as needed.
/// * `stack_base`: The highest address of the shadow stack. The stack grows down from here.
/// * `heap_base`: The start of the heap. It must not be below `stack_base`.
/// * `heap_size`: The initial size of the heap, split between the two semispaces.
pub fn runtime_init(
    builder: &RuntimeBuilder,
    memory: LinearMemory,
    stack_base: Address,
    heap_base: Address,
    heap_size: usize,
) -> Runtime {
    match crate::util::logger::try_init() {
        Ok(_) => debug!("tagheap initialized the logger."),
        Err(_) => debug!(
            "tagheap failed to initialize the logger. Possibly a logger has been initialized by user."
        ),
    }
    #[cfg(feature = "extreme_assertions")]
    warn!("The feature 'extreme_assertions' is enabled. The heap is verified after every collection. Slow performance should be expected.");
    builder.build(memory, stack_base, heap_base, heap_size)
}

/// Create a runtime with default options, overridden by `TAGHEAP_*` environment variables.
pub fn initialize(
    memory: LinearMemory,
    stack_base: Address,
    heap_base: Address,
    heap_size: usize,
) -> Runtime {
    runtime_init(
        &RuntimeBuilder::new(),
        memory,
        stack_base,
        heap_base,
        heap_size,
    )
}

/// Set an option by name. Returns false if the name is unknown or the value invalid.
pub fn process(builder: &mut RuntimeBuilder, name: &str, value: &str) -> bool {
    builder.set_option(name, value)
}

/// Set multiple options from a string of whitespace separated `key=value` pairs.
pub fn process_bulk(builder: &mut RuntimeBuilder, options: &str) -> bool {
    builder.set_options_bulk_by_str(options)
}

/// Allocate a zeroed block of at least `size` bytes. This may run a collection or grow the heap.
/// Running out of memory is fatal.
pub fn alloc(runtime: &mut Runtime, size: usize) -> Address {
    runtime.alloc(size)
}

/// Run a full collection.
pub fn run_gc(runtime: &mut Runtime) {
    runtime.collect()
}

fn bool_word(b: bool) -> Word {
    Value::from(b).encode()
}

/// Structural equality. Returns a tagged boolean.
pub fn object_eq(runtime: &Runtime, a: Word, b: Word) -> Word {
    bool_word(equality::object_eq(
        runtime.memory(),
        Value::decode(a),
        Value::decode(b),
    ))
}

/// The negation of [`object_eq`]. Returns a tagged boolean.
pub fn object_neq(runtime: &Runtime, a: Word, b: Word) -> Word {
    bool_word(equality::object_neq(
        runtime.memory(),
        Value::decode(a),
        Value::decode(b),
    ))
}

/// Symbol identity. Returns a tagged boolean, false if either word is not a symbol.
pub fn symbol_eq(runtime: &Runtime, a: Word, b: Word) -> Word {
    bool_word(equality::symbol_eq(
        runtime.memory(),
        Value::decode(a),
        Value::decode(b),
    ))
}

/// Shallow copy of an array. The source may move while the copy is allocated; the returned word
/// refers to the new array.
///
/// The word must refer to an array. Anything else is a caller bug.
pub fn copy_array(runtime: &mut Runtime, array: Word) -> Word {
    let source = match Value::decode(array).as_object() {
        Some(object) => object,
        None => panic!("copy_array: {:#x} is not a heap reference", array),
    };
    Value::Object(array::copy_array(runtime, source)).encode()
}

/// Bytes allocated in the active semispace.
pub fn used_bytes(runtime: &Runtime) -> usize {
    runtime.used_bytes()
}

/// Bytes that can be allocated before the next collection.
pub fn free_bytes(runtime: &Runtime) -> usize {
    runtime.free_bytes()
}

/// The capacity of the active semispace.
pub fn total_bytes(runtime: &Runtime) -> usize {
    runtime.heap_capacity()
}

/// Is `addr` inside the active semispace?
pub fn is_in_heap(runtime: &Runtime, addr: Address) -> bool {
    runtime.is_in_heap(addr)
}

/// Visit every object allocated in the active semispace. The closure must not allocate.
pub fn enumerate_objects<F: FnMut(ObjectReference)>(runtime: &Runtime, f: F) {
    runtime.enumerate_objects(f)
}
