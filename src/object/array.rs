//! Arrays: `{ kind; size; elements[size] }`.
//!
//! The size of an array never changes. Elements are tagged values; a fresh array holds null
//! references until its elements are written.

use super::{ObjectKind, Value, LENGTH_OFFSET, PAYLOAD_OFFSET};
use crate::plan::tracing::{self, CopyContext};
use crate::runtime::Runtime;
use crate::util::constants::BYTES_IN_WORD;
use crate::util::conversions;
use crate::util::memory::LinearMemory;
use crate::util::{Address, ObjectReference, Word};

fn element_address(array: ObjectReference, index: usize) -> Address {
    array.to_raw_address() + PAYLOAD_OFFSET + conversions::words_to_bytes(index)
}

fn debug_assert_array(memory: &LinearMemory, array: ObjectReference) {
    debug_assert_eq!(
        super::kind_of(memory, array),
        Some(ObjectKind::Array),
        "{} is not an array",
        array
    );
}

/// Allocate an array of `size` null elements. Nothing is kept alive across the allocation.
fn alloc_array(runtime: &mut Runtime, size: usize) -> ObjectReference {
    let bytes = super::size_for(ObjectKind::Array, size);
    let addr = runtime.alloc(bytes);
    let memory = runtime.memory_mut();
    super::write_header(memory, addr, ObjectKind::Array);
    memory.store(addr + LENGTH_OFFSET, size as Word);
    ObjectReference::from_raw_address(addr)
}

/// Create an array holding `elements`.
pub fn make_array(runtime: &mut Runtime, elements: &[Value]) -> ObjectReference {
    let frame = runtime.enter_frame();
    let slots: Vec<_> = elements.iter().map(|v| runtime.push_root(*v)).collect();
    let array = alloc_array(runtime, elements.len());
    for (index, slot) in slots.into_iter().enumerate() {
        let value = runtime.root(slot);
        array_set(runtime.memory_mut(), array, index, value);
    }
    runtime.leave_frame(frame);
    array
}

/// Create an array of `size` elements, all set to `value`.
pub fn make_array_filled(runtime: &mut Runtime, size: usize, value: Value) -> ObjectReference {
    let frame = runtime.enter_frame();
    let slot = runtime.push_root(value);
    let array = alloc_array(runtime, size);
    let value = runtime.root(slot);
    runtime.leave_frame(frame);
    runtime.memory_mut().fill(
        element_address(array, 0),
        conversions::words_to_bytes(size),
        value.encode(),
    );
    array
}

pub fn array_size(memory: &LinearMemory, array: ObjectReference) -> usize {
    debug_assert_array(memory, array);
    super::read_length(memory, array)
}

/// Read an element. Panics if `index` is out of bounds.
pub fn array_get(memory: &LinearMemory, array: ObjectReference, index: usize) -> Value {
    let size = array_size(memory, array);
    assert!(
        index < size,
        "index {} out of bounds for array {} of size {}",
        index,
        array,
        size
    );
    Value::decode(memory.load(element_address(array, index)))
}

/// Write an element. Panics if `index` is out of bounds.
pub fn array_set(memory: &mut LinearMemory, array: ObjectReference, index: usize, value: Value) {
    let size = array_size(memory, array);
    assert!(
        index < size,
        "index {} out of bounds for array {} of size {}",
        index,
        array,
        size
    );
    memory.store(element_address(array, index), value.encode());
}

/// Read all elements.
pub fn array_elements(memory: &LinearMemory, array: ObjectReference) -> Vec<Value> {
    (0..array_size(memory, array))
        .map(|index| Value::decode(memory.load(element_address(array, index))))
        .collect()
}

/// Shallow copy: a new array of the same size holding the same element values.
///
/// Allocating the copy may run a collection that moves `array`, so the source is kept in a root
/// slot across the allocation and read back from it before the elements are copied.
pub fn copy_array(runtime: &mut Runtime, array: ObjectReference) -> ObjectReference {
    let size = array_size(runtime.memory(), array);
    let frame = runtime.enter_frame();
    let slot = runtime.push_root(Value::Object(array));
    let copy = alloc_array(runtime, size);
    let source = match runtime.root(slot).as_object() {
        Some(source) => source,
        None => unreachable!("the root slot of the source array was cleared"),
    };
    runtime.leave_frame(frame);
    debug_assert_eq!(array_size(runtime.memory(), source), size);
    runtime.memory_mut().copy(
        element_address(source, 0),
        element_address(copy, 0),
        conversions::words_to_bytes(size),
    );
    copy
}

/// Phase A for arrays: copy the header and the raw elements into to-space and forward the
/// original. The elements of the copy still point into from-space.
pub(crate) fn gc_copy_array<C: CopyContext>(
    context: &mut C,
    array: ObjectReference,
) -> ObjectReference {
    let bytes = super::size_for(
        ObjectKind::Array,
        super::read_length(context.memory(), array),
    );
    super::gc_copy_verbatim(context, array, ObjectKind::Array, bytes)
}

/// Phase B for one array in to-space: relocate what each element references, copying it first
/// if needed, and update the element. Returns the address just past the array.
pub(crate) fn gc_copy_array_elements<C: CopyContext>(
    context: &mut C,
    array: ObjectReference,
) -> Address {
    let size = super::read_length(context.memory(), array);
    let mut slot = element_address(array, 0);
    let end = element_address(array, size);
    while slot < end {
        tracing::trace_slot(context, slot);
        slot += BYTES_IN_WORD;
    }
    array.to_raw_address() + super::size_for(ObjectKind::Array, size)
}
