//! Strings and symbols: `{ kind; length; bytes[length] }`, padded to a whole word.
//!
//! Strings are heap objects. Symbols have the same layout but live in static data, written once
//! by [`crate::util::static_data::StaticData`], and are never moved.

use super::{ObjectKind, LENGTH_OFFSET, PAYLOAD_OFFSET};
use crate::plan::tracing::CopyContext;
use crate::runtime::Runtime;
use crate::util::memory::LinearMemory;
use crate::util::{Address, ObjectReference, Word};

/// Write a string-shaped object of `kind` at `addr`. The block must be large enough.
pub(crate) fn write_string_object(
    memory: &mut LinearMemory,
    addr: Address,
    kind: ObjectKind,
    bytes: &[u8],
) {
    debug_assert!(matches!(kind, ObjectKind::String | ObjectKind::Symbol));
    super::write_header(memory, addr, kind);
    memory.store(addr + LENGTH_OFFSET, bytes.len() as Word);
    memory
        .bytes_mut(addr + PAYLOAD_OFFSET, bytes.len())
        .copy_from_slice(bytes);
}

/// Create a string holding `bytes`.
pub fn make_string(runtime: &mut Runtime, bytes: &[u8]) -> ObjectReference {
    let addr = runtime.alloc(super::size_for(ObjectKind::String, bytes.len()));
    write_string_object(runtime.memory_mut(), addr, ObjectKind::String, bytes);
    ObjectReference::from_raw_address(addr)
}

/// The length in bytes of a string or symbol.
pub fn string_len(memory: &LinearMemory, object: ObjectReference) -> usize {
    debug_assert!(matches!(
        super::kind_of(memory, object),
        Some(ObjectKind::String | ObjectKind::Symbol)
    ));
    super::read_length(memory, object)
}

/// The bytes of a string or symbol.
pub fn string_bytes(memory: &LinearMemory, object: ObjectReference) -> &[u8] {
    let len = string_len(memory, object);
    memory.bytes(object.to_raw_address() + PAYLOAD_OFFSET, len)
}

/// Copy a string. The source is kept in a root slot across the allocation.
pub fn copy_string(runtime: &mut Runtime, string: ObjectReference) -> ObjectReference {
    let len = string_len(runtime.memory(), string);
    let frame = runtime.enter_frame();
    let slot = runtime.push_root(string.into());
    let addr = runtime.alloc(super::size_for(ObjectKind::String, len));
    let source = match runtime.root(slot).as_object() {
        Some(source) => source,
        None => unreachable!("the root slot of the source string was cleared"),
    };
    runtime.leave_frame(frame);
    let memory = runtime.memory_mut();
    super::write_header(memory, addr, ObjectKind::String);
    memory.store(addr + LENGTH_OFFSET, len as Word);
    let padded = super::size_for(ObjectKind::String, len) - PAYLOAD_OFFSET;
    memory.copy(
        source.to_raw_address() + PAYLOAD_OFFSET,
        addr + PAYLOAD_OFFSET,
        padded,
    );
    ObjectReference::from_raw_address(addr)
}

/// Do two strings or symbols hold the same bytes?
pub fn string_equal(memory: &LinearMemory, a: ObjectReference, b: ObjectReference) -> bool {
    string_bytes(memory, a) == string_bytes(memory, b)
}

pub(crate) fn gc_copy_string<C: CopyContext>(
    context: &mut C,
    string: ObjectReference,
) -> ObjectReference {
    let bytes = super::size_for(
        ObjectKind::String,
        super::read_length(context.memory(), string),
    );
    super::gc_copy_verbatim(context, string, ObjectKind::String, bytes)
}
