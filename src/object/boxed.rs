//! Boxed scalars: `{ kind; payload }`.
//!
//! Integers that do not fit in a 30-bit immediate, single precision floats, and characters are
//! kept in two-word heap objects.

use super::{ObjectKind, Value};
use crate::plan::tracing::CopyContext;
use crate::runtime::Runtime;
use crate::util::constants::BYTES_IN_WORD;
use crate::util::memory::LinearMemory;
use crate::util::{ObjectReference, Word};

const PAYLOAD_OFFSET: usize = BYTES_IN_WORD;

fn make_boxed(runtime: &mut Runtime, kind: ObjectKind, payload: Word) -> ObjectReference {
    let addr = runtime.alloc(super::size_for(kind, 0));
    let memory = runtime.memory_mut();
    super::write_header(memory, addr, kind);
    memory.store(addr + PAYLOAD_OFFSET, payload);
    ObjectReference::from_raw_address(addr)
}

fn payload(memory: &LinearMemory, object: ObjectReference, kind: ObjectKind) -> Word {
    debug_assert_eq!(super::kind_of(memory, object), Some(kind));
    memory.load(object.to_raw_address() + PAYLOAD_OFFSET)
}

/// An integer value: an immediate if it fits, a boxed integer otherwise.
pub fn make_integer(runtime: &mut Runtime, value: i32) -> Value {
    match Value::int(value) {
        Some(immediate) => immediate,
        None => Value::Object(make_boxed(runtime, ObjectKind::Integer, value as Word)),
    }
}

pub fn make_float(runtime: &mut Runtime, value: f32) -> ObjectReference {
    make_boxed(runtime, ObjectKind::Float, value.to_bits())
}

pub fn make_char(runtime: &mut Runtime, value: char) -> ObjectReference {
    make_boxed(runtime, ObjectKind::Char, value as Word)
}

pub fn integer_value(memory: &LinearMemory, object: ObjectReference) -> i32 {
    payload(memory, object, ObjectKind::Integer) as i32
}

pub fn float_value(memory: &LinearMemory, object: ObjectReference) -> f32 {
    f32::from_bits(payload(memory, object, ObjectKind::Float))
}

pub fn char_value(memory: &LinearMemory, object: ObjectReference) -> char {
    char::from_u32(payload(memory, object, ObjectKind::Char)).unwrap_or(char::REPLACEMENT_CHARACTER)
}

/// The integer held by `value`, whether immediate or boxed.
pub fn as_i32(memory: &LinearMemory, value: Value) -> Option<i32> {
    match value {
        Value::Int(i) => Some(i),
        Value::Object(object) if !object.is_null() => {
            (super::kind_of(memory, object)? == ObjectKind::Integer)
                .then(|| integer_value(memory, object))
        }
        _ => None,
    }
}

pub(crate) fn gc_copy_boxed<C: CopyContext>(
    context: &mut C,
    object: ObjectReference,
    kind: ObjectKind,
) -> ObjectReference {
    super::gc_copy_verbatim(context, object, kind, super::size_for(kind, 0))
}
