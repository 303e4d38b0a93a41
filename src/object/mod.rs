//! The heap object model.
//!
//! Every heap object starts with a one-word header holding its [`ObjectKind`]. Variable-length
//! kinds keep their length in the second word. Objects are word aligned and at least two words
//! long, so that a forwarding pointer always fits over them (see
//! [`crate::util::object_forwarding`]).
//!
//! | kind       | layout                                  |
//! |------------|-----------------------------------------|
//! | `Array`    | `{ kind; size; elements[size] }`        |
//! | `Symbol`   | `{ kind; length; bytes[length] }`       |
//! | `String`   | `{ kind; length; bytes[length] }`       |
//! | `Integer`  | `{ kind; value }`                       |
//! | `Float`    | `{ kind; bits }`                        |
//! | `Char`     | `{ kind; code_point }`                  |
//! | `ListNode` | `{ kind; head; tail }`                  |

pub mod array;
pub mod boxed;
pub mod equality;
pub mod list;
pub mod string;
pub mod value;

pub use self::value::{Tag, Value};

use crate::plan::tracing::CopyContext;
use crate::util::constants::*;
use crate::util::conversions;
use crate::util::memory::LinearMemory;
use crate::util::object_forwarding;
use crate::util::{Address, ObjectReference, Word};

use std::ops::Range;
use strum_macros::{EnumIter, FromRepr, IntoStaticStr};

/// The kind stored in the header word of every heap object.
#[repr(u32)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, FromRepr, IntoStaticStr, EnumIter, enum_map::Enum,
)]
pub enum ObjectKind {
    Array = 1,
    Symbol = 2,
    String = 3,
    Integer = 4,
    Float = 5,
    Char = 6,
    ListNode = 7,
}

impl ObjectKind {
    /// The header word for this kind.
    pub const fn header(self) -> Word {
        self as Word
    }
}

/// Offset of the header word.
pub const KIND_OFFSET: usize = 0;
/// Offset of the length word of variable-length kinds.
pub const LENGTH_OFFSET: usize = BYTES_IN_WORD;
/// Offset of the first element or byte of variable-length kinds.
pub const PAYLOAD_OFFSET: usize = 2 * BYTES_IN_WORD;

/// Read the kind of an object. Returns `None` if the header is not a valid kind, which is the
/// case for a block that was allocated but not yet initialised, and for a forwarded object.
pub fn kind_of(memory: &LinearMemory, object: ObjectReference) -> Option<ObjectKind> {
    ObjectKind::from_repr(memory.load(object.to_raw_address() + KIND_OFFSET))
}

/// Read the kind of an object that is known to be initialised.
pub(crate) fn expect_kind(memory: &LinearMemory, object: ObjectReference) -> ObjectKind {
    kind_of(memory, object).unwrap_or_else(|| {
        panic!(
            "{} has no valid object header ({:#x})",
            object,
            memory.load(object.to_raw_address())
        )
    })
}

pub(crate) fn write_header(memory: &mut LinearMemory, addr: Address, kind: ObjectKind) {
    memory.store(addr + KIND_OFFSET, kind.header());
}

pub(crate) fn read_length(memory: &LinearMemory, object: ObjectReference) -> usize {
    memory.load(object.to_raw_address() + LENGTH_OFFSET) as usize
}

/// The number of bytes an object of `kind` occupies, given its length word.
pub fn size_for(kind: ObjectKind, length: usize) -> usize {
    let bytes = match kind {
        ObjectKind::Array => PAYLOAD_OFFSET + conversions::words_to_bytes(length),
        ObjectKind::Symbol | ObjectKind::String => PAYLOAD_OFFSET + length,
        ObjectKind::Integer | ObjectKind::Float | ObjectKind::Char => 2 * BYTES_IN_WORD,
        ObjectKind::ListNode => 3 * BYTES_IN_WORD,
    };
    conversions::object_size_up(bytes)
}

/// The number of bytes `object` occupies.
pub fn size_of(memory: &LinearMemory, object: ObjectReference) -> usize {
    let kind = expect_kind(memory, object);
    let length = match kind {
        ObjectKind::Array | ObjectKind::Symbol | ObjectKind::String => read_length(memory, object),
        _ => 0,
    };
    size_for(kind, length)
}

/// The slots of `object` that hold values the collector must trace. Only arrays and list nodes
/// hold references; strings, symbols and boxed scalars hold raw data.
pub fn reference_slots(memory: &LinearMemory, object: ObjectReference) -> Range<Address> {
    let start = object.to_raw_address();
    match expect_kind(memory, object) {
        ObjectKind::Array => {
            let payload = start + PAYLOAD_OFFSET;
            payload..payload + conversions::words_to_bytes(read_length(memory, object))
        }
        ObjectKind::ListNode => start + list::HEAD_OFFSET..start + list::TAIL_OFFSET + BYTES_IN_WORD,
        _ => start..start,
    }
}

/// Copy the whole of `object` into to-space without looking at its contents, and leave a
/// forwarding pointer behind. This is Phase A of relocation for every kind.
pub(crate) fn gc_copy_verbatim<C: CopyContext>(
    context: &mut C,
    object: ObjectReference,
    kind: ObjectKind,
    bytes: usize,
) -> ObjectReference {
    let to = context.alloc_copy(bytes);
    context
        .memory_mut()
        .copy(object.to_raw_address(), to, bytes);
    let new_object = ObjectReference::from_raw_address(to);
    object_forwarding::write_forwarding_pointer(context.memory_mut(), object, new_object);
    context.post_copy(new_object, kind, bytes);
    new_object
}

/// Phase A: copy `object` into to-space and forward it. `object` must not be forwarded yet.
pub(crate) fn copy_object<C: CopyContext>(
    context: &mut C,
    object: ObjectReference,
) -> ObjectReference {
    match expect_kind(context.memory(), object) {
        ObjectKind::Array => array::gc_copy_array(context, object),
        ObjectKind::String => string::gc_copy_string(context, object),
        kind @ (ObjectKind::Integer | ObjectKind::Float | ObjectKind::Char) => {
            boxed::gc_copy_boxed(context, object, kind)
        }
        ObjectKind::ListNode => list::gc_copy_list_node(context, object),
        // Symbols live in static data, never in from-space.
        ObjectKind::Symbol => object,
    }
}

/// Phase B: fix up the references held by the to-space copy `object`. Returns the address just
/// past the object.
pub(crate) fn scan_object<C: CopyContext>(context: &mut C, object: ObjectReference) -> Address {
    match expect_kind(context.memory(), object) {
        ObjectKind::Array => array::gc_copy_array_elements(context, object),
        ObjectKind::ListNode => list::gc_scan_list_node(context, object),
        _ => object.to_raw_address() + size_of(context.memory(), object),
    }
}
