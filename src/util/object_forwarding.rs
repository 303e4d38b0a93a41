//! Forwarding pointers.
//!
//! Once an object in from-space has been copied, its first two words are overwritten: the header
//! word becomes [`FORWARDED`] and the second word holds the address of the to-space copy. Every
//! object is at least two words long, so there is always room for both. The marker is never a
//! valid object kind, so a forwarded object can be recognised from its header alone.
//!
//! Forwarding pointers only exist during a collection. From-space is released, and with it every
//! forwarding pointer, before the collector returns.

use crate::util::constants::BYTES_IN_WORD;
use crate::util::memory::LinearMemory;
use crate::util::{ObjectReference, Word};

/// The header word of a forwarded object.
pub const FORWARDED: Word = 0xFFFF_FFFF;

pub fn is_forwarded(memory: &LinearMemory, object: ObjectReference) -> bool {
    memory.load(object.to_raw_address()) == FORWARDED
}

/// Read the forwarding pointer of a forwarded object.
pub fn read_forwarding_pointer(memory: &LinearMemory, object: ObjectReference) -> ObjectReference {
    debug_assert!(
        is_forwarded(memory, object),
        "{} is not forwarded, cannot read its forwarding pointer",
        object
    );
    ObjectReference::from_raw_address(
        memory.load_address(object.to_raw_address() + BYTES_IN_WORD),
    )
}

/// Overwrite `object` with a forwarding pointer to `new_object`.
pub fn write_forwarding_pointer(
    memory: &mut LinearMemory,
    object: ObjectReference,
    new_object: ObjectReference,
) {
    debug_assert!(
        !is_forwarded(memory, object),
        "{} is already forwarded to {}",
        object,
        read_forwarding_pointer(memory, object)
    );
    trace!("Forwarding {} to {}", object, new_object);
    memory.store(object.to_raw_address(), FORWARDED);
    memory.store(object.to_raw_address() + BYTES_IN_WORD, new_object.value());
}

/// If `object` has already been copied, return its copy.
pub fn get_forwarded_object(
    memory: &LinearMemory,
    object: ObjectReference,
) -> Option<ObjectReference> {
    is_forwarded(memory, object).then(|| read_forwarding_pointer(memory, object))
}
