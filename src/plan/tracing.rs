//! This module contains code useful for tracing,
//! i.e. visiting the reachable objects by traversing all or part of an object graph.

use crate::object::{ObjectKind, Value};
use crate::util::memory::LinearMemory;
use crate::util::{Address, ObjectReference};

/// This trait is the interface for tracing objects. Given an object, it returns the location the
/// object will have once the collection is over.
pub trait ObjectTracer {
    /// Call this function to trace through an object graph edge which points to `object`.
    ///
    /// The return value is the new object reference for `object` if it is moved, or `object` if
    /// not moved. If moved, the caller should update the slot that holds the reference to
    /// `object` so that it points to the new location.
    fn trace_object(&mut self, object: ObjectReference) -> ObjectReference;
}

/// What the object model needs from the collector while it relocates objects.
pub trait CopyContext: ObjectTracer {
    fn memory(&self) -> &LinearMemory;
    fn memory_mut(&mut self) -> &mut LinearMemory;
    /// Reserve `bytes` bytes in to-space for a copy. Cannot fail: to-space is as large as
    /// from-space.
    fn alloc_copy(&mut self, bytes: usize) -> Address;
    /// Called once the copy of an object is complete.
    fn post_copy(&mut self, new_object: ObjectReference, kind: ObjectKind, bytes: usize);
}

/// Trace the reference held in `slot`, if any, and update the slot with the new location.
pub(crate) fn trace_slot<C: CopyContext>(context: &mut C, slot: Address) {
    let word = context.memory().load(slot);
    if let Some(object) = Value::decode(word).as_object() {
        let new_object = context.trace_object(object);
        if new_object != object {
            context.memory_mut().store(slot, new_object.value());
        }
    }
}
