//! List nodes: `{ kind; head; tail }`. Both slots hold values the collector traces.

use super::{ObjectKind, Value};
use crate::plan::tracing::{self, CopyContext};
use crate::runtime::Runtime;
use crate::util::constants::BYTES_IN_WORD;
use crate::util::memory::LinearMemory;
use crate::util::{Address, ObjectReference};

pub(crate) const HEAD_OFFSET: usize = BYTES_IN_WORD;
pub(crate) const TAIL_OFFSET: usize = 2 * BYTES_IN_WORD;

pub fn make_list_node(runtime: &mut Runtime, head: Value, tail: Value) -> ObjectReference {
    let frame = runtime.enter_frame();
    let head_slot = runtime.push_root(head);
    let tail_slot = runtime.push_root(tail);
    let addr = runtime.alloc(super::size_for(ObjectKind::ListNode, 0));
    let head = runtime.root(head_slot);
    let tail = runtime.root(tail_slot);
    runtime.leave_frame(frame);
    let memory = runtime.memory_mut();
    super::write_header(memory, addr, ObjectKind::ListNode);
    memory.store(addr + HEAD_OFFSET, head.encode());
    memory.store(addr + TAIL_OFFSET, tail.encode());
    ObjectReference::from_raw_address(addr)
}

/// Build a list of `values` ending with the null reference. Returns null for no values.
pub fn make_list(runtime: &mut Runtime, values: &[Value]) -> Value {
    let frame = runtime.enter_frame();
    let slots: Vec<_> = values.iter().map(|v| runtime.push_root(*v)).collect();
    let mut list = Value::NULL;
    for slot in slots.into_iter().rev() {
        let head = runtime.root(slot);
        list = Value::Object(make_list_node(runtime, head, list));
        // The list built so far must survive the next allocation.
        runtime.set_root(slot, list);
    }
    runtime.leave_frame(frame);
    list
}

fn debug_assert_list_node(memory: &LinearMemory, node: ObjectReference) {
    debug_assert_eq!(
        super::kind_of(memory, node),
        Some(ObjectKind::ListNode),
        "{} is not a list node",
        node
    );
}

pub fn list_head(memory: &LinearMemory, node: ObjectReference) -> Value {
    debug_assert_list_node(memory, node);
    Value::decode(memory.load(node.to_raw_address() + HEAD_OFFSET))
}

pub fn list_tail(memory: &LinearMemory, node: ObjectReference) -> Value {
    debug_assert_list_node(memory, node);
    Value::decode(memory.load(node.to_raw_address() + TAIL_OFFSET))
}

pub(crate) fn gc_copy_list_node<C: CopyContext>(
    context: &mut C,
    node: ObjectReference,
) -> ObjectReference {
    super::gc_copy_verbatim(
        context,
        node,
        ObjectKind::ListNode,
        super::size_for(ObjectKind::ListNode, 0),
    )
}

/// Phase B for a list node: relocate the head and the tail. Returns the address past the node.
pub(crate) fn gc_scan_list_node<C: CopyContext>(context: &mut C, node: ObjectReference) -> Address {
    let start = node.to_raw_address();
    tracing::trace_slot(context, start + HEAD_OFFSET);
    tracing::trace_slot(context, start + TAIL_OFFSET);
    start + super::size_for(ObjectKind::ListNode, 0)
}
