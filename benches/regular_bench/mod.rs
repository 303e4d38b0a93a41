use criterion::Criterion;

use tagheap::util::memory::LinearMemory;
use tagheap::util::static_data::StaticData;
use tagheap::util::Address;
use tagheap::{Runtime, RuntimeBuilder};

mod alloc;
mod collect;

const STATIC_DATA_START: Address = Address::from_word(0x100);
const STACK_BASE: Address = Address::from_word(0x10000);
const STACK_SIZE: usize = 0x8000;

/// A runtime with a few symbols and a heap of `heap_size` bytes. Environment variables are
/// ignored so that runs are comparable.
fn runtime(heap_size: usize, options: &str) -> (Runtime, StaticData) {
    let mut memory = LinearMemory::new(1);
    let mut static_data = StaticData::new(STATIC_DATA_START);
    for name in ["nil", "red", "green", "blue"] {
        static_data.intern_symbol(&mut memory, name).unwrap();
    }
    let mut builder = RuntimeBuilder::new_no_env_vars();
    assert!(builder.set_option("stack_size", &STACK_SIZE.to_string()));
    assert!(builder.set_options_bulk_by_str(options));
    let runtime = builder.build(memory, STACK_BASE, STACK_BASE, heap_size);
    (runtime, static_data)
}

pub fn bench(c: &mut Criterion) {
    alloc::bench(c);
    collect::bench(c);
}
