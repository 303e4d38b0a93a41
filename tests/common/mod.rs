// Not every test binary uses every helper.
#![allow(dead_code)]

use tagheap::memory_manager;
use tagheap::util::memory::LinearMemory;
use tagheap::util::static_data::StaticData;
use tagheap::util::{Address, ObjectReference};
use tagheap::{Runtime, RuntimeBuilder};

pub const STATIC_DATA_START: Address = Address::from_word(0x100);
pub const STACK_BASE: Address = Address::from_word(0x8000);
pub const STACK_SIZE: usize = 0x4000;
pub const HEAP_BASE: Address = STACK_BASE;

/// A runtime whose static data segment holds `symbols`.
pub struct TestRuntime {
    pub runtime: Runtime,
    pub static_data: StaticData,
}

impl TestRuntime {
    pub fn new(heap_size: usize, symbols: &[&str], options: &str) -> Self {
        let mut memory = LinearMemory::new(1);
        let mut static_data = StaticData::new(STATIC_DATA_START);
        for name in symbols {
            static_data.intern_symbol(&mut memory, name).unwrap();
        }
        assert!(static_data.end() <= STACK_BASE - STACK_SIZE);

        let mut builder = RuntimeBuilder::new_no_env_vars();
        assert!(memory_manager::process(
            &mut builder,
            "stack_size",
            &STACK_SIZE.to_string()
        ));
        assert!(memory_manager::process_bulk(&mut builder, options));
        let runtime =
            memory_manager::runtime_init(&builder, memory, STACK_BASE, HEAP_BASE, heap_size);
        TestRuntime {
            runtime,
            static_data,
        }
    }

    pub fn symbol(&self, name: &str) -> ObjectReference {
        self.static_data.symbol(name).unwrap()
    }
}
