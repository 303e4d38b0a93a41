// Not every test uses every fixture.
#![allow(dead_code)]

use crate::runtime::{Runtime, RuntimeBuilder};
use crate::util::memory::LinearMemory;
use crate::util::static_data::StaticData;
use crate::util::{Address, ObjectReference};

/// Where the static data segment starts.
pub const STATIC_DATA_START: Address = Address::from_word(0x10);
/// The shadow stack grows down from here.
pub const STACK_BASE: Address = Address::from_word(0x4000);
/// Bytes reserved for the shadow stack. Static data must end below `STACK_BASE - STACK_SIZE`.
pub const STACK_SIZE: usize = 0x2000;
/// The heap starts right above the stack.
pub const HEAP_BASE: Address = STACK_BASE;

/// The symbols every fixture interns.
pub const SYMBOL_NAMES: [&str; 4] = ["nil", "foo", "bar", "a-much-longer-symbol-name"];

/// A runtime with some symbols in static data. Options from the environment are ignored, so
/// that tests setting `TAGHEAP_*` variables do not leak into other tests.
pub struct RuntimeFixture {
    pub runtime: Runtime,
    pub static_data: StaticData,
}

impl RuntimeFixture {
    pub fn with_heap(heap_size: usize) -> Self {
        Self::with_options(heap_size, "")
    }

    /// `options` are whitespace separated `key=value` pairs.
    pub fn with_options(heap_size: usize, options: &str) -> Self {
        let mut memory = LinearMemory::new(1);
        let mut static_data = StaticData::new(STATIC_DATA_START);
        for name in SYMBOL_NAMES {
            static_data.intern_symbol(&mut memory, name).unwrap();
        }
        assert!(static_data.end() <= STACK_BASE - STACK_SIZE);

        let mut builder = RuntimeBuilder::new_no_env_vars();
        assert!(builder.set_option("stack_size", &STACK_SIZE.to_string()));
        assert!(builder.set_options_bulk_by_str(options));
        let runtime = builder.build(memory, STACK_BASE, HEAP_BASE, heap_size);
        RuntimeFixture {
            runtime,
            static_data,
        }
    }

    pub fn symbol(&self, name: &str) -> ObjectReference {
        self.static_data.symbol(name).unwrap()
    }
}
