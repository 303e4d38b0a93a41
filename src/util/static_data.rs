//! The static data segment.
//!
//! Symbols are constants placed in linear memory before the program runs, one object per
//! distinct name, so that two symbols are the same symbol exactly when they are the same
//! object. [`StaticData`] plays the part of the producer of that segment: it lays out symbol
//! objects from a start address upwards and interns them by name. The segment must end below the
//! shadow stack.

use crate::object::string::write_string_object;
use crate::object::{self, ObjectKind};
use crate::util::constants::*;
use crate::util::memory::{LinearMemory, MemoryGrowError};
use crate::util::{Address, ObjectReference};

use std::collections::HashMap;

#[derive(Debug)]
pub struct StaticData {
    start: Address,
    cursor: Address,
    symbols: HashMap<String, ObjectReference>,
}

impl StaticData {
    pub fn new(start: Address) -> Self {
        assert!(
            start.is_aligned_to(BYTES_IN_WORD) && start.as_usize() >= RESERVED_LOW_BYTES,
            "static data cannot start at {}",
            start
        );
        StaticData {
            start,
            cursor: start,
            symbols: HashMap::new(),
        }
    }

    /// The symbol named `name`, writing it into the segment the first time the name is seen.
    pub fn intern_symbol(
        &mut self,
        memory: &mut LinearMemory,
        name: &str,
    ) -> Result<ObjectReference, MemoryGrowError> {
        if let Some(symbol) = self.symbols.get(name) {
            return Ok(*symbol);
        }
        let addr = self.cursor;
        let end = addr + object::size_for(ObjectKind::Symbol, name.len());
        memory.ensure(end)?;
        write_string_object(memory, addr, ObjectKind::Symbol, name.as_bytes());
        self.cursor = end;
        let symbol = ObjectReference::from_raw_address(addr);
        trace!("Interned symbol {:?} at {}", name, symbol);
        self.symbols.insert(name.to_owned(), symbol);
        Ok(symbol)
    }

    /// The symbol named `name`, if it was interned.
    pub fn symbol(&self, name: &str) -> Option<ObjectReference> {
        self.symbols.get(name).copied()
    }

    pub fn start(&self) -> Address {
        self.start
    }

    /// The first address past the segment.
    pub fn end(&self) -> Address {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
