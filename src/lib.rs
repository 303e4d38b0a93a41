//! tagheap is the memory manager of a language runtime that runs on a 32-bit linear memory, in the
//! style of wasm32. It provides:
//! * a tagged value representation, where every value is one word that is either an immediate or a
//!   pointer to a heap object ([`object::Value`]),
//! * the heap object model: arrays, strings, interned symbols, boxed numbers and list nodes
//!   ([`object`]),
//! * a stop-the-world semispace copying collector that finds its roots by scanning a shadow stack
//!   conservatively ([`plan::SemiSpace`]),
//! * structural and identity equality ([`object::equality`]).
//!
//! Generated code talks to the runtime through [`memory_manager`], which only deals in raw words.
//! A runtime is created with [`memory_manager::initialize`], or with a [`RuntimeBuilder`] to set
//! options first.

#[macro_use]
extern crate log;
#[macro_use]
extern crate static_assertions;

pub mod memory_manager;
pub mod object;
pub mod plan;
pub mod policy;
mod runtime;
pub mod util;

pub use crate::runtime::{Runtime, RuntimeBuilder};
