//! Memory policies that can be used for spaces.
//!
//! A space is a contiguous region of linear memory managed under one policy. The only policy
//! here is the copying one: a [`copyspace::CopySpace`] is either the space the mutator allocates
//! into, or the from-space of a collection, from which live objects are evacuated.

pub mod copyspace;
