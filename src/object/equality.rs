//! Equality of values.
//!
//! [`object_eq`] is structural for arrays, strings, list nodes and numbers, and identity for
//! symbols. Identical words are always equal. Arrays and symbols are never equal to a value of
//! another kind.

use super::{boxed, list, string, ObjectKind, Value};
use crate::util::memory::LinearMemory;

#[derive(Debug, Clone, Copy)]
enum Number {
    Int(i32),
    Float(f32),
}

impl Number {
    fn of(memory: &LinearMemory, value: Value) -> Option<Number> {
        match value {
            Value::Int(i) => Some(Number::Int(i)),
            Value::Object(object) if !object.is_null() => match super::kind_of(memory, object)? {
                ObjectKind::Integer => Some(Number::Int(boxed::integer_value(memory, object))),
                ObjectKind::Float => Some(Number::Float(boxed::float_value(memory, object))),
                _ => None,
            },
            _ => None,
        }
    }

    fn numeric_eq(self, other: Number) -> bool {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a == b,
            (Number::Int(a), Number::Float(b)) | (Number::Float(b), Number::Int(a)) => {
                a as f64 == b as f64
            }
            (Number::Float(a), Number::Float(b)) => a == b,
        }
    }
}

/// Structural equality. Recursion follows array elements and list heads; list tails are followed
/// iteratively. Cyclic structures that are not identical do not terminate.
pub fn object_eq(memory: &LinearMemory, a: Value, b: Value) -> bool {
    let (mut a, mut b) = (a, b);
    loop {
        if a == b {
            return true;
        }
        if let (Some(x), Some(y)) = (Number::of(memory, a), Number::of(memory, b)) {
            return x.numeric_eq(y);
        }
        let (Some(x), Some(y)) = (a.as_object(), b.as_object()) else {
            return false;
        };
        let (Some(kind_x), Some(kind_y)) = (super::kind_of(memory, x), super::kind_of(memory, y))
        else {
            return false;
        };
        match (kind_x, kind_y) {
            (ObjectKind::Array, ObjectKind::Array) => {
                let size = super::array::array_size(memory, x);
                return size == super::array::array_size(memory, y)
                    && (0..size).all(|i| {
                        object_eq(
                            memory,
                            super::array::array_get(memory, x, i),
                            super::array::array_get(memory, y, i),
                        )
                    });
            }
            // Symbols are interned: different symbol objects are different symbols.
            (ObjectKind::Symbol, _) | (_, ObjectKind::Symbol) => return false,
            (ObjectKind::String, ObjectKind::String) => {
                return string::string_equal(memory, x, y)
            }
            (ObjectKind::Char, ObjectKind::Char) => {
                return boxed::char_value(memory, x) == boxed::char_value(memory, y)
            }
            (ObjectKind::ListNode, ObjectKind::ListNode) => {
                if !object_eq(memory, list::list_head(memory, x), list::list_head(memory, y)) {
                    return false;
                }
                a = list::list_tail(memory, x);
                b = list::list_tail(memory, y);
            }
            _ => return false,
        }
    }
}

pub fn object_neq(memory: &LinearMemory, a: Value, b: Value) -> bool {
    !object_eq(memory, a, b)
}

/// True iff both values are the same symbol. Any other pair, including two equal strings, is
/// not.
pub fn symbol_eq(memory: &LinearMemory, a: Value, b: Value) -> bool {
    match (a.as_object(), b.as_object()) {
        (Some(x), Some(y)) => x == y && super::kind_of(memory, x) == Some(ObjectKind::Symbol),
        _ => false,
    }
}
