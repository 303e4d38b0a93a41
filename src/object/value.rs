//! Tagged values.
//!
//! Every value the program handles is one 32-bit word. The two low bits are the tag:
//!
//! | tag  | meaning                                                         |
//! |------|-----------------------------------------------------------------|
//! | `00` | pointer to a heap object header (zero is the null reference)    |
//! | `01` | 30-bit signed integer, stored in the upper bits                 |
//! | `10` | boolean: `false` is `0b010`, `true` is `0b110`                  |
//! | `11` | function reference, a 30-bit index stored in the upper bits     |
//!
//! Objects are word aligned, so the pointer tag is simply the two clear low bits of the address.
//! Inside the crate values are handled as [`Value`]; raw words only appear at the
//! [`crate::memory_manager`] boundary and in memory.

use crate::util::{ObjectReference, Word};

use strum_macros::FromRepr;

const TAG_BITS: u32 = 2;
const TAG_MASK: Word = (1 << TAG_BITS) - 1;

/// The low two bits of a value word.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRepr)]
pub enum Tag {
    Pointer = 0b00,
    Int = 0b01,
    Bool = 0b10,
    FuncRef = 0b11,
}

impl Tag {
    pub fn of(word: Word) -> Tag {
        match Tag::from_repr(word & TAG_MASK) {
            Some(tag) => tag,
            None => unreachable!(),
        }
    }
}

/// The smallest integer that fits in an immediate.
pub const MIN_IMMEDIATE_INT: i32 = -(1 << 29);
/// The largest integer that fits in an immediate.
pub const MAX_IMMEDIATE_INT: i32 = (1 << 29) - 1;
/// The largest function index that fits in an immediate.
pub const MAX_FUNC_REF: u32 = (1 << 30) - 1;

/// The word encoding `false`.
pub const FALSE_WORD: Word = 0b010;
/// The word encoding `true`.
pub const TRUE_WORD: Word = 0b110;

/// A decoded value word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Value {
    Int(i32),
    Bool(bool),
    FuncRef(u32),
    /// A heap reference. [`ObjectReference::NULL`] is the null reference, which is also what the
    /// slots of a freshly allocated object hold.
    Object(ObjectReference),
}

impl Value {
    pub const NULL: Value = Value::Object(ObjectReference::NULL);
    pub const TRUE: Value = Value::Bool(true);
    pub const FALSE: Value = Value::Bool(false);

    /// An immediate integer, or `None` if `value` needs more than 30 bits.
    pub fn int(value: i32) -> Option<Value> {
        (MIN_IMMEDIATE_INT..=MAX_IMMEDIATE_INT)
            .contains(&value)
            .then_some(Value::Int(value))
    }

    /// Decode any word. Every word decodes to some value.
    pub fn decode(word: Word) -> Value {
        match Tag::of(word) {
            Tag::Pointer => Value::Object(ObjectReference::from_raw_address(
                crate::util::Address::from_word(word),
            )),
            Tag::Int => Value::Int((word as i32) >> TAG_BITS),
            Tag::Bool => Value::Bool(word >> TAG_BITS != 0),
            Tag::FuncRef => Value::FuncRef(word >> TAG_BITS),
        }
    }

    pub fn encode(self) -> Word {
        match self {
            Value::Int(value) => {
                debug_assert!(
                    Value::int(value).is_some(),
                    "{} does not fit in an immediate integer",
                    value
                );
                ((value as Word) << TAG_BITS) | Tag::Int as Word
            }
            Value::Bool(false) => FALSE_WORD,
            Value::Bool(true) => TRUE_WORD,
            Value::FuncRef(index) => {
                debug_assert!(index <= MAX_FUNC_REF, "function index {} is too large", index);
                (index << TAG_BITS) | Tag::FuncRef as Word
            }
            Value::Object(object) => object.value(),
        }
    }

    pub fn tag(self) -> Tag {
        match self {
            Value::Int(_) => Tag::Int,
            Value::Bool(_) => Tag::Bool,
            Value::FuncRef(_) => Tag::FuncRef,
            Value::Object(_) => Tag::Pointer,
        }
    }

    pub fn is_immediate(self) -> bool {
        !matches!(self, Value::Object(_))
    }

    /// The referenced object, if this is a non-null reference.
    pub fn as_object(self) -> Option<ObjectReference> {
        match self {
            Value::Object(object) if !object.is_null() => Some(object),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<ObjectReference> for Value {
    fn from(object: ObjectReference) -> Self {
        Value::Object(object)
    }
}
