mod common;

use common::TestRuntime;
use tagheap::memory_manager;
use tagheap::object::value::{FALSE_WORD, TRUE_WORD};
use tagheap::object::{array, boxed, list, string, Value};
use tagheap::util::Word;
use tagheap::Runtime;

/// A mix of values of every kind, with some structurally equal but distinct pairs. The heap is
/// large enough that building them never collects, so the words stay valid.
fn sample_values(t: &mut TestRuntime) -> Vec<Word> {
    let foo = Value::Object(t.symbol("foo"));
    let bar = Value::Object(t.symbol("bar"));
    let rt: &mut Runtime = &mut t.runtime;
    let mut values = vec![
        Value::int(0).unwrap(),
        Value::int(42).unwrap(),
        Value::TRUE,
        Value::FALSE,
        Value::FuncRef(3),
        Value::NULL,
        foo,
        bar,
        boxed::make_integer(rt, 1 << 29),
        boxed::make_integer(rt, 42),
        Value::Object(boxed::make_float(rt, 42.0)),
        Value::Object(boxed::make_float(rt, 0.5)),
        Value::Object(boxed::make_char(rt, 'x')),
        Value::Object(boxed::make_char(rt, 'x')),
        Value::Object(string::make_string(rt, b"foo")),
        Value::Object(string::make_string(rt, b"foo")),
        Value::Object(string::make_string(rt, b"")),
    ];
    let inner = array::make_array(rt, &[foo, Value::int(1).unwrap()]);
    let inner_copy = array::copy_array(rt, inner);
    values.push(Value::Object(inner));
    values.push(Value::Object(inner_copy));
    values.push(Value::Object(array::make_array(rt, &[Value::Object(inner)])));
    values.push(Value::Object(array::make_array(rt, &[Value::Object(inner_copy)])));
    values.push(Value::Object(array::make_array(rt, &[])));
    values.push(list::make_list(rt, &[foo, bar]));
    values.push(list::make_list(rt, &[foo, bar]));
    values.push(list::make_list(rt, &[foo]));
    assert_eq!(rt.stats().collections, 0);
    values.into_iter().map(Value::encode).collect()
}

fn eq(rt: &Runtime, a: Word, b: Word) -> bool {
    match memory_manager::object_eq(rt, a, b) {
        TRUE_WORD => true,
        FALSE_WORD => false,
        other => panic!("object_eq returned {:#x}", other),
    }
}

#[test]
fn reflexive_and_symmetric() {
    let mut t = TestRuntime::new(0x10000, &["foo", "bar"], "");
    let values = sample_values(&mut t);
    let rt = &t.runtime;
    for &a in &values {
        assert!(eq(rt, a, a), "{:#x} is not equal to itself", a);
        for &b in &values {
            assert_eq!(eq(rt, a, b), eq(rt, b, a), "{:#x} vs {:#x}", a, b);
            assert_eq!(
                memory_manager::object_neq(rt, a, b),
                if eq(rt, a, b) { FALSE_WORD } else { TRUE_WORD }
            );
        }
    }
}

#[test]
fn per_kind_rules() {
    let mut t = TestRuntime::new(0x10000, &["foo", "bar"], "");
    let foo = Value::Object(t.symbol("foo")).encode();
    let rt = &mut t.runtime;

    let boxed_42 = boxed::make_integer(rt, 42).encode();
    let float_42 = Value::Object(boxed::make_float(rt, 42.0)).encode();
    let int_42 = Value::int(42).unwrap().encode();
    let char_x = Value::Object(boxed::make_char(rt, 'x')).encode();
    let string_foo = Value::Object(string::make_string(rt, b"foo")).encode();
    let array_foo = Value::Object(array::make_array(rt, &[Value::decode(foo)])).encode();
    let rt = &t.runtime;

    assert!(eq(rt, int_42, boxed_42));
    assert!(eq(rt, int_42, float_42));
    assert!(!eq(rt, char_x, Value::int('x' as i32).unwrap().encode()));
    // A symbol equals only itself, even against a string of the same name.
    assert!(!eq(rt, foo, string_foo));
    assert!(!eq(rt, foo, array_foo));
    assert_eq!(memory_manager::symbol_eq(rt, foo, foo), TRUE_WORD);
    assert_eq!(memory_manager::symbol_eq(rt, foo, array_foo), FALSE_WORD);
    assert_eq!(memory_manager::symbol_eq(rt, string_foo, string_foo), FALSE_WORD);
    assert_eq!(memory_manager::symbol_eq(rt, int_42, int_42), FALSE_WORD);
}

#[test]
fn equality_is_preserved_by_collection() {
    let mut t = TestRuntime::new(256, &["foo", "bar"], "");
    let foo = Value::Object(t.symbol("foo"));
    let rt = &mut t.runtime;
    let a = array::make_array(rt, &[foo, Value::TRUE]);
    let a_slot = rt.push_root(Value::Object(a));
    let a = rt.root(a_slot);
    let b = list::make_list(rt, &[a, foo]);
    let b_slot = rt.push_root(b);
    let a2 = array::make_array(rt, &[foo, Value::TRUE]);
    let a2_slot = rt.push_root(Value::Object(a2));
    let a2 = rt.root(a2_slot);
    let b2 = list::make_list(rt, &[a2, foo]);
    let b2_slot = rt.push_root(b2);

    memory_manager::run_gc(rt);
    memory_manager::run_gc(rt);

    let rt: &Runtime = rt;
    let word = |slot| rt.root(slot).encode();
    assert!(eq(rt, word(a_slot), word(a2_slot)));
    assert!(eq(rt, word(b_slot), word(b2_slot)));
    assert!(!eq(rt, word(a_slot), word(b_slot)));
}
