mod common;

use common::TestRuntime;
use tagheap::memory_manager;
use tagheap::object::{array, string, Value};

#[test]
fn allocating_past_the_initial_heap_grows_it() {
    let mut t = TestRuntime::new(64, &[], "min_growth_bytes=64");
    let rt = &mut t.runtime;
    let initial = memory_manager::total_bytes(rt);
    assert_eq!(initial, 32);

    let mut slots = vec![];
    for i in 0..32 {
        let a = array::make_array(rt, &[Value::int(i).unwrap(), Value::int(-i).unwrap()]);
        slots.push(rt.push_root(Value::Object(a)));
    }
    assert!(rt.stats().heap_growths > 0);
    assert!(memory_manager::total_bytes(rt) >= 32 * 16);
    assert_eq!(memory_manager::used_bytes(rt), 32 * 16);

    for (i, slot) in slots.into_iter().enumerate() {
        let a = rt.root(slot).as_object().unwrap();
        let i = i as i32;
        assert_eq!(
            array::array_elements(rt.memory(), a),
            vec![Value::int(i).unwrap(), Value::int(-i).unwrap()]
        );
    }
}

#[test]
fn growth_keeps_data_across_later_collections() {
    let mut t = TestRuntime::new(128, &[], "");
    let rt = &mut t.runtime;
    let s = string::make_string(rt, b"survives growth");
    let s_slot = rt.push_root(Value::Object(s));

    // One object larger than the whole heap.
    let big = array::make_array_filled(rt, 100, Value::TRUE);
    let big_slot = rt.push_root(Value::Object(big));
    assert_eq!(rt.stats().heap_growths, 1);

    memory_manager::run_gc(rt);
    memory_manager::run_gc(rt);

    let s = rt.root(s_slot).as_object().unwrap();
    assert_eq!(string::string_bytes(rt.memory(), s), b"survives growth");
    let big = rt.root(big_slot).as_object().unwrap();
    assert_eq!(array::array_size(rt.memory(), big), 100);
    assert!(array::array_elements(rt.memory(), big)
        .iter()
        .all(|v| *v == Value::TRUE));
}

#[test]
fn growth_is_refused_beyond_the_memory_limit() {
    let mut t = TestRuntime::new(64, &[], "max_memory_pages=1");
    let rt = &mut t.runtime;
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        // The heap cannot grow by a whole page within a one page memory.
        array::make_array_filled(rt, 64, Value::NULL);
    }));
    assert!(result.is_err());
}
