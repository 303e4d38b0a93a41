use criterion::{BatchSize, Criterion};

use tagheap::memory_manager;
use tagheap::object::{array, list, Value};

const LIVE_ARRAYS: usize = 1000;

pub fn bench(c: &mut Criterion) {
    c.bench_function("collect_empty", |b| {
        let (mut rt, _) = super::runtime(1 << 20, "");
        b.iter(|| memory_manager::run_gc(&mut rt))
    });

    // A live vector of arrays that all share one list. Every collection copies all of it.
    c.bench_function("collect_live_graph", |b| {
        let (mut rt, static_data) = super::runtime(1 << 20, "");
        let red = Value::Object(static_data.symbol("red").unwrap());
        let shared = list::make_list(&mut rt, &[red, Value::TRUE, red]);
        let shared_slot = rt.push_root(shared);
        let outer = array::make_array_filled(&mut rt, LIVE_ARRAYS, Value::NULL);
        let outer_slot = rt.push_root(Value::Object(outer));
        for i in 0..LIVE_ARRAYS {
            let shared = rt.root(shared_slot);
            let inner = array::make_array_filled(&mut rt, 4, shared);
            let outer = rt.root(outer_slot).as_object().unwrap();
            array::array_set(rt.memory_mut(), outer, i, Value::Object(inner));
        }
        b.iter(|| memory_manager::run_gc(&mut rt))
    });

    c.bench_function("copy_array_under_stress", |b| {
        b.iter_batched(
            || {
                let (mut rt, _) = super::runtime(1 << 16, "stress_factor=4096");
                let source = array::make_array_filled(&mut rt, 64, Value::TRUE);
                let slot = rt.push_root(Value::Object(source));
                (rt, slot)
            },
            |(mut rt, slot)| {
                for _ in 0..64 {
                    let source = rt.root(slot).as_object().unwrap();
                    array::copy_array(&mut rt, source);
                }
            },
            BatchSize::SmallInput,
        )
    });
}
