use criterion::Criterion;

use tagheap::memory_manager;
use tagheap::object::{array, Value};

pub fn bench(c: &mut Criterion) {
    // A large heap, so that allocation almost never collects.
    let (mut rt, _) = super::runtime(64 << 20, "");

    c.bench_function("alloc", |b| {
        b.iter(|| {
            let _addr = memory_manager::alloc(&mut rt, 8);
        })
    });

    c.bench_function("make_array_4", |b| {
        let elements = [Value::TRUE, Value::FALSE, Value::NULL, Value::FuncRef(1)];
        b.iter(|| {
            let _array = array::make_array(&mut rt, &elements);
        })
    });
}
