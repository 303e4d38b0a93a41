//! Build random object graphs, collect, and check the graph against a model kept outside the heap.

mod common;

use common::TestRuntime;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tagheap::memory_manager;
use tagheap::object::{array, Value};
use tagheap::util::shadow_stack::RootSlot;
use tagheap::util::ObjectReference;
use tagheap::Runtime;

const SEED64: u64 = 0x0123_4567_89ab_cdef;
const SYMBOLS: [&str; 3] = ["red", "green", "blue"];

#[derive(Debug, Clone, Copy)]
enum Element {
    Int(i32),
    Bool(bool),
    Symbol(usize),
    Node(usize),
}

struct Model {
    nodes: Vec<Vec<Element>>,
    symbols: Vec<ObjectReference>,
}

fn random_model(rng: &mut ChaCha8Rng, count: usize, symbols: Vec<ObjectReference>) -> Model {
    let nodes = (0..count)
        .map(|_| {
            let len = rng.random_range(0..6);
            (0..len)
                .map(|_| match rng.random_range(0..4) {
                    0 => Element::Int(rng.random_range(-1000..1000)),
                    1 => Element::Bool(rng.random_bool(0.5)),
                    2 => Element::Symbol(rng.random_range(0..symbols.len())),
                    _ => Element::Node(rng.random_range(0..count)),
                })
                .collect()
        })
        .collect();
    Model { nodes, symbols }
}

fn registry(rt: &Runtime, slot: RootSlot) -> ObjectReference {
    rt.root(slot).as_object().unwrap()
}

fn node(rt: &Runtime, registry: ObjectReference, index: usize) -> ObjectReference {
    array::array_get(rt.memory(), registry, index)
        .as_object()
        .unwrap()
}

/// Allocate every node into the registry array, then fill in the elements. Filling in does not
/// allocate, so references read from the registry stay valid while the elements are written.
fn build(rt: &mut Runtime, model: &Model) -> RootSlot {
    let registry_array = array::make_array_filled(rt, model.nodes.len(), Value::NULL);
    let slot = rt.push_root(Value::Object(registry_array));
    for (i, elements) in model.nodes.iter().enumerate() {
        let n = array::make_array_filled(rt, elements.len(), Value::int(0).unwrap());
        let reg = registry(rt, slot);
        array::array_set(rt.memory_mut(), reg, i, Value::Object(n));
    }
    let reg = registry(rt, slot);
    for (i, elements) in model.nodes.iter().enumerate() {
        let n = node(rt, reg, i);
        for (k, element) in elements.iter().enumerate() {
            let value = match *element {
                Element::Int(v) => Value::int(v).unwrap(),
                Element::Bool(b) => Value::from(b),
                Element::Symbol(s) => Value::Object(model.symbols[s]),
                Element::Node(j) => Value::Object(node(rt, reg, j)),
            };
            array::array_set(rt.memory_mut(), n, k, value);
        }
    }
    slot
}

fn verify(rt: &Runtime, model: &Model, slot: RootSlot) {
    let reg = registry(rt, slot);
    for (i, elements) in model.nodes.iter().enumerate() {
        let n = node(rt, reg, i);
        assert!(rt.is_live_object(n));
        assert_eq!(array::array_size(rt.memory(), n), elements.len());
        for (k, element) in elements.iter().enumerate() {
            let actual = array::array_get(rt.memory(), n, k);
            let expected = match *element {
                Element::Int(v) => Value::int(v).unwrap(),
                Element::Bool(b) => Value::from(b),
                Element::Symbol(s) => Value::Object(model.symbols[s]),
                Element::Node(j) => Value::Object(node(rt, reg, j)),
            };
            assert_eq!(actual, expected, "node {} element {}", i, k);
        }
    }
}

fn allocate_garbage(rt: &mut Runtime, rng: &mut ChaCha8Rng) {
    for _ in 0..rng.random_range(1..20) {
        let len = rng.random_range(0..8);
        array::make_array_filled(rt, len, Value::TRUE);
    }
}

fn run(seed: u64, nodes: usize, heap_size: usize, options: &str) {
    let mut t = TestRuntime::new(heap_size, &SYMBOLS, options);
    let symbols = SYMBOLS.iter().map(|s| t.symbol(s)).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let model = random_model(&mut rng, nodes, symbols);
    let rt = &mut t.runtime;

    let slot = build(rt, &model);
    verify(rt, &model, slot);

    for _ in 0..5 {
        allocate_garbage(rt, &mut rng);
        verify(rt, &model, slot);

        let copied_before = rt.stats().total_objects_copied();
        memory_manager::run_gc(rt);
        // Every node and the registry, each copied exactly once.
        assert_eq!(
            rt.stats().total_objects_copied() - copied_before,
            nodes + 1
        );
        let mut live = 0;
        memory_manager::enumerate_objects(rt, |_| live += 1);
        assert_eq!(live, nodes + 1);
        verify(rt, &model, slot);
    }
}

#[test]
fn random_graph_survives_collections() {
    run(SEED64, 64, 4096, "");
}

#[test]
fn random_graph_with_growth() {
    // Far too small for the graph, so it is built across collections and growths.
    run(SEED64 ^ 0xffff, 200, 64, "min_growth_bytes=32");
}

#[test]
fn random_graph_under_stress() {
    run(SEED64.rotate_left(7), 48, 1024, "stress_factor=0");
}
