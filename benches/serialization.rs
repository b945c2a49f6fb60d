use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde::{Deserialize, Serialize};
use serde_construct::{from_str, to_string, Mode, Notation, Object, Options, Value};

#[derive(Serialize, Deserialize, Clone)]
struct User {
    id: u32,
    name: String,
    email: String,
    active: bool,
}

#[derive(Serialize, Deserialize, Clone)]
struct Product {
    sku: String,
    name: String,
    price: f64,
    quantity: u32,
}

fn products(size: u32) -> Vec<Product> {
    (0..size)
        .map(|i| Product {
            sku: format!("SKU{}", i),
            name: format!("Product {}", i),
            price: 9.99 + f64::from(i),
            quantity: i,
        })
        .collect()
}

/// A doubly linked ring of `size` nodes, each with a date.
fn ring(size: usize) -> Value {
    let nodes: Vec<Object> = (0..size).map(|_| Object::new()).collect();
    for (i, node) in nodes.iter().enumerate() {
        node.set("index", i as u32);
        node.set("next", nodes[(i + 1) % size].clone());
        node.set("prev", nodes[(i + size - 1) % size].clone());
        node.set("seen", Value::date_from_millis(1_700_000_000_000.0 + i as f64));
    }
    Value::Object(nodes[0].clone())
}

fn benchmark_serialize_simple(c: &mut Criterion) {
    let user = User {
        id: 123,
        name: "Alice".to_string(),
        email: "alice@example.com".to_string(),
        active: true,
    };

    c.bench_function("serialize_simple_struct", |b| {
        b.iter(|| to_string(black_box(&user)))
    });
}

fn benchmark_deserialize_simple(c: &mut Criterion) {
    let text = r#"{id:123,name:"Alice",email:"alice@example.com",active:true}"#;

    c.bench_function("deserialize_simple_struct", |b| {
        b.iter(|| from_str::<User>(black_box(text)))
    });
}

fn benchmark_serialize_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize_array");

    for size in [10, 50, 100, 500].iter() {
        let products = products(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| to_string(black_box(&products)))
        });
    }
    group.finish();
}

fn benchmark_deserialize_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("deserialize_array");

    for size in [10, 50, 100, 500].iter() {
        let text = to_string(&products(*size)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| from_str::<Vec<Product>>(black_box(text)))
        });
    }
    group.finish();
}

fn benchmark_circular_graph(c: &mut Criterion) {
    let mut group = c.benchmark_group("circular_graph");
    let mut notation = Notation::new();
    let options = Options::new().with_mode(Mode::Circular);

    for size in [10usize, 50, 100].iter() {
        let graph = ring(*size);
        group.bench_with_input(BenchmarkId::new("serialize", size), &graph, |b, graph| {
            b.iter(|| notation.serialize_with(black_box(graph), options.clone()))
        });

        let text = notation.serialize_with(&graph, options.clone()).unwrap();
        group.bench_with_input(BenchmarkId::new("materialize", size), &text, |b, text| {
            b.iter(|| notation.materialize(black_box(text)))
        });
    }
    group.finish();
}

fn benchmark_comparison_with_json(c: &mut Criterion) {
    let user = User {
        id: 123,
        name: "Alice".to_string(),
        email: "alice@example.com".to_string(),
        active: true,
    };

    let mut group = c.benchmark_group("format_comparison");
    group.bench_function("construct_serialize", |b| {
        b.iter(|| to_string(black_box(&user)))
    });
    group.bench_function("json_serialize", |b| {
        b.iter(|| serde_json::to_string(black_box(&user)))
    });
    group.finish();
}

criterion_group!(
    benches,
    benchmark_serialize_simple,
    benchmark_deserialize_simple,
    benchmark_serialize_array,
    benchmark_deserialize_array,
    benchmark_circular_graph,
    benchmark_comparison_with_json
);
criterion_main!(benches);
