use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use jsonselect::{select, select_first, SelectorExecutor, SelectorParser};
use serde_json::{json, Value};

// Generate test data
fn generate_people(rows: usize) -> Value {
    let people: Vec<Value> = (0..rows)
        .map(|i| {
            json!({
                "id": i,
                "name": format!("Person{}", i),
                "age": 20 + (i % 50),
                "tags": if i % 3 == 0 { vec!["a", "b"] } else { vec!["c"] },
                "address": {"city": format!("City{}", i % 10), "zip": format!("{:05}", i)}
            })
        })
        .collect();
    json!({ "people": people })
}

const SELECTORS: &[(&str, &str)] = &[
    ("type", "string"),
    ("id", ".name"),
    ("child", ".people > object > .age"),
    ("nth", ".tags :nth-child(2n+1)"),
    ("has", "object:has(.city:val(\"City3\")) > .name"),
    ("expr", ".age:expr(x * 2 >= 100 && x % 7 != 0)"),
    ("sibling", ".name ~ .age"),
];

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    let parser = SelectorParser::new();

    for (name, source) in SELECTORS {
        group.bench_with_input(BenchmarkId::from_parameter(name), source, |b, source| {
            b.iter(|| std::hint::black_box(parser.parse(source).unwrap()))
        });
    }

    group.finish();
}

fn bench_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("select");
    let parser = SelectorParser::new();

    for size in [100, 1_000, 10_000] {
        let doc = generate_people(size);
        group.throughput(Throughput::Elements(size as u64));

        for (name, source) in SELECTORS {
            let selector = parser.parse(source).unwrap();
            group.bench_with_input(BenchmarkId::new(*name, size), &doc, |b, doc| {
                b.iter(|| std::hint::black_box(select(&selector, doc).len()))
            });
        }
    }

    group.finish();
}

fn bench_select_first(c: &mut Criterion) {
    let doc = generate_people(10_000);
    let selector = SelectorParser::new().parse(".name").unwrap();

    c.bench_function("select_first_10000", |b| {
        b.iter(|| std::hint::black_box(select_first(&selector, &doc)))
    });
}

fn bench_executor_cache(c: &mut Criterion) {
    let docs: Vec<Value> = (0..100).map(|_| generate_people(10)).collect();

    c.bench_function("executor_cached_100_docs", |b| {
        let mut executor = SelectorExecutor::new();
        b.iter(|| {
            let mut total = 0;
            for doc in &docs {
                total += executor.select(".age:expr(x > 40)", doc).unwrap().len();
            }
            std::hint::black_box(total)
        })
    });
}

criterion_group!(
    benches,
    bench_parse,
    bench_select,
    bench_select_first,
    bench_executor_cache
);
criterion_main!(benches);
