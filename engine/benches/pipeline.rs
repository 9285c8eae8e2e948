//! Benchmarks for the build → filter → bridge pipeline.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use bkb_engine::{
    apply_filter, build, compute_transitive_edges, filter_counts, IdentityMap, Toggles, ViewIndex,
};
use bkb_model::{Categorization, Concept, ConceptKind, DomainData, Relationship, SourceRef};

/// A domain of `size` concepts spread over four views, with every third
/// concept borrowed for context and a relationship chain through all of them.
fn synthetic(size: usize) -> DomainData {
    let name = |i: usize| format!("Concept{i}");
    let concepts = (0..size)
        .map(|i| Concept {
            name: name(i),
            qname: Some(format!("bkb:{}", name(i))),
            kind: if i % 3 == 0 {
                ConceptKind::ContextReference
            } else {
                ConceptKind::Domain
            },
            sources: vec![SourceRef {
                file: format!("View{}.cs", i % 4),
                ..SourceRef::default()
            }],
            ..Concept::default()
        })
        .collect();
    let relationships = (1..size)
        .map(|i| Relationship {
            subject: name(i - 1),
            object: name(i),
            verb_phrase: "precedes".into(),
            ..Relationship::default()
        })
        .collect();
    let categorizations = (0..size / 8)
        .map(|i| Categorization {
            parent_name: name(i * 8),
            category_name: "kind".into(),
            children_names: (1..4).map(|k| name(i * 8 + k)).collect(),
            ..Categorization::default()
        })
        .collect();
    DomainData {
        concepts,
        relationships,
        categorizations,
        ..DomainData::default()
    }
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");

    for size in [64, 256, 1024] {
        let data = synthetic(size);
        let identity = IdentityMap::build(&data);
        let views = ViewIndex::extract(&data);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("all", size), &size, |b, _| {
            b.iter(|| black_box(build(black_box(&data), &identity, &views, None)));
        });
        group.bench_with_input(BenchmarkId::new("view", size), &size, |b, _| {
            b.iter(|| black_box(build(black_box(&data), &identity, &views, Some("View0"))));
        });
    }

    group.finish();
}

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter");

    let toggles = Toggles {
        context: false,
        transitive: true,
        orphans: false,
        ..Toggles::default()
    };

    for size in [64, 256, 1024] {
        let data = synthetic(size);
        let identity = IdentityMap::build(&data);
        let views = ViewIndex::extract(&data);
        let set = build(&data, &identity, &views, None);
        group.throughput(Throughput::Elements(set.node_count() as u64));

        group.bench_with_input(BenchmarkId::new("apply", size), &size, |b, _| {
            b.iter(|| {
                let mut scratch = set.clone();
                apply_filter(black_box(&mut scratch), &toggles, &views);
                black_box(scratch);
            });
        });

        let mut filtered = set.clone();
        apply_filter(&mut filtered, &Toggles { transitive: false, ..toggles }, &views);
        group.bench_with_input(BenchmarkId::new("bridges", size), &size, |b, _| {
            b.iter(|| black_box(compute_transitive_edges(black_box(&filtered))));
        });

        group.bench_with_input(BenchmarkId::new("counts", size), &size, |b, _| {
            b.iter(|| black_box(filter_counts(black_box(&set), &views)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build, bench_filter);
criterion_main!(benches);
