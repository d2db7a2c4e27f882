//! Benchmarks for document path resolution.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use docmux_routes::{PathResolver, SourceDocument, plan_pages};
use docmux_sources::{BuildMode, Diagnostics, RawSource, SourceRegistry};

/// Registry with `count` sources, each serving `docs/**` under its own base.
fn create_registry(count: usize) -> SourceRegistry {
    let raw: Vec<_> = (0..count)
        .map(|i| {
            RawSource::new(&format!("source-{i}"), "mkdocs.yml", &format!("sources/{i}/docs"))
                .with_pattern("docs/**")
        })
        .collect();
    SourceRegistry::validate(&raw, &Diagnostics::tracing(BuildMode::Production))
}

/// Documents spread evenly over the sources plus the local site.
fn create_documents(sources: usize, per_source: usize) -> Vec<SourceDocument> {
    let mut documents = Vec::with_capacity((sources + 1) * per_source);
    for i in 0..per_source {
        documents.push(SourceDocument::local(&format!("guides/section-{}/page-{i}.md", i % 10)));
        for s in 0..sources {
            documents.push(SourceDocument::new(
                &format!("source-{s}"),
                &format!("docs/section-{}/page-{i}.md", i % 10),
            ));
        }
    }
    documents
}

fn bench_resolve_single(c: &mut Criterion) {
    let resolver = PathResolver::new(&create_registry(10));
    let source_doc = SourceDocument::new("source-3", "docs/guides/install.md");
    let local_doc = SourceDocument::local("guides/start.md");

    let mut group = c.benchmark_group("resolve");

    group.bench_function("source_document", |b| b.iter(|| resolver.resolve(&source_doc)));

    group.bench_function("local_document", |b| b.iter(|| resolver.resolve(&local_doc)));

    group.finish();
}

fn bench_resolve_all_varying_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_all");

    for per_source in [100, 1_000, 5_000] {
        let resolver = PathResolver::new(&create_registry(5));
        let documents = create_documents(5, per_source);

        group.bench_with_input(
            BenchmarkId::from_parameter(documents.len()),
            &documents,
            |b, documents| b.iter(|| resolver.resolve_all(documents).unwrap()),
        );
    }

    group.finish();
}

fn bench_plan_pages(c: &mut Criterion) {
    let resolver = PathResolver::new(&create_registry(5));
    let resolved = resolver.resolve_all(&create_documents(5, 1_000)).unwrap();

    c.bench_function("plan_pages", |b| b.iter(|| plan_pages(&resolved)));
}

criterion_group!(
    benches,
    bench_resolve_single,
    bench_resolve_all_varying_sizes,
    bench_plan_pages,
);

criterion_main!(benches);
