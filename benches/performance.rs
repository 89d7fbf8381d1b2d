use criterion::{black_box, criterion_group, criterion_main, Criterion};
use structgraph::core::{AnalyzerConfig, CodebaseAnalyzer, SourceFile};

fn sample_module(i: usize, count: usize) -> String {
    format!(
        r#"
import os
from collections import OrderedDict

class TestClass{i}:
    def __init__(self):
        self.value = {i}

    def process(self):
        return self.calculate() * 2

    def calculate(self):
        return TestClass{next}.calculate(self) + shared_helper()

def shared_helper():
    return os.getpid()

def main_{i}():
    instance = TestClass{i}()
    return instance.process() + main_{next}()

if __name__ == "__main__":
    main_{i}()
"#,
        i = i,
        next = (i + 1) % count
    )
}

fn sources(count: usize) -> Vec<SourceFile> {
    (0..count)
        .map(|i| SourceFile::new(format!("pkg/test_{}.py", i), sample_module(i, count)))
        .collect()
}

fn benchmark_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("codebase_analysis");

    let small = sources(10);
    let large = sources(200);

    for (name, parallel) in [("small_codebase", true), ("small_codebase_sequential", false)] {
        let analyzer = CodebaseAnalyzer::with_config(
            AnalyzerConfig::new().without_cache().with_parallel(parallel),
        )
        .unwrap();
        group.bench_function(name, |b| {
            b.iter(|| black_box(analyzer.analyze_sources(black_box(small.clone()))));
        });
    }

    let analyzer =
        CodebaseAnalyzer::with_config(AnalyzerConfig::new().without_cache()).unwrap();
    group.bench_function("large_codebase", |b| {
        b.iter(|| black_box(analyzer.analyze_sources(black_box(large.clone()))));
    });

    group.finish();
}

fn benchmark_cache_performance(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache_performance");

    let large = sources(200);
    let analyzer =
        CodebaseAnalyzer::with_config(AnalyzerConfig::new().with_memory_cache()).unwrap();
    // warm the cache so every iteration only resolves
    analyzer.analyze_sources(large.clone());

    group.bench_function("warm_cache_large_codebase", |b| {
        b.iter(|| black_box(analyzer.analyze_sources(black_box(large.clone()))));
    });

    group.finish();
}

criterion_group!(benches, benchmark_analysis, benchmark_cache_performance);
criterion_main!(benches);
