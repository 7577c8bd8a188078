use criterion::{criterion_group, criterion_main, Criterion};
use tabdex_core::tokenizer::tokenize;

const TEXT: &str = "The quick brown fox jumps over the lazy dog. \
    Pack my box with five dozen liquor jugs! snake_case, CamelCase and 42 numbers; \
    tabs\tand--dashes...all split on non-word runs.";

fn bench_tokenize(c: &mut Criterion) {
    let text = TEXT.repeat(64);
    c.bench_function("tokenize_paragraphs", |b| b.iter(|| tokenize(&text)));
}

criterion_group!(benches, bench_tokenize);
criterion_main!(benches);
