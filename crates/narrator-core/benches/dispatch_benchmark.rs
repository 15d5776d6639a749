use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use narrator_core::{BarkEngine, KokoroEngine, StyleDispatcher, StyleId};
use std::path::Path;

fn bench_resolve(c: &mut Criterion) {
    let dispatcher = StyleDispatcher::new(BarkEngine::default());

    let mut group = c.benchmark_group("resolve");
    for style in StyleId::ALL {
        group.bench_with_input(BenchmarkId::new("known", style), style.as_str(), |b, name| {
            b.iter(|| black_box(dispatcher.resolve(black_box(name))));
        });
    }
    group.bench_function("unknown", |b| {
        b.iter(|| black_box(dispatcher.resolve(black_box("whispering"))));
    });
    group.finish();
}

fn bench_build_request(c: &mut Criterion) {
    let bark = StyleDispatcher::new(BarkEngine::default());
    let kokoro = StyleDispatcher::new(KokoroEngine::default());

    let mut group = c.benchmark_group("build_request");

    // Test different text lengths
    let long_text = "The river bends once more before it reaches the sea. ".repeat(40);
    let texts = [
        ("short", "Hello world"),
        ("medium", "Deep beneath the ice, a colony of microbes has survived for a million years."),
        ("long", long_text.as_str()),
    ];

    for (name, text) in texts {
        group.bench_with_input(BenchmarkId::new("bark", name), text, |b, text| {
            b.iter(|| {
                let request = bark.build_request(
                    black_box(text),
                    Path::new("narration.wav"),
                    "enthusiastic",
                    Some("v2/en_speaker_4"),
                );
                black_box(request.unwrap())
            });
        });
        group.bench_with_input(BenchmarkId::new("kokoro", name), text, |b, text| {
            b.iter(|| {
                let request =
                    kokoro.build_request(black_box(text), Path::new("narration"), "sad", None);
                black_box(request.unwrap())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_resolve, bench_build_request);
criterion_main!(benches);
