use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustgrab::catalog::canonicalize;
use rustgrab::extractor::{RawMetadataRecord, RawStreamDescriptor};

fn random_record(formats: usize, seed: u64) -> RawMetadataRecord {
    let mut rng = StdRng::seed_from_u64(seed);
    let heights = [144, 240, 360, 480, 720, 1080, 1440, 2160];

    let formats = (0..formats)
        .map(|i| {
            let kind = rng.gen_range(0..3);
            RawStreamDescriptor {
                ext: Some(if kind == 1 { "m4a" } else { "mp4" }.to_string()),
                height: Some(heights[rng.gen_range(0..heights.len())]),
                abr: Some(rng.gen_range(32.0..320.0)),
                filesize: Some(rng.gen_range(1_000..500_000_000)),
                vcodec: Some(if kind == 1 { "none" } else { "avc1" }.to_string()),
                acodec: Some(if kind == 2 { "none" } else { "mp4a" }.to_string()),
                url: Some(format!("https://cdn.example/{}", i)),
                ..Default::default()
            }
        })
        .collect();

    RawMetadataRecord {
        title: Some("Benchmark".to_string()),
        view_count: Some(1_234_567),
        formats,
        ..Default::default()
    }
}

fn benchmark_canonicalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("Canonicalize");

    for size in [10, 50, 200] {
        let record = random_record(size, 42);
        group.bench_function(format!("{} formats", size), |b| {
            b.iter(|| canonicalize(black_box(&record)))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_canonicalize);
criterion_main!(benches);
