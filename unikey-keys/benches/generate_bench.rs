use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;
use unikey_keys::{KeyOptions, Release, Scheme, generate, generate_many, validate};

fn bench_generate(c: &mut Criterion) {
    let options = KeyOptions::for_release(Release::Build73g);
    let mut group = c.benchmark_group("generate_100");
    for scheme in Scheme::ALL {
        group.bench_function(scheme.as_str(), |b| {
            let mut rng = StdRng::seed_from_u64(0);
            b.iter(|| generate_many(black_box(scheme), &options, 100, &mut rng).unwrap());
        });
    }
    group.finish();
}

fn bench_validate(c: &mut Criterion) {
    let options = KeyOptions::for_release(Release::Build73g);
    let mut rng = StdRng::seed_from_u64(0);
    let mut group = c.benchmark_group("validate");
    for scheme in Scheme::ALL {
        let text = generate(scheme, &options, &mut rng).unwrap().canonical_string();
        group.bench_function(scheme.as_str(), |b| {
            b.iter(|| validate(scheme, black_box(&text), &options).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_generate, bench_validate);
criterion_main!(benches);
