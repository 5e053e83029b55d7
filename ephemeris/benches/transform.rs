use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ephemeris::{equatorial_to_horizontal, SiderealFrame};

fn bench_transform(c: &mut Criterion) {
    let timestamp = NaiveDate::from_ymd_opt(2024, 3, 15)
        .and_then(|d| d.and_hms_opt(22, 0, 0))
        .expect("valid timestamp");

    // A grid roughly the size of a naked-eye catalog
    let positions: Vec<(f64, f64)> = (0..9000)
        .map(|i| ((i % 360) as f64, (i / 100) as f64 - 45.0))
        .collect();

    c.bench_function("equatorial_to_horizontal_9000", |b| {
        b.iter(|| {
            for &(ra, dec) in &positions {
                black_box(equatorial_to_horizontal(ra, dec, 31.23, 121.47, &timestamp));
            }
        })
    });

    c.bench_function("sidereal_frame_9000", |b| {
        b.iter(|| {
            let frame = SiderealFrame::new(121.47, &timestamp);
            for &(ra, dec) in &positions {
                black_box(frame.to_horizontal(ra, dec, 31.23));
            }
        })
    });
}

criterion_group!(benches, bench_transform);
criterion_main!(benches);
