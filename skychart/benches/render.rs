use std::time::Duration;

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use skychart::render::new_surface;
use skychart::transition::interpolate;
use skychart::{render_scene, ObserverState, RenderOptions};
use starfield::{BrightStarCatalog, CatalogStar, ConstellationSet, SkyData};
use test_helpers::fixtures::CONSTELLATION_LINES_JSON;

fn synthetic_sky() -> SkyData {
    // Roughly the density of a naked-eye catalog, spread over the whole sphere
    let stars = (0..9000)
        .map(|i| {
            let ra = (i * 37 % 3600) as f64 / 10.0;
            let dec = (i % 178) as f64 - 89.0;
            let magnitude = (i % 70) as f64 / 10.0 - 1.0;
            CatalogStar::new(ra, dec, magnitude, ["B2V", "A0V", "G2V", "K5III", "M1Ia"][i % 5])
        })
        .collect();
    let constellations = ConstellationSet::from_json_reader(CONSTELLATION_LINES_JSON.as_bytes())
        .expect("fixture constellations parse");
    SkyData::new(BrightStarCatalog::new(stars), constellations)
}

fn bench_render(c: &mut Criterion) {
    let sky = synthetic_sky();
    let timestamp = NaiveDate::from_ymd_opt(2024, 1, 15)
        .and_then(|d| d.and_hms_opt(22, 0, 0))
        .expect("valid timestamp");
    let observer = ObserverState::new(31.23, 121.47, timestamp).expect("valid observer");
    let options = RenderOptions::default();

    let mut group = c.benchmark_group("render_scene");
    group.measurement_time(Duration::from_secs(10));
    for resolution in [500u32, 2000] {
        let mut surface = new_surface(resolution).expect("surface");
        group.bench_function(format!("{resolution}px"), |b| {
            b.iter(|| {
                black_box(render_scene(&mut surface, &sky, &observer, &options).expect("render"));
            })
        });
    }
    group.finish();

    let target = ObserverState::new(-33.87, 151.21, timestamp + chrono::TimeDelta::hours(5))
        .expect("valid observer");
    c.bench_function("interpolate_observer", |b| {
        b.iter(|| black_box(interpolate(&observer, &target, black_box(0.37))))
    });
}

criterion_group!(benches, bench_render);
criterion_main!(benches);
