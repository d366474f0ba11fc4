use criterion::{black_box, criterion_group, criterion_main, Criterion};
use eat_map::data::builtin_regions;
use eat_map::map::{MapRenderer, RenderOptions};
use eat_map::model::{parse_payloads, RenderPayload};
use eat_map::raster::rasterize;

fn payload() -> RenderPayload {
    let states = builtin_regions();
    let data: Vec<String> = states
        .iter()
        .enumerate()
        .map(|(i, s)| {
            format!(
                r#"{{"Bundesland": "{}", "parameter": "cases", "est": {}, "est_print": "{}"}}"#,
                s.name,
                i * 6,
                i * 6
            )
        })
        .collect();
    let json = format!(
        r#"{{"data": [{}, {{"Bundesland": "total", "parameter": "cases", "est": 45}}],
            "config": {{"parameter": {{"cases": {{"range": {{"min": 0, "max": 100}}, "label": "Cases"}}}}}}}}"#,
        data.join(",")
    );
    let mut bytes = json.into_bytes();
    parse_payloads(&mut bytes)
        .expect("valid payload")
        .remove(0)
}

fn bench_update(c: &mut Criterion) {
    let regions = builtin_regions();
    let payload = payload();
    let mut renderer = MapRenderer::new(&regions, 900.0, 1000.0, RenderOptions::default());

    c.bench_function("update", |b| {
        b.iter(|| renderer.update(black_box(&payload)))
    });
}

fn bench_pointer_move(c: &mut Criterion) {
    let regions = builtin_regions();
    let mut renderer = MapRenderer::new(&regions, 900.0, 1000.0, RenderOptions::default());
    renderer.update(&payload()).expect("known parameter");

    c.bench_function("pointer_move", |b| {
        let mut x = 0.0;
        b.iter(|| {
            x = (x + 7.0) % 900.0;
            renderer.pointer_move(black_box(x), black_box(500.0));
        })
    });
}

fn bench_rasterize(c: &mut Criterion) {
    let regions = builtin_regions();
    let mut renderer = MapRenderer::new(&regions, 200.0, 120.0, RenderOptions::default());
    renderer.update(&payload()).expect("known parameter");

    c.bench_function("rasterize_200x60", |b| {
        b.iter(|| rasterize(black_box(renderer.surface()), 200, 60))
    });
}

criterion_group!(benches, bench_update, bench_pointer_move, bench_rasterize);
criterion_main!(benches);
