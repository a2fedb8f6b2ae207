//! Benchmarks for full watch face frames.

use cairo::{Context, Format, ImageSurface};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use line_watchface::engine_core::ManualTicker;
use line_watchface::types::{Bitmap, SlotRole, StyleMode};
use line_watchface::{AppConfig, ComplicationsFile, HeadlessHost, RedrawRequester, WatchFaceEngine};
use std::sync::Arc;

const FACE: &str = r#"{
    "top": {"content": {"type": "short_text",
        "title": {"type": "plain", "text": "uv"},
        "text": {"type": "plain", "text": "7"}}},
    "left": {"content": {"type": "ranged_value", "min": 0, "max": 10000, "value": 6250,
        "text": {"type": "plain", "text": "6250"}}},
    "right": {"content": {"type": "ranged_value", "min": 0, "max": 100, "value": 81}},
    "bottom": {"content": {"type": "long_text",
        "title": {"type": "plain", "text": "Next"},
        "text": {"type": "plain", "text": "Design review in room 4"}}},
    "background": {"content": {"type": "large_image", "image": "backdrop.png"}}
}"#;

/// 2024-03-14 10:09:30 UTC
const NOW_MILLIS: i64 = 1_710_410_970_000;

fn engine(style: StyleMode, ambient: bool) -> WatchFaceEngine<HeadlessHost, ManualTicker> {
    let mut config = AppConfig::default();
    config.preferences.style_mode = style;

    let face: ComplicationsFile = serde_json::from_str(FACE).unwrap();
    for image in face.slots[&SlotRole::Background].content.images() {
        image.fulfil(Bitmap::filled(454, 454, [40, 90, 160, 255]));
    }

    let host = Arc::new(HeadlessHost::new(true));
    let redraw = RedrawRequester::new(host.clone());
    let mut engine = WatchFaceEngine::new(host, redraw, ManualTicker::new(), &config);
    engine.on_visibility_changed(true);
    engine.on_ambient_mode_changed(ambient);
    for (slot, data) in face.entries() {
        engine.update_complication(slot, data.clone());
    }
    engine.on_notification_counts_changed(2, 5);
    engine
}

fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("WatchFaceEngine::draw");
    let surface = ImageSurface::create(Format::ARgb32, 454, 454).unwrap();
    let cr = Context::new(&surface).unwrap();

    for (name, style) in [
        ("digitalog", StyleMode::Digitalog),
        ("digital", StyleMode::Digital),
        ("analog", StyleMode::Analog),
    ] {
        for ambient in [false, true] {
            let mut engine = engine(style, ambient);
            let id = format!("{}/{}", name, if ambient { "ambient" } else { "interactive" });
            group.bench_function(BenchmarkId::from_parameter(id), |b| {
                b.iter(|| {
                    engine.draw(&cr, black_box(NOW_MILLIS)).len()
                });
            });
        }
    }

    group.finish();
}

fn bench_tap(c: &mut Criterion) {
    let surface = ImageSurface::create(Format::ARgb32, 454, 454).unwrap();
    let cr = Context::new(&surface).unwrap();
    let mut engine = engine(StyleMode::Digitalog, false);
    engine.draw(&cr, NOW_MILLIS);

    c.bench_function("TapRegions::hit", |b| {
        b.iter(|| {
            engine.on_tap(black_box(227.0), black_box(60.0), NOW_MILLIS);
        });
    });
}

criterion_group!(benches, bench_frame, bench_tap);
criterion_main!(benches);
