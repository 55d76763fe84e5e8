use criterion::{criterion_group, criterion_main, Criterion};

use onview_reveal_core::{
    Config, Easing, Engine, FrameSink, Inputs, RunMode, RunSpec, ValueFormat,
};

fn counter(target: String) -> RunSpec {
    RunSpec {
        target,
        from: 0.0,
        to: 97.0,
        duration_ms: 1600,
        delay_ms: 0,
        easing: Easing::EaseOutCubic,
        mode: RunMode::Driven,
        sink: FrameSink::Text {
            format: ValueFormat::with_suffix("%"),
        },
        zero_state: false,
    }
}

/// 64 driven counters mid-flight, stepped at 60 Hz.
fn bench_engine_step(c: &mut Criterion) {
    c.bench_function("engine_step_64_counters", |b| {
        let mut eng = Engine::new(Config::default());
        for i in 0..64 {
            let t = format!("stats/num[{i}]");
            eng.observe(&t, 0.3, vec![counter(t.clone())]);
            eng.update(0.0, Inputs::visible(&t, 1.0));
        }
        b.iter(|| {
            eng.update(16.0, Inputs::default());
        })
    });
}

criterion_group!(benches, bench_engine_step);
criterion_main!(benches);
