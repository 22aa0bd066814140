use std::hint::black_box;
use std::time::Instant;

use scrollscape_common::Pointer;
use scrollscape_kernel::{FrameInput, Scene, SceneConfig};

fn bench_animate(particle_count: u32, frames: usize) {
    let config = SceneConfig {
        particles: scrollscape_kernel::ParticleConfig {
            count: particle_count,
            ..Default::default()
        },
        ..SceneConfig::default()
    };
    let mut scene = Scene::new(&config);

    let start = Instant::now();
    for i in 0..frames {
        let t = i as f32 / 60.0;
        let input = FrameInput {
            elapsed: t,
            delta: 1.0 / 60.0,
            scroll_y: (i % 1600) as f32,
            viewport_height: 800.0,
            pointer: Pointer::new((t * 0.7).sin() * 0.5, (t * 0.3).cos() * 0.5),
        };
        black_box(scene.animate(black_box(&input)));
    }
    let elapsed = start.elapsed();
    let per_frame = elapsed / frames as u32;
    println!(
        "  animate ({particle_count} particles, {frames} frames): {per_frame:?}/frame, total {elapsed:?}"
    );
}

fn bench_setup(particle_count: u32, iterations: usize) {
    let config = SceneConfig {
        particles: scrollscape_kernel::ParticleConfig {
            count: particle_count,
            ..Default::default()
        },
        ..SceneConfig::default()
    };

    let start = Instant::now();
    for _ in 0..iterations {
        black_box(Scene::new(black_box(&config)));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  setup ({particle_count} particles, {iterations} iters): {per_iter:?}/iter");
}

fn main() {
    println!("scrollscape-kernel benchmarks");
    bench_setup(30, 1_000);
    bench_setup(10_000, 10);
    bench_animate(30, 100_000);
    bench_animate(10_000, 100_000);
}
