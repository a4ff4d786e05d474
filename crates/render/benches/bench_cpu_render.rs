use std::hint::black_box;
use std::time::Instant;

use glam::{Vec2, Vec3};
use raycast_common::CameraState;
use raycast_render::{CpuRenderer, Frame, Scene, Viewport, evaluate};

fn bench_single_pixel(iterations: usize) {
    let view = CameraState::new(Vec3::ZERO, 10.0, 5.0).view();
    let scene = Scene::default();

    let start = Instant::now();
    for i in 0..iterations {
        let u = (i % 256) as f32 / 255.0;
        let _ = black_box(evaluate(
            black_box(&view),
            black_box(&scene),
            Vec2::new(u, 0.5),
            black_box(1.5),
        ));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  evaluate ({iterations} pixels): {per_iter:?}/pixel, total {elapsed:?}");
}

fn bench_frame(width: u32, height: u32, iterations: usize) {
    let renderer = CpuRenderer::default();
    let viewport = Viewport::new(width, height).expect("bench viewport is non-empty");
    let mut frame = Frame::new(viewport);

    let start = Instant::now();
    for i in 0..iterations {
        // Sweep yaw so successive frames differ.
        let view = CameraState::new(Vec3::ZERO, i as f32 * 0.5, 0.0).view();
        renderer.render_frame(black_box(&view), viewport, &mut frame);
        black_box(frame.pixels());
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  frame ({width}x{height}, {iterations} iters): {per_iter:?}/frame, total {elapsed:?}"
    );
}

fn main() {
    println!("=== CPU Ray Cast Benchmarks ===\n");

    println!("Single pixel:");
    bench_single_pixel(1_000_000);

    println!("\nFull frame (rayon):");
    bench_frame(320, 240, 100);
    bench_frame(640, 480, 50);
    bench_frame(1280, 720, 20);

    println!("\n=== Done ===");
}
