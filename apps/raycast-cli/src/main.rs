use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use glam::Vec3;
use image::{ImageFormat, RgbaImage};
use raycast_camera::{CameraConfig, CameraController};
use raycast_common::CameraState;
use raycast_input::{DirectionalKeys, InputAccumulator};
use raycast_render::{AsciiRenderer, CpuRenderer, NormalColoring, Renderer, Scene, Viewport};
use raycast_tools::CameraInspector;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "raycast-cli", about = "Headless ray casting tools")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions and the scene
    Info,
    /// Render one frame to a PNG file
    Render {
        #[command(flatten)]
        pose: PoseArgs,
        /// Image width in pixels
        #[arg(long, default_value = "640")]
        width: u32,
        /// Image height in pixels
        #[arg(long, default_value = "480")]
        height: u32,
        /// How box normals map to colors
        #[arg(long, value_enum, default_value_t = Coloring::Clamped)]
        coloring: Coloring,
        /// Output file
        #[arg(short, long, default_value = "frame.png")]
        out: PathBuf,
    },
    /// Print the view as ASCII art
    Preview {
        #[command(flatten)]
        pose: PoseArgs,
        /// Columns of characters
        #[arg(long, default_value = "80")]
        cols: u32,
        /// Rows of characters
        #[arg(long, default_value = "30")]
        rows: u32,
    },
    /// Drive the camera with a fixed input script and print each pose
    Fly {
        #[command(flatten)]
        pose: PoseArgs,
        /// Number of frames to simulate
        #[arg(short, long, default_value = "60")]
        frames: u32,
        /// Seconds per frame
        #[arg(long, default_value = "0.016666668")]
        dt: f32,
        /// Keys held every frame, any of "wasdeq"
        #[arg(short, long)]
        keys: Option<DirectionalKeys>,
        /// Mouse x motion per frame
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        mouse_dx: i32,
        /// Mouse y motion per frame
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        mouse_dy: i32,
        /// Degrees of rotation per mouse unit
        #[arg(long, default_value = "0.5")]
        sensitivity: f32,
        /// Movement speed in units per second
        #[arg(long, default_value = "5.0")]
        speed: f32,
        /// Emit one JSON object per frame instead of text
        #[arg(long)]
        json: bool,
    },
}

/// Starting camera pose.
#[derive(Args, Debug, Clone, Copy)]
struct PoseArgs {
    /// Camera position as "x,y,z"
    #[arg(long, default_value = "0,0,0", value_parser = parse_vec3, allow_hyphen_values = true)]
    pos: Vec3,
    /// Yaw in degrees
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    yaw: f32,
    /// Pitch in degrees
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    pitch: f32,
}

impl PoseArgs {
    fn state(&self) -> CameraState {
        CameraState::new(self.pos, self.yaw, self.pitch)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Coloring {
    Clamped,
    Biased,
}

impl From<Coloring> for NormalColoring {
    fn from(c: Coloring) -> Self {
        match c {
            Coloring::Clamped => NormalColoring::Clamped,
            Coloring::Biased => NormalColoring::Biased,
        }
    }
}

fn parse_vec3(s: &str) -> Result<Vec3, String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<f32>().map_err(|e| format!("{p:?}: {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    match parts[..] {
        [x, y, z] => Ok(Vec3::new(x, y, z)),
        _ => Err(format!("expected x,y,z, got {} components", parts.len())),
    }
}

fn render_png(
    pose: PoseArgs,
    viewport: Viewport,
    coloring: Coloring,
    out: &Path,
) -> anyhow::Result<()> {
    let scene = Scene {
        normal_coloring: coloring.into(),
        ..Scene::default()
    };
    let renderer = CpuRenderer::new(scene);

    let started = Instant::now();
    let frame = renderer.render(&pose.state().view(), viewport);
    tracing::info!(elapsed = ?started.elapsed(), "frame rendered");

    let img = RgbaImage::from_raw(viewport.width(), viewport.height(), frame.into_pixels())
        .context("frame buffer does not match image size")?;
    img.save_with_format(out, ImageFormat::Png)
        .with_context(|| format!("failed to write {}", out.display()))?;
    println!(
        "Wrote {}x{} frame to {}",
        viewport.width(),
        viewport.height(),
        out.display()
    );
    Ok(())
}

/// Replays the same input every frame, the way a held key and a steady
/// mouse drag would arrive from the window.
fn fly(
    start: CameraState,
    controller: &CameraController,
    frames: u32,
    dt: f32,
    keys: DirectionalKeys,
    mouse: (i32, i32),
) -> Vec<CameraState> {
    let input = InputAccumulator::new();
    input.set_keys(keys, true);
    let mut state = start;
    let mut poses = Vec::with_capacity(frames as usize);
    for _ in 0..frames {
        input.add_mouse_delta(mouse.0, mouse.1);
        controller.step(&mut state, &input, dt);
        poses.push(state);
    }
    poses
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info => {
            let scene = Scene::default();
            println!("raycast-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("input: {}", raycast_input::crate_info());
            println!("camera: {}", raycast_camera::crate_info());
            println!("render: {}", raycast_render::crate_info());
            println!("tools: {}", raycast_tools::crate_info());
            println!(
                "scene: sphere center={} radius={}, cell half extents={}",
                scene.sphere.center, scene.sphere.radius, scene.cell_half_extents
            );
        }
        Commands::Render {
            pose,
            width,
            height,
            coloring,
            out,
        } => {
            let viewport = Viewport::new(width, height)?;
            render_png(pose, viewport, coloring, &out)?;
        }
        Commands::Preview { pose, cols, rows } => {
            let viewport = Viewport::new(cols, rows)?;
            let text = AsciiRenderer::default().render(&pose.state().view(), viewport);
            print!("{text}");
            println!("{}", CameraInspector::summary(&pose.state()));
        }
        Commands::Fly {
            pose,
            frames,
            dt,
            keys,
            mouse_dx,
            mouse_dy,
            sensitivity,
            speed,
            json,
        } => {
            let controller = CameraController::new(CameraConfig::new(sensitivity, speed)?);
            let keys = keys.unwrap_or_default();
            let poses = fly(pose.state(), &controller, frames, dt, keys, (mouse_dx, mouse_dy));
            for (i, state) in poses.iter().enumerate() {
                if json {
                    println!("{}", serde_json::to_string(state)?);
                } else {
                    println!("{:>4} {}", i + 1, CameraInspector::summary(state));
                }
            }
        }
    }

    Ok(())
}
