use anyhow::Result;
use clap::{Parser, ValueEnum};
use egui::Context as EguiContext;
use raycast_camera::{CameraConfig, CameraController};
use raycast_common::CameraState;
use raycast_input::{DirectionalKeys, InputAccumulator};
use raycast_render::{CpuRenderer, Frame, NormalColoring, Scene, Viewport};
use raycast_render_wgpu::{GpuContext, WgpuRenderer};
use raycast_tools::{CameraInspector, FrameClock, FrameStats};
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "raycast-desktop", about = "Interactive ray casting viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Where pixels are evaluated at startup (Tab switches at runtime)
    #[arg(long, value_enum, default_value_t = Backend::Gpu)]
    backend: Backend,

    /// Initial window width in pixels
    #[arg(long, default_value = "640")]
    width: u32,

    /// Initial window height in pixels
    #[arg(long, default_value = "480")]
    height: u32,

    /// Degrees of rotation per mouse unit
    #[arg(long, default_value = "0.5")]
    sensitivity: f32,

    /// Movement speed in units per second
    #[arg(long, default_value = "5.0")]
    speed: f32,

    /// How box normals map to colors
    #[arg(long, value_enum, default_value_t = Coloring::Clamped)]
    coloring: Coloring,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Backend {
    /// Fragment shader on the GPU
    Gpu,
    /// rayon thread pool, uploaded as a texture
    Cpu,
}

impl Backend {
    fn toggled(self) -> Self {
        match self {
            Self::Gpu => Self::Cpu,
            Self::Cpu => Self::Gpu,
        }
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

/// Movement bit driven by a physical key, if any.
fn directional_key(key: KeyCode) -> Option<DirectionalKeys> {
    match key {
        KeyCode::KeyW => Some(DirectionalKeys::FORWARD),
        KeyCode::KeyS => Some(DirectionalKeys::BACK),
        KeyCode::KeyA => Some(DirectionalKeys::LEFT),
        KeyCode::KeyD => Some(DirectionalKeys::RIGHT),
        KeyCode::KeyE | KeyCode::Space => Some(DirectionalKeys::UP),
        KeyCode::KeyQ | KeyCode::ControlLeft => Some(DirectionalKeys::DOWN),
        _ => None,
    }
}

/// Events the app must see even when the overlay consumed them. Releases
/// always reach the accumulator so no key stays held and a right-button
/// release over the panel still ends mouse look.
fn bypasses_overlay(event: &WindowEvent) -> bool {
    matches!(
        event,
        WindowEvent::KeyboardInput {
            event: KeyEvent {
                state: ElementState::Released,
                ..
            },
            ..
        } | WindowEvent::MouseInput {
            state: ElementState::Released,
            button: MouseButton::Right,
            ..
        } | WindowEvent::Focused(_)
    )
}

/// Application state.
struct AppState {
    camera: CameraState,
    controller: CameraController,
    input: InputAccumulator,
    viewport: Viewport,
    backend: Backend,
    cpu: CpuRenderer,
    frame: Frame,
    clock: FrameClock,
    stats: FrameStats,
    show_overlay: bool,
    adapter: Option<String>,
    mouse_captured: bool,
    // Sub-unit mouse motion carried to the next event
    mouse_residual: (f64, f64),
}

impl AppState {
    fn new(backend: Backend, config: CameraConfig, viewport: Viewport, scene: Scene) -> Self {
        Self {
            camera: CameraState::default(),
            controller: CameraController::new(config),
            input: InputAccumulator::new(),
            viewport,
            backend,
            cpu: CpuRenderer::new(scene),
            frame: Frame::new(viewport),
            clock: FrameClock::default(),
            stats: FrameStats::new(),
            show_overlay: true,
            adapter: None,
            mouse_captured: false,
            mouse_residual: (0.0, 0.0),
        }
    }

    /// Returns true when the app should close.
    fn handle_key(&mut self, key: KeyCode, pressed: bool, repeat: bool) -> bool {
        if let Some(keys) = directional_key(key) {
            self.input.set_keys(keys, pressed);
            return false;
        }

        if !pressed || repeat {
            return false;
        }

        match key {
            KeyCode::Tab => {
                self.backend = self.backend.toggled();
                tracing::debug!(backend = ?self.backend, "switched backend");
            }
            KeyCode::F1 => {
                self.show_overlay = !self.show_overlay;
            }
            KeyCode::Escape => return true,
            _ => {}
        }
        false
    }

    fn handle_mouse_motion(&mut self, dx: f64, dy: f64) {
        if !self.mouse_captured {
            return;
        }
        let (rx, ry) = self.mouse_residual;
        let (x, y) = (rx + dx, ry + dy);
        let (whole_x, whole_y) = (x.round(), y.round());
        self.mouse_residual = (x - whole_x, y - whole_y);
        self.input.add_mouse_delta(whole_x as i32, whole_y as i32);
    }

    fn release_input(&mut self) {
        self.input.release_all();
        self.mouse_captured = false;
        self.mouse_residual = (0.0, 0.0);
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        if !self.show_overlay {
            return;
        }

        let summary = CameraInspector::summary(&self.camera);

        egui::SidePanel::left("overlay")
            .default_width(240.0)
            .show(ctx, |ui| {
                ui.heading("Ray Tracing");
                ui.separator();
                ui.label(format!(
                    "FPS: {:.0}  ({:.2} ms frame, {:.2} ms render)",
                    self.stats.fps(),
                    self.stats.last_dt() * 1000.0,
                    self.stats.render_time().as_secs_f64() * 1000.0
                ));
                if let Some(adapter) = &self.adapter {
                    ui.label(format!("Adapter: {adapter}"));
                }
                ui.label(format!(
                    "Viewport: {} x {}",
                    self.viewport.width(),
                    self.viewport.height()
                ));
                ui.horizontal(|ui| {
                    ui.label("Backend:");
                    ui.radio_value(&mut self.backend, Backend::Gpu, "GPU");
                    ui.radio_value(&mut self.backend, Backend::Cpu, "CPU");
                });
                ui.separator();

                ui.heading("Camera");
                ui.label(format!(
                    "Position: ({:.2}, {:.2}, {:.2})",
                    summary.position.x, summary.position.y, summary.position.z
                ));
                ui.label(format!("Yaw: {:.1}  Pitch: {:.1}", summary.yaw, summary.pitch));
                ui.label(format!(
                    "Forward: ({:.3}, {:.3}, {:.3})",
                    summary.forward.x, summary.forward.y, summary.forward.z
                ));
                if ui.button("Reset camera").clicked() {
                    self.camera = CameraState::default();
                }

                ui.separator();
                let config = self.controller.config_mut();
                ui.add(
                    egui::Slider::new(&mut config.sensitivity, 0.05..=2.0).text("Sensitivity"),
                );
                ui.add(egui::Slider::new(&mut config.speed, 0.5..=20.0).text("Speed"));

                ui.separator();
                ui.small("RMB: Look | WASD: Move | E/Q: Up/Down");
                ui.small("Tab: Backend | F1: Overlay | Esc: Quit");
            });
    }
}

/// GPU resources, created once the window exists.
struct Gpu {
    ctx: GpuContext,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

struct GpuApp {
    state: AppState,
    scene: Scene,
    initial_size: PhysicalSize<u32>,
    window: Option<Arc<Window>>,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
}

impl GpuApp {
    fn new(cli: &Cli) -> Result<Self> {
        let scene = Scene {
            normal_coloring: cli.coloring.into(),
            ..Scene::default()
        };
        let viewport = Viewport::new(cli.width, cli.height)?;
        let config = CameraConfig::new(cli.sensitivity, cli.speed)?;
        Ok(Self {
            state: AppState::new(cli.backend, config, viewport, scene),
            scene,
            initial_size: PhysicalSize::new(cli.width, cli.height),
            window: None,
            gpu: None,
            egui_ctx: EguiContext::default(),
        })
    }

    fn init_gpu(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title("Ray Tracing")
            .with_inner_size(self.initial_size);
        let window = Arc::new(event_loop.create_window(attrs)?);

        let size = window.inner_size();
        let ctx = GpuContext::new(window.clone(), size.width, size.height)?;
        self.state.viewport.resize(size.width, size.height);

        let renderer = WgpuRenderer::new(&ctx.device, ctx.format(), self.scene);
        let info = ctx.adapter_info();
        self.state.adapter = Some(format!("{} ({})", info.name, info.backend.to_str()));

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&ctx.device, ctx.format(), None, 1, false);

        self.window = Some(window);
        self.gpu = Some(Gpu {
            ctx,
            renderer,
            egui_winit,
            egui_renderer,
        });
        Ok(())
    }

    fn set_mouse_captured(&mut self, captured: bool) {
        self.state.mouse_captured = captured;
        if let Some(window) = &self.window {
            window.set_cursor_visible(!captured);
        }
    }

    fn redraw(&mut self) {
        let dt = self.state.clock.tick();
        self.state
            .controller
            .step(&mut self.state.camera, &self.state.input, dt);

        let (Some(window), Some(gpu)) = (&self.window, &mut self.gpu) else {
            return;
        };

        let output = match gpu.ctx.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.ctx.reconfigure();
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let target = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let view = self.state.camera.view();
        let started = Instant::now();
        match self.state.backend {
            Backend::Gpu => {
                gpu.renderer.render(
                    &gpu.ctx.device,
                    &gpu.ctx.queue,
                    &target,
                    &view,
                    self.state.viewport,
                );
            }
            Backend::Cpu => {
                self.state
                    .cpu
                    .render_frame(&view, self.state.viewport, &mut self.state.frame);
                gpu.renderer.present_frame(
                    &gpu.ctx.device,
                    &gpu.ctx.queue,
                    &target,
                    &self.state.frame,
                );
            }
        }
        self.state.stats.record(dt, started.elapsed());

        let raw_input = gpu.egui_winit.take_egui_input(window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            self.state.draw_ui(ctx);
        });
        gpu.egui_winit
            .handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.ctx.config.width, gpu.ctx.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        {
            let (device, queue) = (&gpu.ctx.device, &gpu.ctx.queue);
            let egui_renderer = &mut gpu.egui_renderer;
            for (id, image_delta) in &full_output.textures_delta.set {
                egui_renderer.update_texture(device, queue, *id, image_delta);
            }
            let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
            egui_renderer.update_buffers(
                device,
                queue,
                &mut encoder,
                &paint_jobs,
                &screen_descriptor,
            );
            {
                let mut pass = encoder
                    .begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("egui_pass"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                            view: &target,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Load,
                                store: wgpu::StoreOp::Store,
                            },
                        })],
                        depth_stencil_attachment: None,
                        ..Default::default()
                    })
                    .forget_lifetime();
                egui_renderer.render(&mut pass, &paint_jobs, &screen_descriptor);
            }
            queue.submit(std::iter::once(encoder.finish()));
            for id in &full_output.textures_delta.free {
                egui_renderer.free_texture(id);
            }
        }

        output.present();
        window.request_redraw();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init_gpu(event_loop) {
            tracing::error!("failed to initialize window: {e:#}");
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let (Some(window), Some(gpu)) = (&self.window, &mut self.gpu) {
            let response = gpu.egui_winit.on_window_event(window, &event);
            if response.consumed && !bypasses_overlay(&event) {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if self.state.viewport.resize(new_size.width, new_size.height) {
                    if let Some(gpu) = &mut self.gpu {
                        gpu.ctx.resize(new_size.width, new_size.height);
                    }
                }
            }
            WindowEvent::Focused(false) => {
                self.state.release_input();
                self.set_mouse_captured(false);
            }
            WindowEvent::Focused(true) => {
                // Time spent unfocused is not a frame.
                self.state.clock.reset();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        repeat,
                        ..
                    },
                ..
            } => {
                if self
                    .state
                    .handle_key(key, key_state == ElementState::Pressed, repeat)
                {
                    event_loop.exit();
                }
            }
            WindowEvent::MouseInput {
                button: MouseButton::Right,
                state: btn_state,
                ..
            } => {
                self.set_mouse_captured(btn_state == ElementState::Pressed);
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.state.handle_mouse_motion(delta.0, delta.1);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!(
        backend = ?cli.backend,
        render = raycast_render_wgpu::crate_info(),
        "raycast-desktop starting"
    );

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(&cli)?;
    event_loop.run_app(&mut app)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        AppState::new(
            Backend::Gpu,
            CameraConfig::default(),
            Viewport::new(64, 48).unwrap(),
            Scene::default(),
        )
    }

    fn mouse_input(state: ElementState, button: MouseButton) -> WindowEvent {
        WindowEvent::MouseInput {
            // SAFETY: only compared by the matcher, never passed to winit.
            device_id: unsafe { winit::event::DeviceId::dummy() },
            state,
            button,
        }
    }

    #[test]
    fn cli_defaults_match_original_window() {
        let cli = Cli::parse_from(["raycast-desktop"]);
        assert_eq!((cli.width, cli.height), (640, 480));
        assert_eq!(cli.backend, Backend::Gpu);
        assert_eq!(cli.sensitivity, 0.5);
        assert_eq!(cli.speed, 5.0);
    }

    #[test]
    fn movement_keys_feed_the_accumulator() {
        let mut s = state();
        s.handle_key(KeyCode::KeyW, true, false);
        s.handle_key(KeyCode::KeyE, true, false);
        assert_eq!(
            s.input.keys(),
            DirectionalKeys::FORWARD | DirectionalKeys::UP
        );
        s.handle_key(KeyCode::KeyW, false, false);
        assert_eq!(s.input.keys(), DirectionalKeys::UP);
    }

    #[test]
    fn tab_toggles_backend_and_ignores_repeat() {
        let mut s = state();
        s.handle_key(KeyCode::Tab, true, false);
        assert_eq!(s.backend, Backend::Cpu);
        s.handle_key(KeyCode::Tab, true, true);
        assert_eq!(s.backend, Backend::Cpu);
        s.handle_key(KeyCode::Tab, true, false);
        assert_eq!(s.backend, Backend::Gpu);
    }

    #[test]
    fn escape_requests_exit() {
        let mut s = state();
        assert!(s.handle_key(KeyCode::Escape, true, false));
        assert!(!s.handle_key(KeyCode::Escape, false, false));
    }

    #[test]
    fn mouse_motion_only_counts_while_captured() {
        let mut s = state();
        s.handle_mouse_motion(10.0, 5.0);
        assert!(s.input.pending_mouse_delta().is_zero());

        s.mouse_captured = true;
        s.handle_mouse_motion(0.4, -0.4);
        s.handle_mouse_motion(0.4, -0.4);
        let delta = s.input.pending_mouse_delta();
        assert_eq!((delta.dx, delta.dy), (1, -1));
    }

    #[test]
    fn focus_loss_releases_everything() {
        let mut s = state();
        s.mouse_captured = true;
        s.handle_key(KeyCode::KeyA, true, false);
        s.release_input();
        assert!(s.input.keys().is_empty());
        assert!(!s.mouse_captured);
    }

    #[test]
    fn right_button_release_bypasses_overlay() {
        assert!(bypasses_overlay(&mouse_input(
            ElementState::Released,
            MouseButton::Right
        )));
        assert!(!bypasses_overlay(&mouse_input(
            ElementState::Pressed,
            MouseButton::Right
        )));
        assert!(!bypasses_overlay(&mouse_input(
            ElementState::Released,
            MouseButton::Left
        )));
        assert!(bypasses_overlay(&WindowEvent::Focused(false)));
        assert!(!bypasses_overlay(&WindowEvent::CloseRequested));
    }

    #[test]
    fn invalid_tunables_are_rejected_at_startup() {
        let cli = Cli::parse_from(["raycast-desktop", "--sensitivity", "nan"]);
        assert!(GpuApp::new(&cli).is_err());
        let cli = Cli::parse_from(["raycast-desktop", "--speed", "0"]);
        assert!(GpuApp::new(&cli).is_err());
    }
}
