use crate::evaluator::{evaluate, primary_ray};
use crate::scene::{Sample, Scene};
use crate::viewport::{Viewport, ViewportError};
use rayon::prelude::*;
use raycast_common::CameraView;

/// Backend-agnostic renderer interface.
///
/// A renderer reads a camera snapshot and produces one image for the given
/// viewport. It never writes back to the camera.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given view.
    fn render(&self, view: &CameraView, viewport: Viewport) -> Self::Output;
}

/// A tightly packed RGBA8 image, row 0 at the top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    viewport: Viewport,
    pixels: Vec<u8>,
}

impl Frame {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            pixels: vec![0; viewport.rgba8_len()],
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// RGBA8 of pixel `(x, y)`. Panics when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        assert!(x < self.viewport.width() && y < self.viewport.height());
        let i = (y as usize * self.viewport.width() as usize + x as usize) * 4;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    /// Reallocate for a new viewport if the size changed.
    pub fn resize(&mut self, viewport: Viewport) {
        if self.viewport != viewport {
            self.viewport = viewport;
            self.pixels.resize(viewport.rgba8_len(), 0);
        }
    }
}

/// Ray caster that evaluates every pixel on the rayon thread pool.
#[derive(Debug, Clone, Default)]
pub struct CpuRenderer {
    scene: Scene,
}

impl CpuRenderer {
    pub fn new(scene: Scene) -> Self {
        Self { scene }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Evaluate all pixels into an existing RGBA8 buffer, one row per task.
    pub fn render_into(
        &self,
        view: &CameraView,
        viewport: Viewport,
        pixels: &mut [u8],
    ) -> Result<(), ViewportError> {
        if pixels.len() != viewport.rgba8_len() {
            return Err(ViewportError::BufferSize {
                expected: viewport.rgba8_len(),
                actual: pixels.len(),
            });
        }

        let _span = tracing::debug_span!(
            "cpu_render",
            width = viewport.width(),
            height = viewport.height()
        )
        .entered();

        let aspect = viewport.aspect();
        let row_bytes = viewport.width() as usize * 4;
        pixels
            .par_chunks_exact_mut(row_bytes)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, px) in row.chunks_exact_mut(4).enumerate() {
                    let uv = viewport.pixel_uv(x as u32, y as u32);
                    px.copy_from_slice(&evaluate(view, &self.scene, uv, aspect).to_rgba8());
                }
            });
        Ok(())
    }

    /// Render into a reusable frame, resizing it to `viewport` first.
    pub fn render_frame(&self, view: &CameraView, viewport: Viewport, frame: &mut Frame) {
        frame.resize(viewport);
        // Sizes match after resize, so this cannot fail.
        if let Err(e) = self.render_into(view, viewport, frame.pixels_mut()) {
            tracing::error!("cpu render skipped: {e}");
        }
    }
}

impl Renderer for CpuRenderer {
    type Output = Frame;

    fn render(&self, view: &CameraView, viewport: Viewport) -> Frame {
        let mut frame = Frame::new(viewport);
        self.render_frame(view, viewport, &mut frame);
        frame
    }
}

/// Debug renderer that draws the scene as text, one character per cell.
///
/// Terminal cells are roughly twice as tall as they are wide, so the
/// evaluation aspect is scaled by `cell_aspect`.
#[derive(Debug, Clone)]
pub struct AsciiRenderer {
    scene: Scene,
    pub cell_aspect: f32,
}

impl Default for AsciiRenderer {
    fn default() -> Self {
        Self::new(Scene::default())
    }
}

impl AsciiRenderer {
    pub fn new(scene: Scene) -> Self {
        Self {
            scene,
            cell_aspect: 0.5,
        }
    }

    fn glyph(sample: Sample) -> char {
        match sample {
            Sample::Background => ' ',
            Sample::Surface { .. } => '.',
            Sample::Cell { hit, .. } => {
                let n = hit.normal;
                if n.x != 0.0 {
                    '|'
                } else if n.y != 0.0 {
                    '='
                } else {
                    '#'
                }
            }
        }
    }
}

impl Renderer for AsciiRenderer {
    type Output = String;

    fn render(&self, view: &CameraView, viewport: Viewport) -> String {
        let aspect = viewport.aspect() * self.cell_aspect;
        let rows = viewport.height() as usize;
        let mut out = String::with_capacity((viewport.width() as usize + 1) * rows);
        for y in 0..viewport.height() {
            for x in 0..viewport.width() {
                let ray = primary_ray(view, viewport.pixel_uv(x, y), aspect);
                out.push(Self::glyph(self.scene.cast(&ray)));
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use raycast_common::CameraState;

    #[test]
    fn cpu_frame_matches_serial_evaluation() {
        let renderer = CpuRenderer::default();
        let view = CameraState::new(Vec3::new(0.2, 0.1, 0.0), 5.0, -3.0).view();
        let viewport = Viewport::new(33, 17).unwrap();
        let frame = renderer.render(&view, viewport);

        assert_eq!(frame.pixels().len(), viewport.rgba8_len());
        for y in 0..viewport.height() {
            for x in 0..viewport.width() {
                let expected = evaluate(
                    &view,
                    renderer.scene(),
                    viewport.pixel_uv(x, y),
                    viewport.aspect(),
                );
                assert_eq!(frame.pixel(x, y), expected.to_rgba8(), "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn cpu_frames_are_repeatable() {
        let renderer = CpuRenderer::default();
        let view = CameraView::default();
        let viewport = Viewport::new(64, 48).unwrap();
        assert_eq!(renderer.render(&view, viewport), renderer.render(&view, viewport));
    }

    #[test]
    fn looking_away_fills_with_background() {
        let renderer = CpuRenderer::default();
        let view = CameraState::new(Vec3::ZERO, 180.0, 0.0).view();
        let frame = renderer.render(&view, Viewport::new(8, 8).unwrap());
        let bg = renderer.scene().background_color.to_rgba8();
        assert!(frame.pixels().chunks_exact(4).all(|px| px == bg));
    }

    #[test]
    fn render_into_rejects_wrong_buffer() {
        let renderer = CpuRenderer::default();
        let viewport = Viewport::new(4, 4).unwrap();
        let mut buf = vec![0u8; 10];
        let err = renderer
            .render_into(&CameraView::default(), viewport, &mut buf)
            .unwrap_err();
        assert_eq!(
            err,
            ViewportError::BufferSize {
                expected: 64,
                actual: 10
            }
        );
    }

    #[test]
    fn render_frame_follows_resize() {
        let renderer = CpuRenderer::default();
        let mut frame = Frame::new(Viewport::new(4, 4).unwrap());
        let bigger = Viewport::new(10, 6).unwrap();
        renderer.render_frame(&CameraView::default(), bigger, &mut frame);
        assert_eq!(frame.viewport(), bigger);
        assert_eq!(frame.pixels().len(), 10 * 6 * 4);
    }

    #[test]
    fn ascii_preview_shape() {
        let renderer = AsciiRenderer::default();
        let out = renderer.render(&CameraView::default(), Viewport::new(41, 21).unwrap());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 21);
        assert!(lines.iter().all(|l| l.chars().count() == 41));
        // Center cell looks straight at the front face of the cell at (0, 0, 2).
        assert_eq!(lines[10].chars().nth(20), Some('#'));
    }
}
