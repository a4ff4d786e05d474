use glam::Vec2;

/// Errors from viewport construction and frame buffer validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewportError {
    #[error("viewport must be non-empty, got {width}x{height}")]
    Empty { width: u32, height: u32 },
    #[error("frame buffer holds {actual} bytes, viewport needs {expected}")]
    BufferSize { expected: usize, actual: usize },
}

/// Output image dimensions in pixels. Always at least 1x1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Viewport {
    width: u32,
    height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Result<Self, ViewportError> {
        if width == 0 || height == 0 {
            return Err(ViewportError::Empty { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Width over height.
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Bytes in a tightly packed RGBA8 frame.
    pub fn rgba8_len(&self) -> usize {
        self.pixel_count() * 4
    }

    /// Normalized coordinate of the center of pixel `(x, y)`, where row 0 is
    /// the top of the image and v grows upward.
    pub fn pixel_uv(&self, x: u32, y: u32) -> Vec2 {
        Vec2::new(
            (x as f32 + 0.5) / self.width as f32,
            1.0 - (y as f32 + 0.5) / self.height as f32,
        )
    }

    /// Apply a window resize. Zero-sized client areas (minimized windows)
    /// keep the previous dimensions. Returns whether the size changed.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        match Self::new(width, height) {
            Ok(next) if next != *self => {
                *self = next;
                tracing::debug!(width, height, "viewport resized");
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty() {
        assert_eq!(
            Viewport::new(0, 10),
            Err(ViewportError::Empty {
                width: 0,
                height: 10
            })
        );
        assert!(Viewport::new(10, 0).is_err());
    }

    #[test]
    fn aspect_and_sizes() {
        let vp = Viewport::new(640, 480).unwrap();
        assert!((vp.aspect() - 4.0 / 3.0).abs() < 1e-6);
        assert_eq!(vp.pixel_count(), 640 * 480);
        assert_eq!(vp.rgba8_len(), 640 * 480 * 4);
    }

    #[test]
    fn pixel_uv_is_top_down_center_sampled() {
        let vp = Viewport::new(2, 2).unwrap();
        assert_eq!(vp.pixel_uv(0, 0), Vec2::new(0.25, 0.75));
        assert_eq!(vp.pixel_uv(1, 1), Vec2::new(0.75, 0.25));
    }

    #[test]
    fn resize_ignores_minimized_window() {
        let mut vp = Viewport::new(640, 480).unwrap();
        assert!(!vp.resize(0, 0));
        assert_eq!((vp.width(), vp.height()), (640, 480));
        assert!(vp.resize(800, 600));
        assert!(!vp.resize(800, 600));
        assert_eq!((vp.width(), vp.height()), (800, 600));
    }
}
