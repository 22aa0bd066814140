use scrollscape_common::Pointer;

/// Window size in logical pixels plus the display scale factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub scale_factor: f32,
    /// Cap on the pixel ratio the surface renders at.
    pub max_pixel_ratio: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, scale_factor: f32, max_pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            scale_factor,
            max_pixel_ratio,
        }
    }

    /// Build from a physical surface size, as reported by the windowing layer.
    pub fn from_physical(width: u32, height: u32, scale_factor: f64, max_pixel_ratio: f32) -> Self {
        let scale = if scale_factor > 0.0 { scale_factor } else { 1.0 };
        Self::new(
            (width as f64 / scale) as f32,
            (height as f64 / scale) as f32,
            scale as f32,
            max_pixel_ratio,
        )
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        tracing::debug!(width, height, "viewport resized");
        self.width = width;
        self.height = height;
    }

    pub fn set_scale_factor(&mut self, scale_factor: f32) {
        self.scale_factor = scale_factor;
    }

    /// Width over height; 1 for a collapsed viewport.
    pub fn aspect(&self) -> f32 {
        if self.width > 0.0 && self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    /// Device pixel ratio, capped at `max_pixel_ratio`.
    pub fn pixel_ratio(&self) -> f32 {
        let ratio = if self.scale_factor > 0.0 {
            self.scale_factor
        } else {
            1.0
        };
        ratio.min(self.max_pixel_ratio)
    }

    /// Size of the render target in physical pixels, never below 1x1.
    pub fn render_size(&self) -> (u32, u32) {
        let ratio = self.pixel_ratio();
        let px = |logical: f32| ((logical.max(0.0) * ratio).ceil() as u32).max(1);
        (px(self.width), px(self.height))
    }

    /// Normalize a cursor position in logical pixels to `[-0.5, 0.5]` per axis.
    /// A collapsed axis reads as centered.
    pub fn pointer_at(&self, x: f32, y: f32) -> Pointer {
        let axis = |v: f32, extent: f32| if extent > 0.0 { v / extent - 0.5 } else { 0.0 };
        Pointer::new(axis(x, self.width), axis(y, self.height))
    }

    /// Same as [`Viewport::pointer_at`] for a position in physical pixels.
    pub fn pointer_at_physical(&self, x: f64, y: f64) -> Pointer {
        let scale = if self.scale_factor > 0.0 {
            self.scale_factor as f64
        } else {
            1.0
        };
        self.pointer_at((x / scale) as f32, (y / scale) as f32)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0, 1.0, 2.0)
    }
}
