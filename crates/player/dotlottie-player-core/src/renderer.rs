//! Rendering seam.
//!
//! Vector rasterization is supplied by the host through [`Renderer`]. The
//! built-in [`SoftwareRenderer`] composes the canvas background and tracks
//! what would be drawn, which is enough for headless playback and tests.

use crate::config::Layout;
use crate::lottie::LottieAnimation;

/// Rasterizes an animation into the player's ARGB pixel buffer.
pub trait Renderer: Send {
    /// Prepare `animation` for a `width` x `height` canvas.
    fn load_animation(&mut self, animation: &LottieAnimation, width: u32, height: u32);
    fn set_frame(&mut self, frame: f32);
    fn resize(&mut self, width: u32, height: u32);
    fn set_viewport(&mut self, x: i32, y: i32, w: i32, h: i32);
    /// Packed `0xRRGGBBAA`.
    fn set_background_color(&mut self, color: u32);
    fn set_layout(&mut self, layout: &Layout);
    /// `None` removes the active theme.
    fn load_theme(&mut self, theme: Option<&str>);
    /// Draw the current frame into `buffer` (row-major, `width * height`).
    fn draw(&mut self, buffer: &mut [u32]);
}

/// Convert packed `0xRRGGBBAA` into the buffer's `0xAARRGGBB`.
#[inline]
pub fn rgba_to_argb(color: u32) -> u32 {
    (color >> 8) | (color << 24)
}

/// Background-only renderer.
#[derive(Debug, Default)]
pub struct SoftwareRenderer {
    width: u32,
    height: u32,
    viewport: Option<(i32, i32, i32, i32)>,
    background: u32,
    layout: Layout,
    frame: f32,
    content: Option<(f32, f32)>,
    theme: Option<String>,
    draws: u64,
}

impl SoftwareRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frame passed to the last `set_frame`.
    pub fn frame(&self) -> f32 {
        self.frame
    }

    pub fn draw_count(&self) -> u64 {
        self.draws
    }

    pub fn theme(&self) -> Option<&str> {
        self.theme.as_deref()
    }

    /// Where the animation lands on the canvas: placed in the viewport by the
    /// layout, then moved to the viewport origin.
    pub fn content_rect(&self) -> Option<(f32, f32, f32, f32)> {
        let content = self.content?;
        let (ox, oy, vw, vh) = match self.viewport {
            Some((x, y, w, h)) => (x as f32, y as f32, w as f32, h as f32),
            None => (0.0, 0.0, self.width as f32, self.height as f32),
        };
        let (x, y, w, h) = self.layout.place(content, (vw, vh));
        Some((ox + x, oy + y, w, h))
    }
}

impl Renderer for SoftwareRenderer {
    fn load_animation(&mut self, animation: &LottieAnimation, width: u32, height: u32) {
        self.content = Some((animation.width as f32, animation.height as f32));
        self.width = width;
        self.height = height;
        self.viewport = None;
        self.frame = 0.0;
    }

    fn set_frame(&mut self, frame: f32) {
        self.frame = frame;
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn set_viewport(&mut self, x: i32, y: i32, w: i32, h: i32) {
        self.viewport = Some((x, y, w, h));
    }

    fn set_background_color(&mut self, color: u32) {
        self.background = color;
    }

    fn set_layout(&mut self, layout: &Layout) {
        self.layout = layout.clone();
    }

    fn load_theme(&mut self, theme: Option<&str>) {
        self.theme = theme.map(str::to_string);
    }

    fn draw(&mut self, buffer: &mut [u32]) {
        buffer.fill(rgba_to_argb(self.background));
        self.draws += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Fit;

    fn wide() -> LottieAnimation {
        LottieAnimation::from_json(r#"{"fr":30,"ip":0,"op":60,"w":200,"h":100,"layers":[]}"#)
            .unwrap()
    }

    #[test]
    fn converts_rgba_to_argb() {
        assert_eq!(rgba_to_argb(0xFF0000FF), 0xFFFF0000);
        assert_eq!(rgba_to_argb(0x11223344), 0x44112233);
        assert_eq!(rgba_to_argb(0), 0);
    }

    #[test]
    fn draw_fills_background() {
        let mut r = SoftwareRenderer::new();
        r.set_background_color(0x00FF00FF);
        let mut buf = vec![0u32; 4];
        r.draw(&mut buf);
        assert!(buf.iter().all(|&p| p == 0xFF00FF00));
        assert_eq!(r.draw_count(), 1);
    }

    #[test]
    fn layout_and_viewport_place_content() {
        let mut r = SoftwareRenderer::new();
        assert_eq!(r.content_rect(), None);
        r.load_animation(&wide(), 100, 100);
        // contain, centered: half scale, letterboxed vertically
        assert_eq!(r.content_rect(), Some((0.0, 25.0, 100.0, 50.0)));

        r.set_layout(&Layout::new(Fit::Fill, [0.5, 0.5]));
        assert_eq!(r.content_rect(), Some((0.0, 0.0, 100.0, 100.0)));

        r.set_layout(&Layout::new(Fit::Contain, [0.0, 0.0]));
        r.set_viewport(10, 20, 50, 50);
        assert_eq!(r.content_rect(), Some((10.0, 20.0, 50.0, 25.0)));

        // a new animation drops the viewport
        r.load_animation(&wide(), 40, 40);
        assert_eq!(r.content_rect(), Some((0.0, 0.0, 40.0, 20.0)));
    }

    #[test]
    fn tracks_frame_and_theme() {
        let mut r = SoftwareRenderer::new();
        r.load_animation(&wide(), 10, 10);
        r.set_frame(12.5);
        assert_eq!(r.frame(), 12.5);
        r.load_theme(Some(r#"{"rules":[]}"#));
        assert_eq!(r.theme(), Some(r#"{"rules":[]}"#));
        r.load_theme(None);
        assert_eq!(r.theme(), None);
        r.load_animation(&wide(), 10, 10);
        assert_eq!(r.frame(), 0.0);
    }
}
