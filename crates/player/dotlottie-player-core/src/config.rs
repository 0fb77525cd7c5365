//! Player configuration.

use serde::{Deserialize, Serialize};

use crate::error::PlayerError;

/// Direction of travel through the playback window.
///
/// Ordinals are part of the C ABI.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Forward = 0,
    Reverse = 1,
    /// Forward then back; one round trip is one loop.
    Bounce = 2,
    /// Backward then forward.
    ReverseBounce = 3,
}

impl Mode {
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Reverse => "reverse",
            Self::Bounce => "bounce",
            Self::ReverseBounce => "reverse-bounce",
        }
    }

    /// Whether a cycle starts at the end of the window.
    #[inline]
    pub fn starts_at_end(&self) -> bool {
        matches!(self, Self::Reverse | Self::ReverseBounce)
    }
}

/// How the animation is scaled into the canvas.
///
/// Ordinals are part of the C ABI.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Fit {
    #[default]
    Contain = 0,
    Fill = 1,
    Cover = 2,
    FitWidth = 3,
    FitHeight = 4,
    None = 5,
}

/// Fit mode plus normalized alignment of the animation inside the canvas.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    #[serde(default)]
    pub fit: Fit,
    /// `[x, y]` in `0..=1`; `[0.5, 0.5]` centers.
    #[serde(default = "default_align")]
    pub align: [f32; 2],
}

fn default_align() -> [f32; 2] {
    [0.5, 0.5]
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            fit: Fit::Contain,
            align: default_align(),
        }
    }
}

impl Layout {
    pub fn new(fit: Fit, align: [f32; 2]) -> Self {
        Self { fit, align }
    }

    /// Compute the destination rectangle `(x, y, w, h)` of an animation of size
    /// `content` inside a canvas of size `canvas`.
    pub fn place(&self, content: (f32, f32), canvas: (f32, f32)) -> (f32, f32, f32, f32) {
        let (cw, ch) = content;
        let (vw, vh) = canvas;
        if cw <= 0.0 || ch <= 0.0 {
            return (0.0, 0.0, vw, vh);
        }
        let sx = vw / cw;
        let sy = vh / ch;
        let (w, h) = match self.fit {
            Fit::Contain => {
                let s = sx.min(sy);
                (cw * s, ch * s)
            }
            Fit::Cover => {
                let s = sx.max(sy);
                (cw * s, ch * s)
            }
            Fit::Fill => (vw, vh),
            Fit::FitWidth => (cw * sx, ch * sx),
            Fit::FitHeight => (cw * sy, ch * sy),
            Fit::None => (cw, ch),
        };
        let x = (vw - w) * self.align[0];
        let y = (vh - h) * self.align[1];
        (x, y, w, h)
    }
}

/// Playback configuration, shared by the player and the C ABI.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub mode: Mode,
    pub loop_animation: bool,
    pub speed: f32,
    pub use_frame_interpolation: bool,
    pub autoplay: bool,
    /// `[start, end]` in frames; empty means the whole animation.
    pub segment: Vec<f32>,
    /// Packed `0xRRGGBBAA`.
    pub background_color: u32,
    pub layout: Layout,
    /// Marker name; empty means no marker.
    pub marker: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::Forward,
            loop_animation: false,
            speed: 1.0,
            use_frame_interpolation: true,
            autoplay: false,
            segment: Vec::new(),
            background_color: 0,
            layout: Layout::default(),
            marker: String::new(),
        }
    }
}

impl Config {
    /// Parse a config from JSON; missing fields take their defaults.
    pub fn from_json(s: &str) -> Result<Self, PlayerError> {
        let cfg: Config = serde_json::from_str(s)?;
        Ok(cfg.validated())
    }

    /// Normalize values the player cannot use as-is.
    pub fn validated(mut self) -> Self {
        if !self.speed.is_finite() || self.speed <= 0.0 {
            log::warn!("speed {} is not usable, falling back to 1.0", self.speed);
            self.speed = 1.0;
        }
        if self.segment.len() < 2
            || !self.segment[0].is_finite()
            || !self.segment[1].is_finite()
            || self.segment[0] >= self.segment[1]
        {
            if !self.segment.is_empty() {
                log::warn!("ignoring invalid segment {:?}", self.segment);
            }
            self.segment.clear();
        } else {
            self.segment.truncate(2);
        }
        for a in self.layout.align.iter_mut() {
            *a = if a.is_finite() { a.clamp(0.0, 1.0) } else { 0.5 };
        }
        self
    }

    /// The segment as a `(start, end)` pair when one is set.
    #[inline]
    pub fn segment_range(&self) -> Option<(f32, f32)> {
        match self.segment.as_slice() {
            [start, end, ..] => Some((*start, *end)),
            _ => None,
        }
    }

    #[inline]
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    #[inline]
    pub fn with_loop(mut self) -> Self {
        self.loop_animation = true;
        self
    }

    #[inline]
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    #[inline]
    pub fn with_autoplay(mut self) -> Self {
        self.autoplay = true;
        self
    }

    #[inline]
    pub fn with_segment(mut self, start: f32, end: f32) -> Self {
        self.segment = vec![start, end];
        self
    }

    #[inline]
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    #[inline]
    pub fn with_background_color(mut self, color: u32) -> Self {
        self.background_color = color;
        self
    }

    #[inline]
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    #[inline]
    pub fn without_frame_interpolation(mut self) -> Self {
        self.use_frame_interpolation = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_abi_expectations() {
        let cfg = Config::default();
        assert_eq!(cfg.mode, Mode::Forward);
        assert!(!cfg.loop_animation);
        assert_eq!(cfg.speed, 1.0);
        assert!(cfg.use_frame_interpolation);
        assert!(cfg.segment_range().is_none());
        assert_eq!(cfg.layout.align, [0.5, 0.5]);
    }

    #[test]
    fn enum_ordinals_are_stable() {
        assert_eq!(Mode::Forward as i32, 0);
        assert_eq!(Mode::ReverseBounce as i32, 3);
        assert_eq!(Fit::Contain as i32, 0);
        assert_eq!(Fit::None as i32, 5);
    }

    #[test]
    fn validated_drops_bad_segment_and_speed() {
        let cfg = Config::default()
            .with_speed(-2.0)
            .with_segment(30.0, 10.0)
            .validated();
        assert_eq!(cfg.speed, 1.0);
        assert!(cfg.segment.is_empty());

        let cfg = Config::default().with_segment(10.0, 30.0).validated();
        assert_eq!(cfg.segment_range(), Some((10.0, 30.0)));
    }

    #[test]
    fn from_json_fills_defaults() {
        let cfg = Config::from_json(r#"{ "mode": "Bounce", "loop_animation": true }"#).unwrap();
        assert_eq!(cfg.mode, Mode::Bounce);
        assert!(cfg.loop_animation);
        assert_eq!(cfg.speed, 1.0);
        assert_eq!(cfg.layout.fit, Fit::Contain);
    }

    #[test]
    fn layout_contain_centers_content() {
        let layout = Layout::default();
        let (x, y, w, h) = layout.place((100.0, 50.0), (200.0, 200.0));
        assert_eq!((w, h), (200.0, 100.0));
        assert_eq!((x, y), (0.0, 50.0));
    }

    #[test]
    fn layout_cover_and_none() {
        let cover = Layout::new(Fit::Cover, [0.0, 0.0]);
        assert_eq!(cover.place((100.0, 50.0), (200.0, 200.0)), (0.0, 0.0, 400.0, 200.0));
        let none = Layout::new(Fit::None, [1.0, 1.0]);
        assert_eq!(none.place((100.0, 50.0), (200.0, 200.0)), (100.0, 150.0, 100.0, 50.0));
    }
}
