//! Frame advance: maps elapsed playback time to a frame in the playback window.
//!
//! All frame values are in animation frames relative to the in point. A cycle
//! is one pass through the window (Forward/Reverse) or one round trip
//! (Bounce/ReverseBounce).

use crate::config::{Config, Mode};
use crate::lottie::LottieAnimation;

/// Inclusive playback range in frames.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Window {
    pub start: f32,
    pub end: f32,
}

impl Window {
    #[inline]
    pub fn span(&self) -> f32 {
        (self.end - self.start).max(0.0)
    }

    #[inline]
    pub fn contains(&self, frame: f32) -> bool {
        frame >= self.start && frame <= self.end
    }

    /// Frame a cycle starts from.
    #[inline]
    pub fn origin(&self, mode: Mode) -> f32 {
        if mode.starts_at_end() {
            self.end
        } else {
            self.start
        }
    }

    /// Frames travelled in one full cycle.
    #[inline]
    pub fn cycle_frames(&self, mode: Mode) -> f32 {
        match mode {
            Mode::Forward | Mode::Reverse => self.span(),
            Mode::Bounce | Mode::ReverseBounce => 2.0 * self.span(),
        }
    }
}

/// Resolve the playback window: a known marker wins over the segment, which
/// wins over the whole animation. The result always lies in `[0, last_frame]`.
pub fn window_for(animation: &LottieAnimation, config: &Config) -> Window {
    let last = animation.last_frame();
    let (start, end) = if let Some(m) = Some(config.marker.as_str())
        .filter(|m| !m.is_empty())
        .and_then(|name| animation.marker(name))
    {
        (m.time, m.time + m.duration)
    } else if let Some((s, e)) = config.segment_range() {
        (s, e)
    } else {
        (0.0, last)
    };
    let start = start.clamp(0.0, last);
    let end = end.clamp(start, last);
    Window { start, end }
}

/// Result of advancing the timeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameStep {
    pub frame: f32,
    /// The cycle has run to its end; `frame` is the cycle's final frame.
    pub cycle_complete: bool,
}

fn fmod(a: f32, b: f32) -> f32 {
    if b == 0.0 {
        return 0.0;
    }
    let m = a % b;
    if (m < 0.0 && b > 0.0) || (m > 0.0 && b < 0.0) {
        m + b
    } else {
        m
    }
}

/// Reflect t into [0, span] with ping-pong behavior, where period = 2 * span.
fn ping_pong(t: f32, span: f32) -> f32 {
    if span <= 0.0 {
        return 0.0;
    }
    let m = fmod(t, 2.0 * span);
    if m <= span {
        m
    } else {
        2.0 * span - m
    }
}

/// Frames covered by `elapsed` seconds.
#[inline]
pub fn frames_travelled(elapsed: f32, frame_rate: f32, speed: f32) -> f32 {
    (elapsed * frame_rate * speed).max(0.0)
}

/// Frame reached after travelling `travelled` frames from the cycle origin.
pub fn frame_at(window: Window, mode: Mode, travelled: f32, interpolate: bool) -> FrameStep {
    let span = window.span();
    let cycle = window.cycle_frames(mode);
    if span <= 0.0 {
        return FrameStep {
            frame: window.start,
            cycle_complete: true,
        };
    }
    let cycle_complete = travelled >= cycle;
    let t = travelled.clamp(0.0, cycle);
    let offset = match mode {
        Mode::Forward | Mode::Reverse => t,
        Mode::Bounce | Mode::ReverseBounce => {
            if cycle_complete {
                0.0
            } else {
                ping_pong(t, span)
            }
        }
    };
    let mut frame = if mode.starts_at_end() {
        window.end - offset
    } else {
        window.start + offset
    };
    if !interpolate {
        frame = frame.round();
    }
    FrameStep {
        frame: frame.clamp(window.start, window.end),
        cycle_complete,
    }
}

/// Frames that must have been travelled for the cycle to sit at `frame`,
/// taking the outbound half of a bounce.
pub fn travelled_for_frame(window: Window, mode: Mode, frame: f32) -> f32 {
    let frame = frame.clamp(window.start, window.end);
    if mode.starts_at_end() {
        window.end - frame
    } else {
        frame - window.start
    }
}
