//! Lottie animation document: the parts of the JSON that drive playback.
//!
//! Layers, assets and shapes are kept as raw JSON and handed to the renderer
//! untouched; only the timing header and markers are interpreted here.

use serde::{Deserialize, Serialize};

use crate::error::PlayerError;

/// A named sub-range of the timeline, in frames.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub name: String,
    /// Start frame.
    pub time: f32,
    /// Length in frames.
    pub duration: f32,
}

#[derive(Deserialize)]
struct RawMarker {
    #[serde(default)]
    cm: String,
    #[serde(default)]
    tm: f32,
    #[serde(default)]
    dr: f32,
}

#[derive(Deserialize)]
struct RawHeader {
    fr: f32,
    ip: f32,
    op: f32,
    w: u32,
    h: u32,
    #[serde(default)]
    nm: Option<String>,
    #[serde(default)]
    markers: Vec<RawMarker>,
}

/// Parsed Lottie document.
#[derive(Clone, Debug)]
pub struct LottieAnimation {
    pub name: Option<String>,
    pub frame_rate: f32,
    pub in_point: f32,
    pub out_point: f32,
    pub width: u32,
    pub height: u32,
    pub markers: Vec<Marker>,
    /// Full document for the renderer.
    pub document: serde_json::Value,
}

impl LottieAnimation {
    pub fn from_json(s: &str) -> Result<Self, PlayerError> {
        let document: serde_json::Value =
            serde_json::from_str(s).map_err(|e| PlayerError::InvalidAnimation {
                reason: format!("parse error: {e}"),
            })?;
        Self::from_value(document)
    }

    pub fn from_value(document: serde_json::Value) -> Result<Self, PlayerError> {
        let header = RawHeader::deserialize(&document).map_err(|e| {
            PlayerError::InvalidAnimation {
                reason: format!("missing timing header: {e}"),
            }
        })?;

        if !header.fr.is_finite() || header.fr <= 0.0 {
            return Err(PlayerError::InvalidAnimation {
                reason: format!("frame rate must be positive, got {}", header.fr),
            });
        }
        if !(header.op > header.ip) {
            return Err(PlayerError::InvalidAnimation {
                reason: format!("out point {} must follow in point {}", header.op, header.ip),
            });
        }

        let markers = header
            .markers
            .into_iter()
            .filter(|m| !m.cm.is_empty())
            .map(|m| Marker {
                name: m.cm,
                time: m.tm,
                duration: m.dr.max(0.0),
            })
            .collect();

        Ok(Self {
            name: header.nm,
            frame_rate: header.fr,
            in_point: header.ip,
            out_point: header.op,
            width: header.w,
            height: header.h,
            markers,
            document,
        })
    }

    /// `op - ip`.
    #[inline]
    pub fn total_frames(&self) -> f32 {
        self.out_point - self.in_point
    }

    /// Seconds at normal speed.
    #[inline]
    pub fn duration(&self) -> f32 {
        self.total_frames() / self.frame_rate
    }

    /// Highest addressable frame.
    #[inline]
    pub fn last_frame(&self) -> f32 {
        (self.total_frames() - 1.0).max(0.0)
    }

    pub fn marker(&self, name: &str) -> Option<&Marker> {
        self.markers.iter().find(|m| m.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "v": "5.7.4", "fr": 30, "ip": 0, "op": 90, "w": 200, "h": 100, "nm": "dots",
        "layers": [],
        "markers": [
            { "cm": "intro", "tm": 0, "dr": 30 },
            { "cm": "", "tm": 10, "dr": 5 },
            { "cm": "outro", "tm": 60, "dr": 29 }
        ]
    }"#;

    #[test]
    fn parses_timing_header() {
        let anim = LottieAnimation::from_json(DOC).unwrap();
        assert_eq!(anim.total_frames(), 90.0);
        assert_eq!(anim.duration(), 3.0);
        assert_eq!(anim.last_frame(), 89.0);
        assert_eq!((anim.width, anim.height), (200, 100));
        assert_eq!(anim.name.as_deref(), Some("dots"));
    }

    #[test]
    fn skips_unnamed_markers() {
        let anim = LottieAnimation::from_json(DOC).unwrap();
        assert_eq!(anim.markers.len(), 2);
        let outro = anim.marker("outro").unwrap();
        assert_eq!((outro.time, outro.duration), (60.0, 29.0));
    }

    #[test]
    fn rejects_missing_or_bad_header() {
        assert!(matches!(
            LottieAnimation::from_json(r#"{"layers": []}"#),
            Err(PlayerError::InvalidAnimation { .. })
        ));
        assert!(LottieAnimation::from_json(r#"{"fr": 0, "ip": 0, "op": 10, "w": 1, "h": 1}"#).is_err());
        assert!(LottieAnimation::from_json(r#"{"fr": 30, "ip": 10, "op": 10, "w": 1, "h": 1}"#).is_err());
        assert!(LottieAnimation::from_json("not json").is_err());
    }
}
