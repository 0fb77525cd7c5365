//! dotLottie `manifest.json` model.

use serde::{Deserialize, Serialize};

use crate::error::PlayerError;

fn default_direction() -> i8 {
    1
}

fn default_speed() -> f32 {
    1.0
}

/// One animation entry of a bundle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestAnimation {
    pub id: String,
    #[serde(default)]
    pub autoplay: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_theme: Option<String>,
    /// `1` forward, `-1` reverse.
    #[serde(default = "default_direction")]
    pub direction: i8,
    #[serde(default)]
    pub hover: bool,
    /// Pause between loops, in milliseconds.
    #[serde(default)]
    pub intermission: u32,
    #[serde(default)]
    pub r#loop: bool,
    #[serde(default)]
    pub loop_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub play_mode: Option<String>,
    #[serde(default = "default_speed")]
    pub speed: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_color: Option<String>,
}

/// One theme entry and the animations it applies to.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ManifestTheme {
    pub id: String,
    #[serde(default)]
    pub animations: Vec<String>,
}

/// Bundle metadata.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_animation_id: Option<String>,
    #[serde(default)]
    pub animations: Vec<ManifestAnimation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<u32>,
    #[serde(default)]
    pub themes: Vec<ManifestTheme>,
    #[serde(default)]
    pub states: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl Manifest {
    pub fn from_json(s: &str) -> Result<Self, PlayerError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn to_json_string(&self) -> Result<String, PlayerError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn animation(&self, id: &str) -> Option<&ManifestAnimation> {
        self.animations.iter().find(|a| a.id == id)
    }

    pub fn theme(&self, id: &str) -> Option<&ManifestTheme> {
        self.themes.iter().find(|t| t.id == id)
    }

    /// `activeAnimationId` when it names a listed animation, else the first one.
    pub fn initial_animation_id(&self) -> Option<&str> {
        self.active_animation_id
            .as_deref()
            .filter(|id| self.animation(id).is_some())
            .or_else(|| self.animations.first().map(|a| a.id.as_str()))
    }

    /// Whether `theme_id` may be applied to `animation_id`. Themes that list
    /// no animations apply everywhere.
    pub fn theme_applies_to(&self, theme_id: &str, animation_id: &str) -> bool {
        match self.theme(theme_id) {
            Some(theme) => {
                theme.animations.is_empty() || theme.animations.iter().any(|a| a == animation_id)
            }
            None => true,
        }
    }
}
