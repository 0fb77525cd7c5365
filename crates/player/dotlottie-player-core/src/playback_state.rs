use serde::{Deserialize, Serialize};

/// Playback state of a player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaybackState {
    /// Player is stopped (also after a non-looping cycle completes)
    #[default]
    Stopped,
    /// Player is playing
    Playing,
    /// Player is paused
    Paused,
}

impl PlaybackState {
    /// Get the name of this playback state
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Playing => "playing",
            Self::Paused => "paused",
        }
    }

    /// Check if the player is actively playing
    #[inline]
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing)
    }

    /// Check if the player can be started or resumed
    #[inline]
    pub fn can_play(&self) -> bool {
        matches!(self, Self::Paused | Self::Stopped)
    }

    /// Check if the player can be paused
    #[inline]
    pub fn can_pause(&self) -> bool {
        matches!(self, Self::Playing)
    }

    /// Check if the player can be stopped
    #[inline]
    pub fn can_stop(&self) -> bool {
        matches!(self, Self::Playing | Self::Paused)
    }
}

impl From<&str> for PlaybackState {
    fn from(s: &str) -> Self {
        match s {
            "playing" => Self::Playing,
            "paused" => Self::Paused,
            _ => Self::Stopped,
        }
    }
}
