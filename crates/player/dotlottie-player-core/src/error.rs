//! Error types for the dotLottie player

/// Error type for player, bundle and state machine operations
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum PlayerError {
    /// An operation needs an animation but none is loaded
    #[error("No animation loaded")]
    AnimationNotLoaded,

    /// Animation id not present in the loaded bundle
    #[error("Animation not found: {id}")]
    AnimationNotFound { id: String },

    /// Animation document could not be interpreted
    #[error("Invalid animation: {reason}")]
    InvalidAnimation { reason: String },

    /// Frame outside of the playback window
    #[error("Frame {frame} is out of range [{start}, {end}]")]
    InvalidFrame { frame: f32, start: f32, end: f32 },

    /// Operation not allowed in the current playback state
    #[error("Invalid playback state: {current} -> {requested}")]
    InvalidPlaybackState {
        current: &'static str,
        requested: &'static str,
    },

    /// Theme id not present in the loaded bundle
    #[error("Theme not found: {id}")]
    ThemeNotFound { id: String },

    /// Theme document could not be interpreted
    #[error("Invalid theme: {reason}")]
    InvalidTheme { reason: String },

    /// State machine id not present in the loaded bundle
    #[error("State machine not found: {id}")]
    StateMachineNotFound { id: String },

    /// State machine document failed to parse or validate
    #[error("Invalid state machine: {reason}")]
    InvalidStateMachine { reason: String },

    /// No state machine loaded
    #[error("No state machine loaded")]
    StateMachineNotLoaded,

    /// State machine loaded but not started
    #[error("State machine is not running")]
    StateMachineNotRunning,

    /// Context variable already declared with another type
    #[error("Context variable {key} is {expected}, got {actual}")]
    ContextTypeMismatch {
        key: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// An id lookup was attempted without a dotLottie bundle
    #[error("No dotLottie bundle loaded")]
    BundleNotLoaded,

    /// Packed `.lottie` archive is unreadable or has no manifest
    #[error("Invalid dotLottie bundle: {reason}")]
    InvalidBundle { reason: String },

    /// Invalid argument (e.g. zero-sized canvas)
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// Serialization error
    #[error("Serialization error: {reason}")]
    Serialization { reason: String },

    /// IO error
    #[error("IO error: {reason}")]
    Io { reason: String },
}

impl PlayerError {
    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::AnimationNotLoaded
            | Self::AnimationNotFound { .. }
            | Self::InvalidAnimation { .. } => "animation",
            Self::InvalidFrame { .. }
            | Self::InvalidPlaybackState { .. }
            | Self::InvalidArgument { .. } => "playback",
            Self::ThemeNotFound { .. } | Self::InvalidTheme { .. } => "theme",
            Self::StateMachineNotFound { .. }
            | Self::InvalidStateMachine { .. }
            | Self::StateMachineNotLoaded
            | Self::StateMachineNotRunning
            | Self::ContextTypeMismatch { .. } => "state_machine",
            Self::BundleNotLoaded | Self::InvalidBundle { .. } => "bundle",
            Self::Serialization { .. } => "serialization",
            Self::Io { .. } => "io",
        }
    }

    /// Errors caused by what the caller passed in rather than by player state
    #[inline]
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidFrame { .. }
                | Self::InvalidArgument { .. }
                | Self::InvalidAnimation { .. }
                | Self::InvalidTheme { .. }
                | Self::InvalidStateMachine { .. }
                | Self::InvalidBundle { .. }
                | Self::Serialization { .. }
                | Self::ContextTypeMismatch { .. }
        )
    }
}

impl From<std::io::Error> for PlayerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for PlayerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            reason: err.to_string(),
        }
    }
}

impl From<zip::result::ZipError> for PlayerError {
    fn from(err: zip::result::ZipError) -> Self {
        Self::InvalidBundle {
            reason: err.to_string(),
        }
    }
}
