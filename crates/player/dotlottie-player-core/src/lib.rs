//! dotLottie Player Core
//!
//! Playback engine behind the `dotlottie-ffi` C ABI: Lottie header parsing,
//! the frame timeline, dotLottie bundles (packed or unpacked), themes and interactive
//! state machines. Rasterization is delegated to a [`Renderer`].

pub mod bundle;
pub mod clock;
pub mod config;
pub mod error;
pub mod lottie;
pub mod manifest;
pub mod observer;
pub mod playback_state;
pub mod player;
pub mod renderer;
pub mod state_machine;
pub mod theme;
pub mod timeline;

// Re-export common types for convenience
pub use bundle::Bundle;
pub use clock::{Clock, SystemClock};
pub use config::{Config, Fit, Layout, Mode};
pub use error::PlayerError;
pub use lottie::{LottieAnimation, Marker};
pub use manifest::{Manifest, ManifestAnimation, ManifestTheme};
pub use observer::{Observer, StateMachineObserver};
pub use playback_state::PlaybackState;
pub use player::{DotLottiePlayer, MAX_CANVAS_PIXELS};
pub use renderer::{Renderer, SoftwareRenderer};
pub use state_machine::{ContextValue, ListenerType, MachineStatus, StateMachine};
pub use theme::Theme;

/// Player result type
pub type Result<T> = core::result::Result<T, PlayerError>;
