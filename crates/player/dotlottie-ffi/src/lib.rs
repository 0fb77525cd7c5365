//! C ABI for the dotLottie player.
//!
//! # Quick start (C)
//!
//! ```c
//! #include "bindings.h"
//!
//! float align[2] = {0.5f, 0.5f};
//! DotLottieConfig cfg = {
//!     .mode = Forward,
//!     .loop_animation = true,
//!     .speed = 1.0f,
//!     .use_frame_interpolation = true,
//!     .autoplay = true,
//!     .segment = {NULL, 0},
//!     .background_color = 0xFFFFFFFF,
//!     .layout = {Contain, {align, 2}},
//!     .marker = NULL,
//! };
//! DotLottiePlayer *player = new_dotlottie_player(&cfg);
//!
//! bool loaded = false;
//! dotlottie_load_animation_path(player, "anim.json", 512, 512, &loaded);
//!
//! while (running) {
//!     dotlottie_tick(player);
//!     uint64_t pixels, len;
//!     dotlottie_buffer_ptr(player, &pixels);
//!     dotlottie_buffer_len(player, &len);
//!     blit((const uint32_t *)(uintptr_t)pixels, len);
//! }
//!
//! dotlottie_destroy(player);
//! ```
//!
//! # Conventions
//!
//! * Every call returns [`DOTLOTTIE_SUCCESS`], [`DOTLOTTIE_ERROR`] or
//!   [`DOTLOTTIE_INVALID_PARAMETER`] and writes results through out-pointers.
//! * Loaders return success once the arguments are accepted and report the
//!   outcome of the load through their `bool *` out-parameter.
//! * Lists use a size probe: pass a null array to receive the element count
//!   in `*size`, then pass an array with `*size` set to its capacity.
//! * Nothing returned by the library has to be freed except the player itself
//!   ([`dotlottie_destroy`](handle::dotlottie_destroy)).
//!
//! # Thread safety
//!
//! A player may be shared across threads. Callbacks run on the thread that
//! made the triggering call, after the player's internal lock is released.

pub mod handle;
pub mod observer;
pub mod types;

pub use handle::DotLottiePlayer;
pub use observer::{Observer, StateMachineObserver};
pub use types::{
    DotLottieConfig, DotLottieFloatData, DotLottieLayout, DotLottieManifest,
    DotLottieManifestAnimation, DotLottieManifestTheme, DotLottieMarker, DotLottieString,
    DOTLOTTIE_MAX_STR_LENGTH,
};

pub const DOTLOTTIE_SUCCESS: i32 = 0;
pub const DOTLOTTIE_ERROR: i32 = 1;
/// Null handle or out-pointer, or a string argument that is not UTF-8.
pub const DOTLOTTIE_INVALID_PARAMETER: i32 = 2;
