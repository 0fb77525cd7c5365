//! C-compatible records exchanged across the ABI.
//!
//! Everything here is `#[repr(C)]`. Strings handed back to the caller are
//! copied into fixed [`DotLottieString`] buffers, so no record returned by the
//! library owns heap memory the caller would have to free.

use std::ffi::CStr;
use std::os::raw::c_char;

use dotlottie_player_core::{Config, Fit, Layout, ManifestAnimation, Marker, Mode};

/// Bytes available in a [`DotLottieString`], terminating NUL included.
pub const DOTLOTTIE_MAX_STR_LENGTH: usize = 512;

/// Borrowed `float` array. The library never frees `ptr`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct DotLottieFloatData {
    pub ptr: *mut f32,
    pub size: usize,
}

impl DotLottieFloatData {
    pub const fn empty() -> Self {
        Self {
            ptr: std::ptr::null_mut(),
            size: 0,
        }
    }

    /// # Safety
    ///
    /// `ptr` must be null or point to `size` readable floats.
    pub unsafe fn as_slice(&self) -> &[f32] {
        if self.ptr.is_null() || self.size == 0 {
            &[]
        } else {
            std::slice::from_raw_parts(self.ptr, self.size)
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct DotLottieLayout {
    pub fit: Fit,
    /// `[x, y]`; anything shorter keeps the centered default.
    pub align: DotLottieFloatData,
}

impl DotLottieLayout {
    /// # Safety
    ///
    /// See [`DotLottieFloatData::as_slice`].
    pub unsafe fn to_layout(&self) -> Layout {
        let align = match self.align.as_slice() {
            [x, y, ..] => [*x, *y],
            _ => Layout::default().align,
        };
        Layout::new(self.fit, align)
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct DotLottieConfig {
    pub mode: Mode,
    pub loop_animation: bool,
    pub speed: f32,
    pub use_frame_interpolation: bool,
    pub autoplay: bool,
    /// `[start, end]` in frames; empty plays the whole animation.
    pub segment: DotLottieFloatData,
    /// Packed `0xRRGGBBAA`.
    pub background_color: u32,
    pub layout: DotLottieLayout,
    /// Nullable NUL-terminated marker name.
    pub marker: *const c_char,
}

impl DotLottieConfig {
    /// Copy into an owned [`Config`]. Returns `None` when `marker` is not UTF-8.
    ///
    /// # Safety
    ///
    /// Every pointer must be null or valid for the duration of the call.
    pub unsafe fn to_config(&self) -> Option<Config> {
        let marker = if self.marker.is_null() {
            String::new()
        } else {
            match CStr::from_ptr(self.marker).to_str() {
                Ok(s) => s.to_string(),
                Err(_) => {
                    log::warn!("config marker is not valid UTF-8");
                    return None;
                }
            }
        };
        Some(
            Config {
                mode: self.mode,
                loop_animation: self.loop_animation,
                speed: self.speed,
                use_frame_interpolation: self.use_frame_interpolation,
                autoplay: self.autoplay,
                segment: self.segment.as_slice().to_vec(),
                background_color: self.background_color,
                layout: self.layout.to_layout(),
                marker,
            }
            .validated(),
        )
    }
}

/// Fixed-size, NUL-terminated UTF-8 string.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct DotLottieString {
    pub value: [c_char; DOTLOTTIE_MAX_STR_LENGTH],
}

impl Default for DotLottieString {
    fn default() -> Self {
        Self {
            value: [0; DOTLOTTIE_MAX_STR_LENGTH],
        }
    }
}

impl DotLottieString {
    /// Copy `s`, truncated on a character boundary to fit.
    pub fn new(s: &str) -> Self {
        let mut end = s.len().min(DOTLOTTIE_MAX_STR_LENGTH - 1);
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        let mut out = Self::default();
        for (dst, &b) in out.value.iter_mut().zip(&s.as_bytes()[..end]) {
            *dst = b as c_char;
        }
        out
    }

    pub fn as_str(&self) -> &str {
        // SAFETY: `value` always holds a NUL within bounds and was written from a &str.
        let bytes = unsafe { CStr::from_ptr(self.value.as_ptr()) }.to_bytes();
        std::str::from_utf8(bytes).unwrap_or_default()
    }
}

impl std::fmt::Debug for DotLottieString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("DotLottieString").field(&self.as_str()).finish()
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct DotLottieMarker {
    pub name: DotLottieString,
    pub duration: f32,
    pub time: f32,
}

impl From<&Marker> for DotLottieMarker {
    fn from(m: &Marker) -> Self {
        Self {
            name: DotLottieString::new(&m.name),
            duration: m.duration,
            time: m.time,
        }
    }
}

/// Scalar manifest fields; lists are read with the `dotlottie_manifest_*` calls.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct DotLottieManifest {
    pub active_animation_id: DotLottieString,
    pub author: DotLottieString,
    pub description: DotLottieString,
    pub generator: DotLottieString,
    pub keywords: DotLottieString,
    /// `0` when absent.
    pub revision: u32,
    pub version: DotLottieString,
}

impl From<&dotlottie_player_core::Manifest> for DotLottieManifest {
    fn from(m: &dotlottie_player_core::Manifest) -> Self {
        let s = |v: &Option<String>| DotLottieString::new(v.as_deref().unwrap_or_default());
        Self {
            active_animation_id: s(&m.active_animation_id),
            author: s(&m.author),
            description: s(&m.description),
            generator: s(&m.generator),
            keywords: s(&m.keywords),
            revision: m.revision.unwrap_or_default(),
            version: s(&m.version),
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct DotLottieManifestAnimation {
    pub autoplay: bool,
    pub default_theme: DotLottieString,
    pub direction: i8,
    pub hover: bool,
    pub id: DotLottieString,
    pub intermission: u32,
    pub r#loop: bool,
    pub loop_count: u32,
    pub play_mode: DotLottieString,
    pub speed: f32,
    pub theme_color: DotLottieString,
}

impl From<&ManifestAnimation> for DotLottieManifestAnimation {
    fn from(a: &ManifestAnimation) -> Self {
        let s = |v: &Option<String>| DotLottieString::new(v.as_deref().unwrap_or_default());
        Self {
            autoplay: a.autoplay,
            default_theme: s(&a.default_theme),
            direction: a.direction,
            hover: a.hover,
            id: DotLottieString::new(&a.id),
            intermission: a.intermission,
            r#loop: a.r#loop,
            loop_count: a.loop_count,
            play_mode: s(&a.play_mode),
            speed: a.speed,
            theme_color: s(&a.theme_color),
        }
    }
}

/// Theme entry; its animation ids come from `dotlottie_manifest_theme_animations`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct DotLottieManifestTheme {
    pub id: DotLottieString,
}
