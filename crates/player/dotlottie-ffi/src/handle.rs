//! Exported `dotlottie_*` functions over an opaque [`DotLottiePlayer`].
//!
//! # Safety contract
//!
//! * Handle, string and out-pointers are checked for null before use.
//! * Panics are caught with [`std::panic::catch_unwind`] and reported as
//!   [`DOTLOTTIE_ERROR`]; they never cross the boundary.
//! * Strings passed in are borrowed for the duration of the call only.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, PoisonError};

use dotlottie_player_core::observer::{
    Observer as PlayerObserver, StateMachineObserver as PlayerStateMachineObserver,
};
use dotlottie_player_core::{DotLottiePlayer as Player, ListenerType, PlayerError};

use crate::observer::{Observer, StateMachineObserver};
use crate::types::{
    DotLottieConfig, DotLottieFloatData, DotLottieLayout, DotLottieManifest,
    DotLottieManifestAnimation, DotLottieManifestTheme, DotLottieMarker, DotLottieString,
};
use crate::{DOTLOTTIE_ERROR, DOTLOTTIE_INVALID_PARAMETER, DOTLOTTIE_SUCCESS};

/// Backing storage for the pointers handed out by [`dotlottie_config`].
#[derive(Default)]
struct ConfigView {
    segment: Vec<f32>,
    align: [f32; 2],
    marker: CString,
}

/// Opaque player handle.
pub struct DotLottiePlayer {
    player: Player,
    /// Subscriptions keyed by the address of the caller's callback table.
    observers: Mutex<Vec<(usize, Arc<dyn PlayerObserver>)>>,
    state_machine_observers: Mutex<Vec<(usize, Arc<dyn PlayerStateMachineObserver>)>>,
    config_view: Mutex<ConfigView>,
}

impl DotLottiePlayer {
    fn new(player: Player) -> Self {
        Self {
            player,
            observers: Mutex::new(Vec::new()),
            state_machine_observers: Mutex::new(Vec::new()),
            config_view: Mutex::new(ConfigView::default()),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

type Status = Result<(), i32>;

/// Run `op`, turning its outcome or a panic into a status code.
fn guarded(name: &str, op: impl FnOnce() -> Status) -> i32 {
    match std::panic::catch_unwind(AssertUnwindSafe(op)) {
        Ok(Ok(())) => DOTLOTTIE_SUCCESS,
        Ok(Err(code)) => code,
        Err(_) => {
            log::error!("panic during {name}");
            DOTLOTTIE_ERROR
        }
    }
}

fn with_player(
    ptr: *mut DotLottiePlayer,
    name: &str,
    op: impl FnOnce(&DotLottiePlayer) -> Status,
) -> i32 {
    guarded(name, || {
        let handle = unsafe { ptr.as_ref() }.ok_or_else(|| {
            log::warn!("{name}: null player handle");
            DOTLOTTIE_INVALID_PARAMETER
        })?;
        op(handle)
    })
}

/// Map an engine error to [`DOTLOTTIE_ERROR`].
fn check(name: &str, result: dotlottie_player_core::Result<()>) -> Status {
    result.map_err(|err| {
        report(name, &err);
        DOTLOTTIE_ERROR
    })
}

fn report(name: &str, err: &PlayerError) {
    if err.is_invalid_input() {
        log::warn!("{name} rejected input ({}): {err}", err.category());
    } else {
        log::debug!("{name} failed ({}): {err}", err.category());
    }
}

fn non_null<T>(ptr: *mut T) -> Result<*mut T, i32> {
    if ptr.is_null() {
        Err(DOTLOTTIE_INVALID_PARAMETER)
    } else {
        Ok(ptr)
    }
}

/// Borrow a NUL-terminated UTF-8 argument.
unsafe fn c_str<'a>(ptr: *const c_char) -> Result<&'a str, i32> {
    if ptr.is_null() {
        log::warn!("null string argument");
        return Err(DOTLOTTIE_INVALID_PARAMETER);
    }
    CStr::from_ptr(ptr).to_str().map_err(|_| {
        log::warn!("string argument is not valid UTF-8");
        DOTLOTTIE_INVALID_PARAMETER
    })
}

unsafe fn write<T>(out: *mut T, value: T) -> Status {
    non_null(out)?.write(value);
    Ok(())
}

/// Size-probe list copy: a null `out` only reports the count.
unsafe fn write_list<T, U>(
    items: &[T],
    out: *mut U,
    size: *mut usize,
    convert: impl Fn(&T) -> U,
) -> Status {
    let size = non_null(size)?;
    if out.is_null() {
        size.write(items.len());
        return Ok(());
    }
    let capacity = size.read();
    size.write(items.len());
    if capacity < items.len() {
        return Err(DOTLOTTIE_ERROR);
    }
    for (i, item) in items.iter().enumerate() {
        out.add(i).write(convert(item));
    }
    Ok(())
}

unsafe fn write_loaded(result: *mut bool, outcome: dotlottie_player_core::Result<()>) -> Status {
    if let Err(err) = &outcome {
        log::debug!("load failed: {err}");
    }
    result.write(outcome.is_ok());
    Ok(())
}

fn manifest_of(h: &DotLottiePlayer) -> Result<dotlottie_player_core::Manifest, i32> {
    h.player.manifest().ok_or_else(|| {
        log::debug!("no manifest: no dotLottie bundle loaded");
        DOTLOTTIE_ERROR
    })
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// Create a player. Returns null when `config` is null or invalid.
#[no_mangle]
pub extern "C" fn new_dotlottie_player(config: *const DotLottieConfig) -> *mut DotLottiePlayer {
    std::panic::catch_unwind(AssertUnwindSafe(|| {
        let Some(raw) = (unsafe { config.as_ref() }) else {
            log::warn!("new_dotlottie_player: null config");
            return std::ptr::null_mut();
        };
        match unsafe { raw.to_config() } {
            Some(config) => Box::into_raw(Box::new(DotLottiePlayer::new(Player::new(config)))),
            None => std::ptr::null_mut(),
        }
    }))
    .unwrap_or_else(|_| {
        log::error!("panic during new_dotlottie_player");
        std::ptr::null_mut()
    })
}

/// Free a player created by [`new_dotlottie_player`]. The pointer is invalid
/// afterwards.
#[no_mangle]
pub extern "C" fn dotlottie_destroy(ptr: *mut DotLottiePlayer) -> i32 {
    guarded("dotlottie_destroy", || {
        let ptr = non_null(ptr)?;
        drop(unsafe { Box::from_raw(ptr) });
        Ok(())
    })
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[no_mangle]
pub extern "C" fn dotlottie_load_animation_data(
    ptr: *mut DotLottiePlayer,
    animation_data: *const c_char,
    width: u32,
    height: u32,
    result: *mut bool,
) -> i32 {
    with_player(ptr, "dotlottie_load_animation_data", |h| unsafe {
        let result = non_null(result)?;
        let data = c_str(animation_data)?;
        write_loaded(result, h.player.load_animation_data(data, width, height))
    })
}

#[no_mangle]
pub extern "C" fn dotlottie_load_animation_path(
    ptr: *mut DotLottiePlayer,
    animation_path: *const c_char,
    width: u32,
    height: u32,
    result: *mut bool,
) -> i32 {
    with_player(ptr, "dotlottie_load_animation_path", |h| unsafe {
        let result = non_null(result)?;
        let path = c_str(animation_path)?;
        write_loaded(result, h.player.load_animation_path(path, width, height))
    })
}

/// Load a `.lottie` file or an unpacked dotLottie directory.
#[no_mangle]
pub extern "C" fn dotlottie_load_dotlottie_path(
    ptr: *mut DotLottiePlayer,
    dotlottie_path: *const c_char,
    width: u32,
    height: u32,
    result: *mut bool,
) -> i32 {
    with_player(ptr, "dotlottie_load_dotlottie_path", |h| unsafe {
        let result = non_null(result)?;
        let path = c_str(dotlottie_path)?;
        write_loaded(result, h.player.load_dotlottie_path(path, width, height))
    })
}

/// Load a packed `.lottie` archive from `size` bytes at `file_data`.
#[no_mangle]
pub extern "C" fn dotlottie_load_dotlottie_data(
    ptr: *mut DotLottiePlayer,
    file_data: *const u8,
    size: usize,
    width: u32,
    height: u32,
    result: *mut bool,
) -> i32 {
    with_player(ptr, "dotlottie_load_dotlottie_data", |h| unsafe {
        let result = non_null(result)?;
        if file_data.is_null() {
            log::warn!("dotlottie_load_dotlottie_data: null data");
            return Err(DOTLOTTIE_INVALID_PARAMETER);
        }
        let data = std::slice::from_raw_parts(file_data, size);
        write_loaded(result, h.player.load_dotlottie_data(data, width, height))
    })
}

/// Load an animation of the current bundle by id.
#[no_mangle]
pub extern "C" fn dotlottie_load_animation(
    ptr: *mut DotLottiePlayer,
    animation_id: *const c_char,
    width: u32,
    height: u32,
    result: *mut bool,
) -> i32 {
    with_player(ptr, "dotlottie_load_animation", |h| unsafe {
        let result = non_null(result)?;
        let id = c_str(animation_id)?;
        write_loaded(result, h.player.load_animation(id, width, height))
    })
}

// ---------------------------------------------------------------------------
// Manifest
// ---------------------------------------------------------------------------

#[no_mangle]
pub extern "C" fn dotlottie_manifest(
    ptr: *mut DotLottiePlayer,
    result: *mut DotLottieManifest,
) -> i32 {
    with_player(ptr, "dotlottie_manifest", |h| unsafe {
        let result = non_null(result)?;
        write(result, DotLottieManifest::from(&manifest_of(h)?))
    })
}

#[no_mangle]
pub extern "C" fn dotlottie_manifest_animations(
    ptr: *mut DotLottiePlayer,
    result: *mut DotLottieManifestAnimation,
    size: *mut usize,
) -> i32 {
    with_player(ptr, "dotlottie_manifest_animations", |h| unsafe {
        let manifest = manifest_of(h)?;
        write_list(&manifest.animations, result, size, |a| {
            DotLottieManifestAnimation::from(a)
        })
    })
}

#[no_mangle]
pub extern "C" fn dotlottie_manifest_themes(
    ptr: *mut DotLottiePlayer,
    result: *mut DotLottieManifestTheme,
    size: *mut usize,
) -> i32 {
    with_player(ptr, "dotlottie_manifest_themes", |h| unsafe {
        let manifest = manifest_of(h)?;
        write_list(&manifest.themes, result, size, |t| DotLottieManifestTheme {
            id: DotLottieString::new(&t.id),
        })
    })
}

/// Animation ids a manifest theme applies to.
#[no_mangle]
pub extern "C" fn dotlottie_manifest_theme_animations(
    ptr: *mut DotLottiePlayer,
    theme_id: *const c_char,
    result: *mut DotLottieString,
    size: *mut usize,
) -> i32 {
    with_player(ptr, "dotlottie_manifest_theme_animations", |h| unsafe {
        let id = c_str(theme_id)?;
        let manifest = manifest_of(h)?;
        let theme = manifest.theme(id).ok_or_else(|| {
            log::debug!("manifest has no theme {id:?}");
            DOTLOTTIE_ERROR
        })?;
        write_list(&theme.animations, result, size, |a| DotLottieString::new(a))
    })
}

#[no_mangle]
pub extern "C" fn dotlottie_manifest_states(
    ptr: *mut DotLottiePlayer,
    result: *mut DotLottieString,
    size: *mut usize,
) -> i32 {
    with_player(ptr, "dotlottie_manifest_states", |h| unsafe {
        let manifest = manifest_of(h)?;
        write_list(&manifest.states, result, size, |s| DotLottieString::new(s))
    })
}

/// Raw manifest JSON. `*size` counts the terminating NUL.
#[no_mangle]
pub extern "C" fn dotlottie_manifest_string(
    ptr: *mut DotLottiePlayer,
    result: *mut c_char,
    size: *mut usize,
) -> i32 {
    with_player(ptr, "dotlottie_manifest_string", |h| unsafe {
        let size = non_null(size)?;
        let json = h.player.manifest_string();
        if json.is_empty() {
            return Err(DOTLOTTIE_ERROR);
        }
        let needed = json.len() + 1;
        if result.is_null() {
            size.write(needed);
            return Ok(());
        }
        let capacity = size.read();
        size.write(needed);
        if capacity < needed {
            return Err(DOTLOTTIE_ERROR);
        }
        std::ptr::copy_nonoverlapping(json.as_ptr().cast::<c_char>(), result, json.len());
        result.add(json.len()).write(0);
        Ok(())
    })
}

// ---------------------------------------------------------------------------
// Playback
// ---------------------------------------------------------------------------

#[no_mangle]
pub extern "C" fn dotlottie_play(ptr: *mut DotLottiePlayer) -> i32 {
    with_player(ptr, "dotlottie_play", |h| check("dotlottie_play", h.player.play()))
}

#[no_mangle]
pub extern "C" fn dotlottie_pause(ptr: *mut DotLottiePlayer) -> i32 {
    with_player(ptr, "dotlottie_pause", |h| check("dotlottie_pause", h.player.pause()))
}

#[no_mangle]
pub extern "C" fn dotlottie_stop(ptr: *mut DotLottiePlayer) -> i32 {
    with_player(ptr, "dotlottie_stop", |h| check("dotlottie_stop", h.player.stop()))
}

#[no_mangle]
pub extern "C" fn dotlottie_render(ptr: *mut DotLottiePlayer) -> i32 {
    with_player(ptr, "dotlottie_render", |h| check("dotlottie_render", h.player.render()))
}

/// Advance to the frame due now and render it.
#[no_mangle]
pub extern "C" fn dotlottie_tick(ptr: *mut DotLottiePlayer) -> i32 {
    with_player(ptr, "dotlottie_tick", |h| check("dotlottie_tick", h.player.tick()))
}

#[no_mangle]
pub extern "C" fn dotlottie_request_frame(ptr: *mut DotLottiePlayer, result: *mut f32) -> i32 {
    with_player(ptr, "dotlottie_request_frame", |h| unsafe {
        write(result, h.player.request_frame())
    })
}

#[no_mangle]
pub extern "C" fn dotlottie_set_frame(ptr: *mut DotLottiePlayer, no: f32) -> i32 {
    with_player(ptr, "dotlottie_set_frame", |h| {
        check("dotlottie_set_frame", h.player.set_frame(no))
    })
}

#[no_mangle]
pub extern "C" fn dotlottie_seek(ptr: *mut DotLottiePlayer, no: f32) -> i32 {
    with_player(ptr, "dotlottie_seek", |h| check("dotlottie_seek", h.player.seek(no)))
}

#[no_mangle]
pub extern "C" fn dotlottie_resize(ptr: *mut DotLottiePlayer, width: u32, height: u32) -> i32 {
    with_player(ptr, "dotlottie_resize", |h| {
        check("dotlottie_resize", h.player.resize(width, height))
    })
}

#[no_mangle]
pub extern "C" fn dotlottie_set_viewport(
    ptr: *mut DotLottiePlayer,
    x: i32,
    y: i32,
    w: i32,
    h: i32,
) -> i32 {
    with_player(ptr, "dotlottie_set_viewport", |handle| {
        check("dotlottie_set_viewport", handle.player.set_viewport(x, y, w, h))
    })
}

#[no_mangle]
pub extern "C" fn dotlottie_clear(ptr: *mut DotLottiePlayer) -> i32 {
    with_player(ptr, "dotlottie_clear", |h| {
        h.player.clear();
        Ok(())
    })
}

#[no_mangle]
pub extern "C" fn dotlottie_set_config(
    ptr: *mut DotLottiePlayer,
    config: *const DotLottieConfig,
) -> i32 {
    with_player(ptr, "dotlottie_set_config", |h| {
        let raw = unsafe { config.as_ref() }.ok_or(DOTLOTTIE_INVALID_PARAMETER)?;
        let config = unsafe { raw.to_config() }.ok_or(DOTLOTTIE_INVALID_PARAMETER)?;
        h.player.set_config(config);
        Ok(())
    })
}

/// Current configuration. `segment.ptr`, `layout.align.ptr` and `marker`
/// point into the player and stay valid until the next `dotlottie_config`
/// call on the same player or its destruction.
#[no_mangle]
pub extern "C" fn dotlottie_config(ptr: *mut DotLottiePlayer, result: *mut DotLottieConfig) -> i32 {
    with_player(ptr, "dotlottie_config", |h| {
        let result = non_null(result)?;
        let config = h.player.config();
        let mut view = h
            .config_view
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        view.segment = config.segment.clone();
        view.align = config.layout.align;
        view.marker = CString::new(config.marker.as_str()).unwrap_or_default();

        let segment = if view.segment.is_empty() {
            DotLottieFloatData::empty()
        } else {
            DotLottieFloatData {
                ptr: view.segment.as_mut_ptr(),
                size: view.segment.len(),
            }
        };
        let raw = DotLottieConfig {
            mode: config.mode,
            loop_animation: config.loop_animation,
            speed: config.speed,
            use_frame_interpolation: config.use_frame_interpolation,
            autoplay: config.autoplay,
            segment,
            background_color: config.background_color,
            layout: DotLottieLayout {
                fit: config.layout.fit,
                align: DotLottieFloatData {
                    ptr: view.align.as_mut_ptr(),
                    size: view.align.len(),
                },
            },
            marker: view.marker.as_ptr(),
        };
        unsafe { write(result, raw) }
    })
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

#[no_mangle]
pub extern "C" fn dotlottie_total_frames(ptr: *mut DotLottiePlayer, result: *mut f32) -> i32 {
    with_player(ptr, "dotlottie_total_frames", |h| unsafe {
        write(result, h.player.total_frames())
    })
}

#[no_mangle]
pub extern "C" fn dotlottie_duration(ptr: *mut DotLottiePlayer, result: *mut f32) -> i32 {
    with_player(ptr, "dotlottie_duration", |h| unsafe {
        write(result, h.player.duration())
    })
}

#[no_mangle]
pub extern "C" fn dotlottie_segment_duration(ptr: *mut DotLottiePlayer, result: *mut f32) -> i32 {
    with_player(ptr, "dotlottie_segment_duration", |h| unsafe {
        write(result, h.player.segment_duration())
    })
}

#[no_mangle]
pub extern "C" fn dotlottie_current_frame(ptr: *mut DotLottiePlayer, result: *mut f32) -> i32 {
    with_player(ptr, "dotlottie_current_frame", |h| unsafe {
        write(result, h.player.current_frame())
    })
}

#[no_mangle]
pub extern "C" fn dotlottie_loop_count(ptr: *mut DotLottiePlayer, result: *mut u32) -> i32 {
    with_player(ptr, "dotlottie_loop_count", |h| unsafe {
        write(result, h.player.loop_count())
    })
}

#[no_mangle]
pub extern "C" fn dotlottie_is_loaded(ptr: *mut DotLottiePlayer, result: *mut bool) -> i32 {
    with_player(ptr, "dotlottie_is_loaded", |h| unsafe {
        write(result, h.player.is_loaded())
    })
}

#[no_mangle]
pub extern "C" fn dotlottie_is_complete(ptr: *mut DotLottiePlayer, result: *mut bool) -> i32 {
    with_player(ptr, "dotlottie_is_complete", |h| unsafe {
        write(result, h.player.is_complete())
    })
}

#[no_mangle]
pub extern "C" fn dotlottie_is_playing(ptr: *mut DotLottiePlayer, result: *mut bool) -> i32 {
    with_player(ptr, "dotlottie_is_playing", |h| unsafe {
        write(result, h.player.is_playing())
    })
}

#[no_mangle]
pub extern "C" fn dotlottie_is_paused(ptr: *mut DotLottiePlayer, result: *mut bool) -> i32 {
    with_player(ptr, "dotlottie_is_paused", |h| unsafe {
        write(result, h.player.is_paused())
    })
}

#[no_mangle]
pub extern "C" fn dotlottie_is_stopped(ptr: *mut DotLottiePlayer, result: *mut bool) -> i32 {
    with_player(ptr, "dotlottie_is_stopped", |h| unsafe {
        write(result, h.player.is_stopped())
    })
}

/// Address of the ARGB pixel buffer. Valid until the next load or resize.
#[no_mangle]
pub extern "C" fn dotlottie_buffer_ptr(ptr: *mut DotLottiePlayer, result: *mut u64) -> i32 {
    with_player(ptr, "dotlottie_buffer_ptr", |h| unsafe {
        write(result, h.player.buffer_ptr())
    })
}

/// Pixel count of the buffer.
#[no_mangle]
pub extern "C" fn dotlottie_buffer_len(ptr: *mut DotLottiePlayer, result: *mut u64) -> i32 {
    with_player(ptr, "dotlottie_buffer_len", |h| unsafe {
        write(result, h.player.buffer_len())
    })
}

#[no_mangle]
pub extern "C" fn dotlottie_animation_size(
    ptr: *mut DotLottiePlayer,
    width: *mut f32,
    height: *mut f32,
) -> i32 {
    with_player(ptr, "dotlottie_animation_size", |h| unsafe {
        let (width, height) = (non_null(width)?, non_null(height)?);
        let [w, hgt] = h.player.animation_size();
        width.write(w);
        height.write(hgt);
        Ok(())
    })
}

#[no_mangle]
pub extern "C" fn dotlottie_markers(
    ptr: *mut DotLottiePlayer,
    result: *mut DotLottieMarker,
    size: *mut usize,
) -> i32 {
    with_player(ptr, "dotlottie_markers", |h| unsafe {
        write_list(&h.player.markers(), result, size, |m| DotLottieMarker::from(m))
    })
}

#[no_mangle]
pub extern "C" fn dotlottie_active_animation_id(
    ptr: *mut DotLottiePlayer,
    result: *mut DotLottieString,
) -> i32 {
    with_player(ptr, "dotlottie_active_animation_id", |h| unsafe {
        write(result, DotLottieString::new(&h.player.active_animation_id()))
    })
}

#[no_mangle]
pub extern "C" fn dotlottie_active_theme_id(
    ptr: *mut DotLottiePlayer,
    result: *mut DotLottieString,
) -> i32 {
    with_player(ptr, "dotlottie_active_theme_id", |h| unsafe {
        write(result, DotLottieString::new(&h.player.active_theme_id()))
    })
}

// ---------------------------------------------------------------------------
// Themes
// ---------------------------------------------------------------------------

/// Apply a bundle theme; an empty id removes the active theme.
#[no_mangle]
pub extern "C" fn dotlottie_load_theme(ptr: *mut DotLottiePlayer, theme_id: *const c_char) -> i32 {
    with_player(ptr, "dotlottie_load_theme", |h| {
        let id = unsafe { c_str(theme_id) }?;
        check("dotlottie_load_theme", h.player.load_theme(id))
    })
}

#[no_mangle]
pub extern "C" fn dotlottie_load_theme_data(
    ptr: *mut DotLottiePlayer,
    theme_data: *const c_char,
) -> i32 {
    with_player(ptr, "dotlottie_load_theme_data", |h| {
        let data = unsafe { c_str(theme_data) }?;
        check("dotlottie_load_theme_data", h.player.load_theme_data(data))
    })
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

#[no_mangle]
pub extern "C" fn dotlottie_load_state_machine(
    ptr: *mut DotLottiePlayer,
    state_machine_id: *const c_char,
) -> i32 {
    with_player(ptr, "dotlottie_load_state_machine", |h| {
        let id = unsafe { c_str(state_machine_id) }?;
        check("dotlottie_load_state_machine", h.player.load_state_machine(id))
    })
}

#[no_mangle]
pub extern "C" fn dotlottie_load_state_machine_data(
    ptr: *mut DotLottiePlayer,
    state_machine: *const c_char,
) -> i32 {
    with_player(ptr, "dotlottie_load_state_machine_data", |h| {
        let data = unsafe { c_str(state_machine) }?;
        check(
            "dotlottie_load_state_machine_data",
            h.player.load_state_machine_data(data),
        )
    })
}

#[no_mangle]
pub extern "C" fn dotlottie_start_state_machine(ptr: *mut DotLottiePlayer) -> i32 {
    with_player(ptr, "dotlottie_start_state_machine", |h| {
        check("dotlottie_start_state_machine", h.player.start_state_machine())
    })
}

#[no_mangle]
pub extern "C" fn dotlottie_stop_state_machine(ptr: *mut DotLottiePlayer) -> i32 {
    with_player(ptr, "dotlottie_stop_state_machine", |h| {
        check("dotlottie_stop_state_machine", h.player.stop_state_machine())
    })
}

#[no_mangle]
pub extern "C" fn dotlottie_set_state_machine_numeric_context(
    ptr: *mut DotLottiePlayer,
    key: *const c_char,
    value: f32,
) -> i32 {
    with_player(ptr, "dotlottie_set_state_machine_numeric_context", |h| {
        let key = unsafe { c_str(key) }?;
        check(
            "dotlottie_set_state_machine_numeric_context",
            h.player.set_state_machine_numeric_context(key, value),
        )
    })
}

#[no_mangle]
pub extern "C" fn dotlottie_set_state_machine_string_context(
    ptr: *mut DotLottiePlayer,
    key: *const c_char,
    value: *const c_char,
) -> i32 {
    with_player(ptr, "dotlottie_set_state_machine_string_context", |h| {
        let (key, value) = unsafe { (c_str(key)?, c_str(value)?) };
        check(
            "dotlottie_set_state_machine_string_context",
            h.player.set_state_machine_string_context(key, value),
        )
    })
}

#[no_mangle]
pub extern "C" fn dotlottie_set_state_machine_boolean_context(
    ptr: *mut DotLottiePlayer,
    key: *const c_char,
    value: bool,
) -> i32 {
    with_player(ptr, "dotlottie_set_state_machine_boolean_context", |h| {
        let key = unsafe { c_str(key) }?;
        check(
            "dotlottie_set_state_machine_boolean_context",
            h.player.set_state_machine_boolean_context(key, value),
        )
    })
}

/// Pointer listeners (`ListenerType` bits) the host must install.
#[no_mangle]
pub extern "C" fn dotlottie_state_machine_framework_setup(
    ptr: *mut DotLottiePlayer,
    result: *mut u16,
) -> i32 {
    with_player(ptr, "dotlottie_state_machine_framework_setup", |h| unsafe {
        write(result, h.player.state_machine_framework_setup().bits())
    })
}

/// Deliver one pointer event; `event` must be a single `ListenerType` bit.
#[no_mangle]
pub extern "C" fn dotlottie_state_machine_post_pointer_event(
    ptr: *mut DotLottiePlayer,
    event: u16,
) -> i32 {
    with_player(ptr, "dotlottie_state_machine_post_pointer_event", |h| {
        let event = ListenerType::from_bits(event).ok_or_else(|| {
            log::warn!("unknown pointer event bits {event:#x}");
            DOTLOTTIE_INVALID_PARAMETER
        })?;
        check(
            "dotlottie_state_machine_post_pointer_event",
            h.player.post_pointer_event(event),
        )
    })
}

/// Name of the current state, empty when the machine is not running.
#[no_mangle]
pub extern "C" fn dotlottie_state_machine_current_state(
    ptr: *mut DotLottiePlayer,
    result: *mut DotLottieString,
) -> i32 {
    with_player(ptr, "dotlottie_state_machine_current_state", |h| unsafe {
        let name = h.player.state_machine_current_state().unwrap_or_default();
        write(result, DotLottieString::new(&name))
    })
}

// ---------------------------------------------------------------------------
// Observers
// ---------------------------------------------------------------------------

#[no_mangle]
pub extern "C" fn dotlottie_subscribe(ptr: *mut DotLottiePlayer, observer: *mut Observer) -> i32 {
    with_player(ptr, "dotlottie_subscribe", |h| {
        let table = *unsafe { observer.as_ref() }.ok_or(DOTLOTTIE_INVALID_PARAMETER)?;
        let observer_arc: Arc<dyn PlayerObserver> = Arc::new(table);
        h.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((observer as usize, observer_arc.clone()));
        h.player.subscribe(observer_arc);
        Ok(())
    })
}

/// Remove a subscription made with the same `observer` pointer.
#[no_mangle]
pub extern "C" fn dotlottie_unsubscribe(ptr: *mut DotLottiePlayer, observer: *mut Observer) -> i32 {
    with_player(ptr, "dotlottie_unsubscribe", |h| {
        let key = non_null(observer)? as usize;
        let mut subscribed = h.observers.lock().unwrap_or_else(PoisonError::into_inner);
        let index = subscribed
            .iter()
            .position(|(k, _)| *k == key)
            .ok_or(DOTLOTTIE_ERROR)?;
        let (_, observer_arc) = subscribed.remove(index);
        h.player.unsubscribe(&observer_arc);
        Ok(())
    })
}

#[no_mangle]
pub extern "C" fn dotlottie_state_machine_subscribe(
    ptr: *mut DotLottiePlayer,
    observer: *mut StateMachineObserver,
) -> i32 {
    with_player(ptr, "dotlottie_state_machine_subscribe", |h| {
        let table = *unsafe { observer.as_ref() }.ok_or(DOTLOTTIE_INVALID_PARAMETER)?;
        let observer_arc: Arc<dyn PlayerStateMachineObserver> = Arc::new(table);
        h.state_machine_observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((observer as usize, observer_arc.clone()));
        h.player.state_machine_subscribe(observer_arc);
        Ok(())
    })
}

#[no_mangle]
pub extern "C" fn dotlottie_state_machine_unsubscribe(
    ptr: *mut DotLottiePlayer,
    observer: *mut StateMachineObserver,
) -> i32 {
    with_player(ptr, "dotlottie_state_machine_unsubscribe", |h| {
        let key = non_null(observer)? as usize;
        let mut subscribed = h
            .state_machine_observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let index = subscribed
            .iter()
            .position(|(k, _)| *k == key)
            .ok_or(DOTLOTTIE_ERROR)?;
        let (_, observer_arc) = subscribed.remove(index);
        h.player.state_machine_unsubscribe(&observer_arc);
        Ok(())
    })
}
