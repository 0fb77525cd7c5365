//! C callback tables and their bridges onto the player's observer traits.

use std::ffi::CString;
use std::os::raw::c_char;

use dotlottie_player_core::observer::{
    Observer as PlayerObserver, StateMachineObserver as PlayerStateMachineObserver,
};

pub type OnOp = unsafe extern "C" fn();
pub type OnFrameOp = unsafe extern "C" fn(f32);
pub type OnRenderOp = unsafe extern "C" fn(f32);
pub type OnLoopOp = unsafe extern "C" fn(u32);

pub type OnTransitionOp = unsafe extern "C" fn(*const c_char, *const c_char);
pub type OnStateEnteredOp = unsafe extern "C" fn(*const c_char);
pub type OnStateExitOp = unsafe extern "C" fn(*const c_char);

/// Playback callbacks. Null entries are skipped.
///
/// The table is copied on subscribe; the caller's struct only identifies the
/// subscription for `dotlottie_unsubscribe`.
#[repr(C)]
#[derive(Clone, Copy, Default)]
pub struct Observer {
    pub on_load_op: Option<OnOp>,
    pub on_load_error_op: Option<OnOp>,
    pub on_play_op: Option<OnOp>,
    pub on_pause_op: Option<OnOp>,
    pub on_stop_op: Option<OnOp>,
    pub on_frame_op: Option<OnFrameOp>,
    pub on_render_op: Option<OnRenderOp>,
    pub on_loop_op: Option<OnLoopOp>,
    pub on_complete_op: Option<OnOp>,
}

#[inline]
fn call(op: Option<OnOp>) {
    if let Some(op) = op {
        unsafe { op() }
    }
}

impl PlayerObserver for Observer {
    fn on_load(&self) {
        call(self.on_load_op)
    }
    fn on_load_error(&self) {
        call(self.on_load_error_op)
    }
    fn on_play(&self) {
        call(self.on_play_op)
    }
    fn on_pause(&self) {
        call(self.on_pause_op)
    }
    fn on_stop(&self) {
        call(self.on_stop_op)
    }
    fn on_frame(&self, frame_no: f32) {
        if let Some(op) = self.on_frame_op {
            unsafe { op(frame_no) }
        }
    }
    fn on_render(&self, frame_no: f32) {
        if let Some(op) = self.on_render_op {
            unsafe { op(frame_no) }
        }
    }
    fn on_loop(&self, loop_count: u32) {
        if let Some(op) = self.on_loop_op {
            unsafe { op(loop_count) }
        }
    }
    fn on_complete(&self) {
        call(self.on_complete_op)
    }
}

/// State machine callbacks. State names are only valid during the call.
#[repr(C)]
#[derive(Clone, Copy, Default)]
pub struct StateMachineObserver {
    pub on_transition_op: Option<OnTransitionOp>,
    pub on_state_entered_op: Option<OnStateEnteredOp>,
    pub on_state_exit_op: Option<OnStateExitOp>,
}

fn c_name(name: &str) -> Option<CString> {
    CString::new(name)
        .map_err(|_| log::warn!("state name {name:?} contains a NUL byte, callback skipped"))
        .ok()
}

impl PlayerStateMachineObserver for StateMachineObserver {
    fn on_transition(&self, previous_state: &str, new_state: &str) {
        if let (Some(op), Some(prev), Some(new)) = (
            self.on_transition_op,
            c_name(previous_state),
            c_name(new_state),
        ) {
            unsafe { op(prev.as_ptr(), new.as_ptr()) }
        }
    }
    fn on_state_entered(&self, entering_state: &str) {
        if let (Some(op), Some(name)) = (self.on_state_entered_op, c_name(entering_state)) {
            unsafe { op(name.as_ptr()) }
        }
    }
    fn on_state_exit(&self, leaving_state: &str) {
        if let (Some(op), Some(name)) = (self.on_state_exit_op, c_name(leaving_state)) {
            unsafe { op(name.as_ptr()) }
        }
    }
}
