//! Observer traits and the events queued for them.

use std::sync::Arc;

/// Playback lifecycle callbacks. Default methods do nothing.
pub trait Observer: Send + Sync {
    fn on_load(&self) {}
    fn on_load_error(&self) {}
    fn on_play(&self) {}
    fn on_pause(&self) {}
    fn on_stop(&self) {}
    fn on_frame(&self, _frame_no: f32) {}
    fn on_render(&self, _frame_no: f32) {}
    fn on_loop(&self, _loop_count: u32) {}
    fn on_complete(&self) {}
}

/// State machine callbacks. Default methods do nothing.
pub trait StateMachineObserver: Send + Sync {
    fn on_transition(&self, _previous_state: &str, _new_state: &str) {}
    fn on_state_entered(&self, _entering_state: &str) {}
    fn on_state_exit(&self, _leaving_state: &str) {}
}

/// Something that happened while the player lock was held; delivered to
/// observers once it is released.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum PlayerEvent {
    Load,
    LoadError,
    Play,
    Pause,
    Stop,
    Frame(f32),
    Render(f32),
    Loop(u32),
    Complete,
    Transition { from: String, to: String },
    StateEntered(String),
    StateExit(String),
}

pub(crate) fn dispatch(
    events: Vec<PlayerEvent>,
    observers: &[Arc<dyn Observer>],
    sm_observers: &[Arc<dyn StateMachineObserver>],
) {
    for event in &events {
        match event {
            PlayerEvent::Transition { from, to } => {
                sm_observers.iter().for_each(|o| o.on_transition(from, to))
            }
            PlayerEvent::StateEntered(s) => sm_observers.iter().for_each(|o| o.on_state_entered(s)),
            PlayerEvent::StateExit(s) => sm_observers.iter().for_each(|o| o.on_state_exit(s)),
            _ => observers.iter().for_each(|o| notify(o.as_ref(), event)),
        }
    }
}

fn notify(o: &dyn Observer, event: &PlayerEvent) {
    match *event {
        PlayerEvent::Load => o.on_load(),
        PlayerEvent::LoadError => o.on_load_error(),
        PlayerEvent::Play => o.on_play(),
        PlayerEvent::Pause => o.on_pause(),
        PlayerEvent::Stop => o.on_stop(),
        PlayerEvent::Frame(f) => o.on_frame(f),
        PlayerEvent::Render(f) => o.on_render(f),
        PlayerEvent::Loop(n) => o.on_loop(n),
        PlayerEvent::Complete => o.on_complete(),
        PlayerEvent::Transition { .. } | PlayerEvent::StateEntered(_) | PlayerEvent::StateExit(_) => {}
    }
}
