#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use dotlottie_player_core::{
    Clock, Config, DotLottiePlayer, Observer, SoftwareRenderer, StateMachineObserver,
};
use instant::Instant;

/// Clock that only moves when told to.
pub struct ManualClock(Mutex<Instant>);

impl ManualClock {
    pub fn new() -> Arc<Self> {
        Arc::new(Self(Mutex::new(Instant::now())))
    }

    pub fn advance(&self, secs: f32) {
        *self.0.lock().unwrap() += Duration::from_secs_f32(secs);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.0.lock().unwrap()
    }
}

/// Records every callback as a short string.
#[derive(Default)]
pub struct Recorder(Mutex<Vec<String>>);

impl Recorder {
    pub fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    /// Events without the per-draw `render` noise.
    pub fn transport(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|e| !e.starts_with("render"))
            .collect()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }

    fn push(&self, e: String) {
        self.0.lock().unwrap().push(e);
    }
}

impl Observer for Recorder {
    fn on_load(&self) {
        self.push("load".into());
    }
    fn on_load_error(&self) {
        self.push("load_error".into());
    }
    fn on_play(&self) {
        self.push("play".into());
    }
    fn on_pause(&self) {
        self.push("pause".into());
    }
    fn on_stop(&self) {
        self.push("stop".into());
    }
    fn on_frame(&self, frame_no: f32) {
        self.push(format!("frame:{frame_no}"));
    }
    fn on_render(&self, frame_no: f32) {
        self.push(format!("render:{frame_no}"));
    }
    fn on_loop(&self, loop_count: u32) {
        self.push(format!("loop:{loop_count}"));
    }
    fn on_complete(&self) {
        self.push("complete".into());
    }
}

impl StateMachineObserver for Recorder {
    fn on_transition(&self, previous_state: &str, new_state: &str) {
        self.push(format!("transition:{previous_state}->{new_state}"));
    }
    fn on_state_entered(&self, entering_state: &str) {
        self.push(format!("entered:{entering_state}"));
    }
    fn on_state_exit(&self, leaving_state: &str) {
        self.push(format!("exit:{leaving_state}"));
    }
}

pub fn player(config: Config) -> (DotLottiePlayer, Arc<ManualClock>, Arc<Recorder>) {
    let clock = ManualClock::new();
    let player =
        DotLottiePlayer::with_renderer(config, Box::new(SoftwareRenderer::new()), clock.clone());
    let recorder = Arc::new(Recorder::default());
    player.subscribe(recorder.clone());
    player.state_machine_subscribe(recorder.clone());
    (player, clock, recorder)
}

pub fn dots() -> String {
    dotlottie_test_fixtures::animations::json("dots").expect("dots fixture")
}
