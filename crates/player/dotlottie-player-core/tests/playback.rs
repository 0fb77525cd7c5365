mod common;

use std::sync::Arc;

use approx::assert_relative_eq;
use common::{dots, player, Recorder};
use dotlottie_player_core::{
    Config, Mode, Observer, PlaybackState, PlayerError, MAX_CANVAS_PIXELS,
};

#[test]
fn load_reports_timing_and_allocates_buffer() {
    let (p, _clock, rec) = player(Config::default());
    p.load_animation_data(&dots(), 100, 50).unwrap();

    assert!(p.is_loaded());
    assert!(p.is_stopped());
    assert_relative_eq!(p.total_frames(), 61.0);
    assert_relative_eq!(p.duration(), 61.0 / 30.0);
    assert_relative_eq!(p.segment_duration(), 2.0);
    assert_eq!(p.current_frame(), 0.0);
    assert_eq!(p.buffer_len(), 5000);
    assert_ne!(p.buffer_ptr(), 0);
    assert_eq!(p.animation_size(), [200.0, 100.0]);
    assert_eq!(p.markers().len(), 2);
    assert!(p.manifest().is_none());
    assert_eq!(p.manifest_string(), "");
    assert_eq!(rec.events(), vec!["load"]);
}

#[test]
fn failed_load_leaves_player_unloaded() {
    let (p, _clock, rec) = player(Config::default());
    let err = p.load_animation_data("{}", 100, 100).unwrap_err();
    assert!(matches!(err, PlayerError::InvalidAnimation { .. }));
    assert!(!p.is_loaded());
    assert_eq!(rec.events(), vec!["load_error"]);

    assert!(matches!(
        p.load_animation_data(&dots(), 0, 100),
        Err(PlayerError::InvalidArgument { .. })
    ));
    assert!(matches!(p.play(), Err(PlayerError::AnimationNotLoaded)));
    assert!(p.render().is_err());
    assert_eq!(p.total_frames(), 0.0);
}

#[test]
fn clock_drives_the_frame() {
    let (p, clock, _rec) = player(Config::default());
    p.load_animation_data(&dots(), 100, 100).unwrap();
    p.play().unwrap();

    clock.advance(1.0);
    assert_relative_eq!(p.request_frame(), 30.0);
    // request_frame is a query only
    assert_eq!(p.current_frame(), 0.0);

    p.tick().unwrap();
    assert_relative_eq!(p.current_frame(), 30.0);
    assert!(!p.is_complete());
}

#[test]
fn speed_scales_playback() {
    let (p, clock, _rec) = player(Config::default().with_speed(2.0));
    p.load_animation_data(&dots(), 100, 100).unwrap();
    p.play().unwrap();
    clock.advance(0.5);
    assert_relative_eq!(p.request_frame(), 30.0);
}

#[test]
fn frames_snap_without_interpolation() {
    let (p, clock, _rec) = player(Config::default().without_frame_interpolation());
    p.load_animation_data(&dots(), 100, 100).unwrap();
    p.play().unwrap();
    clock.advance(0.51);
    assert_eq!(p.request_frame(), 15.0);
}

#[test]
fn pause_holds_position() {
    let (p, clock, rec) = player(Config::default());
    p.load_animation_data(&dots(), 100, 100).unwrap();
    p.play().unwrap();
    clock.advance(0.5);
    p.tick().unwrap();
    p.pause().unwrap();
    assert!(p.is_paused());

    clock.advance(10.0);
    assert_relative_eq!(p.request_frame(), 15.0);

    p.play().unwrap();
    clock.advance(0.5);
    assert_relative_eq!(p.request_frame(), 30.0);
    assert_eq!(rec.transport(), vec!["load", "play", "frame:15", "pause", "play"]);
}

#[test]
fn transport_rejects_invalid_transitions() {
    let (p, _clock, _rec) = player(Config::default());
    p.load_animation_data(&dots(), 100, 100).unwrap();
    assert!(matches!(
        p.pause(),
        Err(PlayerError::InvalidPlaybackState { current: "stopped", requested: "paused" })
    ));
    assert!(p.stop().is_err());
    p.play().unwrap();
    assert!(p.play().is_err());
    p.stop().unwrap();
    assert_eq!(p.playback_state(), PlaybackState::Stopped);
}

#[test]
fn completes_once_without_loop() {
    let (p, clock, rec) = player(Config::default());
    p.load_animation_data(&dots(), 100, 100).unwrap();
    p.play().unwrap();
    clock.advance(2.5);
    assert!(p.is_complete());

    p.tick().unwrap();
    assert!(p.is_complete());
    assert!(p.is_stopped());
    assert_relative_eq!(p.current_frame(), 60.0);
    assert_eq!(
        rec.transport(),
        vec!["load", "play", "frame:60", "complete"]
    );

    // replay restarts the cycle
    p.play().unwrap();
    assert!(!p.is_complete());
    assert_eq!(p.current_frame(), 0.0);
}

#[test]
fn loops_and_counts() {
    let (p, clock, rec) = player(Config::default().with_loop());
    p.load_animation_data(&dots(), 100, 100).unwrap();
    p.play().unwrap();

    clock.advance(2.5);
    p.tick().unwrap();
    assert_eq!(p.loop_count(), 1);
    assert!(p.is_playing());
    // half a second into the next cycle
    assert_relative_eq!(p.current_frame(), 15.0, epsilon = 1e-3);

    clock.advance(1.0);
    assert_relative_eq!(p.request_frame(), 45.0, epsilon = 1e-3);
    assert!(rec.events().contains(&"loop:1".to_string()));
    assert!(!rec.events().contains(&"complete".to_string()));
}

#[test]
fn late_render_counts_every_elapsed_cycle() {
    let (p, clock, rec) = player(Config::default().with_loop());
    p.load_animation_data(&dots(), 100, 100).unwrap();
    p.play().unwrap();

    clock.advance(4.5);
    p.tick().unwrap();
    assert_eq!(p.loop_count(), 2);
    assert_relative_eq!(p.current_frame(), 15.0, epsilon = 1e-3);
    let loops: Vec<_> = rec
        .events()
        .into_iter()
        .filter(|e| e.starts_with("loop"))
        .collect();
    assert_eq!(loops, vec!["loop:2"]);
}

#[test]
fn set_frame_after_completion_resumes_from_there() {
    let (p, clock, _rec) = player(Config::default());
    p.load_animation_data(&dots(), 100, 100).unwrap();
    p.play().unwrap();
    clock.advance(2.5);
    p.tick().unwrap();
    assert!(p.is_complete());

    p.set_frame(10.0).unwrap();
    assert!(!p.is_complete());
    p.play().unwrap();
    assert_eq!(p.current_frame(), 10.0);
    clock.advance(0.1);
    assert_relative_eq!(p.request_frame(), 13.0, epsilon = 1e-3);
}

#[test]
fn oversized_canvas_is_rejected() {
    let (p, _clock, rec) = player(Config::default());
    let err = p.load_animation_data(&dots(), u32::MAX, u32::MAX).unwrap_err();
    assert!(matches!(err, PlayerError::InvalidArgument { .. }));
    assert!(!p.is_loaded());
    assert_eq!(rec.events(), vec!["load_error"]);

    p.load_animation_data(&dots(), 64, 64).unwrap();
    let side = (MAX_CANVAS_PIXELS as f64).sqrt() as u32;
    assert!(matches!(
        p.resize(side + 1, side),
        Err(PlayerError::InvalidArgument { .. })
    ));
    assert!(p.resize(0, 10).is_err());
    assert_eq!(p.buffer_len(), 64 * 64);
    p.resize(32, 16).unwrap();
    assert_eq!(p.buffer_len(), 32 * 16);
}

#[test]
fn bounce_comes_back() {
    let (p, clock, _rec) = player(Config::default().with_mode(Mode::Bounce));
    p.load_animation_data(&dots(), 100, 100).unwrap();
    p.play().unwrap();
    clock.advance(2.5);
    assert_relative_eq!(p.request_frame(), 45.0);
    clock.advance(2.0);
    assert!(p.is_complete());
}

#[test]
fn reverse_bounce_goes_out_and_back_from_the_end() {
    let (p, clock, _rec) = player(Config::default().with_mode(Mode::ReverseBounce));
    p.load_animation_data(&dots(), 100, 100).unwrap();
    assert_eq!(p.current_frame(), 60.0);
    p.play().unwrap();
    clock.advance(1.0);
    assert_relative_eq!(p.request_frame(), 30.0, epsilon = 1e-3);
    clock.advance(1.5);
    assert_relative_eq!(p.request_frame(), 15.0, epsilon = 1e-3);
    clock.advance(2.0);
    p.tick().unwrap();
    assert!(p.is_complete());
    assert_eq!(p.current_frame(), 60.0);
}

#[test]
fn set_config_while_playing_keeps_position() {
    let (p, clock, _rec) = player(Config::default());
    p.load_animation_data(&dots(), 100, 100).unwrap();
    p.play().unwrap();
    clock.advance(1.0);
    p.tick().unwrap();
    assert_relative_eq!(p.current_frame(), 30.0, epsilon = 1e-3);

    p.set_config(p.config().with_speed(2.0));
    assert!(p.is_playing());
    clock.advance(0.25);
    assert_relative_eq!(p.request_frame(), 45.0, epsilon = 1e-3);

    // a window that no longer holds the frame rewinds to its start
    p.tick().unwrap();
    p.set_config(p.config().with_segment(0.0, 20.0));
    assert_eq!(p.current_frame(), 0.0);
    assert!(p.is_playing());
}

#[test]
fn reverse_starts_at_the_end() {
    let (p, clock, _rec) = player(Config::default().with_mode(Mode::Reverse));
    p.load_animation_data(&dots(), 100, 100).unwrap();
    assert_eq!(p.current_frame(), 60.0);
    p.play().unwrap();
    clock.advance(1.0);
    assert_relative_eq!(p.request_frame(), 30.0);
}

#[test]
fn segment_bounds_set_frame() {
    let (p, _clock, rec) = player(Config::default().with_segment(10.0, 20.0));
    p.load_animation_data(&dots(), 100, 100).unwrap();
    assert_eq!(p.current_frame(), 10.0);
    assert_relative_eq!(p.segment_duration(), 10.0 / 30.0);

    let err = p.set_frame(25.0).unwrap_err();
    assert_eq!(
        err,
        PlayerError::InvalidFrame {
            frame: 25.0,
            start: 10.0,
            end: 20.0
        }
    );
    p.set_frame(15.0).unwrap();
    assert_eq!(p.current_frame(), 15.0);
    assert!(rec.events().contains(&"frame:15".to_string()));
}

#[test]
fn marker_overrides_segment() {
    let config = Config::default()
        .with_segment(0.0, 10.0)
        .with_marker("outro");
    let (p, _clock, _rec) = player(config);
    p.load_animation_data(&dots(), 100, 100).unwrap();
    assert_eq!(p.current_frame(), 30.0);
    assert!(p.set_frame(5.0).is_err());

    // unknown markers fall back to the segment
    p.set_config(p.config().with_marker("nope"));
    assert_eq!(p.current_frame(), 0.0);
    assert!(p.set_frame(5.0).is_ok());
}

#[test]
fn seek_continues_from_new_frame() {
    let (p, clock, rec) = player(Config::default());
    p.load_animation_data(&dots(), 100, 100).unwrap();
    p.play().unwrap();
    clock.advance(1.0);
    p.seek(50.0).unwrap();
    assert_eq!(p.current_frame(), 50.0);
    assert!(rec.events().contains(&"render:50".to_string()));

    clock.advance(0.2);
    assert_relative_eq!(p.request_frame(), 56.0, epsilon = 1e-3);
}

#[test]
fn autoplay_starts_on_load() {
    let (p, _clock, rec) = player(Config::default().with_autoplay());
    p.load_animation_data(&dots(), 100, 100).unwrap();
    assert!(p.is_playing());
    assert_eq!(rec.events(), vec!["load", "play"]);
}

#[test]
fn render_fills_background() {
    let (p, _clock, _rec) = player(Config::default().with_background_color(0x336699FF));
    p.load_animation_data(&dots(), 4, 4).unwrap();
    p.render().unwrap();
    assert!(p.buffer().iter().all(|&px| px == 0xFF336699));
    p.clear();
    assert!(p.buffer().iter().all(|&px| px == 0));

    p.resize(8, 2).unwrap();
    assert_eq!(p.buffer_len(), 16);
    assert!(p.resize(0, 2).is_err());
    assert!(p.set_viewport(0, 0, 0, 4).is_err());
    p.set_viewport(0, 0, 8, 2).unwrap();
}

#[test]
fn unsubscribe_silences_observer() {
    let (p, _clock, rec) = player(Config::default());
    let extra = Arc::new(Recorder::default());
    let as_observer: Arc<dyn Observer> = extra.clone();
    p.subscribe(as_observer.clone());
    p.load_animation_data(&dots(), 10, 10).unwrap();
    p.unsubscribe(&as_observer);
    p.play().unwrap();

    assert_eq!(extra.events(), vec!["load"]);
    assert_eq!(rec.events(), vec!["load", "play"]);
}

#[test]
fn observer_may_call_back_into_player() {
    use dotlottie_player_core::DotLottiePlayer;
    use std::sync::{Mutex, Weak};

    #[derive(Default)]
    struct Peek {
        player: Mutex<Weak<DotLottiePlayer>>,
        seen: Mutex<Option<bool>>,
    }
    impl Observer for Peek {
        fn on_play(&self) {
            if let Some(p) = self.player.lock().unwrap().upgrade() {
                *self.seen.lock().unwrap() = Some(p.is_playing());
            }
        }
    }

    let (p, _clock, _rec) = player(Config::default());
    let p = Arc::new(p);
    let peek = Arc::new(Peek::default());
    *peek.player.lock().unwrap() = Arc::downgrade(&p);
    p.subscribe(peek.clone());
    p.load_animation_data(&dots(), 10, 10).unwrap();
    p.play().unwrap();
    assert_eq!(*peek.seen.lock().unwrap(), Some(true));
}
