//! Player: owns the loaded animation, the playback clock, the pixel buffer and
//! an optional state machine.
//!
//! Every public method takes `&self`; state lives behind a mutex. Observer
//! events raised while the lock is held are queued and delivered after it is
//! released, so callbacks may call back into the player.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use instant::Instant;

use crate::bundle::Bundle;
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::error::PlayerError;
use crate::lottie::{LottieAnimation, Marker};
use crate::manifest::Manifest;
use crate::observer::{dispatch, Observer, PlayerEvent, StateMachineObserver};
use crate::playback_state::PlaybackState;
use crate::renderer::{Renderer, SoftwareRenderer};
use crate::state_machine::{
    ContextValue, Fired, ListenerType, StateDef, StateMachine, Trigger,
};
use crate::theme::Theme;
use crate::timeline::{frame_at, frames_travelled, travelled_for_frame, window_for, FrameStep, Window};
use crate::Result;

/// Largest canvas, in pixels, the player allocates a buffer for.
pub const MAX_CANVAS_PIXELS: usize = 8192 * 8192;

/// Zeroed ARGB buffer for a `width` x `height` canvas.
fn canvas_buffer(width: u32, height: u32) -> Result<Vec<u32>> {
    let pixels = (width as usize)
        .checked_mul(height as usize)
        .filter(|&n| n > 0 && n <= MAX_CANVAS_PIXELS)
        .ok_or_else(|| PlayerError::InvalidArgument {
            reason: format!(
                "canvas {width}x{height} must hold between 1 and {MAX_CANVAS_PIXELS} pixels"
            ),
        })?;
    Ok(vec![0; pixels])
}

struct PlayerRuntime {
    config: Config,
    renderer: Box<dyn Renderer>,
    clock: Arc<dyn Clock>,

    animation: Option<LottieAnimation>,
    bundle: Option<Bundle>,
    active_animation_id: String,
    active_theme: Option<Theme>,

    width: u32,
    height: u32,
    buffer: Vec<u32>,

    state: PlaybackState,
    window: Window,
    current_frame: f32,
    loop_count: u32,
    completed: bool,
    /// Clock reading when playback last (re)started.
    anchor: Instant,
    /// Seconds of the current cycle already played before `anchor`.
    offset: f32,

    state_machine: Option<StateMachine>,
    events: Vec<PlayerEvent>,
}

impl PlayerRuntime {
    fn new(config: Config, renderer: Box<dyn Renderer>, clock: Arc<dyn Clock>) -> Self {
        let anchor = clock.now();
        let mut rt = Self {
            config: config.validated(),
            renderer,
            clock,
            animation: None,
            bundle: None,
            active_animation_id: String::new(),
            active_theme: None,
            width: 0,
            height: 0,
            buffer: Vec::new(),
            state: PlaybackState::Stopped,
            window: Window::default(),
            current_frame: 0.0,
            loop_count: 0,
            completed: false,
            anchor,
            offset: 0.0,
            state_machine: None,
            events: Vec::new(),
        };
        rt.renderer.set_background_color(rt.config.background_color);
        rt.renderer.set_layout(&rt.config.layout);
        rt
    }

    fn animation(&self) -> Result<&LottieAnimation> {
        self.animation.as_ref().ok_or(PlayerError::AnimationNotLoaded)
    }

    fn bundle(&self) -> Result<&Bundle> {
        self.bundle.as_ref().ok_or(PlayerError::BundleNotLoaded)
    }

    fn origin(&self) -> f32 {
        self.window.origin(self.config.mode)
    }

    /// Seconds into the current cycle.
    fn elapsed(&self) -> f32 {
        if self.state.is_playing() {
            self.offset + self.clock.now().duration_since(self.anchor).as_secs_f32()
        } else {
            self.offset
        }
    }

    fn step(&self) -> Option<FrameStep> {
        let anim = self.animation.as_ref()?;
        let travelled = frames_travelled(self.elapsed(), anim.frame_rate, self.config.speed);
        Some(frame_at(
            self.window,
            self.config.mode,
            travelled,
            self.config.use_frame_interpolation,
        ))
    }

    /// Seconds needed to reach `frame` from the cycle origin.
    fn seconds_to(&self, frame: f32) -> f32 {
        match &self.animation {
            Some(anim) => {
                travelled_for_frame(self.window, self.config.mode, frame)
                    / (anim.frame_rate * self.config.speed)
            }
            None => 0.0,
        }
    }

    /// Seconds one full cycle takes at the current speed.
    fn cycle_seconds(&self) -> f32 {
        match &self.animation {
            Some(anim) => {
                self.window.cycle_frames(self.config.mode) / (anim.frame_rate * self.config.speed)
            }
            None => 0.0,
        }
    }

    fn restart_cycle(&mut self) {
        self.anchor = self.clock.now();
        self.offset = 0.0;
    }

    fn anchor_at(&mut self, frame: f32) {
        self.anchor = self.clock.now();
        self.offset = self.seconds_to(frame);
    }

    fn emit(&mut self, event: PlayerEvent) {
        self.events.push(event);
    }

    // ---------------------------------------------------------------------
    // Loading
    // ---------------------------------------------------------------------

    /// Run a loader; on failure the player is left unloaded and observers hear
    /// `on_load_error`.
    fn guarded_load(&mut self, load: impl FnOnce(&mut Self) -> Result<()>) -> Result<()> {
        load(self).map_err(|err| {
            log::error!("animation load failed: {err}");
            self.animation = None;
            self.active_animation_id.clear();
            self.active_theme = None;
            self.state = PlaybackState::Stopped;
            self.emit(PlayerEvent::LoadError);
            err
        })
    }

    fn install(&mut self, animation: LottieAnimation, id: &str, width: u32, height: u32) -> Result<()> {
        let buffer = canvas_buffer(width, height)?;
        self.renderer.load_animation(&animation, width, height);
        self.renderer.set_background_color(self.config.background_color);
        self.renderer.set_layout(&self.config.layout);
        self.renderer.load_theme(None);

        self.width = width;
        self.height = height;
        self.buffer = buffer;
        self.window = window_for(&animation, &self.config);
        log::debug!(
            "loaded animation {:?}: {} frames at {} fps, window [{}, {}]",
            id,
            animation.total_frames(),
            animation.frame_rate,
            self.window.start,
            self.window.end
        );
        self.animation = Some(animation);
        self.active_animation_id = id.to_string();
        self.active_theme = None;

        self.state = PlaybackState::Stopped;
        self.loop_count = 0;
        self.completed = false;
        self.current_frame = self.origin();
        self.renderer.set_frame(self.current_frame);
        self.restart_cycle();
        self.emit(PlayerEvent::Load);

        if self.config.autoplay {
            self.play()?;
        }
        Ok(())
    }

    fn load_animation_data(&mut self, data: &str, width: u32, height: u32) -> Result<()> {
        self.guarded_load(|rt| {
            let animation = LottieAnimation::from_json(data)?;
            rt.bundle = None;
            rt.install(animation, "", width, height)
        })
    }

    fn load_animation_path(&mut self, path: &Path, width: u32, height: u32) -> Result<()> {
        if path.is_dir() || path.extension().map_or(false, |ext| ext == "lottie") {
            return self.load_dotlottie_path(path, width, height);
        }
        self.guarded_load(|rt| {
            let data = std::fs::read_to_string(path)?;
            let animation = LottieAnimation::from_json(&data)?;
            rt.bundle = None;
            rt.install(animation, "", width, height)
        })
    }

    fn load_dotlottie_path(&mut self, path: &Path, width: u32, height: u32) -> Result<()> {
        match Bundle::open_path(path) {
            Ok(bundle) => self.load_bundle(bundle, width, height),
            Err(err) => self.guarded_load(|_| Err(err)),
        }
    }

    fn load_dotlottie_data(&mut self, data: &[u8], width: u32, height: u32) -> Result<()> {
        match Bundle::from_archive(data) {
            Ok(bundle) => self.load_bundle(bundle, width, height),
            Err(err) => self.guarded_load(|_| Err(err)),
        }
    }

    fn load_bundle(&mut self, bundle: Bundle, width: u32, height: u32) -> Result<()> {
        self.guarded_load(|rt| {
            let id = bundle
                .initial_animation_id()
                .ok_or_else(|| PlayerError::AnimationNotFound { id: String::new() })?
                .to_string();
            rt.bundle = Some(bundle);
            rt.install_from_bundle(&id, width, height)
        })
    }

    fn load_animation(&mut self, id: &str, width: u32, height: u32) -> Result<()> {
        self.guarded_load(|rt| rt.install_from_bundle(id, width, height))
    }

    fn install_from_bundle(&mut self, id: &str, width: u32, height: u32) -> Result<()> {
        let bundle = self.bundle()?;
        let data = bundle.animation(id)?;
        let default_theme = bundle
            .manifest()
            .animation(id)
            .and_then(|a| a.default_theme.clone());
        let animation = LottieAnimation::from_json(&data)?;
        self.install(animation, id, width, height)?;
        if let Some(theme) = default_theme {
            if let Err(err) = self.load_theme(&theme) {
                log::warn!("default theme {theme:?} for {id:?} not applied: {err}");
            }
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Playback control
    // ---------------------------------------------------------------------

    fn play(&mut self) -> Result<()> {
        self.animation()?;
        if !self.state.can_play() {
            return Err(PlayerError::InvalidPlaybackState {
                current: self.state.name(),
                requested: "playing",
            });
        }
        match self.state {
            PlaybackState::Paused => self.anchor = self.clock.now(),
            _ if self.completed => {
                self.completed = false;
                self.current_frame = self.origin();
                self.renderer.set_frame(self.current_frame);
                self.restart_cycle();
            }
            _ => self.anchor_at(self.current_frame),
        }
        self.state = PlaybackState::Playing;
        self.emit(PlayerEvent::Play);
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.animation()?;
        if !self.state.can_pause() {
            return Err(PlayerError::InvalidPlaybackState {
                current: self.state.name(),
                requested: "paused",
            });
        }
        self.offset = self.elapsed();
        self.state = PlaybackState::Paused;
        self.emit(PlayerEvent::Pause);
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.animation()?;
        if !self.state.can_stop() {
            return Err(PlayerError::InvalidPlaybackState {
                current: self.state.name(),
                requested: "stopped",
            });
        }
        self.state = PlaybackState::Stopped;
        self.completed = false;
        self.current_frame = self.origin();
        self.renderer.set_frame(self.current_frame);
        self.restart_cycle();
        self.emit(PlayerEvent::Stop);
        Ok(())
    }

    fn request_frame(&self) -> f32 {
        if self.state.is_playing() {
            if let Some(step) = self.step() {
                return step.frame;
            }
        }
        self.current_frame
    }

    fn set_frame(&mut self, no: f32) -> Result<()> {
        self.animation()?;
        if !no.is_finite() || !self.window.contains(no) {
            log::warn!(
                "frame {no} outside window [{}, {}]",
                self.window.start,
                self.window.end
            );
            return Err(PlayerError::InvalidFrame {
                frame: no,
                start: self.window.start,
                end: self.window.end,
            });
        }
        self.current_frame = no;
        self.completed = false;
        self.renderer.set_frame(no);
        if self.state == PlaybackState::Paused {
            self.offset = self.seconds_to(no);
        }
        self.emit(PlayerEvent::Frame(no));
        Ok(())
    }

    fn seek(&mut self, no: f32) -> Result<()> {
        self.set_frame(no)?;
        if self.state.is_playing() {
            self.anchor_at(no);
        }
        self.completed = false;
        self.render()
    }

    fn render(&mut self) -> Result<()> {
        self.animation()?;
        self.renderer.draw(&mut self.buffer);
        self.emit(PlayerEvent::Render(self.current_frame));

        if !self.state.is_playing() {
            return Ok(());
        }
        let Some(step) = self.step() else {
            return Ok(());
        };
        if !step.cycle_complete {
            return Ok(());
        }
        if self.config.loop_animation {
            // Several cycles may have passed since the last render; count them
            // all and keep the time left over in the current one.
            let elapsed = self.elapsed();
            let cycle = self.cycle_seconds();
            let (cycles, rest) = if cycle > 0.0 {
                let n = (elapsed / cycle).floor().max(1.0);
                (n, (elapsed - n * cycle).max(0.0))
            } else {
                (1.0, 0.0)
            };
            self.loop_count = self.loop_count.saturating_add(cycles as u32);
            self.emit(PlayerEvent::Loop(self.loop_count));
            self.anchor = self.clock.now();
            self.offset = rest;
            self.current_frame = self.step().map_or(self.origin(), |s| s.frame);
            self.renderer.set_frame(self.current_frame);
        } else {
            self.state = PlaybackState::Stopped;
            self.completed = true;
            self.current_frame = step.frame;
            self.offset = self.seconds_to(step.frame);
            self.emit(PlayerEvent::Complete);
            self.evaluate(Trigger::Complete);
        }
        Ok(())
    }

    fn tick(&mut self) -> Result<()> {
        let next = self.request_frame();
        if next != self.current_frame {
            self.set_frame(next)?;
        }
        self.render()
    }

    fn is_complete(&self) -> bool {
        self.completed
            || (self.state.is_playing() && self.step().map_or(false, |s| s.cycle_complete))
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.buffer = canvas_buffer(width, height)?;
        self.width = width;
        self.height = height;
        self.renderer.resize(width, height);
        Ok(())
    }

    fn set_viewport(&mut self, x: i32, y: i32, w: i32, h: i32) -> Result<()> {
        if w <= 0 || h <= 0 {
            return Err(PlayerError::InvalidArgument {
                reason: format!("viewport must not be empty, got {w}x{h}"),
            });
        }
        self.renderer.set_viewport(x, y, w, h);
        Ok(())
    }

    fn set_config(&mut self, config: Config) {
        self.config = config.validated();
        self.renderer.set_background_color(self.config.background_color);
        self.renderer.set_layout(&self.config.layout);
        let Some(anim) = &self.animation else {
            return;
        };
        self.window = window_for(anim, &self.config);
        if !self.window.contains(self.current_frame) {
            self.current_frame = self.origin();
            self.completed = false;
            self.renderer.set_frame(self.current_frame);
        }
        match self.state {
            PlaybackState::Playing => self.anchor_at(self.current_frame),
            PlaybackState::Paused => self.offset = self.seconds_to(self.current_frame),
            PlaybackState::Stopped => {}
        }
    }

    // ---------------------------------------------------------------------
    // Themes
    // ---------------------------------------------------------------------

    fn apply_theme(&mut self, theme: Theme) {
        self.renderer.load_theme(Some(&theme.data));
        log::debug!("theme {:?} applied", theme.id);
        self.active_theme = Some(theme);
    }

    fn load_theme(&mut self, id: &str) -> Result<()> {
        self.animation()?;
        if id.is_empty() {
            self.renderer.load_theme(None);
            self.active_theme = None;
            return Ok(());
        }
        let bundle = self.bundle()?;
        let data = bundle.theme(id)?;
        if !bundle.manifest().theme_applies_to(id, &self.active_animation_id) {
            return Err(PlayerError::InvalidTheme {
                reason: format!(
                    "theme {id:?} does not apply to animation {:?}",
                    self.active_animation_id
                ),
            });
        }
        let theme = Theme::parse(id, &data)?;
        self.apply_theme(theme);
        Ok(())
    }

    fn load_theme_data(&mut self, data: &str) -> Result<()> {
        self.animation()?;
        let theme = Theme::parse("", data)?;
        self.apply_theme(theme);
        Ok(())
    }

    // ---------------------------------------------------------------------
    // State machine
    // ---------------------------------------------------------------------

    fn machine(&mut self) -> Result<&mut StateMachine> {
        self.state_machine
            .as_mut()
            .ok_or(PlayerError::StateMachineNotLoaded)
    }

    fn state_name(&self, index: usize) -> String {
        self.state_machine
            .as_ref()
            .and_then(|sm| sm.state(index))
            .map(|s| s.name().to_string())
            .unwrap_or_default()
    }

    fn load_state_machine_data(&mut self, data: &str) -> Result<()> {
        let machine = StateMachine::from_json(data)?;
        if self.state_machine.as_ref().map_or(false, |sm| sm.is_running()) {
            self.stop_state_machine()?;
        }
        log::debug!("state machine {:?} loaded", machine.id());
        self.state_machine = Some(machine);
        Ok(())
    }

    fn load_state_machine(&mut self, id: &str) -> Result<()> {
        let data = self.bundle()?.state_machine(id)?;
        self.load_state_machine_data(&data)
    }

    fn start_state_machine(&mut self) -> Result<()> {
        let machine = self.machine()?;
        if machine.is_running() {
            return Ok(());
        }
        let entered = machine.start();
        let name = self.state_name(entered);
        self.emit(PlayerEvent::StateEntered(name));
        self.enter_state(entered);
        Ok(())
    }

    fn stop_state_machine(&mut self) -> Result<()> {
        if let Some(left) = self.machine()?.stop()? {
            let name = self.state_name(left);
            self.emit(PlayerEvent::StateExit(name));
        }
        Ok(())
    }

    fn set_context(&mut self, key: &str, value: ContextValue) -> Result<()> {
        self.machine()?.set_context(key, value).map_err(|err| {
            log::warn!("context {key:?} rejected: {err}");
            err
        })?;
        self.evaluate(Trigger::ContextChange);
        Ok(())
    }

    fn post_pointer_event(&mut self, event: ListenerType) -> Result<()> {
        if !self.machine()?.is_running() {
            return Err(PlayerError::StateMachineNotRunning);
        }
        let trigger = Trigger::from_listener(event).ok_or_else(|| PlayerError::InvalidArgument {
            reason: format!("expected exactly one pointer event, got {:#x}", event.bits()),
        })?;
        self.evaluate(trigger);
        Ok(())
    }

    fn evaluate(&mut self, trigger: Trigger) {
        let Some(Fired { from, to }) = self.state_machine.as_mut().and_then(|sm| sm.fire(trigger))
        else {
            return;
        };
        let from = self.state_name(from);
        let to_name = self.state_name(to);
        self.emit(PlayerEvent::StateExit(from.clone()));
        self.emit(PlayerEvent::Transition {
            from,
            to: to_name.clone(),
        });
        self.emit(PlayerEvent::StateEntered(to_name));
        self.enter_state(to);
    }

    /// Apply an entered state's playback settings.
    fn enter_state(&mut self, index: usize) {
        let Some(state) = self.state_machine.as_ref().and_then(|sm| sm.state(index)).cloned() else {
            return;
        };
        if let Err(err) = self.apply_playback_state(&state) {
            log::warn!("state {:?} could not be applied: {err}", state.name());
        }
    }

    fn apply_playback_state(&mut self, state: &StateDef) -> Result<()> {
        let StateDef::PlaybackState {
            animation_id,
            loop_animation,
            autoplay,
            mode,
            speed,
            marker,
            segment,
            use_frame_interpolation,
            ..
        } = state
        else {
            return Ok(());
        };

        let keep_autoplay = self.config.autoplay;
        let mut config = self.config.clone();
        config.mode = *mode;
        config.loop_animation = *loop_animation;
        config.speed = *speed;
        config.marker = marker.clone();
        config.segment = segment.clone();
        config.use_frame_interpolation = *use_frame_interpolation;
        config.autoplay = false;
        self.set_config(config);

        let switch = !animation_id.is_empty() && *animation_id != self.active_animation_id;
        let result = if switch {
            let (w, h) = (self.width, self.height);
            self.guarded_load(|rt| rt.install_from_bundle(animation_id, w, h))
        } else {
            Ok(())
        };
        self.config.autoplay = keep_autoplay;
        result?;

        if self.state.can_stop() {
            self.stop()?;
        }
        if *autoplay {
            self.play()?;
        }
        Ok(())
    }
}

/// dotLottie player. Shareable across threads.
pub struct DotLottiePlayer {
    runtime: Mutex<PlayerRuntime>,
    observers: RwLock<Vec<Arc<dyn Observer>>>,
    state_machine_observers: RwLock<Vec<Arc<dyn StateMachineObserver>>>,
}

fn same_object<T: ?Sized>(a: &Arc<T>, b: &Arc<T>) -> bool {
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}

impl DotLottiePlayer {
    /// Player with the built-in [`SoftwareRenderer`] and wall clock.
    pub fn new(config: Config) -> Self {
        Self::with_renderer(config, Box::new(SoftwareRenderer::new()), Arc::new(SystemClock))
    }

    pub fn with_renderer(config: Config, renderer: Box<dyn Renderer>, clock: Arc<dyn Clock>) -> Self {
        Self {
            runtime: Mutex::new(PlayerRuntime::new(config, renderer, clock)),
            observers: RwLock::new(Vec::new()),
            state_machine_observers: RwLock::new(Vec::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PlayerRuntime> {
        self.runtime.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` under the lock, then deliver whatever it emitted.
    fn with_runtime<R>(&self, f: impl FnOnce(&mut PlayerRuntime) -> R) -> R {
        let (result, events) = {
            let mut rt = self.lock();
            let result = f(&mut rt);
            (result, std::mem::take(&mut rt.events))
        };
        if !events.is_empty() {
            let observers = self
                .observers
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .clone();
            let sm_observers = self
                .state_machine_observers
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .clone();
            dispatch(events, &observers, &sm_observers);
        }
        result
    }

    // Loading

    /// Load a Lottie JSON document for a `width` x `height` canvas.
    pub fn load_animation_data(&self, data: &str, width: u32, height: u32) -> Result<()> {
        self.with_runtime(|rt| rt.load_animation_data(data, width, height))
    }

    /// Load a Lottie JSON file, a `.lottie` archive or an unpacked dotLottie
    /// directory.
    pub fn load_animation_path(&self, path: impl AsRef<Path>, width: u32, height: u32) -> Result<()> {
        self.with_runtime(|rt| rt.load_animation_path(path.as_ref(), width, height))
    }

    /// Load a dotLottie bundle (`.lottie` file or unpacked directory) and its
    /// initial animation.
    pub fn load_dotlottie_path(&self, path: impl AsRef<Path>, width: u32, height: u32) -> Result<()> {
        self.with_runtime(|rt| rt.load_dotlottie_path(path.as_ref(), width, height))
    }

    /// Load a packed `.lottie` archive held in memory.
    pub fn load_dotlottie_data(&self, data: &[u8], width: u32, height: u32) -> Result<()> {
        self.with_runtime(|rt| rt.load_dotlottie_data(data, width, height))
    }

    pub fn load_bundle(&self, bundle: Bundle, width: u32, height: u32) -> Result<()> {
        self.with_runtime(|rt| rt.load_bundle(bundle, width, height))
    }

    /// Switch to another animation of the loaded bundle.
    pub fn load_animation(&self, animation_id: &str, width: u32, height: u32) -> Result<()> {
        self.with_runtime(|rt| rt.load_animation(animation_id, width, height))
    }

    // Playback

    pub fn play(&self) -> Result<()> {
        self.with_runtime(PlayerRuntime::play)
    }

    pub fn pause(&self) -> Result<()> {
        self.with_runtime(PlayerRuntime::pause)
    }

    pub fn stop(&self) -> Result<()> {
        self.with_runtime(PlayerRuntime::stop)
    }

    /// Frame playback should show now. Does not change the current frame.
    pub fn request_frame(&self) -> f32 {
        self.lock().request_frame()
    }

    pub fn set_frame(&self, no: f32) -> Result<()> {
        self.with_runtime(|rt| rt.set_frame(no))
    }

    /// Jump to `no`, continue playing from there, and render.
    pub fn seek(&self, no: f32) -> Result<()> {
        self.with_runtime(|rt| rt.seek(no))
    }

    /// Draw the current frame; handles loop and completion while playing.
    pub fn render(&self) -> Result<()> {
        self.with_runtime(PlayerRuntime::render)
    }

    /// `request_frame`, `set_frame` and `render` in one step.
    pub fn tick(&self) -> Result<()> {
        self.with_runtime(PlayerRuntime::tick)
    }

    pub fn resize(&self, width: u32, height: u32) -> Result<()> {
        self.with_runtime(|rt| rt.resize(width, height))
    }

    pub fn set_viewport(&self, x: i32, y: i32, w: i32, h: i32) -> Result<()> {
        self.with_runtime(|rt| rt.set_viewport(x, y, w, h))
    }

    /// Zero the pixel buffer.
    pub fn clear(&self) {
        self.lock().buffer.fill(0);
    }

    pub fn set_config(&self, config: Config) {
        self.with_runtime(|rt| rt.set_config(config))
    }

    pub fn config(&self) -> Config {
        self.lock().config.clone()
    }

    // Queries

    pub fn is_loaded(&self) -> bool {
        self.lock().animation.is_some()
    }

    pub fn is_playing(&self) -> bool {
        self.lock().state == PlaybackState::Playing
    }

    pub fn is_paused(&self) -> bool {
        self.lock().state == PlaybackState::Paused
    }

    pub fn is_stopped(&self) -> bool {
        self.lock().state == PlaybackState::Stopped
    }

    pub fn is_complete(&self) -> bool {
        self.lock().is_complete()
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.lock().state
    }

    pub fn current_frame(&self) -> f32 {
        self.lock().current_frame
    }

    pub fn total_frames(&self) -> f32 {
        self.lock().animation.as_ref().map_or(0.0, |a| a.total_frames())
    }

    /// Seconds for the whole animation at normal speed.
    pub fn duration(&self) -> f32 {
        self.lock().animation.as_ref().map_or(0.0, |a| a.duration())
    }

    /// Seconds for the playback window at normal speed.
    pub fn segment_duration(&self) -> f32 {
        let rt = self.lock();
        rt.animation
            .as_ref()
            .map_or(0.0, |a| rt.window.span() / a.frame_rate)
    }

    pub fn loop_count(&self) -> u32 {
        self.lock().loop_count
    }

    /// Address of the ARGB pixel buffer; valid until the next load or resize.
    pub fn buffer_ptr(&self) -> u64 {
        self.lock().buffer.as_ptr() as u64
    }

    /// Number of pixels in the buffer.
    pub fn buffer_len(&self) -> u64 {
        self.lock().buffer.len() as u64
    }

    /// Copy of the pixel buffer.
    pub fn buffer(&self) -> Vec<u32> {
        self.lock().buffer.clone()
    }

    /// `[width, height]` of the animation's own canvas.
    pub fn animation_size(&self) -> [f32; 2] {
        self.lock()
            .animation
            .as_ref()
            .map_or([0.0, 0.0], |a| [a.width as f32, a.height as f32])
    }

    pub fn markers(&self) -> Vec<Marker> {
        self.lock()
            .animation
            .as_ref()
            .map(|a| a.markers.clone())
            .unwrap_or_default()
    }

    pub fn manifest(&self) -> Option<Manifest> {
        self.lock().bundle.as_ref().map(|b| b.manifest().clone())
    }

    /// Manifest JSON, empty without a bundle.
    pub fn manifest_string(&self) -> String {
        self.lock()
            .bundle
            .as_ref()
            .map(|b| b.manifest_json().to_string())
            .unwrap_or_default()
    }

    pub fn active_animation_id(&self) -> String {
        self.lock().active_animation_id.clone()
    }

    pub fn active_theme_id(&self) -> String {
        self.lock()
            .active_theme
            .as_ref()
            .map(|t| t.id.clone())
            .unwrap_or_default()
    }

    // Themes

    /// Apply a theme from the bundle; an empty id removes the active theme.
    pub fn load_theme(&self, theme_id: &str) -> Result<()> {
        self.with_runtime(|rt| rt.load_theme(theme_id))
    }

    pub fn load_theme_data(&self, theme_data: &str) -> Result<()> {
        self.with_runtime(|rt| rt.load_theme_data(theme_data))
    }

    // State machine

    pub fn load_state_machine(&self, state_machine_id: &str) -> Result<()> {
        self.with_runtime(|rt| rt.load_state_machine(state_machine_id))
    }

    pub fn load_state_machine_data(&self, data: &str) -> Result<()> {
        self.with_runtime(|rt| rt.load_state_machine_data(data))
    }

    pub fn start_state_machine(&self) -> Result<()> {
        self.with_runtime(PlayerRuntime::start_state_machine)
    }

    pub fn stop_state_machine(&self) -> Result<()> {
        self.with_runtime(PlayerRuntime::stop_state_machine)
    }

    pub fn set_state_machine_numeric_context(&self, key: &str, value: f32) -> Result<()> {
        self.with_runtime(|rt| rt.set_context(key, ContextValue::Numeric(value)))
    }

    pub fn set_state_machine_string_context(&self, key: &str, value: &str) -> Result<()> {
        self.with_runtime(|rt| rt.set_context(key, ContextValue::Text(value.to_string())))
    }

    pub fn set_state_machine_boolean_context(&self, key: &str, value: bool) -> Result<()> {
        self.with_runtime(|rt| rt.set_context(key, ContextValue::Boolean(value)))
    }

    /// Deliver one pointer event kind to the running state machine.
    pub fn post_pointer_event(&self, event: ListenerType) -> Result<()> {
        self.with_runtime(|rt| rt.post_pointer_event(event))
    }

    /// Pointer listeners the host must install for the loaded state machine.
    pub fn state_machine_framework_setup(&self) -> ListenerType {
        self.lock()
            .state_machine
            .as_ref()
            .map_or(ListenerType::empty(), StateMachine::listener_types)
    }

    pub fn state_machine_current_state(&self) -> Option<String> {
        self.lock()
            .state_machine
            .as_ref()
            .and_then(|sm| sm.current_state())
            .map(|s| s.name().to_string())
    }

    // Observers

    pub fn subscribe(&self, observer: Arc<dyn Observer>) {
        self.observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(observer);
    }

    pub fn unsubscribe(&self, observer: &Arc<dyn Observer>) {
        self.observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|o| !same_object(o, observer));
    }

    pub fn state_machine_subscribe(&self, observer: Arc<dyn StateMachineObserver>) {
        self.state_machine_observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(observer);
    }

    pub fn state_machine_unsubscribe(&self, observer: &Arc<dyn StateMachineObserver>) {
        self.state_machine_observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|o| !same_object(o, observer));
    }
}
