use crate::controls::{apply_angle_input, AngleInput};
use crate::eclipse::{classify, EclipsePolicy, EclipseState};
use crate::math::{resolve_positions, wrap_degrees, BodyPositions};
use crate::notify::{Notification, NotificationKind, Notifier, Outbox};
use crate::state::{AnimationConfig, OrbitalState};
use std::time::{Duration, Instant};

/// How long the animation rests on an eclipse before it carries on
pub const AUTO_RESUME_DELAY: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Stopped,
    Running,
}

/// Token for one scheduled frame. Only the most recently issued handle is honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHandle(u64);

/// Owns the orbital state and advances it frame by frame.
///
/// The frame loop asks for a [`FrameHandle`] before waiting for the next
/// frame and hands it back through [`AnimationDriver::on_frame`]. Stopping
/// or disposing in between invalidates the handle, so no tick lands after a
/// stop request.
pub struct AnimationDriver<N: Notifier = Outbox> {
    state: OrbitalState,
    config: AnimationConfig,
    policy: EclipsePolicy,
    run_state: RunState,
    next_frame_id: u64,
    pending_frame: Option<FrameHandle>,
    auto_resume_at: Option<Instant>,
    disposed: bool,
    notifier: N,
}

impl<N: Notifier> AnimationDriver<N> {
    pub fn new(
        state: OrbitalState,
        config: AnimationConfig,
        policy: EclipsePolicy,
        notifier: N,
    ) -> Self {
        AnimationDriver {
            state,
            config,
            policy,
            run_state: RunState::Stopped,
            next_frame_id: 0,
            pending_frame: None,
            auto_resume_at: None,
            disposed: false,
            notifier,
        }
    }

    pub fn state(&self) -> &OrbitalState {
        &self.state
    }

    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    pub fn policy(&self) -> EclipsePolicy {
        self.policy
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn is_running(&self) -> bool {
        self.run_state == RunState::Running
    }

    pub fn positions(&self) -> BodyPositions {
        resolve_positions(&self.state)
    }

    pub fn eclipse_state(&self) -> EclipseState {
        classify(&self.state, self.policy)
    }

    /// When the pending auto-resume fires, if one is armed
    pub fn auto_resume_at(&self) -> Option<Instant> {
        self.auto_resume_at
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    pub fn start(&mut self) {
        if self.disposed {
            return;
        }
        self.auto_resume_at = None;
        if self.run_state == RunState::Stopped {
            self.run_state = RunState::Running;
            log::info!("animation started at speed {:.1}x", self.config.speed_multiplier());
        }
    }

    pub fn stop(&mut self) {
        if self.disposed {
            return;
        }
        self.auto_resume_at = None;
        self.pending_frame = None;
        if self.run_state == RunState::Running {
            self.run_state = RunState::Stopped;
            log::info!("animation stopped");
        }
    }

    pub fn toggle(&mut self) {
        match self.run_state {
            RunState::Running => self.stop(),
            RunState::Stopped => self.start(),
        }
    }

    /// Handle for the next frame while running; the same handle until it is consumed
    pub fn request_frame(&mut self) -> Option<FrameHandle> {
        if self.disposed || self.run_state != RunState::Running {
            return None;
        }
        if self.pending_frame.is_none() {
            self.next_frame_id += 1;
            self.pending_frame = Some(FrameHandle(self.next_frame_id));
        }
        self.pending_frame
    }

    /// Runs the frame for `handle`. Stale handles are ignored; returns whether a tick happened.
    pub fn on_frame(&mut self, handle: FrameHandle, now: Instant) -> bool {
        if self.disposed || self.pending_frame != Some(handle) {
            return false;
        }
        self.pending_frame = None;
        if self.run_state != RunState::Running {
            return false;
        }
        self.tick();
        self.after_state_change(now);
        true
    }

    fn tick(&mut self) {
        self.state = OrbitalState {
            earth_angle_deg: wrap_degrees(self.state.earth_angle_deg + self.config.earth_rate()),
            moon_angle_deg: wrap_degrees(self.state.moon_angle_deg + self.config.moon_rate()),
        };
    }

    pub fn set_earth_angle(&mut self, input: AngleInput, now: Instant) {
        if self.disposed {
            return;
        }
        self.state.earth_angle_deg = apply_angle_input(self.state.earth_angle_deg, input);
        self.after_state_change(now);
    }

    pub fn set_moon_angle(&mut self, input: AngleInput, now: Instant) {
        if self.disposed {
            return;
        }
        self.state.moon_angle_deg = apply_angle_input(self.state.moon_angle_deg, input);
        self.after_state_change(now);
    }

    pub fn adjust_speed(&mut self, delta: f64) {
        if self.disposed {
            return;
        }
        self.config.adjust_speed(delta);
        log::debug!("speed set to {:.1}x", self.config.speed_multiplier());
    }

    /// Switches the classification rules; the current angles are re-checked under the new ones
    pub fn set_policy(&mut self, policy: EclipsePolicy, now: Instant) {
        if self.disposed || self.policy == policy {
            return;
        }
        self.policy = policy;
        log::info!("eclipse policy switched to {}", policy);
        if policy.pauses_on_eclipse() {
            self.after_state_change(now);
        } else {
            self.notifier.clear_banner();
        }
    }

    /// Stops the animation and returns angles and speed to their defaults
    pub fn reset(&mut self, now: Instant) {
        if self.disposed {
            return;
        }
        self.stop();
        self.state = OrbitalState::default();
        self.config = AnimationConfig::default();
        self.after_state_change(now);
    }

    /// Classifies the rounded angle pair and reports it as an alert
    pub fn check_eclipse(&mut self) -> EclipseState {
        let (earth_deg, moon_deg) = self.state.rounded();
        // 359.6 rounds to 360, which reads as 0
        let (earth_deg, moon_deg) = (earth_deg.rem_euclid(360), moon_deg.rem_euclid(360));
        let eclipse = classify(
            &OrbitalState::new(earth_deg as f64, moon_deg as f64),
            self.policy,
        );
        if self.disposed {
            return eclipse;
        }
        log::info!("manual check at earth {}° moon {}°: {:?}", earth_deg, moon_deg, eclipse);
        self.notifier.notify(Notification {
            kind: NotificationKind::Alert,
            category: eclipse.into(),
            earth_deg,
            moon_deg,
        });
        eclipse
    }

    /// Stops the animation and arms the auto-resume, replacing any resume already armed
    pub fn pause_for_eclipse(&mut self, now: Instant) {
        if self.disposed {
            return;
        }
        self.run_state = RunState::Stopped;
        self.pending_frame = None;
        self.auto_resume_at = Some(now + AUTO_RESUME_DELAY);
    }

    /// Fires the auto-resume once its deadline has passed. Returns whether it fired.
    pub fn poll_timers(&mut self, now: Instant) -> bool {
        if self.disposed {
            return false;
        }
        match self.auto_resume_at {
            Some(deadline) if now >= deadline => {
                self.auto_resume_at = None;
                self.run_state = RunState::Running;
                self.notifier.clear_banner();
                log::info!("animation resumed after eclipse");
                true
            }
            _ => false,
        }
    }

    /// Tears the driver down; frames, timers and input arriving later are ignored
    pub fn dispose(&mut self) {
        self.disposed = true;
        self.run_state = RunState::Stopped;
        self.pending_frame = None;
        self.auto_resume_at = None;
    }

    fn after_state_change(&mut self, now: Instant) {
        if !self.policy.pauses_on_eclipse() {
            return;
        }
        let eclipse = classify(&self.state, self.policy);
        if !eclipse.is_eclipse() {
            self.notifier.clear_banner();
            return;
        }
        let (earth_deg, moon_deg) = self.state.rounded();
        self.notifier.notify(Notification {
            kind: NotificationKind::Banner,
            category: eclipse.into(),
            earth_deg,
            moon_deg,
        });
        // only an animation that is playing, or resting on an earlier eclipse, pauses
        if self.run_state == RunState::Running || self.auto_resume_at.is_some() {
            log::info!("{:?} eclipse at earth {}° moon {}°, pausing", eclipse, earth_deg, moon_deg);
            self.pause_for_eclipse(now);
        }
    }
}
