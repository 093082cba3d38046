use crate::animation::{AnimationDriver, RunState};
use crate::controls::{command_for_key, Command};
use crate::graphics::{draw_dashed_orbit, draw_disc, Canvas, OrthographicCamera};
use crate::math::{Position2D, EARTH_ORBIT_RADIUS, MOON_ORBIT_RADIUS};
use crate::notify::{Announcer, Notification, NotificationKind, NotifierEvent, Outbox};
use crate::sprite::scene_sprites;
use crossterm::event::{Event, KeyEventKind};
use crossterm::style::Color;
use std::io::{self, Write};
use std::time::Instant;

const TITLE: &str = "Lunar & Solar Eclipse Simulator";
const HELP: &str = "Space: start/pause  Left/Right: Earth  Down/Up: Moon  +/-: speed  \
e: check eclipse  v: read aloud  m: policy  r: reset  d: debug  q: quit";
/// Visible half-height of the scene, in world units
const VIEW_HALF_HEIGHT: f64 = 30.0;
/// Segments in each orbit path
const ORBIT_SEGMENTS: usize = 64;

/// Whether the frame loop should keep going after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    Continue,
    Quit,
}

/// Console view of the simulator: draws the scene and turns input into commands
pub struct SimulatorWidget {
    frames_since_last_update: usize,
    last_fps_calculation: Instant,
    fps: f64,
    /// Terminal size in columns and rows
    size: (u16, u16),
    debug: bool,
    banner: Option<Notification>,
    alert: Option<Notification>,
    announcer: Announcer,
    canvas: Canvas,
}

impl SimulatorWidget {
    pub fn new(cols: u16, rows: u16, debug: bool) -> Self {
        SimulatorWidget {
            frames_since_last_update: 0,
            last_fps_calculation: Instant::now(),
            fps: 0.0,
            size: (cols, rows),
            debug,
            banner: None,
            alert: None,
            announcer: Announcer::new(),
            canvas: Canvas::new(cols as usize, rows as usize),
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.size = (cols, rows);
        self.canvas = Canvas::new(cols as usize, rows as usize);
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn banner(&self) -> Option<&Notification> {
        self.banner.as_ref()
    }

    pub fn alert(&self) -> Option<&Notification> {
        self.alert.as_ref()
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn is_announcing(&self, now: Instant) -> bool {
        self.announcer.is_speaking(now)
    }

    /// Handle input for the simulator
    pub fn handle_event(
        &mut self,
        driver: &mut AnimationDriver<Outbox>,
        event: &Event,
        now: Instant,
    ) -> EventOutcome {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                // Any key dismisses an open alert
                if self.alert.take().is_some() {
                    return EventOutcome::Continue;
                }
                match command_for_key(key) {
                    Some(command) => self.apply_command(driver, command, now),
                    None => EventOutcome::Continue,
                }
            }
            Event::Resize(cols, rows) => {
                log::debug!("terminal resized to {}x{}", cols, rows);
                self.resize(*cols, *rows);
                EventOutcome::Continue
            }
            _ => EventOutcome::Continue,
        }
    }

    fn apply_command(
        &mut self,
        driver: &mut AnimationDriver<Outbox>,
        command: Command,
        now: Instant,
    ) -> EventOutcome {
        match command {
            Command::ToggleAnimation => driver.toggle(),
            Command::Earth(input) => driver.set_earth_angle(input, now),
            Command::Moon(input) => driver.set_moon_angle(input, now),
            Command::Speed(delta) => driver.adjust_speed(delta),
            Command::CheckEclipse => {
                driver.check_eclipse();
            }
            Command::ToggleAnnouncement => {
                self.announcer.toggle(now);
            }
            Command::TogglePolicy => driver.set_policy(driver.policy().toggled(), now),
            Command::Reset => driver.reset(now),
            Command::ToggleDebug => self.debug = !self.debug,
            Command::Quit => return EventOutcome::Quit,
        }
        self.sync_notifications(driver);
        EventOutcome::Continue
    }

    /// Picks up what the model reported since the last call
    pub fn sync_notifications(&mut self, driver: &mut AnimationDriver<Outbox>) {
        for event in driver.notifier_mut().drain() {
            match event {
                NotifierEvent::Notify(notification) => match notification.kind {
                    NotificationKind::Alert => self.alert = Some(notification),
                    NotificationKind::Banner => self.banner = Some(notification),
                },
                NotifierEvent::ClearBanner => self.banner = None,
            }
        }
    }

    /// Paint the current frame into the canvas
    pub fn paint(&mut self, driver: &mut AnimationDriver<Outbox>, now: Instant) {
        // Update FPS calculation
        self.frames_since_last_update += 1;
        let duration = now.saturating_duration_since(self.last_fps_calculation);
        if duration.as_secs_f64() >= 1.0 {
            self.fps = self.frames_since_last_update as f64 / duration.as_secs_f64();
            self.frames_since_last_update = 0;
            self.last_fps_calculation = now;
            log::debug!("{:.1} fps", self.fps);
        }

        self.sync_notifications(driver);
        self.announcer.update(now);
        self.canvas.clear();

        let width = self.canvas.width();
        let height = self.canvas.height();
        self.canvas.draw_text_centered(0, TITLE, Color::White);

        // Title on top, two panel rows at the bottom
        let scene_top = 1;
        let scene_height = height.saturating_sub(3);
        if scene_height > 0 && width > 0 {
            let camera = OrthographicCamera::fit(0, scene_top, width, scene_height, VIEW_HALF_HEIGHT);
            self.paint_scene(driver, &camera);
            self.paint_overlays(driver, &camera, scene_top, scene_height, now);
        }

        if height >= 3 {
            let state = driver.state();
            let (earth_deg, moon_deg) = state.rounded();
            let run = match driver.run_state() {
                RunState::Running => "Running",
                RunState::Stopped => "Stopped",
            };
            let status = format!(
                "Earth Orbit Angle: {}°  Moon Orbit Angle: {}°  Animation Speed: {:.1}x  Policy: {}  [{}]",
                earth_deg,
                moon_deg,
                driver.config().speed_multiplier(),
                driver.policy(),
                run
            );
            self.canvas.draw_text(1, height as isize - 2, &status, Color::White);
            self.canvas.draw_text(1, height as isize - 1, HELP, Color::DarkGrey);
        }
    }

    fn paint_scene(&mut self, driver: &AnimationDriver<Outbox>, camera: &OrthographicCamera) {
        let positions = driver.positions();
        draw_dashed_orbit(
            &mut self.canvas,
            camera,
            &Position2D::ORIGIN,
            EARTH_ORBIT_RADIUS,
            ORBIT_SEGMENTS,
            Color::DarkGrey,
        );
        draw_dashed_orbit(
            &mut self.canvas,
            camera,
            &positions.earth,
            MOON_ORBIT_RADIUS,
            ORBIT_SEGMENTS,
            Color::DarkGrey,
        );
        for sprite in scene_sprites(&positions) {
            draw_disc(
                &mut self.canvas,
                camera,
                &sprite.position,
                sprite.radius,
                sprite.glyph,
                sprite.color,
            );
        }
    }

    fn paint_overlays(
        &mut self,
        driver: &AnimationDriver<Outbox>,
        camera: &OrthographicCamera,
        scene_top: usize,
        scene_height: usize,
        now: Instant,
    ) {
        let width = self.canvas.width();
        let top = scene_top as isize;
        let bottom = (scene_top + scene_height) as isize - 1;

        if let Some(banner) = &self.banner {
            let (headline, angles) = (banner.headline(), banner.angles());
            self.canvas.draw_text_centered(top + 1, headline, Color::Red);
            self.canvas.draw_text_centered(top + 2, &angles, Color::White);
        }
        if let Some(resume_at) = driver.auto_resume_at() {
            let secs = resume_at.saturating_duration_since(now).as_secs_f64().ceil();
            let countdown = format!("resuming in {:.0}s", secs);
            self.canvas.draw_text_centered(top + 3, &countdown, Color::DarkGrey);
        }

        let mut caption_bottom = bottom;
        if !driver.is_running() {
            self.canvas.draw_text_centered(bottom, "-- Paused --", Color::White);
            caption_bottom -= 1;
        }

        if self.announcer.is_speaking(now) {
            let lines = wrap_text(self.announcer.text(), width.saturating_sub(4).max(1));
            let first = caption_bottom - lines.len() as isize + 1;
            for (i, line) in lines.iter().enumerate() {
                self.canvas
                    .draw_text_centered(first + i as isize, line, Color::Cyan);
            }
        }

        if self.debug {
            let state = driver.state();
            let lines = [
                format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
                format!(
                    "Earth: {:.2}  Moon: {:.2}",
                    state.earth_angle_deg, state.moon_angle_deg
                ),
                format!("Eclipse: {:?}", driver.eclipse_state()),
                format!("Speed: {:.1}x", driver.config().speed_multiplier()),
                format!("Policy: {}", driver.policy()),
                format!(
                    "View: {:.1} x {:.1} in {}x{} cells",
                    camera.half_width(width) * 2.0,
                    camera.half_height * 2.0,
                    self.size.0,
                    self.size.1
                ),
                format!("FPS: {:.2}", self.fps),
            ];
            let bodies = scene_sprites(&driver.positions())
                .iter()
                .map(|sprite| {
                    format!(
                        "{} ({:.1}, {:.1})",
                        sprite.name, sprite.position.x, sprite.position.y
                    )
                })
                .collect::<Vec<_>>()
                .join("  ");
            let lines: Vec<String> = lines.into_iter().chain(std::iter::once(bodies)).collect();
            for (i, line) in lines.iter().enumerate() {
                self.canvas.draw_text(1, top + i as isize, line, Color::Green);
            }
        }

        if let Some(alert) = &self.alert {
            let headline = alert.headline();
            let angles = alert.angles();
            let hint = "press any key";
            let inner = headline
                .chars()
                .count()
                .max(angles.chars().count())
                .max(hint.len());
            let (box_w, box_h) = (inner + 4, 5);
            let x = (width as isize - box_w as isize) / 2;
            let y = top + (scene_height as isize - box_h as isize) / 2;
            self.canvas.draw_box(x, y, box_w, box_h, Color::White);
            self.canvas.draw_text_centered(y + 1, headline, Color::Yellow);
            self.canvas.draw_text_centered(y + 2, &angles, Color::White);
            self.canvas.draw_text_centered(y + 3, hint, Color::DarkGrey);
        }
    }

    /// Paint and draw the frame to the terminal
    pub fn render<W: Write>(
        &mut self,
        out: &mut W,
        driver: &mut AnimationDriver<Outbox>,
        now: Instant,
    ) -> io::Result<()> {
        self.paint(driver, now);
        self.canvas.flush(out)
    }
}

/// Greedy word wrap; words longer than `width` get a line of their own
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let needed = if line.is_empty() {
            word.chars().count()
        } else {
            line.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eclipse::{EclipsePolicy, EclipseState};
    use crate::notify::NotificationCategory;
    use crate::state::{AnimationConfig, OrbitalState};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn driver(policy: EclipsePolicy) -> AnimationDriver<Outbox> {
        AnimationDriver::new(
            OrbitalState::default(),
            AnimationConfig::default(),
            policy,
            Outbox::new(),
        )
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn row_text(canvas: &Canvas, y: usize) -> String {
        (0..canvas.width())
            .filter_map(|x| canvas.get(x, y).map(|c| c.glyph))
            .collect()
    }

    #[test]
    fn space_toggles_animation() {
        let mut widget = SimulatorWidget::new(80, 24, false);
        let mut driver = driver(EclipsePolicy::ExactMatch);
        let now = Instant::now();
        widget.handle_event(&mut driver, &key(KeyCode::Char(' ')), now);
        assert!(driver.is_running());
        widget.handle_event(&mut driver, &key(KeyCode::Char(' ')), now);
        assert!(!driver.is_running());
    }

    #[test]
    fn arrows_step_angles() {
        let mut widget = SimulatorWidget::new(80, 24, false);
        let mut driver = driver(EclipsePolicy::ToleranceBand);
        let now = Instant::now();
        widget.handle_event(&mut driver, &key(KeyCode::Left), now);
        widget.handle_event(&mut driver, &key(KeyCode::Up), now);
        assert_eq!(driver.state().earth_angle_deg, 350.0);
        assert_eq!(driver.state().moon_angle_deg, 10.0);
    }

    #[test]
    fn check_opens_alert_and_next_key_only_dismisses() {
        let mut widget = SimulatorWidget::new(80, 24, false);
        let mut driver = driver(EclipsePolicy::ExactMatch);
        let now = Instant::now();
        widget.handle_event(&mut driver, &key(KeyCode::Char('e')), now);
        let alert = widget.alert().cloned().unwrap();
        assert_eq!(alert.category, NotificationCategory::Lunar);
        assert_eq!(alert.headline(), "Lunar Eclipse!");

        widget.handle_event(&mut driver, &key(KeyCode::Char(' ')), now);
        assert!(widget.alert().is_none());
        assert!(!driver.is_running());
    }

    #[test]
    fn banner_follows_monitoring() {
        let mut widget = SimulatorWidget::new(80, 24, false);
        let mut driver = driver(EclipsePolicy::ExactMatch);
        let now = Instant::now();
        for _ in 0..18 {
            widget.handle_event(&mut driver, &key(KeyCode::Up), now);
        }
        assert_eq!(driver.eclipse_state(), EclipseState::Solar);
        assert_eq!(
            widget.banner().map(|b| b.category),
            Some(NotificationCategory::Solar)
        );
        widget.handle_event(&mut driver, &key(KeyCode::Up), now);
        assert!(widget.banner().is_none());
    }

    #[test]
    fn quit_and_toggles() {
        let mut widget = SimulatorWidget::new(80, 24, false);
        let mut driver = driver(EclipsePolicy::ExactMatch);
        let now = Instant::now();
        widget.handle_event(&mut driver, &key(KeyCode::Char('d')), now);
        assert!(widget.debug());
        widget.handle_event(&mut driver, &key(KeyCode::Char('m')), now);
        assert_eq!(driver.policy(), EclipsePolicy::ToleranceBand);
        widget.handle_event(&mut driver, &key(KeyCode::Char('v')), now);
        assert!(widget.is_announcing(now));
        assert_eq!(
            widget.handle_event(&mut driver, &key(KeyCode::Char('q')), now),
            EventOutcome::Quit
        );
    }

    #[test]
    fn debug_overlay_names_the_bodies() {
        let mut widget = SimulatorWidget::new(120, 40, true);
        let mut driver = driver(EclipsePolicy::ToleranceBand);
        widget.paint(&mut driver, Instant::now());
        let text: String = (0..widget.canvas().height())
            .map(|y| row_text(widget.canvas(), y))
            .collect();
        assert!(text.contains("Sun (0.0, 0.0)"));
        assert!(text.contains("Earth (15.0, 0.0)"));
        assert!(text.contains("Moon (20.0, 0.0)"));
    }

    #[test]
    fn policy_key_rechecks_current_angles() {
        let mut widget = SimulatorWidget::new(80, 24, false);
        let mut driver = driver(EclipsePolicy::ToleranceBand);
        let now = Instant::now();
        widget.handle_event(&mut driver, &key(KeyCode::Char('m')), now);
        assert_eq!(driver.policy(), EclipsePolicy::ExactMatch);
        assert_eq!(
            widget.banner().map(|b| b.category),
            Some(NotificationCategory::Lunar)
        );
    }

    #[test]
    fn resize_rebuilds_canvas() {
        let mut widget = SimulatorWidget::new(80, 24, false);
        let mut driver = driver(EclipsePolicy::ExactMatch);
        widget.handle_event(&mut driver, &Event::Resize(100, 40), Instant::now());
        assert_eq!(widget.canvas().width(), 100);
        assert_eq!(widget.canvas().height(), 40);
    }

    #[test]
    fn paint_draws_title_sun_and_status() {
        let mut widget = SimulatorWidget::new(120, 40, false);
        let mut driver = driver(EclipsePolicy::ToleranceBand);
        widget.paint(&mut driver, Instant::now());
        let canvas = widget.canvas();
        assert!(row_text(canvas, 0).contains(TITLE));
        // scene spans rows 1..=37, the Sun sits on its centre
        let centre = canvas.get(60, 19).unwrap();
        assert_eq!(centre.glyph, '#');
        assert!(row_text(canvas, 38).contains("Earth Orbit Angle: 0°"));
        assert!(row_text(canvas, 38).contains("[Stopped]"));
    }

    #[test]
    fn paint_survives_tiny_terminals() {
        let mut driver = driver(EclipsePolicy::ExactMatch);
        for (cols, rows) in [(0, 0), (1, 1), (10, 3), (3, 10)] {
            let mut widget = SimulatorWidget::new(cols, rows, true);
            widget.paint(&mut driver, Instant::now());
        }
    }

    #[test]
    fn wrap_text_respects_width() {
        let lines = wrap_text("the sun is covered in darkness", 10);
        assert_eq!(lines, vec!["the sun is", "covered in", "darkness"]);
        assert!(wrap_text("", 10).is_empty());
    }
}
