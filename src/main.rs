use clap::Parser;
use crossterm::{
    cursor, event, execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use eclipse_sim::animation::AnimationDriver;
use eclipse_sim::config::{Cli, Settings};
use eclipse_sim::error::{AppError, Result};
use eclipse_sim::notify::Outbox;
use eclipse_sim::widget::{EventOutcome, SimulatorWidget};
use simplelog::WriteLogger;
use std::fs::File;
use std::io::{self, Stdout};
use std::time::Instant;

/// Puts the terminal into raw mode on the alternate screen and restores it when dropped
struct TerminalGuard {
    out: Stdout,
}

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        let mut out = io::stdout();
        terminal::enable_raw_mode()?;
        if let Err(err) = execute!(out, EnterAlternateScreen, cursor::Hide) {
            let _ = terminal::disable_raw_mode();
            return Err(err);
        }
        Ok(TerminalGuard { out })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(self.out, cursor::Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Installs the file logger when a log file was requested
fn init_logging(settings: &Settings) -> Result<()> {
    if let Some(path) = &settings.log_file {
        let file = File::create(path).map_err(AppError::LogFile)?;
        WriteLogger::init(settings.log_level, simplelog::Config::default(), file)?;
    }
    Ok(())
}

/// Initial viewport; falls back to a classic 80x24 terminal
fn terminal_size() -> (u16, u16) {
    termsize::get()
        .map(|size| (size.cols, size.rows))
        .or_else(|| terminal::size().ok())
        .unwrap_or((80, 24))
}

/// Runs frames until the user quits
fn run(settings: &Settings, guard: &mut TerminalGuard) -> Result<()> {
    let mut driver = AnimationDriver::new(
        settings.state,
        settings.animation,
        settings.policy,
        Outbox::new(),
    );
    let (cols, rows) = terminal_size();
    let mut widget = SimulatorWidget::new(cols, rows, settings.debug);
    log::info!(
        "session started: {}x{} cells, policy {}, speed {:.1}x",
        cols,
        rows,
        settings.policy,
        settings.animation.speed_multiplier()
    );

    let result = frame_loop(settings, guard, &mut driver, &mut widget);
    driver.dispose();
    log::info!("session ended");
    result
}

fn frame_loop(
    settings: &Settings,
    guard: &mut TerminalGuard,
    driver: &mut AnimationDriver<Outbox>,
    widget: &mut SimulatorWidget,
) -> Result<()> {
    loop {
        let frame = driver.request_frame();
        let deadline = Instant::now() + settings.frame_interval;

        // Handle input until the next frame is due
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if !event::poll(remaining)? {
                break;
            }
            let event = event::read()?;
            if widget.handle_event(driver, &event, Instant::now()) == EventOutcome::Quit {
                return Ok(());
            }
        }

        let now = Instant::now();
        driver.poll_timers(now);
        // A stop during input handling has already invalidated this frame
        if let Some(frame) = frame {
            driver.on_frame(frame, now);
        }
        widget.render(&mut guard.out, driver, now)?;
    }
}

/// Main function
fn main() -> Result<()> {
    let settings = Cli::parse().settings()?;
    init_logging(&settings)?;

    let mut guard = TerminalGuard::enter()?;
    run(&settings, &mut guard)
}
