use crate::eclipse::EclipsePolicy;
use crate::error::ConfigError;
use crate::state::{AnimationConfig, OrbitalState, DEFAULT_SPEED};
use clap::Parser;
use simplelog::LevelFilter;
use std::path::PathBuf;
use std::time::Duration;

/// Earth, Moon and Sun eclipse simulator for the terminal.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Animation speed multiplier; the controls keep it between 0.1 and 5.0.
    #[arg(long, default_value_t = DEFAULT_SPEED)]
    pub speed: f64,

    /// Eclipse detection rules.
    #[arg(long, value_enum, default_value_t = EclipsePolicy::ExactMatch)]
    pub policy: EclipsePolicy,

    /// Initial Earth orbit angle in degrees.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub earth: f64,

    /// Initial Moon orbit angle in degrees.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub moon: f64,

    /// Frames drawn per second.
    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    /// Start with the debug overlay shown and log at debug level.
    #[arg(long, default_value_t = false)]
    pub debug: bool,

    /// Write logs to this file. Nothing is logged without it.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Set the log level for the log file.
    ///
    /// If `debug` is enabled, the minimum log level will be set to `Debug`.
    #[arg(long, default_value_t = LevelFilter::Info)]
    pub log_level: LevelFilter,
}

/// Validated settings for a session
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub state: OrbitalState,
    pub animation: AnimationConfig,
    pub policy: EclipsePolicy,
    pub frame_interval: Duration,
    pub debug: bool,
    pub log_file: Option<PathBuf>,
    pub log_level: LevelFilter,
}

impl Cli {
    pub fn settings(&self) -> Result<Settings, ConfigError> {
        for (body, value) in [("Earth", self.earth), ("Moon", self.moon)] {
            if !value.is_finite() {
                return Err(ConfigError::InvalidAngle { body, value });
            }
        }
        if self.fps == 0 {
            return Err(ConfigError::InvalidFrameRate);
        }
        let log_level = if self.debug {
            self.log_level.max(LevelFilter::Debug)
        } else {
            self.log_level
        };
        Ok(Settings {
            state: OrbitalState::new(self.earth, self.moon),
            animation: AnimationConfig::new(self.speed)?,
            policy: self.policy,
            frame_interval: Duration::from_secs(1) / self.fps,
            debug: self.debug,
            log_file: self.log_file.clone(),
            log_level,
        })
    }
}
