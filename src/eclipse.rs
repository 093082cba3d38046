use crate::math::{angular_distance, wrap_degrees};
use crate::state::OrbitalState;
use std::fmt;

/// Angular tolerance of the tolerance-band policy, in degrees
pub const TOLERANCE_DEG: f64 = 10.0;

/// Eclipse classification of an Earth/Moon angle pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EclipseState {
    None,
    Lunar,
    Solar,
}

impl EclipseState {
    pub fn is_eclipse(&self) -> bool {
        !matches!(self, EclipseState::None)
    }
}

/// Rule set used to classify an angle pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum EclipsePolicy {
    /// Eclipses only at exactly 0/180/360 degrees; pauses the animation on a hit
    #[default]
    #[value(name = "exact")]
    ExactMatch,
    /// Eclipses within 10 degrees of alignment; never pauses the animation
    #[value(name = "tolerance")]
    ToleranceBand,
}

impl EclipsePolicy {
    /// Whether a detected eclipse pauses a running animation
    pub fn pauses_on_eclipse(&self) -> bool {
        matches!(self, EclipsePolicy::ExactMatch)
    }

    /// The other policy
    pub fn toggled(&self) -> EclipsePolicy {
        match self {
            EclipsePolicy::ExactMatch => EclipsePolicy::ToleranceBand,
            EclipsePolicy::ToleranceBand => EclipsePolicy::ExactMatch,
        }
    }
}

impl fmt::Display for EclipsePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EclipsePolicy::ExactMatch => f.write_str("exact"),
            EclipsePolicy::ToleranceBand => f.write_str("tolerance"),
        }
    }
}

/// Classifies the angle pair under the given policy
pub fn classify(state: &OrbitalState, policy: EclipsePolicy) -> EclipseState {
    match policy {
        EclipsePolicy::ExactMatch => classify_exact(state.earth_angle_deg, state.moon_angle_deg),
        EclipsePolicy::ToleranceBand => {
            classify_tolerance(state.earth_angle_deg, state.moon_angle_deg)
        }
    }
}

fn classify_exact(earth: f64, moon: f64) -> EclipseState {
    // 360 folds onto 0, which covers the (x, 360) and (360, x) pairs
    let earth = wrap_degrees(earth);
    let moon = wrap_degrees(moon);
    let aligned = |a: f64| a == 0.0 || a == 180.0;
    if !aligned(earth) || !aligned(moon) {
        EclipseState::None
    } else if earth != moon {
        EclipseState::Solar
    } else {
        EclipseState::Lunar
    }
}

fn classify_tolerance(earth: f64, moon: f64) -> EclipseState {
    let near = |a: f64, target: f64| angular_distance(a, target) < TOLERANCE_DEG;
    if (near(earth, 0.0) && near(moon, 180.0)) || (near(earth, 180.0) && near(moon, 0.0)) {
        return EclipseState::Solar;
    }
    let separation = angular_distance(moon, earth);
    if separation < TOLERANCE_DEG || (180.0 - separation) < TOLERANCE_DEG {
        EclipseState::Lunar
    } else {
        EclipseState::None
    }
}
