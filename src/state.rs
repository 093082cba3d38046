use crate::error::ConfigError;
use crate::math::wrap_degrees;

/// Lowest speed multiplier reachable from the controls
pub const MIN_SPEED: f64 = 0.1;
/// Highest speed multiplier reachable from the controls
pub const MAX_SPEED: f64 = 5.0;
/// Speed multiplier used when none is given
pub const DEFAULT_SPEED: f64 = 0.5;

/// Earth advance per tick at speed 1.0, in degrees
const EARTH_RATE: f64 = 0.5;
/// Moon advance per tick at speed 1.0, in degrees
const MOON_RATE: f64 = 1.0;

/// Orbital angles of the Earth (around the Sun) and the Moon (around the Earth)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OrbitalState {
    /// Earth orbit angle in degrees, kept in [0, 360)
    pub earth_angle_deg: f64,
    /// Moon orbit angle in degrees, kept in [0, 360)
    pub moon_angle_deg: f64,
}

impl OrbitalState {
    /// Creates a state with both angles wrapped into [0, 360)
    pub fn new(earth_angle_deg: f64, moon_angle_deg: f64) -> Self {
        OrbitalState {
            earth_angle_deg: wrap_degrees(earth_angle_deg),
            moon_angle_deg: wrap_degrees(moon_angle_deg),
        }
    }

    /// Angles rounded to whole degrees, as shown to the user
    pub fn rounded(&self) -> (i64, i64) {
        (
            self.earth_angle_deg.round() as i64,
            self.moon_angle_deg.round() as i64,
        )
    }
}

/// Animation speed settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationConfig {
    speed_multiplier: f64,
}

impl AnimationConfig {
    /// Validates the multiplier; it must be finite and strictly positive
    pub fn new(speed_multiplier: f64) -> Result<Self, ConfigError> {
        if !speed_multiplier.is_finite() || speed_multiplier <= 0.0 {
            return Err(ConfigError::InvalidSpeed(speed_multiplier));
        }
        Ok(AnimationConfig { speed_multiplier })
    }

    pub fn speed_multiplier(&self) -> f64 {
        self.speed_multiplier
    }

    /// Earth advance per tick, in degrees
    pub fn earth_rate(&self) -> f64 {
        EARTH_RATE * self.speed_multiplier
    }

    /// Moon advance per tick, in degrees
    pub fn moon_rate(&self) -> f64 {
        MOON_RATE * self.speed_multiplier
    }

    /// Moves the multiplier by `delta`, clamped to the control range on a 0.1 grid
    pub fn adjust_speed(&mut self, delta: f64) {
        if !delta.is_finite() {
            return;
        }
        let speed = ((self.speed_multiplier + delta) * 10.0).round() / 10.0;
        self.speed_multiplier = speed.clamp(MIN_SPEED, MAX_SPEED);
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        AnimationConfig {
            speed_multiplier: DEFAULT_SPEED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_wraps_angles() {
        let state = OrbitalState::new(-10.0, 725.0);
        assert_eq!(state.earth_angle_deg, 350.0);
        assert_eq!(state.moon_angle_deg, 5.0);
    }

    #[test]
    fn rounded_angles() {
        let state = OrbitalState::new(179.6, 0.4);
        assert_eq!(state.rounded(), (180, 0));
    }

    #[test]
    fn config_rejects_bad_speeds() {
        assert!(AnimationConfig::new(0.0).is_err());
        assert!(AnimationConfig::new(-1.0).is_err());
        assert!(AnimationConfig::new(f64::NAN).is_err());
        assert!(AnimationConfig::new(f64::INFINITY).is_err());
        assert!(AnimationConfig::new(2.5).is_ok());
    }

    #[test]
    fn rates_scale_with_speed() {
        let config = AnimationConfig::new(2.0).unwrap();
        assert_eq!(config.earth_rate(), 1.0);
        assert_eq!(config.moon_rate(), 2.0);
    }

    #[test]
    fn adjust_speed_clamps_to_range() {
        let mut config = AnimationConfig::new(4.9).unwrap();
        config.adjust_speed(0.1);
        assert_eq!(config.speed_multiplier(), 5.0);
        config.adjust_speed(0.1);
        assert_eq!(config.speed_multiplier(), 5.0);

        let mut config = AnimationConfig::new(0.2).unwrap();
        config.adjust_speed(-0.1);
        assert_eq!(config.speed_multiplier(), 0.1);
        config.adjust_speed(-0.1);
        assert_eq!(config.speed_multiplier(), 0.1);
    }
}
