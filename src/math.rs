use crate::state::OrbitalState;

/// Radius of the Earth's orbit around the Sun, in world units
pub const EARTH_ORBIT_RADIUS: f64 = 15.0;
/// Radius of the Moon's orbit around the Earth, in world units
pub const MOON_ORBIT_RADIUS: f64 = 5.0;

/// A point in the orbital plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position2D {
    pub x: f64,
    pub y: f64,
}

impl Position2D {
    pub const ORIGIN: Position2D = Position2D { x: 0.0, y: 0.0 };

    /// Distance from the origin
    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Component-wise difference `self - other`
    pub fn sub(&self, other: &Position2D) -> Position2D {
        Position2D {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

/// Derived positions of the orbiting bodies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyPositions {
    pub earth: Position2D,
    /// Absolute position; the orbit itself is relative to the Earth
    pub moon: Position2D,
}

/// Wraps an angle in degrees into [0, 360)
pub fn wrap_degrees(angle: f64) -> f64 {
    if !angle.is_finite() {
        return 0.0;
    }
    (angle % 360.0 + 360.0) % 360.0
}

/// Shortest angular distance between two angles, in [0, 180]
pub fn angular_distance(a: f64, b: f64) -> f64 {
    let d = wrap_degrees(a - b);
    d.min(360.0 - d)
}

/// Point on a circle of `radius` around `center` at `angle_deg`
pub fn point_on_circle(center: &Position2D, radius: f64, angle_deg: f64) -> Position2D {
    let (sin_a, cos_a) = angle_deg.to_radians().sin_cos();
    Position2D {
        x: center.x + cos_a * radius,
        y: center.y + sin_a * radius,
    }
}

/// Resolves the Earth and Moon positions for the given orbital state
pub fn resolve_positions(state: &OrbitalState) -> BodyPositions {
    let earth = point_on_circle(&Position2D::ORIGIN, EARTH_ORBIT_RADIUS, state.earth_angle_deg);
    let moon = point_on_circle(&earth, MOON_ORBIT_RADIUS, state.moon_angle_deg);
    BodyPositions { earth, moon }
}
