use crate::math::{BodyPositions, Position2D};
use crossterm::style::Color;

/// Display radius of the Sun, in world units
pub const SUN_RADIUS: f64 = 6.0;
/// Display radius of the Earth, in world units
pub const EARTH_RADIUS: f64 = 2.5;
/// Display radius of the Moon, in world units
pub const MOON_RADIUS: f64 = 1.25;

/// A body as the renderer draws it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub name: &'static str,
    pub position: Position2D,
    pub radius: f64,
    pub glyph: char,
    pub color: Color,
}

/// Sun, Earth and Moon in back-to-front order
pub fn scene_sprites(positions: &BodyPositions) -> [Sprite; 3] {
    [
        Sprite {
            name: "Sun",
            position: Position2D::ORIGIN,
            radius: SUN_RADIUS,
            glyph: '#',
            color: Color::Yellow,
        },
        Sprite {
            name: "Earth",
            position: positions.earth,
            radius: EARTH_RADIUS,
            glyph: '@',
            color: Color::Blue,
        },
        Sprite {
            name: "Moon",
            position: positions.moon,
            radius: MOON_RADIUS,
            glyph: 'o',
            color: Color::Grey,
        },
    ]
}
