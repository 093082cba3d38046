use crate::math::wrap_degrees;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Size of a discrete step, in degrees
pub const STEP_DEG: f64 = 10.0;
/// Size of a fine slider adjustment, in degrees
pub const FINE_STEP_DEG: f64 = 1.0;
/// Speed change per key press
pub const SPEED_STEP: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Increment,
    Decrement,
}

/// A requested change to one orbit angle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AngleInput {
    /// Slider position; any value, normalized into [0, 360)
    Absolute(f64),
    /// Relative move from the current angle
    Delta(f64),
    /// Discrete move by exactly [`STEP_DEG`]
    Step(Step),
}

/// Applies an input to the current angle. Never fails; the result is in [0, 360).
pub fn apply_angle_input(current: f64, input: AngleInput) -> f64 {
    match input {
        AngleInput::Absolute(value) => wrap_degrees(value),
        AngleInput::Delta(delta) if delta.is_finite() => wrap_degrees(current + delta),
        AngleInput::Delta(_) => wrap_degrees(current),
        AngleInput::Step(Step::Increment) => wrap_degrees(current + STEP_DEG),
        AngleInput::Step(Step::Decrement) => wrap_degrees(current - STEP_DEG + 360.0),
    }
}

/// User commands produced by the keyboard
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    ToggleAnimation,
    Earth(AngleInput),
    Moon(AngleInput),
    Speed(f64),
    CheckEclipse,
    ToggleAnnouncement,
    TogglePolicy,
    Reset,
    ToggleDebug,
    Quit,
}

/// Maps a key press to a command
pub fn command_for_key(key: &KeyEvent) -> Option<Command> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    // raw mode swallows SIGINT
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Command::Quit);
    }
    let fine = key.modifiers.contains(KeyModifiers::SHIFT);
    let nudge = |step: Step| {
        if fine {
            match step {
                Step::Increment => AngleInput::Delta(FINE_STEP_DEG),
                Step::Decrement => AngleInput::Delta(-FINE_STEP_DEG),
            }
        } else {
            AngleInput::Step(step)
        }
    };

    let command = match key.code {
        KeyCode::Char(' ') => Command::ToggleAnimation,
        KeyCode::Left => Command::Earth(nudge(Step::Decrement)),
        KeyCode::Right => Command::Earth(nudge(Step::Increment)),
        KeyCode::Down => Command::Moon(nudge(Step::Decrement)),
        KeyCode::Up => Command::Moon(nudge(Step::Increment)),
        KeyCode::Esc => Command::Quit,
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'p' => Command::ToggleAnimation,
            '+' | '=' => Command::Speed(SPEED_STEP),
            '-' | '_' => Command::Speed(-SPEED_STEP),
            'e' => Command::CheckEclipse,
            'v' => Command::ToggleAnnouncement,
            'm' => Command::TogglePolicy,
            'r' => Command::Reset,
            'd' => Command::ToggleDebug,
            'q' => Command::Quit,
            _ => return None,
        },
        _ => return None,
    };
    Some(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn step_decrement_from_zero_wraps() {
        assert_eq!(apply_angle_input(0.0, AngleInput::Step(Step::Decrement)), 350.0);
    }

    #[test]
    fn step_increment_wraps() {
        assert_eq!(apply_angle_input(355.0, AngleInput::Step(Step::Increment)), 5.0);
        assert_eq!(apply_angle_input(350.0, AngleInput::Step(Step::Increment)), 0.0);
    }

    #[test]
    fn absolute_and_delta_are_normalized() {
        assert_eq!(apply_angle_input(10.0, AngleInput::Absolute(360.0)), 0.0);
        assert_eq!(apply_angle_input(10.0, AngleInput::Absolute(187.25)), 187.25);
        assert_eq!(apply_angle_input(10.0, AngleInput::Absolute(-90.0)), 270.0);
        assert_eq!(apply_angle_input(10.0, AngleInput::Absolute(f64::NAN)), 0.0);
        assert_eq!(apply_angle_input(10.0, AngleInput::Delta(-15.0)), 355.0);
        assert_eq!(apply_angle_input(10.0, AngleInput::Delta(f64::NAN)), 10.0);
    }

    #[test]
    fn arrows_step_the_angles() {
        assert_eq!(
            command_for_key(&press(KeyCode::Left, KeyModifiers::NONE)),
            Some(Command::Earth(AngleInput::Step(Step::Decrement)))
        );
        assert_eq!(
            command_for_key(&press(KeyCode::Up, KeyModifiers::NONE)),
            Some(Command::Moon(AngleInput::Step(Step::Increment)))
        );
        assert_eq!(
            command_for_key(&press(KeyCode::Right, KeyModifiers::SHIFT)),
            Some(Command::Earth(AngleInput::Delta(FINE_STEP_DEG)))
        );
    }

    #[test]
    fn letters_are_case_insensitive() {
        assert_eq!(
            command_for_key(&press(KeyCode::Char('E'), KeyModifiers::SHIFT)),
            Some(Command::CheckEclipse)
        );
        assert_eq!(
            command_for_key(&press(KeyCode::Char('q'), KeyModifiers::NONE)),
            Some(Command::Quit)
        );
        assert_eq!(command_for_key(&press(KeyCode::Char('x'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn ctrl_c_quits() {
        assert_eq!(
            command_for_key(&press(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Command::Quit)
        );
    }

    #[test]
    fn releases_are_ignored() {
        let mut key = press(KeyCode::Char(' '), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        assert_eq!(command_for_key(&key), None);
    }
}
