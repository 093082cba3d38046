use crate::eclipse::EclipseState;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Explanatory text read out by the announcer
pub const ANNOUNCEMENT_TEXT: &str = "तमसा संवृतो भानुः, क्षणं चापि न दृश्यते। \
नित्यं चक्रेण कालस्य, ग्रहणं सम्प्रवर्तते। \
Meaning: The Sun is momentarily covered in darkness and becomes invisible, \
as the eternal cycle of time causes the eclipse to occur.";

/// Reading pace of the announcer
const TIME_PER_WORD: Duration = Duration::from_millis(400);

/// Message category reported to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationCategory {
    Solar,
    Lunar,
    NoEclipse,
}

impl From<EclipseState> for NotificationCategory {
    fn from(state: EclipseState) -> Self {
        match state {
            EclipseState::Solar => NotificationCategory::Solar,
            EclipseState::Lunar => NotificationCategory::Lunar,
            EclipseState::None => NotificationCategory::NoEclipse,
        }
    }
}

/// How a notification is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// Answer to a manual check; stays until dismissed
    Alert,
    /// Shown while the animation sits on an eclipse; cleared automatically
    Banner,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub category: NotificationCategory,
    /// Earth angle rounded to whole degrees
    pub earth_deg: i64,
    /// Moon angle rounded to whole degrees
    pub moon_deg: i64,
}

impl Notification {
    pub fn headline(&self) -> &'static str {
        match (self.kind, self.category) {
            (NotificationKind::Banner, NotificationCategory::Solar) => "Solar Eclipse Occurring!",
            (NotificationKind::Banner, NotificationCategory::Lunar) => "Lunar Eclipse Occurring!",
            (_, NotificationCategory::Solar) => "Solar Eclipse!",
            (_, NotificationCategory::Lunar) => "Lunar Eclipse!",
            (_, NotificationCategory::NoEclipse) => "No Eclipse",
        }
    }

    /// Angle pair line shown under the headline
    pub fn angles(&self) -> String {
        format!("Earth: {}°  Moon: {}°", self.earth_deg, self.moon_deg)
    }
}

/// Receives what the model wants shown to the user
pub trait Notifier {
    fn notify(&mut self, notification: Notification);

    /// Removes the current banner, if any
    fn clear_banner(&mut self);
}

/// Event recorded by [`Outbox`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifierEvent {
    Notify(Notification),
    ClearBanner,
}

/// Queues notifications until the display layer drains them
#[derive(Debug, Default)]
pub struct Outbox {
    events: VecDeque<NotifierEvent>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = NotifierEvent> + '_ {
        self.events.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl Notifier for Outbox {
    fn notify(&mut self, notification: Notification) {
        self.events.push_back(NotifierEvent::Notify(notification));
    }

    fn clear_banner(&mut self) {
        self.events.push_back(NotifierEvent::ClearBanner);
    }
}

/// Read-aloud toggle for [`ANNOUNCEMENT_TEXT`]
#[derive(Debug, Default)]
pub struct Announcer {
    speaking_until: Option<Instant>,
}

impl Announcer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts reading, or stops a reading in progress. Returns whether it is now speaking.
    pub fn toggle(&mut self, now: Instant) -> bool {
        if self.is_speaking(now) {
            self.speaking_until = None;
            log::info!("announcement stopped");
            false
        } else {
            self.speaking_until = Some(now + Self::reading_time());
            log::info!("announcement started");
            true
        }
    }

    pub fn is_speaking(&self, now: Instant) -> bool {
        self.speaking_until.is_some_and(|until| now < until)
    }

    /// Forgets a reading that has run to its end
    pub fn update(&mut self, now: Instant) {
        if self.speaking_until.is_some() && !self.is_speaking(now) {
            self.speaking_until = None;
        }
    }

    pub fn text(&self) -> &'static str {
        ANNOUNCEMENT_TEXT
    }

    pub fn reading_time() -> Duration {
        TIME_PER_WORD * ANNOUNCEMENT_TEXT.split_whitespace().count() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notification(kind: NotificationKind, category: NotificationCategory) -> Notification {
        Notification {
            kind,
            category,
            earth_deg: 180,
            moon_deg: 0,
        }
    }

    #[test]
    fn headlines_follow_kind_and_category() {
        let banner = notification(NotificationKind::Banner, NotificationCategory::Solar);
        assert_eq!(banner.headline(), "Solar Eclipse Occurring!");
        let alert = notification(NotificationKind::Alert, NotificationCategory::Lunar);
        assert_eq!(alert.headline(), "Lunar Eclipse!");
        let none = notification(NotificationKind::Alert, NotificationCategory::NoEclipse);
        assert_eq!(none.headline(), "No Eclipse");
        assert_eq!(none.angles(), "Earth: 180°  Moon: 0°");
    }

    #[test]
    fn outbox_drains_in_order() {
        let mut outbox = Outbox::new();
        let alert = notification(NotificationKind::Alert, NotificationCategory::Lunar);
        outbox.notify(alert.clone());
        outbox.clear_banner();
        let events: Vec<_> = outbox.drain().collect();
        assert_eq!(
            events,
            vec![NotifierEvent::Notify(alert), NotifierEvent::ClearBanner]
        );
        assert!(outbox.is_empty());
    }

    #[test]
    fn announcer_toggles() {
        let now = Instant::now();
        let mut announcer = Announcer::new();
        assert!(!announcer.is_speaking(now));
        assert!(announcer.toggle(now));
        assert!(announcer.is_speaking(now + Duration::from_secs(1)));
        assert!(!announcer.toggle(now + Duration::from_secs(1)));
        assert!(!announcer.is_speaking(now + Duration::from_secs(1)));
    }

    #[test]
    fn announcer_finishes_on_its_own() {
        let now = Instant::now();
        let mut announcer = Announcer::new();
        announcer.toggle(now);
        let done = now + Announcer::reading_time();
        assert!(!announcer.is_speaking(done));
        announcer.update(done);
        // a finished reading starts over instead of stopping
        assert!(announcer.toggle(done));
    }
}
