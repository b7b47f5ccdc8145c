//! Day/time cycle and the seasonal label.
//!
//! Real seconds accumulate; every [`SECONDS_PER_GAME_MINUTE`] of them is one
//! in-game minute. Midnight rolls into a new day.

use serde::{Deserialize, Serialize};

pub const SECONDS_PER_GAME_MINUTE: f32 = 20.0;
pub const MINUTES_PER_DAY: u32 = 24 * 60;
/// New games start at 08:00 on day 1.
pub const START_MINUTE: u32 = 8 * 60;

#[derive(Debug, Clone, PartialEq)]
pub struct GameClock {
    pub day: u32,
    /// Minutes since midnight, always below [`MINUTES_PER_DAY`].
    pub minutes: u32,
    accumulator: f32,
}

impl Default for GameClock {
    fn default() -> Self {
        Self {
            day: 1,
            minutes: START_MINUTE,
            accumulator: 0.0,
        }
    }
}

impl GameClock {
    pub fn new(day: u32, minutes: u32) -> Self {
        Self {
            day: day.max(1),
            minutes: minutes % MINUTES_PER_DAY,
            accumulator: 0.0,
        }
    }

    /// Advance by `dt` real seconds. Returns how many new days began.
    pub fn tick(&mut self, dt: f32) -> u32 {
        let mut new_days = 0;
        self.accumulator += dt.max(0.0);
        while self.accumulator >= SECONDS_PER_GAME_MINUTE {
            self.accumulator -= SECONDS_PER_GAME_MINUTE;
            self.minutes += 1;
            if self.minutes >= MINUTES_PER_DAY {
                self.minutes = 0;
                self.day = self.day.saturating_add(1);
                new_days += 1;
            }
        }
        new_days
    }

    pub fn hour(&self) -> u32 {
        self.minutes / 60
    }

    pub fn minute(&self) -> u32 {
        self.minutes % 60
    }

    pub fn time_of_day(&self) -> TimeOfDay {
        match self.hour() {
            h if h < 6 => TimeOfDay::Night,
            h if h < 12 => TimeOfDay::Morning,
            h if h < 17 => TimeOfDay::Noon,
            h if h < 21 => TimeOfDay::Evening,
            _ => TimeOfDay::Night,
        }
    }

    /// `Day 3 • Morning • 08:05`
    pub fn label(&self) -> String {
        format!(
            "Day {} • {} • {:02}:{:02}",
            self.day,
            self.time_of_day().label(),
            self.hour(),
            self.minute()
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeOfDay {
    Morning,
    Noon,
    Evening,
    Night,
}

impl TimeOfDay {
    pub fn label(self) -> &'static str {
        match self {
            TimeOfDay::Morning => "Morning",
            TimeOfDay::Noon => "Noon",
            TimeOfDay::Evening => "Evening",
            TimeOfDay::Night => "Night",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hemisphere {
    #[default]
    North,
    South,
}

impl Hemisphere {
    pub fn toggled(self) -> Self {
        match self {
            Hemisphere::North => Hemisphere::South,
            Hemisphere::South => Hemisphere::North,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Hemisphere::North => "North",
            Hemisphere::South => "South",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    /// `month0` is zero-based (0 = January). The south runs half a year apart.
    pub fn for_month(month0: u32, hemisphere: Hemisphere) -> Self {
        let north = match month0 % 12 {
            2..=4 => Season::Spring,
            5..=7 => Season::Summer,
            8..=10 => Season::Autumn,
            _ => Season::Winter,
        };
        match hemisphere {
            Hemisphere::North => north,
            Hemisphere::South => north.opposite(),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Season::Spring => Season::Autumn,
            Season::Summer => Season::Winter,
            Season::Autumn => Season::Spring,
            Season::Winter => Season::Summer,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Autumn => "Autumn",
            Season::Winter => "Winter",
        }
    }
}

/// Zero-based month of the local wall clock.
pub fn current_month() -> u32 {
    use chrono::Datelike;
    chrono::Local::now().month0()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_twenty_seconds_is_one_minute() {
        let mut clock = GameClock::default();
        clock.tick(19.9);
        assert_eq!(clock.minutes, START_MINUTE);
        clock.tick(0.1);
        assert_eq!(clock.minutes, START_MINUTE + 1);
    }

    #[test]
    fn test_midnight_starts_new_day() {
        let mut clock = GameClock::new(4, MINUTES_PER_DAY - 1);
        let days = clock.tick(SECONDS_PER_GAME_MINUTE);
        assert_eq!(days, 1);
        assert_eq!(clock.day, 5);
        assert_eq!(clock.minutes, 0);
    }

    #[test]
    fn test_time_of_day_boundaries() {
        let at = |h: u32| GameClock::new(1, h * 60).time_of_day();
        assert_eq!(at(0), TimeOfDay::Night);
        assert_eq!(at(5), TimeOfDay::Night);
        assert_eq!(at(6), TimeOfDay::Morning);
        assert_eq!(at(12), TimeOfDay::Noon);
        assert_eq!(at(17), TimeOfDay::Evening);
        assert_eq!(at(21), TimeOfDay::Night);
    }

    #[test]
    fn test_label_format() {
        let clock = GameClock::new(3, 8 * 60 + 5);
        assert_eq!(clock.label(), "Day 3 • Morning • 08:05");
    }

    #[test]
    fn test_seasons_flip_by_hemisphere() {
        assert_eq!(Season::for_month(3, Hemisphere::North), Season::Spring);
        assert_eq!(Season::for_month(3, Hemisphere::South), Season::Autumn);
        assert_eq!(Season::for_month(0, Hemisphere::North), Season::Winter);
        assert_eq!(Season::for_month(11, Hemisphere::South), Season::Summer);
        assert_eq!(Season::for_month(7, Hemisphere::North), Season::Summer);
    }
}
