//! In-game calendar derived from the running week counter.
//!
//! Time advances one week at a time. A year is 48 weeks, a month is 4
//! weeks, so every derived date is a pure function of `current_week`.

use serde::{Deserialize, Serialize};

const WEEKS_PER_YEAR: i64 = 48;
const WEEKS_PER_MONTH: i64 = 4;

/// A calendar date: year / month / week-of-month, all 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameDate {
    pub year: i64,
    pub month: i64,
    pub week: i64,
}

impl GameDate {
    /// Derive the date from the running week counter (week 1 = year 1,
    /// month 1, week 1).
    pub fn from_week(current_week: i64) -> Self {
        let elapsed = (current_week - 1).max(0);
        let remaining = elapsed % WEEKS_PER_YEAR;
        Self {
            year: elapsed / WEEKS_PER_YEAR + 1,
            month: remaining / WEEKS_PER_MONTH + 1,
            week: remaining % WEEKS_PER_MONTH + 1,
        }
    }
}

impl std::fmt::Display for GameDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Year {} Month {} Week {}", self.year, self.month, self.week)
    }
}

/// Seasons of the year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    /// The lowercase save-document spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
            Season::Winter => "winter",
        }
    }
}

/// Season for a given running week: months 12/1/2 are winter, 3-5 spring,
/// 6-8 summer, 9-11 autumn.
pub fn season_for_week(current_week: i64) -> Season {
    match GameDate::from_week(current_week).month {
        12 | 1 | 2 => Season::Winter,
        3..=5 => Season::Spring,
        6..=8 => Season::Summer,
        _ => Season::Autumn,
    }
}
