use chrono::NaiveDate;
use serde::Deserialize;

/// Inclusive range of dates that belong to one competition round.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RoundWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub round: u32,
}

impl RoundWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct RoundSchedule {
    windows: Vec<RoundWindow>,
}

impl RoundSchedule {
    pub fn new(windows: Vec<RoundWindow>) -> Self {
        Self { windows }
    }

    /// Round played on `date`. The first matching window wins.
    pub fn round_for(&self, date: NaiveDate) -> Option<u32> {
        self.windows
            .iter()
            .find(|w| w.contains(date))
            .map(|w| w.round)
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}
