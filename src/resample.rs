//! Last-known-value resampling of a scoring timeline onto shared checkpoints.

use serde::Deserialize;

use crate::constants::{DEFAULT_CHECKPOINTS, DEFAULT_STEP_MINUTES};
use crate::error::{Result, ScraperError};
use crate::types::{GameTimeline, ScoringEvent};

/// Ordered query times shared by every game of a run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TimeGrid {
    pub enabled: bool,
    pub step_minutes: f64,
    pub checkpoints: usize,
}

impl Default for TimeGrid {
    fn default() -> Self {
        Self {
            enabled: true,
            step_minutes: DEFAULT_STEP_MINUTES,
            checkpoints: DEFAULT_CHECKPOINTS,
        }
    }
}

impl TimeGrid {
    pub fn uniform(step_minutes: f64, checkpoints: usize) -> Self {
        Self {
            enabled: true,
            step_minutes,
            checkpoints,
        }
    }

    pub fn times(&self) -> Vec<f64> {
        (0..self.checkpoints)
            .map(|i| self.step_minutes * i as f64)
            .collect()
    }
}

/// One event per entry of `query_times`, holding the score of the last event
/// at or before each time. Times before the first event get the first event.
///
/// `query_times` must be non-decreasing; the cursor never moves backwards.
pub fn resample(timeline: &GameTimeline, query_times: &[f64]) -> Result<Vec<ScoringEvent>> {
    let events = timeline.events();
    if events.is_empty() {
        return Err(ScraperError::Resampling(format!(
            "game {} has no scoring events to hold",
            timeline.meta().game_id
        )));
    }

    let mut cursor = 0;
    let resampled = query_times
        .iter()
        .map(|&t| {
            while cursor + 1 < events.len() && events[cursor + 1].time <= t {
                cursor += 1;
            }
            ScoringEvent {
                time: t,
                ..events[cursor].clone()
            }
        })
        .collect();
    Ok(resampled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GameMeta;

    fn timeline(points: &[(f64, u32, u32)]) -> GameTimeline {
        let meta = GameMeta::new("Spurs", "Mavericks", 7, 1);
        let events = points
            .iter()
            .map(|&(t, a, h)| ScoringEvent::new(&meta, t, a, h))
            .collect();
        GameTimeline::new(meta, events)
    }

    #[test]
    fn test_holds_last_known_value() {
        let tl = timeline(&[(0.0, 0, 0), (5.0, 3, 0), (10.0, 3, 5)]);
        let out = resample(&tl, &[0.0, 2.0, 5.0, 8.0, 10.0, 12.0]).unwrap();
        let diffs: Vec<i32> = out.iter().map(|e| e.diff_score).collect();
        assert_eq!(diffs, vec![0, 0, 3, 3, -2, -2]);
        let times: Vec<f64> = out.iter().map(|e| e.time).collect();
        assert_eq!(times, vec![0.0, 2.0, 5.0, 8.0, 10.0, 12.0]);
    }

    #[test]
    fn test_boundaries() {
        let tl = timeline(&[(3.0, 2, 0), (6.0, 2, 2), (9.0, 5, 2)]);
        let out = resample(&tl, &[0.0, 1.0, 2.99, 9.0, 20.0, 48.0]).unwrap();
        for e in &out[..3] {
            assert_eq!(e.score(), (2, 0));
        }
        for e in &out[3..] {
            assert_eq!(e.score(), (5, 2));
        }
        assert!(out.iter().all(|e| e.game_id == "Spurs-Mavericks-7"));
    }

    #[test]
    fn test_output_length_matches_grid() {
        let tl = timeline(&[(1.0, 2, 0)]);
        let grid = TimeGrid::default().times();
        assert_eq!(grid.len(), 196);
        assert_eq!(grid[195], 48.75);
        assert_eq!(resample(&tl, &grid).unwrap().len(), grid.len());
        assert!(resample(&tl, &[]).unwrap().is_empty());
    }

    #[test]
    fn test_same_time_events_take_latest() {
        let tl = timeline(&[(4.0, 1, 0), (4.0, 2, 0), (6.0, 2, 3)]);
        let out = resample(&tl, &[4.0, 5.0]).unwrap();
        assert_eq!(out[0].score(), (2, 0));
        assert_eq!(out[1].score(), (2, 0));
    }

    #[test]
    fn test_empty_timeline_is_rejected() {
        let tl = timeline(&[]);
        assert!(matches!(resample(&tl, &[0.0]), Err(ScraperError::Resampling(_))));
    }
}
