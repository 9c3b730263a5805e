//! Conversion from the countdown clock shown on the page to one monotonic
//! game clock measured in elapsed minutes.

use crate::constants::CLOCK_PATTERN;
use crate::error::{Result, ScraperError};
use once_cell::sync::Lazy;
use regex::Regex;

/// Length of one period on the game clock.
pub const MINUTES_PER_PERIOD: f64 = 12.0;

static CLOCK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(CLOCK_PATTERN).expect("valid clock pattern"));

/// Returns the elapsed game minute for `relative_minutes` left on the clock in
/// `period` (1-based).
pub fn to_global_time(relative_minutes: f64, period: u32) -> f64 {
    let since_period_start = MINUTES_PER_PERIOD - relative_minutes;
    MINUTES_PER_PERIOD * (period.saturating_sub(1)) as f64 + since_period_start
}

/// Parses `mm:ss` into fractional minutes. Returns `None` when the text is not
/// a clock reading at all.
pub fn parse_clock(text: &str) -> Option<Result<f64>> {
    let caps = CLOCK_RE.captures(text.trim())?;
    Some(clock_minutes(&caps[1], &caps[2], text))
}

fn clock_minutes(minutes: &str, seconds: &str, text: &str) -> Result<f64> {
    let parse = |s: &str| -> Result<f64> {
        s.parse::<u32>()
            .map(f64::from)
            .map_err(|e| ScraperError::Parse(format!("bad clock '{}': {}", text.trim(), e)))
    };
    Ok(parse(minutes)? + parse(seconds)? / 60.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_start_and_end() {
        assert_eq!(to_global_time(12.0, 1), 0.0);
        for p in 1..=4 {
            assert_eq!(to_global_time(0.0, p), 12.0 * p as f64);
        }
    }

    #[test]
    fn test_mid_second_quarter() {
        assert_eq!(to_global_time(7.5, 2), 16.5);
    }

    #[test]
    fn test_monotonic_in_period_and_clock() {
        for p in 1..4 {
            assert!(to_global_time(6.0, p + 1) > to_global_time(6.0, p));
        }
        let mut last = f64::MIN;
        for tenth in (0..=120).rev() {
            let t = to_global_time(tenth as f64 / 10.0, 3);
            assert!(t > last);
            last = t;
        }
    }

    #[test]
    fn test_parse_clock() {
        assert_eq!(parse_clock("7:30").unwrap().unwrap(), 7.5);
        assert_eq!(parse_clock(" 12:00 ").unwrap().unwrap(), 12.0);
        assert_eq!(parse_clock("0:45").unwrap().unwrap(), 0.75);
        assert!(parse_clock("End of 1st Quarter").is_none());
        assert!(parse_clock("3-2").is_none());
    }

    #[test]
    fn test_parse_clock_overflow_is_error() {
        assert!(parse_clock("99999999999:00").unwrap().is_err());
    }
}
