use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::{debug, warn};

use crate::clock::{parse_clock, to_global_time, MINUTES_PER_PERIOD};
use crate::constants::{END_OF_PERIOD_MARKER, GAME_NUMBER_PATTERN, SCORE_PATTERN, UNKNOWN_GAME_NUMBER};
use crate::error::{Result, ScraperError};
use crate::seeds::RankTable;
use crate::types::{GameMeta, GameTimeline, ScoringEvent};

static SCORE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(SCORE_PATTERN).expect("valid score pattern"));
static GAME_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(GAME_NUMBER_PATTERN).expect("valid game number pattern"));

static ROW_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").unwrap());
static COLUMN_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("td").unwrap());
static LINESCORE_TEAM_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("table.linescore a").unwrap());
static PARAGRAPH_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());

/// A row that changed the score, before game metadata is attached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowEvent {
    pub period: u32,
    /// Minutes left on the period clock.
    pub clock: f64,
    pub away_score: u32,
    pub home_score: u32,
}

impl RowEvent {
    pub fn global_time(&self) -> f64 {
        to_global_time(self.clock, self.period)
    }
}

/// State threaded from one row to the next.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ScanState {
    period: u32,
    prev_away: u32,
    prev_home: u32,
    clock: f64,
}

impl Default for ScanState {
    fn default() -> Self {
        Self {
            period: 1,
            prev_away: 0,
            prev_home: 0,
            clock: MINUTES_PER_PERIOD,
        }
    }
}

/// Each side is bounded by `i32::MAX` so the signed differential fits.
fn parse_score(text: &str) -> Result<Option<(u32, u32)>> {
    let text = text.trim();
    let Some(caps) = SCORE_RE.captures(text) else {
        return Ok(None);
    };
    let side = |i: usize| {
        caps[i]
            .parse::<i32>()
            .map(i32::unsigned_abs)
            .map_err(|e| ScraperError::Parse(format!("bad score '{}': {}", text, e)))
    };
    Ok(Some((side(1)?, side(2)?)))
}

/// Applies one row to `state`. The returned event carries the period that was
/// current when the row was read; a period boundary in the row only affects
/// the rows after it.
fn scan_row(state: ScanState, row: &[String]) -> Result<(ScanState, Option<RowEvent>)> {
    let mut next = state;
    let mut score_changed = false;
    let mut period_ended = false;

    for text in row {
        if let Some((away, home)) = parse_score(text)? {
            score_changed = away != next.prev_away || home != next.prev_home;
            next.prev_away = away;
            next.prev_home = home;
        }
        if let Some(clock) = parse_clock(text) {
            next.clock = clock?;
        }
        if text.contains(END_OF_PERIOD_MARKER) {
            period_ended = true;
        }
    }

    let event = score_changed.then(|| RowEvent {
        period: state.period,
        clock: next.clock,
        away_score: next.prev_away,
        home_score: next.prev_home,
    });
    if period_ended {
        next.period += 1;
    }
    Ok((next, event))
}

/// Folds the rows of a play-by-play table into the rows that changed the score.
pub fn scan_rows(rows: &[Vec<String>]) -> Result<Vec<RowEvent>> {
    rows.iter()
        .try_fold((ScanState::default(), Vec::new()), |(state, mut events), row| -> Result<(ScanState, Vec<RowEvent>)> {
            let (next, event) = scan_row(state, row)?;
            events.extend(event);
            Ok((next, events))
        })
        .map(|(_, events)| events)
}

/// Every `tr` of the document as its trimmed `td` texts, in document order.
pub fn document_rows(document: &Html) -> Vec<Vec<String>> {
    document
        .select(&ROW_SELECTOR)
        .map(|row| {
            row.select(&COLUMN_SELECTOR)
                .map(|col| col.text().collect::<String>().trim().to_string())
                .collect()
        })
        .collect()
}

/// Away and home team names from the linescore table.
pub fn parse_team_names(document: &Html) -> Result<(String, String)> {
    let names: Vec<String> = document
        .select(&LINESCORE_TEAM_SELECTOR)
        .map(|a| a.text().collect::<String>().trim().to_string())
        .collect();

    match <[String; 2]>::try_from(names) {
        Ok([away, home]) => Ok((away, home)),
        Err(names) => Err(ScraperError::Parse(format!(
            "expected 2 teams in linescore table, found {}",
            names.len()
        ))),
    }
}

/// Series game number from a `Game N of 7` note. `Err` carries the warning
/// text when the note is absent or contradictory.
pub fn parse_game_number(document: &Html) -> std::result::Result<i32, String> {
    let mut numbers: Vec<i32> = Vec::new();
    for p in document.select(&PARAGRAPH_SELECTOR) {
        let text = p.text().collect::<String>();
        if let Some(caps) = GAME_NUMBER_RE.captures(&text) {
            if let Ok(n) = caps[1].parse::<i32>() {
                if !numbers.contains(&n) {
                    numbers.push(n);
                }
            }
        }
    }

    match numbers.as_slice() {
        [n] => Ok(*n),
        [] => Err("no game number found".to_string()),
        many => Err(format!("ambiguous game number, candidates {:?}", many)),
    }
}

/// Builds the scoring timeline of one play-by-play page.
pub fn extract(document: &str, round_num: u32, ranks: &RankTable) -> Result<GameTimeline> {
    let html = Html::parse_document(document);

    let (away, home) = parse_team_names(&html)?;
    let mut warnings = Vec::new();
    let game_number = match parse_game_number(&html) {
        Ok(n) => n,
        Err(warning) => {
            warn!(away = %away, home = %home, "{}; using {}", warning, UNKNOWN_GAME_NUMBER);
            warnings.push(warning);
            UNKNOWN_GAME_NUMBER
        }
    };

    let meta = GameMeta::new(away, home, game_number, round_num);
    let away_seed = ranks.lookup(&meta.away_team, &meta.game_id)?;
    let home_seed = ranks.lookup(&meta.home_team, &meta.game_id)?;
    let meta = meta.with_seeds(away_seed, home_seed);

    let rows = document_rows(&html);
    let events: Vec<ScoringEvent> = scan_rows(&rows)?
        .into_iter()
        .map(|row| ScoringEvent::new(&meta, row.global_time(), row.away_score, row.home_score))
        .collect();

    debug!(game_id = %meta.game_id, rows = rows.len(), events = events.len(), "extracted timeline");
    Ok(GameTimeline::new(meta, events).with_warnings(warnings))
}
