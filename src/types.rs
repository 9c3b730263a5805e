use serde::{Deserialize, Serialize};

/// One change in the running score of a game.
///
/// Serialized field names match the flat event table written by
/// [`crate::storage`], so optional ranks become empty cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringEvent {
    pub game_id: String,
    pub round_num: u32,
    #[serde(rename = "away")]
    pub away_team: String,
    #[serde(rename = "away_rank")]
    pub away_seed: Option<u32>,
    #[serde(rename = "home")]
    pub home_team: String,
    #[serde(rename = "home_rank")]
    pub home_seed: Option<u32>,
    /// Absolute in-game minute.
    pub time: f64,
    pub away_score: u32,
    pub home_score: u32,
    pub diff_score: i32,
    pub rank_diff: Option<u32>,
}

impl ScoringEvent {
    /// Builds an event for `meta` at `time`, orienting the differential from the
    /// higher-ranked team's side when both seeds are known.
    pub fn new(meta: &GameMeta, time: f64, away_score: u32, home_score: u32) -> Self {
        Self {
            game_id: meta.game_id.clone(),
            round_num: meta.round_num,
            away_team: meta.away_team.clone(),
            away_seed: meta.away_seed,
            home_team: meta.home_team.clone(),
            home_seed: meta.home_seed,
            time,
            away_score,
            home_score,
            diff_score: meta.differential(away_score, home_score),
            rank_diff: meta.rank_diff(),
        }
    }

    pub fn score(&self) -> (u32, u32) {
        (self.away_score, self.home_score)
    }
}

/// Identifying metadata parsed from a play-by-play page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameMeta {
    pub game_id: String,
    pub round_num: u32,
    pub away_team: String,
    pub home_team: String,
    pub away_seed: Option<u32>,
    pub home_seed: Option<u32>,
    /// Position in a best-of-seven series, `-1` when the page did not say.
    pub game_number: i32,
}

impl GameMeta {
    pub fn new(
        away_team: impl Into<String>,
        home_team: impl Into<String>,
        game_number: i32,
        round_num: u32,
    ) -> Self {
        let away_team = away_team.into();
        let home_team = home_team.into();
        Self {
            game_id: game_id(&away_team, &home_team, game_number),
            round_num,
            away_team,
            home_team,
            away_seed: None,
            home_seed: None,
            game_number,
        }
    }

    pub fn with_seeds(mut self, away_seed: Option<u32>, home_seed: Option<u32>) -> Self {
        self.away_seed = away_seed;
        self.home_seed = home_seed;
        self
    }

    pub fn rank_diff(&self) -> Option<u32> {
        match (self.away_seed, self.home_seed) {
            (Some(a), Some(h)) => Some(a.abs_diff(h)),
            _ => None,
        }
    }

    /// True when the home team holds the better (numerically lower) seed.
    pub fn home_higher_ranked(&self) -> bool {
        matches!((self.away_seed, self.home_seed), (Some(a), Some(h)) if h < a)
    }

    pub fn differential(&self, away_score: u32, home_score: u32) -> i32 {
        let away = away_score as i32;
        let home = home_score as i32;
        if self.home_higher_ranked() {
            home - away
        } else {
            away - home
        }
    }
}

pub fn game_id(away_team: &str, home_team: &str, game_number: i32) -> String {
    format!("{}-{}-{}", away_team, home_team, game_number)
}

/// The ordered scoring events of one game. Built once by the extractor and
/// read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct GameTimeline {
    meta: GameMeta,
    events: Vec<ScoringEvent>,
    warnings: Vec<String>,
}

impl GameTimeline {
    pub fn new(meta: GameMeta, events: Vec<ScoringEvent>) -> Self {
        Self {
            meta,
            events,
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }

    pub fn meta(&self) -> &GameMeta {
        &self.meta
    }

    pub fn events(&self) -> &[ScoringEvent] {
        &self.events
    }

    /// Non-fatal extraction problems, e.g. a missing game number.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn into_events(self) -> Vec<ScoringEvent> {
        self.events
    }
}

/// Differential scores of one game sampled on the shared time grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    pub game_id: String,
    pub round_num: u32,
    pub away_team: String,
    pub home_team: String,
    pub diffs: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterAssignment {
    pub game_id: String,
    pub round_num: u32,
    pub away: String,
    pub home: String,
    pub cluster: usize,
}

/// An event row joined with the cluster label of its game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusteredEvent {
    pub game_id: String,
    pub round_num: u32,
    pub away: String,
    pub away_rank: Option<u32>,
    pub home: String,
    pub home_rank: Option<u32>,
    pub time: f64,
    pub away_score: u32,
    pub home_score: u32,
    pub diff_score: i32,
    pub rank_diff: Option<u32>,
    pub cluster_num: usize,
}

impl ClusteredEvent {
    pub fn from_event(event: &ScoringEvent, cluster_num: usize) -> Self {
        let rank_diff = match (event.away_seed, event.home_seed) {
            (Some(a), Some(h)) => Some(a.abs_diff(h)),
            _ => event.rank_diff,
        };
        Self {
            game_id: event.game_id.clone(),
            round_num: event.round_num,
            away: event.away_team.clone(),
            away_rank: event.away_seed,
            home: event.home_team.clone(),
            home_rank: event.home_seed,
            time: event.time,
            away_score: event.away_score,
            home_score: event.home_score,
            diff_score: event.diff_score,
            rank_diff,
            cluster_num,
        }
    }
}
