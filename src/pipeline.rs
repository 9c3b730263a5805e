use crate::app::ports::{PageSource, QueryParams};
use crate::config::Config;
use crate::error::Result;
use crate::parser::{extract, extract_game_links};
use crate::resample::resample;
use crate::schedule::RoundSchedule;
use crate::seeds::RankTable;
use crate::types::ScoringEvent;
use chrono::NaiveDate;
use metrics::{counter, histogram};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// A game that was dropped from a day's output.
#[derive(Debug, Clone, Serialize)]
pub struct GameFailure {
    pub url: String,
    pub error: String,
}

/// Events of every game on one scoreboard.
#[derive(Debug, Default)]
pub struct DayResult {
    pub round_num: u32,
    pub events: Vec<ScoringEvent>,
    pub games_processed: usize,
    pub failures: Vec<GameFailure>,
}

/// Fans one scoreboard out to its games and concatenates their events.
pub struct DayAggregator {
    source: Arc<dyn PageSource>,
    ranks: Arc<RankTable>,
    base_url: String,
    query_times: Option<Vec<f64>>,
}

impl DayAggregator {
    pub fn new(source: Arc<dyn PageSource>, ranks: Arc<RankTable>, base_url: impl Into<String>) -> Self {
        Self {
            source,
            ranks,
            base_url: base_url.into(),
            query_times: None,
        }
    }

    /// Resample every game onto `query_times` instead of emitting raw events.
    pub fn with_query_times(mut self, query_times: Vec<f64>) -> Self {
        self.query_times = Some(query_times);
        self
    }

    pub fn from_config(config: &Config, source: Arc<dyn PageSource>) -> Self {
        if !config.seeds.is_enabled() {
            info!("Rank table is empty; ranks disabled and diff_score is away minus home");
        }
        let aggregator = Self::new(source, Arc::new(config.seeds.clone()), config.source.base_url.clone());
        if config.resample.enabled {
            aggregator.with_query_times(config.resample.times())
        } else {
            aggregator
        }
    }

    /// Fetches one play-by-play page and returns its (optionally resampled) events.
    #[instrument(skip(self))]
    pub async fn process_game(&self, url: &str, round_num: u32) -> Result<Vec<ScoringEvent>> {
        info!("Working on {}", url);
        let document = self.source.fetch(url, &[]).await?;
        let timeline = extract(&document, round_num, &self.ranks)?;
        match &self.query_times {
            Some(times) => resample(&timeline, times),
            None => Ok(timeline.into_events()),
        }
    }

    /// Processes every game linked from a scoreboard. A failing game is logged
    /// and left out; only an unreachable or unreadable scoreboard fails the day.
    #[instrument(skip(self, params), fields(round = round_num))]
    pub async fn process_day(
        &self,
        scoreboard_url: &str,
        params: &QueryParams,
        round_num: u32,
    ) -> Result<DayResult> {
        let board = self.source.fetch(scoreboard_url, params).await?;
        let links = extract_game_links(&board, &self.base_url)?;
        info!(games = links.len(), "Found games on scoreboard");

        let mut result = DayResult {
            round_num,
            ..Default::default()
        };
        for url in links {
            match self.process_game(&url, round_num).await {
                Ok(events) => {
                    counter!("pbp_games_processed_total").increment(1);
                    counter!("pbp_events_emitted_total").increment(events.len() as u64);
                    result.games_processed += 1;
                    result.events.extend(events);
                }
                Err(e) if e.is_game_recoverable() => {
                    counter!("pbp_games_failed_total").increment(1);
                    error!(url = %url, error = %e, "Skipping game");
                    result.failures.push(GameFailure {
                        url,
                        error: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }
        Ok(result)
    }
}

/// Result of a run over a date range.
#[derive(Debug, Default, Serialize)]
pub struct PipelineResult {
    pub days_processed: usize,
    pub days_skipped: usize,
    pub games_processed: usize,
    pub games_failed: usize,
    #[serde(skip)]
    pub events: Vec<ScoringEvent>,
    pub errors: Vec<String>,
}

pub struct Pipeline;

impl Pipeline {
    /// Runs every scheduled day in `start..=end`. A failed day is recorded in
    /// `errors` and the run moves on. Events come out ordered by round, then
    /// by fetch order.
    #[instrument(skip(aggregator, schedule))]
    pub async fn run_range(
        aggregator: &DayAggregator,
        scoreboard_url: &str,
        schedule: &RoundSchedule,
        start: NaiveDate,
        end: NaiveDate,
    ) -> PipelineResult {
        let mut result = PipelineResult::default();

        for date in start.iter_days().take_while(|d| *d <= end) {
            let Some(round_num) = schedule.round_for(date) else {
                debug!(%date, "No round scheduled");
                result.days_skipped += 1;
                continue;
            };

            let params = vec![("date".to_string(), date.format("%Y%m%d").to_string())];
            let t_day = std::time::Instant::now();
            match aggregator.process_day(scoreboard_url, &params, round_num).await {
                Ok(day) => {
                    info!(
                        %date,
                        round = round_num,
                        games = day.games_processed,
                        failed = day.failures.len(),
                        events = day.events.len(),
                        "Day finished"
                    );
                    result.days_processed += 1;
                    result.games_processed += day.games_processed;
                    result.games_failed += day.failures.len();
                    result.errors.extend(
                        day.failures
                            .into_iter()
                            .map(|f| format!("{}: {}", f.url, f.error)),
                    );
                    result.events.extend(day.events);
                }
                Err(e) => {
                    warn!(%date, error = %e, "Day failed");
                    result.errors.push(format!("{}: {}", date, e));
                }
            }
            histogram!("pbp_day_duration_seconds").record(t_day.elapsed().as_secs_f64());
        }

        result.events.sort_by_key(|e| e.round_num);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScraperError;
    use crate::infra::StaticSource;

    const BASE: &str = "http://scores.espn.go.com";
    const BOARD: &str = "http://scores.espn.go.com/nba/scoreboard";

    fn game_page(away: &str, home: &str, n: u32) -> String {
        format!(
            r#"<html><body>
            <table class="linescore"><tr><td><a>{away}</a></td></tr><tr><td><a>{home}</a></td></tr></table>
            <p>Game {n} of 7</p>
            <table>
              <tr><td>11:00</td><td>layup</td><td>2-0</td></tr>
              <tr><td>6:00</td><td>three</td><td>2-3</td></tr>
            </table></body></html>"#
        )
    }

    fn board(ids: &[u32]) -> String {
        let links: String = ids
            .iter()
            .map(|id| format!(r#"<a href="/nba/playbyplay?gameId={id}">Play‑By‑Play</a>"#))
            .collect();
        format!("<html><body>{links}</body></html>")
    }

    fn source() -> StaticSource {
        StaticSource::new()
            .with_page(format!("{BOARD}?date=20140419"), board(&[1, 2]))
            .with_page(format!("{BOARD}?date=20140420"), board(&[3]))
            .with_page(format!("{BASE}/nba/playbyplay?gameId=1"), game_page("Hawks", "Pacers", 1))
            .with_page(format!("{BASE}/nba/playbyplay?gameId=2"), game_page("Grizzlies", "Thunder", 1))
            .with_page(format!("{BASE}/nba/playbyplay?gameId=3"), game_page("Mavericks", "Spurs", 1))
    }

    fn params(date: &str) -> Vec<(String, String)> {
        vec![("date".to_string(), date.to_string())]
    }

    #[tokio::test]
    async fn test_process_day_concatenates_games() {
        let agg = DayAggregator::new(Arc::new(source()), Arc::new(RankTable::default()), BASE);
        let day = agg.process_day(BOARD, &params("20140419"), 1).await.unwrap();
        assert_eq!(day.games_processed, 2);
        assert!(day.failures.is_empty());
        assert_eq!(day.events.len(), 4);
        assert_eq!(day.events[0].game_id, "Hawks-Pacers-1");
        assert_eq!(day.events[3].game_id, "Grizzlies-Thunder-1");
        assert!(day.events.iter().all(|e| e.round_num == 1));
    }

    #[tokio::test]
    async fn test_unmapped_team_only_drops_that_game() {
        let ranks: RankTable = [("Hawks", 8), ("Pacers", 1), ("Grizzlies", 7)]
            .into_iter()
            .map(|(t, s)| (t.to_string(), s))
            .collect();
        let agg = DayAggregator::new(Arc::new(source()), Arc::new(ranks), BASE);
        let day = agg.process_day(BOARD, &params("20140419"), 1).await.unwrap();
        assert_eq!(day.games_processed, 1);
        assert_eq!(day.failures.len(), 1);
        assert!(day.failures[0].url.ends_with("gameId=2"));
        assert!(day.failures[0].error.contains("Thunder"));
        assert!(day.events.iter().all(|e| e.game_id == "Hawks-Pacers-1"));
        // Pacers hold the better seed, so the differential is theirs.
        assert_eq!(day.events[1].diff_score, 1);
    }

    #[tokio::test]
    async fn test_missing_game_page_is_isolated() {
        let source = source().with_page(format!("{BOARD}?date=20140421"), board(&[3, 99]));
        let agg = DayAggregator::new(Arc::new(source), Arc::new(RankTable::default()), BASE);
        let day = agg.process_day(BOARD, &params("20140421"), 1).await.unwrap();
        assert_eq!(day.games_processed, 1);
        assert_eq!(day.failures.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_seeds_table_disables_ranks() {
        let mut config = Config::default();
        config.source.base_url = BASE.to_string();
        config.resample.enabled = false;
        assert!(!config.seeds.is_enabled());

        let agg = DayAggregator::from_config(&config, Arc::new(source()));
        let events = agg
            .process_game(&format!("{BASE}/nba/playbyplay?gameId=1"), 1)
            .await
            .unwrap();
        let diffs: Vec<i32> = events.iter().map(|e| e.diff_score).collect();
        assert_eq!(diffs, vec![2, -1]);
        assert!(events.iter().all(|e| e.rank_diff.is_none() && e.away_seed.is_none()));
    }

    #[tokio::test]
    async fn test_unresolvable_link_does_not_fail_day() {
        let board = r#"<html><body>
            <a href="/nba/playbyplay?gameId=1">Play-By-Play</a>
            <a href="http://[bad">Play-By-Play</a>
        </body></html>"#;
        let source = source().with_page(format!("{BOARD}?date=20140422"), board);
        let agg = DayAggregator::new(Arc::new(source), Arc::new(RankTable::default()), BASE);
        let day = agg.process_day(BOARD, &params("20140422"), 1).await.unwrap();
        assert_eq!(day.games_processed, 1);
        assert!(day.failures.is_empty());
        assert!(day.events.iter().all(|e| e.game_id == "Hawks-Pacers-1"));
    }

    #[tokio::test]
    async fn test_unreachable_scoreboard_fails_day() {
        let agg = DayAggregator::new(Arc::new(source()), Arc::new(RankTable::default()), BASE);
        let err = agg.process_day(BOARD, &params("20140101"), 1).await.unwrap_err();
        assert!(matches!(err, ScraperError::Fetch { .. }));
    }

    #[tokio::test]
    async fn test_resampled_day_has_grid_length_per_game() {
        let agg = DayAggregator::new(Arc::new(source()), Arc::new(RankTable::default()), BASE)
            .with_query_times(vec![0.0, 1.0, 6.0, 12.0]);
        let day = agg.process_day(BOARD, &params("20140419"), 1).await.unwrap();
        assert_eq!(day.events.len(), 8);
        let diffs: Vec<i32> = day.events[..4].iter().map(|e| e.diff_score).collect();
        assert_eq!(diffs, vec![2, 2, -1, -1]);
    }

    #[tokio::test]
    async fn test_run_range_skips_unscheduled_and_failed_days() {
        use crate::schedule::RoundWindow;
        let d = |day| NaiveDate::from_ymd_opt(2014, 4, day).unwrap();
        let schedule = RoundSchedule::new(vec![
            RoundWindow { start: d(19), end: d(19), round: 1 },
            RoundWindow { start: d(20), end: d(21), round: 2 },
        ]);
        let agg = DayAggregator::new(Arc::new(source()), Arc::new(RankTable::default()), BASE);
        let result = Pipeline::run_range(&agg, BOARD, &schedule, d(18), d(21)).await;

        assert_eq!(result.days_skipped, 1);
        assert_eq!(result.days_processed, 2);
        assert_eq!(result.games_processed, 3);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].starts_with("2014-04-21"));
        let rounds: Vec<u32> = result.events.iter().map(|e| e.round_num).collect();
        assert_eq!(rounds, vec![1, 1, 1, 1, 2, 2]);
    }
}
