/// Origin that relative play-by-play links are resolved against.
pub const DEFAULT_BASE_URL: &str = "http://scores.espn.go.com";

/// Scoreboard page; the day is selected with a `date=YYYYMMDD` parameter.
pub const DEFAULT_SCOREBOARD_URL: &str = "http://scores.espn.go.com/nba/scoreboard";

pub const DEFAULT_USER_AGENT: &str = "pbp_scraper/0.1";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 20;

/// Visible label of the per-game event-log link on a scoreboard.
pub const PLAY_BY_PLAY_LABEL: &str = "play-by-play";

// Row patterns. Whole trimmed column text must match.
pub const SCORE_PATTERN: &str = r"^(\d+)-(\d+)$";
pub const CLOCK_PATTERN: &str = r"^(\d+):(\d+)$";
pub const GAME_NUMBER_PATTERN: &str = r"Game ([0-7]) of 7";
/// Marks the end of a quarter (NBA) or half (NCAA).
pub const END_OF_PERIOD_MARKER: &str = "End of";

/// Written in place of the series game number when the page has none.
pub const UNKNOWN_GAME_NUMBER: i32 = -1;

pub const DEFAULT_STEP_MINUTES: f64 = 0.25;
/// 0 to 48.75 minutes in quarter-minute steps.
pub const DEFAULT_CHECKPOINTS: usize = 196;

pub const DEFAULT_CLUSTERS: usize = 4;
pub const DEFAULT_MAX_ITERATIONS: u64 = 300;
pub const DEFAULT_TOLERANCE: f64 = 1e-4;
