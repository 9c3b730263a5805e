use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Fetch failed for {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Team '{team}' has no seed in the rank table (game {game_id})")]
    Lookup { team: String, game_id: String },

    #[error("Resampling error: {0}")]
    Resampling(String),

    #[error("Clustering error: {0}")]
    Clustering(String),

    #[error("Invalid URL '{url}': {message}")]
    Url { url: String, message: String },

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ScraperError {
    /// Errors confined to a single game page. The day aggregator logs these
    /// and drops the game instead of failing the whole day.
    pub fn is_game_recoverable(&self) -> bool {
        matches!(
            self,
            ScraperError::Http(_)
                | ScraperError::Fetch { .. }
                | ScraperError::Parse(_)
                | ScraperError::Lookup { .. }
                | ScraperError::Resampling(_)
                | ScraperError::Url { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ScraperError>;
