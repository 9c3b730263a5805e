use once_cell::sync::Lazy;
use reqwest::Url;
use scraper::{Html, Selector};
use tracing::{debug, warn};

use crate::constants::PLAY_BY_PLAY_LABEL;
use crate::error::{Result, ScraperError};

static LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

/// Scoreboards spell the label with a non-breaking hyphen (U+2011).
fn is_play_by_play_label(label: &str) -> bool {
    label
        .replace('\u{2011}', "-")
        .to_lowercase()
        .contains(PLAY_BY_PLAY_LABEL)
}

/// Absolute URLs of every play-by-play link on a scoreboard page, in page
/// order with duplicates removed. Links that cannot be resolved are skipped.
pub fn extract_game_links(document: &str, base_url: &str) -> Result<Vec<String>> {
    let base = Url::parse(base_url).map_err(|e| ScraperError::Url {
        url: base_url.to_string(),
        message: e.to_string(),
    })?;
    let html = Html::parse_document(document);

    let mut links: Vec<String> = Vec::new();
    for anchor in html.select(&LINK_SELECTOR) {
        let label = anchor.text().collect::<String>();
        if !is_play_by_play_label(&label) {
            continue;
        }
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let url = match base.join(href.trim()) {
            Ok(url) => url.to_string(),
            Err(e) => {
                warn!(href = %href, error = %e, "Skipping unresolvable play-by-play link");
                continue;
            }
        };
        if !links.contains(&url) {
            links.push(url);
        }
    }

    debug!(count = links.len(), "found play-by-play links");
    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCOREBOARD: &str = r#"<html><body>
        <div class="game">
          <a href="/nba/boxscore?gameId=400553081">Box&nbsp;Score</a>
          <a href="/nba/playbyplay?gameId=400553081">Play‑By‑Play</a>
        </div>
        <div class="game">
          <a href="/nba/recap?gameId=400553082">Recap</a>
          <a href="http://scores.espn.go.com/nba/playbyplay?gameId=400553082">Play-by-Play</a>
          <a href="/nba/playbyplay?gameId=400553081">Play‑By‑Play</a>
        </div>
    </body></html>"#;

    #[test]
    fn test_extracts_and_resolves_play_by_play_links() {
        let links = extract_game_links(SCOREBOARD, "http://scores.espn.go.com").unwrap();
        assert_eq!(
            links,
            vec![
                "http://scores.espn.go.com/nba/playbyplay?gameId=400553081".to_string(),
                "http://scores.espn.go.com/nba/playbyplay?gameId=400553082".to_string(),
            ]
        );
    }

    #[test]
    fn test_no_links_on_empty_board() {
        let links = extract_game_links("<html><body><a href='/x'>Recap</a></body></html>", "http://scores.espn.go.com").unwrap();
        assert!(links.is_empty());
    }

    #[test]
    fn test_unresolvable_link_is_skipped() {
        let board = r#"<html><body>
            <a href="/nba/playbyplay?gameId=1">Play-By-Play</a>
            <a href="http://[bad">Play-By-Play</a>
        </body></html>"#;
        let links = extract_game_links(board, "http://scores.espn.go.com").unwrap();
        assert_eq!(links, vec!["http://scores.espn.go.com/nba/playbyplay?gameId=1".to_string()]);
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            extract_game_links(SCOREBOARD, "not a url"),
            Err(ScraperError::Url { .. })
        ));
    }
}
