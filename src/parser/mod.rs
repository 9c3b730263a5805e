//! Page parsers: scoreboard link discovery and play-by-play extraction.

pub mod links;
pub mod play_by_play;

pub use links::extract_game_links;
pub use play_by_play::{extract, scan_rows, RowEvent};
