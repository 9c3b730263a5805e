use std::collections::HashMap;

use serde::Deserialize;

use crate::error::{Result, ScraperError};

/// Team name to tournament seed. Read-only once loaded from config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct RankTable {
    seeds: HashMap<String, u32>,
}

impl RankTable {
    pub fn new(seeds: HashMap<String, u32>) -> Self {
        Self { seeds }
    }

    /// An empty table means ranks are not tracked at all.
    pub fn is_enabled(&self) -> bool {
        !self.seeds.is_empty()
    }

    pub fn seed_for(&self, team: &str) -> Option<u32> {
        self.seeds.get(team).copied()
    }

    /// Seed for `team`, or `None` when ranks are disabled. A team missing from
    /// an enabled table is an error for the game being extracted.
    pub fn lookup(&self, team: &str, game_id: &str) -> Result<Option<u32>> {
        if !self.is_enabled() {
            return Ok(None);
        }
        self.seed_for(team)
            .map(Some)
            .ok_or_else(|| ScraperError::Lookup {
                team: team.to_string(),
                game_id: game_id.to_string(),
            })
    }
}

impl FromIterator<(String, u32)> for RankTable {
    fn from_iter<I: IntoIterator<Item = (String, u32)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_table_yields_no_seed() {
        let table = RankTable::default();
        assert_eq!(table.lookup("Heat", "Heat-Nets-1").unwrap(), None);
    }

    #[test]
    fn test_missing_team_is_lookup_error() {
        let table: RankTable = [("Heat".to_string(), 2)].into_iter().collect();
        assert_eq!(table.lookup("Heat", "g").unwrap(), Some(2));
        match table.lookup("Nets", "Heat-Nets-1") {
            Err(ScraperError::Lookup { team, game_id }) => {
                assert_eq!(team, "Nets");
                assert_eq!(game_id, "Heat-Nets-1");
            }
            other => panic!("expected lookup error, got {:?}", other),
        }
    }
}
