//! Grouping of games by the shape of their score-differential trajectories.

use std::collections::HashMap;

use linfa::prelude::*;
use linfa_clustering::KMeans;
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::config::ClusterConfig;
use crate::error::{Result, ScraperError};
use crate::types::{ClusterAssignment, ClusteredEvent, ScoringEvent, Trajectory};

/// Clusters equal-length trajectories into `k` groups with randomized
/// centroid initialization.
pub fn cluster(trajectories: &[Vec<f64>], k: usize) -> Result<Vec<usize>> {
    cluster_with(
        trajectories,
        &ClusterConfig {
            k,
            ..ClusterConfig::default()
        },
    )
}

/// K-means on the raw differential vectors. Labels are aligned with the input
/// order and lie in `0..params.k`.
pub fn cluster_with(trajectories: &[Vec<f64>], params: &ClusterConfig) -> Result<Vec<usize>> {
    let n = trajectories.len();
    let Some(first) = trajectories.first() else {
        return Err(ScraperError::Clustering("no trajectories to cluster".into()));
    };
    let dims = first.len();
    if dims == 0 {
        return Err(ScraperError::Clustering("trajectories are empty".into()));
    }
    if let Some((i, t)) = trajectories.iter().enumerate().find(|(_, t)| t.len() != dims) {
        return Err(ScraperError::Clustering(format!(
            "trajectory {} has {} points, expected {}",
            i,
            t.len(),
            dims
        )));
    }
    if params.k == 0 || params.k > n {
        return Err(ScraperError::Clustering(format!(
            "k must be between 1 and {} (got {})",
            n, params.k
        )));
    }

    let data: Vec<f64> = trajectories.iter().flatten().copied().collect();
    let records = Array2::from_shape_vec((n, dims), data)
        .map_err(|e| ScraperError::Clustering(format!("Failed to create matrix: {}", e)))?;
    let dataset = DatasetBase::new(records, Array1::from_elem(n, ()));

    let rng = match params.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let model = KMeans::params_with_rng(params.k, rng)
        .max_n_iterations(params.max_iterations)
        .tolerance(params.tolerance)
        .fit(&dataset)
        .map_err(|e| ScraperError::Clustering(format!("K-means clustering failed: {}", e)))?;

    let predictions = model.predict(&dataset);
    let labels: Vec<usize> = predictions.iter().cloned().collect();
    debug!(games = n, dims, k = params.k, "clustered trajectories");
    Ok(labels)
}

/// One trajectory per game, keyed by `(round_num, game_id)` in first-seen
/// order. Rows missing a team name are ignored.
pub fn build_trajectories(events: &[ScoringEvent]) -> Vec<Trajectory> {
    let mut index: HashMap<(u32, &str), usize> = HashMap::new();
    let mut trajectories: Vec<Trajectory> = Vec::new();

    for event in events {
        if event.away_team.is_empty() || event.home_team.is_empty() {
            continue;
        }
        let slot = *index
            .entry((event.round_num, event.game_id.as_str()))
            .or_insert_with(|| {
                trajectories.push(Trajectory {
                    game_id: event.game_id.clone(),
                    round_num: event.round_num,
                    away_team: event.away_team.clone(),
                    home_team: event.home_team.clone(),
                    diffs: Vec::new(),
                });
                trajectories.len() - 1
            });
        trajectories[slot].diffs.push(event.diff_score as f64);
    }
    trajectories
}

pub fn assign_clusters(trajectories: &[Trajectory], params: &ClusterConfig) -> Result<Vec<ClusterAssignment>> {
    let series: Vec<Vec<f64>> = trajectories.iter().map(|t| t.diffs.clone()).collect();
    let labels = cluster_with(&series, params)?;
    info!(games = trajectories.len(), k = params.k, "Assigned clusters");

    Ok(trajectories
        .iter()
        .zip(labels)
        .map(|(t, cluster)| ClusterAssignment {
            game_id: t.game_id.clone(),
            round_num: t.round_num,
            away: t.away_team.clone(),
            home: t.home_team.clone(),
            cluster,
        })
        .collect())
}

/// Attaches each game's label to its events. Events of unclustered games and
/// rows missing a team name are dropped, as in `build_trajectories`.
pub fn join_clusters(events: &[ScoringEvent], assignments: &[ClusterAssignment]) -> Vec<ClusteredEvent> {
    let labels: HashMap<(u32, &str), usize> = assignments
        .iter()
        .map(|a| ((a.round_num, a.game_id.as_str()), a.cluster))
        .collect();

    events
        .iter()
        .filter(|e| !e.away_team.is_empty() && !e.home_team.is_empty())
        .filter_map(|e| {
            labels
                .get(&(e.round_num, e.game_id.as_str()))
                .map(|&cluster| ClusteredEvent::from_event(e, cluster))
        })
        .collect()
}
