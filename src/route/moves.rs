// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Roadgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Roadgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use rayon::prelude::*;

use crate::model::Point;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveBreakdown {
    pub navigation_moves: usize,
    pub pothole_repairs: usize,
    pub pickups: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MoveEstimate {
    pub path_length: usize,
    pub estimated_moves: usize,
    /// `manhattan(start, end) / estimated_moves`, capped at 1.
    pub efficiency: f64,
    pub breakdown: MoveBreakdown,
}

impl MoveEstimate {
    /// `true` when the estimate fits `budget`; `None` means unlimited.
    pub fn viable_for(&self, budget: Option<usize>) -> bool {
        budget.map_or(true, |moves| self.estimated_moves <= moves)
    }
}

fn count_on_path(path: &HashSet<Point>, points: &[Point]) -> usize {
    points.iter().collect::<HashSet<_>>().into_iter().filter(|point| path.contains(*point)).count()
}

/// Moves needed to drive `path`, repairing every pothole and serving every pickup on it.
///
/// Potholes and pickups off the path are ignored, and duplicates count once.
pub fn estimate(path: &[Point], potholes: &[Point], pickups: &[Point]) -> MoveEstimate {
    let (Some(start), Some(end)) = (path.first(), path.last()) else {
        return MoveEstimate::default();
    };

    let cells = path.iter().copied().collect::<HashSet<_>>();
    let breakdown = MoveBreakdown {
        navigation_moves: path.len() - 1,
        pothole_repairs: count_on_path(&cells, potholes),
        pickups: count_on_path(&cells, pickups),
    };
    let estimated_moves =
        breakdown.navigation_moves + breakdown.pothole_repairs + breakdown.pickups;

    let minimum = start.manhattan(*end);
    let efficiency = if estimated_moves == 0 {
        1.0
    } else {
        (minimum as f64 / estimated_moves as f64).min(1.0)
    };

    MoveEstimate { path_length: path.len(), estimated_moves, efficiency, breakdown }
}

/// Budget check with a player-facing recommendation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viability {
    pub viable: bool,
    /// `None` for an unlimited budget.
    pub moves_remaining: Option<usize>,
    pub recommendation: String,
}

pub fn viability(
    estimate: &MoveEstimate,
    max_moves: Option<usize>,
    moves_used: usize,
) -> Viability {
    let Some(max_moves) = max_moves else {
        return Viability {
            viable: true,
            moves_remaining: None,
            recommendation: "Unlimited moves available".to_owned(),
        };
    };

    let remaining = max_moves.saturating_sub(moves_used);
    let viable = estimate.viable_for(Some(remaining));
    let recommendation = if viable {
        format!(
            "Path viable. {} moves remaining after completion.",
            remaining - estimate.estimated_moves
        )
    } else {
        format!(
            "Path requires {} more moves than available. Consider alternative route.",
            estimate.estimated_moves - remaining
        )
    };
    Viability { viable, moves_remaining: Some(remaining), recommendation }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteRecommendation<K> {
    pub recommended: Option<K>,
    pub analysis: BTreeMap<K, MoveEstimate>,
    pub strategy: String,
}

/// Estimates every candidate in parallel and recommends the most efficient one.
///
/// Ties go to the smallest key. A candidate needs efficiency above zero to be
/// recommended, so empty paths never are.
pub fn recommend_route<K>(
    candidates: &BTreeMap<K, Vec<Point>>,
    potholes: &[Point],
    pickups: &[Point],
) -> RouteRecommendation<K>
where
    K: Ord + Clone + Send + Sync + fmt::Display,
{
    let analysis = candidates
        .par_iter()
        .map(|(key, path)| (key.clone(), estimate(path, potholes, pickups)))
        .collect::<BTreeMap<_, _>>();

    let mut recommended: Option<(&K, &MoveEstimate)> = None;
    for (key, estimate) in &analysis {
        let best = recommended.map_or(0.0, |(_, best)| best.efficiency);
        if estimate.efficiency > best {
            recommended = Some((key, estimate));
        }
    }

    let strategy = match recommended {
        Some((key, best)) => format!(
            "Recommended path: {key}. Estimated {} moves ({} navigation, {} pothole repairs, {} pickups). Efficiency: {:.1}%",
            best.estimated_moves,
            best.breakdown.navigation_moves,
            best.breakdown.pothole_repairs,
            best.breakdown.pickups,
            best.efficiency * 100.0
        ),
        None => "No viable paths found.".to_owned(),
    };
    let recommended = recommended.map(|(key, _)| key.clone());

    RouteRecommendation { recommended, analysis, strategy }
}
