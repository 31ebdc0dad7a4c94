// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Roadgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Roadgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Concurrent per-lane routing with cross-lane obstacle negotiation.
//!
//! Every lane searches on its own copy of the base grid inside its own task. The
//! selected lane blocks all rows outside its range and always commits its result.
//! Every other lane blocks the selected lane's rows, folds paths other lanes have
//! already committed into its copy, and commits only if its candidate does not cross
//! a path committed in the meantime. On conflict it folds the newcomer, sleeps for
//! the poll interval and tries again until the attempt budget runs out.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::sync::{Arc, PoisonError, RwLock};

use smallvec::SmallVec;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::config::LanePolling;
use crate::error::RouteError;
use crate::model::{Grid, Lane, LaneId, MultiLaneConfig, Path, Point, SearchOutcome};
use crate::search::PathFinder;

/// Result of a multi-lane request, one entry per configured lane.
pub type LanePaths = BTreeMap<LaneId, SearchOutcome>;

/// Slot-per-lane publication point for committed paths.
///
/// A slot is written once, under the write lock, with a complete path; readers never
/// observe a partial path.
#[derive(Debug)]
struct LaneBoard {
    slots: RwLock<Vec<Option<Arc<Path>>>>,
}

impl LaneBoard {
    fn new(lanes: usize) -> Self {
        Self { slots: RwLock::new(vec![None; lanes]) }
    }

    /// Committed paths of lanes other than `lane_idx` that `folded` has not seen yet.
    fn unseen(&self, lane_idx: usize, folded: &[bool]) -> Vec<(usize, Arc<Path>)> {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        slots
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != lane_idx && !folded[*idx])
            .filter_map(|(idx, slot)| slot.as_ref().map(|path| (idx, Arc::clone(path))))
            .collect()
    }

    /// Publishes `path` for `lane_idx`.
    ///
    /// With `exclusive` set, the commit is refused if the path crosses any path another
    /// lane already committed; the crossing lanes are returned instead.
    fn commit(&self, lane_idx: usize, path: &Arc<Path>, exclusive: bool) -> Result<(), Vec<usize>> {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        if exclusive {
            let conflicts = slots
                .iter()
                .enumerate()
                .filter(|(idx, _)| *idx != lane_idx)
                .filter_map(|(idx, slot)| slot.as_ref().map(|other| (idx, other)))
                .filter(|(_, other)| other.crosses(path))
                .map(|(idx, _)| idx)
                .collect::<Vec<_>>();
            if !conflicts.is_empty() {
                return Err(conflicts);
            }
        }
        slots[lane_idx] = Some(Arc::clone(path));
        Ok(())
    }
}

/// Shortest path over every candidate pair; the first pair wins ties.
fn best_candidate(grid: &Grid, pairs: &[(Point, Point)]) -> SearchOutcome {
    let mut finder = PathFinder::new();
    let mut best: Option<Path> = None;
    for (start, end) in pairs {
        if let SearchOutcome::Found(path) = finder.find_path(grid, *start, *end) {
            if best.as_ref().map_or(true, |current| path.len() < current.len()) {
                best = Some(path);
            }
        }
    }
    best.into()
}

struct LaneTask {
    idx: usize,
    lane: Lane,
    selected: bool,
    selected_rows: Option<RangeInclusive<usize>>,
    lane_count: usize,
}

async fn run_lane(
    task: LaneTask,
    base: Arc<Grid>,
    board: Arc<LaneBoard>,
    polling: LanePolling,
) -> SearchOutcome {
    let LaneTask { idx, lane, selected, selected_rows, lane_count } = task;

    let mut grid = (*base).clone();
    if selected {
        grid.block_rows_outside(lane.rows());
    } else if let Some(rows) = selected_rows {
        grid.block_rows_within(rows);
    }
    let mut pairs = lane.candidate_pairs().collect::<SmallVec<[(Point, Point); 4]>>();
    let mut folded = vec![false; lane_count];

    for attempt in 1..=polling.max_attempts {
        if !selected {
            for (other, path) in board.unseen(idx, &folded) {
                grid.stamp_obstacles(path.points().iter().copied());
                folded[other] = true;
            }
        }

        let joined = tokio::task::spawn_blocking(move || {
            let outcome = best_candidate(&grid, &pairs);
            (grid, pairs, outcome)
        })
        .await;
        let (searched_grid, searched_pairs, outcome) = match joined {
            Ok(result) => result,
            Err(err) => {
                warn!(lane = %lane.id(), error = %err, "lane search task failed");
                return SearchOutcome::NotFound;
            }
        };
        grid = searched_grid;
        pairs = searched_pairs;

        // Folded obstacles only accumulate, so a miss now is a miss for every later attempt.
        let SearchOutcome::Found(path) = outcome else {
            debug!(lane = %lane.id(), attempt, "no route for lane");
            return SearchOutcome::NotFound;
        };

        let path = Arc::new(path);
        match board.commit(idx, &path, !selected) {
            Ok(()) => {
                debug!(lane = %lane.id(), attempt, len = path.len(), selected, "lane committed");
                let path = Arc::try_unwrap(path).unwrap_or_else(|shared| (*shared).clone());
                return SearchOutcome::Found(path);
            }
            Err(conflicts) => {
                debug!(
                    lane = %lane.id(),
                    attempt,
                    ?conflicts,
                    "lane path crossed a committed lane"
                );
                if attempt < polling.max_attempts {
                    tokio::time::sleep(polling.interval()).await;
                }
            }
        }
    }

    debug!(lane = %lane.id(), attempts = polling.max_attempts, "lane attempt budget exhausted");
    SearchOutcome::NotFound
}

/// Plans every lane of a [`MultiLaneConfig`] concurrently.
#[derive(Debug, Clone, Copy, Default)]
pub struct LaneCoordinator {
    polling: LanePolling,
}

impl LaneCoordinator {
    pub fn new(polling: LanePolling) -> Self {
        Self { polling }
    }

    pub fn polling(&self) -> LanePolling {
        self.polling
    }

    /// Runs one task per lane and waits for all of them.
    ///
    /// A lane that finds nothing maps to [`SearchOutcome::NotFound`]; only a malformed
    /// config fails the request. Must be called from within a tokio runtime.
    pub async fn plan(
        &self,
        base: &Grid,
        config: &MultiLaneConfig,
    ) -> Result<LanePaths, RouteError> {
        config.validate(base.rows())?;

        let lanes = config.lanes();
        let base = Arc::new(base.clone());
        let board = Arc::new(LaneBoard::new(lanes.len()));
        let selected_rows = config.selected_lane().map(Lane::rows);

        let mut tasks = JoinSet::new();
        for (idx, lane) in lanes.iter().enumerate() {
            let task = LaneTask {
                idx,
                lane: lane.clone(),
                selected: config.is_selected(lane),
                selected_rows: selected_rows.clone(),
                lane_count: lanes.len(),
            };
            let fut = run_lane(task, Arc::clone(&base), Arc::clone(&board), self.polling);
            tasks.spawn(async move { (idx, fut.await) });
        }

        let mut outcomes = vec![SearchOutcome::NotFound; lanes.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((idx, outcome)) => outcomes[idx] = outcome,
                Err(err) => warn!(error = %err, "lane task failed"),
            }
        }

        Ok(lanes.iter().map(|lane| lane.id().clone()).zip(outcomes).collect())
    }
}

/// The base grid with every lane's path drawn in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaneMatrix {
    grid: Grid,
    selected_path: Option<Path>,
    other_paths: BTreeMap<LaneId, Path>,
}

impl LaneMatrix {
    /// Non-selected paths as `Obstacle`, the selected path as `PathMarker(2 + i)`.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn selected_path(&self) -> Option<&Path> {
        self.selected_path.as_ref()
    }

    pub fn other_paths(&self) -> &BTreeMap<LaneId, Path> {
        &self.other_paths
    }
}

/// Composes the presentation matrix for a finished multi-lane plan.
pub fn compose_lane_matrix(base: &Grid, config: &MultiLaneConfig, paths: &LanePaths) -> LaneMatrix {
    let mut grid = base.clone();
    let mut selected_path = None;
    let mut other_paths = BTreeMap::new();

    for (lane_id, outcome) in paths {
        let Some(path) = outcome.path() else {
            continue;
        };
        if config.selected() == Some(lane_id) {
            selected_path = Some(path.clone());
        } else {
            grid.stamp_obstacles(path.points().iter().copied());
            other_paths.insert(lane_id.clone(), path.clone());
        }
    }
    if let Some(path) = &selected_path {
        grid.mark_path(path);
    }

    LaneMatrix { grid, selected_path, other_paths }
}
