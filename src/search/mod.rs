// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Roadgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Roadgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! 4-directional shortest-path search (A* with a Manhattan heuristic).

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::error::EndpointError;
use crate::model::{Dimensions, Grid, Path, Point, SearchOutcome};

const NO_PARENT: usize = usize::MAX;

/// Checks that `start` and `end` are inside `grid` and walkable.
pub fn check_endpoints(grid: &Grid, start: Point, end: Point) -> Result<(), EndpointError> {
    for point in [start, end] {
        if !grid.contains(point) {
            return Err(EndpointError::OutOfBounds(point));
        }
        if !grid.is_walkable(point) {
            return Err(EndpointError::Blocked(point));
        }
    }
    Ok(())
}

/// One-shot search; allocates fresh scratch buffers.
pub fn find_path(grid: &Grid, start: Point, goal: Point) -> SearchOutcome {
    PathFinder::default().find_path(grid, start, goal)
}

/// Reusable A* solver.
///
/// Buffers are sized to the last grid searched and invalidated by bumping a generation
/// counter, so repeated searches over same-sized grids do not reallocate.
#[derive(Debug, Default)]
pub struct PathFinder {
    dims: Option<Dimensions>,
    dist_gen: Vec<u32>,
    dist_cost: Vec<usize>,
    came_from: Vec<usize>,
    heap: BinaryHeap<Reverse<(usize, usize, usize, usize)>>,
    gen: u32,
    expanded: usize,
}

impl PathFinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cells popped from the open set during the last search.
    pub fn last_expanded(&self) -> usize {
        self.expanded
    }

    /// Finds a shortest path from `start` to `goal`.
    ///
    /// Endpoints that are out of range or blocked yield `NotFound`; callers that need to
    /// tell those apart from "no route" run [`check_endpoints`] first.
    pub fn find_path(&mut self, grid: &Grid, start: Point, goal: Point) -> SearchOutcome {
        self.expanded = 0;
        if check_endpoints(grid, start, goal).is_err() {
            return SearchOutcome::NotFound;
        }
        if start == goal {
            return SearchOutcome::Found(Path::from_solver(vec![start]));
        }

        let dims = grid.dimensions();
        self.configure(dims);
        let gen = self.begin();
        let cells = grid.cells();

        let (Some(start_idx), Some(goal_idx)) = (dims.idx_of(start), dims.idx_of(goal)) else {
            return SearchOutcome::NotFound;
        };

        let mut tie_seq = 0usize;
        self.set_dist(start_idx, gen, 0, NO_PARENT);
        let h0 = start.manhattan(goal);
        self.heap.push(Reverse((h0, h0, tie_seq, start_idx)));

        // Equal f-costs pop the entry closest to the goal first.
        while let Some(Reverse((f_cost, h_cost, _tie, idx))) = self.heap.pop() {
            let g_cost = f_cost - h_cost;
            if g_cost > self.dist(idx, gen) {
                continue;
            }
            self.expanded += 1;
            if idx == goal_idx {
                return SearchOutcome::Found(self.reconstruct(dims, start_idx, goal_idx));
            }

            let current = dims.point_of(idx);
            for (d_row, d_column) in neighbor_deltas_towards(current, goal) {
                let Some(next) = current.offset(d_row, d_column) else {
                    continue;
                };
                let Some(next_idx) = dims.idx_of(next) else {
                    continue;
                };
                if !cells[next_idx].is_walkable() {
                    continue;
                }
                let next_cost = g_cost + 1;
                if next_cost < self.dist(next_idx, gen) {
                    self.set_dist(next_idx, gen, next_cost, idx);
                    tie_seq += 1;
                    let h_cost = next.manhattan(goal);
                    self.heap.push(Reverse((next_cost + h_cost, h_cost, tie_seq, next_idx)));
                }
            }
        }

        SearchOutcome::NotFound
    }

    fn configure(&mut self, dims: Dimensions) {
        if self.dims == Some(dims) {
            return;
        }
        let len = dims.area();
        self.dims = Some(dims);
        self.dist_gen = vec![0; len];
        self.dist_cost = vec![0; len];
        self.came_from = vec![NO_PARENT; len];
        self.heap.reserve(len.min(4096).saturating_sub(self.heap.len()));
    }

    fn begin(&mut self) -> u32 {
        self.gen = self.gen.wrapping_add(1);
        if self.gen == 0 {
            self.dist_gen.fill(0);
            self.gen = 1;
        }
        self.heap.clear();
        self.gen
    }

    fn dist(&self, idx: usize, gen: u32) -> usize {
        if self.dist_gen[idx] == gen {
            self.dist_cost[idx]
        } else {
            usize::MAX
        }
    }

    fn set_dist(&mut self, idx: usize, gen: u32, cost: usize, came_from: usize) {
        self.dist_gen[idx] = gen;
        self.dist_cost[idx] = cost;
        self.came_from[idx] = came_from;
    }

    fn reconstruct(&self, dims: Dimensions, start_idx: usize, goal_idx: usize) -> Path {
        let mut points = vec![dims.point_of(goal_idx)];
        let mut cursor = goal_idx;
        while cursor != start_idx {
            cursor = self.came_from[cursor];
            points.push(dims.point_of(cursor));
        }
        points.reverse();
        Path::from_solver(points)
    }
}

/// Neighbour order: steps that close the gap to `goal` first, then vertical detours,
/// then horizontal ones. Keeps results deterministic for a given grid.
fn neighbor_deltas_towards(current: Point, goal: Point) -> [(isize, isize); 4] {
    let primary_row = match goal.row().cmp(&current.row()) {
        std::cmp::Ordering::Greater => Some((1, 0)),
        std::cmp::Ordering::Less => Some((-1, 0)),
        std::cmp::Ordering::Equal => None,
    };
    let primary_column = match goal.column().cmp(&current.column()) {
        std::cmp::Ordering::Greater => Some((0, 1)),
        std::cmp::Ordering::Less => Some((0, -1)),
        std::cmp::Ordering::Equal => None,
    };

    let mut out = [(0, 0); 4];
    let mut idx = 0usize;
    for delta in [primary_column, primary_row].into_iter().flatten() {
        out[idx] = delta;
        idx += 1;
    }
    for delta in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
        if primary_row == Some(delta) || primary_column == Some(delta) {
            continue;
        }
        out[idx] = delta;
        idx += 1;
    }

    debug_assert_eq!(idx, 4);
    out
}
