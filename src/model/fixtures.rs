// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Roadgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Roadgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::grid::{Cell, Grid, Point};
use super::ids::LaneId;
use super::lane::{Lane, MultiLaneConfig, VehicleClass};

pub(crate) fn lid(value: &str) -> LaneId {
    LaneId::new(value).expect("lane id")
}

pub(crate) fn p(row: usize, column: usize) -> Point {
    Point::new(row, column)
}

/// 5x5 grid with a vertical wall in column 2 that leaves a gap at the bottom row.
///
/// ```text
/// . . # . .
/// . . # . .
/// . . # . .
/// . . # . .
/// . . . . .
/// ```
pub(crate) fn walled_grid() -> Grid {
    let mut grid = Grid::build(5, 5);
    grid.stamp_obstacles((0..4).map(|row| p(row, 2)));
    grid
}

/// 3x3 grid whose centre column is fully blocked.
pub(crate) fn split_grid() -> Grid {
    let mut grid = Grid::build(3, 3);
    grid.stamp_obstacles((0..3).map(|row| p(row, 1)));
    grid
}

/// Random grid with roughly `density` percent obstacles, deterministic per seed.
pub(crate) fn random_grid(seed: u64, rows: usize, columns: usize, density: u32) -> Grid {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut grid = Grid::build(rows, columns);
    for row in 0..rows {
        for column in 0..columns {
            if rng.gen_range(0..100) < density {
                grid.set(p(row, column), Cell::Obstacle);
            }
        }
    }
    grid
}

/// Two lanes on a 6x8 grid: `fast` owns rows 0..=2, `slow` owns rows 3..=5.
pub(crate) fn two_lane_config() -> MultiLaneConfig {
    MultiLaneConfig::new(vec![
        Lane::new(lid("fast"), 0..=2, VehicleClass::Fast)
            .with_start(p(1, 0))
            .with_end(p(1, 7)),
        Lane::new(lid("slow"), 3..=5, VehicleClass::Slow)
            .with_start(p(4, 0))
            .with_end(p(4, 7)),
    ])
}

/// Two lanes that share rows, so without negotiation their straight routes would overlap.
pub(crate) fn overlapping_lane_config() -> MultiLaneConfig {
    MultiLaneConfig::new(vec![
        Lane::new(lid("a"), 0..=3, VehicleClass::Fast)
            .with_start(p(1, 0))
            .with_end(p(1, 5)),
        Lane::new(lid("b"), 0..=3, VehicleClass::Slow)
            .with_start(p(0, 2))
            .with_end(p(3, 2)),
    ])
}
