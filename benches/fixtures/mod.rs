// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Roadgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Roadgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use roadgrid::model::{Cell, Grid, Lane, LaneId, MultiLaneConfig, Point, VehicleClass};

#[derive(Debug, Clone, Copy)]
pub enum Case {
    /// 16x16, no obstacles.
    OpenSmall,
    /// 64x64 serpentine: walls every 4th column with alternating gaps.
    Serpentine,
    /// 256x256 with roughly 9% scattered obstacles.
    ScatteredLarge,
}

pub struct RouteFixture {
    pub grid: Grid,
    pub start: Point,
    pub end: Point,
}

pub fn route(case: Case) -> RouteFixture {
    let grid = match case {
        Case::OpenSmall => Grid::build(16, 16),
        Case::Serpentine => serpentine(64, 64),
        Case::ScatteredLarge => scattered(256, 256, 11),
    };
    let end = Point::new(grid.rows() - 1, grid.columns() - 1);
    RouteFixture { grid, start: Point::new(0, 0), end }
}

fn serpentine(rows: usize, columns: usize) -> Grid {
    let mut grid = Grid::build(rows, columns);
    for (wall_idx, column) in (2..columns - 1).step_by(4).enumerate() {
        let gap = if wall_idx % 2 == 0 { rows - 1 } else { 0 };
        for row in (0..rows).filter(|row| *row != gap) {
            grid.set(Point::new(row, column), Cell::Obstacle);
        }
    }
    grid
}

fn scattered(rows: usize, columns: usize, modulus: usize) -> Grid {
    let mut grid = Grid::build(rows, columns);
    for row in 0..rows {
        for column in 0..columns {
            let corner = (row, column) == (0, 0) || (row, column) == (rows - 1, columns - 1);
            if !corner && (row * 7919 + column * 104_729) % modulus == 0 {
                grid.set(Point::new(row, column), Cell::Obstacle);
            }
        }
    }
    grid
}

/// `lanes` horizontal lanes of `band` rows across an open grid, each crossing it left to right.
pub fn lanes(lanes: usize, band: usize, columns: usize) -> (Grid, MultiLaneConfig) {
    let grid = Grid::build(lanes * band, columns);
    let config = MultiLaneConfig::new(
        (0..lanes)
            .map(|idx| {
                let top = idx * band;
                let vehicle = if idx % 2 == 0 { VehicleClass::Fast } else { VehicleClass::Slow };
                let lane_id = LaneId::new(format!("lane-{idx}")).expect("lane id");
                Lane::new(lane_id, top..=top + band - 1, vehicle)
                    .with_start(Point::new(top + band / 2, 0))
                    .with_end(Point::new(top + band / 2, columns - 1))
            })
            .collect(),
    );
    (grid, config)
}
