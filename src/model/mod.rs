// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Roadgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Roadgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Grid model: cells, points, obstacles, lanes and paths.
//!
//! Points are `(row, column)` everywhere; row 0 is the top (north) edge.

#[cfg(test)]
pub(crate) mod fixtures;
pub mod grid;
pub mod ids;
pub mod lane;
pub mod obstacle;
pub mod path;

pub use grid::{Cell, Dimensions, Grid, GridError, Point, MAX_CELLS};
pub use ids::{Id, IdError, LaneId};
pub use lane::{Lane, LaneConfigError, MultiLaneConfig, ParseVehicleClassError, VehicleClass};
pub use obstacle::{Direction, IconKey, Obstacle, ParseDirectionError, ParseIconKeyError};
pub use path::{Path, PathError, SearchOutcome};
