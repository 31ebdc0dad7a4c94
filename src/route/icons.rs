// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Roadgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Roadgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use tracing::warn;

use super::directions::PathDirections;
use crate::cache::{CacheKey, Fingerprint};
use crate::model::{Dimensions, Direction, GridError, IconKey, Obstacle, Point};

/// Icon for one cell, with a facing for directional icons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct OrientedIcon {
    icon: IconKey,
    facing: Option<Direction>,
}

impl OrientedIcon {
    /// Non-directional icons drop `facing`.
    pub fn new(icon: IconKey, facing: Option<Direction>) -> Self {
        Self { icon, facing: facing.filter(|_| icon.is_directional()) }
    }

    pub fn icon(&self) -> IconKey {
        self.icon
    }

    pub fn facing(&self) -> Option<Direction> {
        self.facing
    }
}

/// Renders as `ROAD`, `CAR_NORTH`, `POTHOLE`, ...
impl fmt::Display for OrientedIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.icon.as_str())?;
        if let Some(facing) = self.facing {
            f.write_str("_")?;
            for ch in facing.as_str().chars() {
                write!(f, "{}", ch.to_ascii_uppercase())?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconMatrix {
    dims: Dimensions,
    cells: Vec<OrientedIcon>,
}

impl IconMatrix {
    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    pub fn get(&self, point: Point) -> Option<OrientedIcon> {
        self.dims.idx_of(point).map(|idx| self.cells[idx])
    }

    pub fn rows(&self) -> impl Iterator<Item = &[OrientedIcon]> + '_ {
        self.cells.chunks(self.dims.columns().max(1))
    }

    /// Cell names row by row, as consumed by the renderer.
    pub fn to_names(&self) -> Vec<Vec<String>> {
        if self.dims.columns() == 0 {
            return vec![Vec::new(); self.dims.rows()];
        }
        self.rows().map(|row| row.iter().map(ToString::to_string).collect()).collect()
    }
}

/// Road everywhere, then each obstacle's icon on its cells. Later obstacles win.
pub fn icons_for_obstacles(
    dims: Dimensions,
    obstacles: &[Obstacle],
) -> Result<IconMatrix, GridError> {
    let mut cells = vec![OrientedIcon::default(); dims.checked_area()?];
    for obstacle in obstacles {
        let icon = OrientedIcon::new(obstacle.icon(), obstacle.direction());
        for point in obstacle.points() {
            match dims.idx_of(*point) {
                Some(idx) => cells[idx] = icon,
                None => warn!(%point, icon = %obstacle.icon(), "icon outside grid ignored"),
            }
        }
    }
    Ok(IconMatrix { dims, cells })
}

/// Gives plain road cells on an annotated path the path's travel direction.
pub fn orient_along(matrix: &mut IconMatrix, directions: &PathDirections) {
    for (point, direction) in directions.steps() {
        let Some(idx) = matrix.dims.idx_of(*point) else {
            continue;
        };
        let cell = &mut matrix.cells[idx];
        if cell.icon == IconKey::Road && cell.facing.is_none() {
            cell.facing = Some(*direction);
        }
    }
}

/// Obstacle order is part of the key: overlapping obstacles resolve by order.
pub fn icon_key(dims: Dimensions, obstacles: &[Obstacle]) -> CacheKey {
    let mut fp = Fingerprint::new("icons");
    fp.number("rows", dims.rows() as u64).number("columns", dims.columns() as u64);
    for obstacle in obstacles {
        fp.text("icon", obstacle.icon().as_str())
            .optional_text("facing", obstacle.direction().map(Direction::as_str))
            .point_seq("points", obstacle.points().iter().copied());
    }
    fp.finish()
}
