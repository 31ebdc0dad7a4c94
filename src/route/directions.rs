// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Roadgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Roadgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use crate::error::AnnotateError;
use crate::model::{Dimensions, Direction, Point};

/// Path points grouped by travel direction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectionSegments {
    north: Vec<Point>,
    south: Vec<Point>,
    east: Vec<Point>,
    west: Vec<Point>,
}

impl DirectionSegments {
    pub fn points(&self, direction: Direction) -> &[Point] {
        match direction {
            Direction::North => &self.north,
            Direction::South => &self.south,
            Direction::East => &self.east,
            Direction::West => &self.west,
        }
    }

    fn push(&mut self, direction: Direction, point: Point) {
        match direction {
            Direction::North => self.north.push(point),
            Direction::South => self.south.push(point),
            Direction::East => self.east.push(point),
            Direction::West => self.west.push(point),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Direction, &[Point])> + '_ {
        Direction::ALL.into_iter().map(|direction| (direction, self.points(direction)))
    }

    pub fn len(&self) -> usize {
        self.north.len() + self.south.len() + self.east.len() + self.west.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Travel direction for every point of one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathDirections {
    dims: Dimensions,
    start_direction: Direction,
    steps: Vec<(Point, Direction)>,
    segments: DirectionSegments,
}

impl PathDirections {
    /// Direction the path enters the grid with.
    pub fn start_direction(&self) -> Direction {
        self.start_direction
    }

    pub fn segments(&self) -> &DirectionSegments {
        &self.segments
    }

    /// `(point, direction)` in path order.
    pub fn steps(&self) -> &[(Point, Direction)] {
        &self.steps
    }

    pub fn direction_at(&self, point: Point) -> Option<Direction> {
        self.steps
            .iter()
            .find(|(candidate, _)| *candidate == point)
            .map(|(_, direction)| *direction)
    }

    /// Grid-shaped view: each path cell holds its direction, every other cell `None`.
    pub fn direction_matrix(&self) -> Vec<Vec<Option<Direction>>> {
        let mut matrix = vec![vec![None; self.dims.columns()]; self.dims.rows()];
        for (point, direction) in &self.steps {
            matrix[point.row()][point.column()] = Some(*direction);
        }
        matrix
    }
}

/// Direction a path must start with when it begins at `start`.
///
/// Non-corner edge points point inward and ignore `declared`. Corners take `declared`,
/// else the step toward `next`.
fn start_direction(
    dims: Dimensions,
    start: Point,
    next: Option<Point>,
    declared: Option<Direction>,
) -> Result<Direction, AnnotateError> {
    if !dims.is_boundary(start) {
        return Err(AnnotateError::InvalidPathStart(start));
    }
    if dims.is_corner(start) {
        if let Some(direction) = declared {
            return Ok(direction);
        }
        let Some(next) = next else {
            return Err(AnnotateError::AmbiguousStartDirection(start));
        };
        return Direction::between(start, next)
            .ok_or(AnnotateError::DegenerateSegment { index: 0, from: start, to: next });
    }

    Ok(if start.row() == 0 {
        Direction::South
    } else if start.row() + 1 == dims.rows() {
        Direction::North
    } else if start.column() == 0 {
        Direction::East
    } else {
        Direction::West
    })
}

/// Assigns a travel direction to every point of `path`.
///
/// A point takes the direction of the step leaving it; the last point keeps the last
/// step's direction, and a single-point path uses the start direction.
pub fn annotate(
    path: &[Point],
    dims: Dimensions,
    declared: Option<Direction>,
) -> Result<PathDirections, AnnotateError> {
    let Some(&start) = path.first() else {
        return Err(AnnotateError::EmptyPath);
    };
    dims.checked_area()?;
    if let Some(outside) = path.iter().find(|point| !dims.contains(**point)) {
        return Err(AnnotateError::OutOfBounds(*outside));
    }
    let start_direction = start_direction(dims, start, path.get(1).copied(), declared)?;

    let mut steps = Vec::with_capacity(path.len());
    let mut segments = DirectionSegments::default();
    let mut current = start_direction;
    for (index, point) in path.iter().enumerate() {
        if let Some(next) = path.get(index + 1) {
            current = Direction::between(*point, *next)
                .ok_or(AnnotateError::DegenerateSegment { index, from: *point, to: *next })?;
        }
        steps.push((*point, current));
        segments.push(current, *point);
    }

    Ok(PathDirections { dims, start_direction, steps, segments })
}

/// Annotates several paths independently; one bad path does not fail the others.
pub fn annotate_all<'a, K: Ord>(
    paths: impl IntoIterator<Item = (K, &'a [Point])>,
    dims: Dimensions,
) -> BTreeMap<K, Result<PathDirections, AnnotateError>> {
    paths.into_iter().map(|(key, path)| (key, annotate(path, dims, None))).collect()
}
