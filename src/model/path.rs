// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Roadgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Roadgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashSet;

use super::grid::Point;

/// An ordered, non-empty walk of 4-adjacent points with no repeats.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
    points: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("path must contain at least one point")]
    Empty,
    #[error("points {from} and {to} at index {index} are not 4-adjacent")]
    NotAdjacent { index: usize, from: Point, to: Point },
    #[error("point {0} appears more than once")]
    Repeated(Point),
}

impl Path {
    pub fn new(points: Vec<Point>) -> Result<Self, PathError> {
        if points.is_empty() {
            return Err(PathError::Empty);
        }
        for (index, window) in points.windows(2).enumerate() {
            if window[0].manhattan(window[1]) != 1 {
                return Err(PathError::NotAdjacent { index, from: window[0], to: window[1] });
            }
        }
        let mut seen = HashSet::with_capacity(points.len());
        for point in &points {
            if !seen.insert(*point) {
                return Err(PathError::Repeated(*point));
            }
        }
        Ok(Self { points })
    }

    /// Wraps points produced by the solver, which already upholds the invariants.
    pub(crate) fn from_solver(points: Vec<Point>) -> Self {
        debug_assert!(Path::new(points.clone()).is_ok(), "solver produced an invalid path");
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; kept for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn start(&self) -> Point {
        self.points[0]
    }

    pub fn end(&self) -> Point {
        self.points[self.points.len() - 1]
    }

    /// Number of steps, i.e. `len() - 1`.
    pub fn steps(&self) -> usize {
        self.points.len() - 1
    }

    pub fn contains(&self, point: Point) -> bool {
        self.points.contains(&point)
    }

    /// True when the two paths share at least one cell.
    pub fn crosses(&self, other: &Path) -> bool {
        let (small, large) =
            if self.len() <= other.len() { (self, other) } else { (other, self) };
        let cells = large.points.iter().copied().collect::<HashSet<_>>();
        small.points.iter().any(|point| cells.contains(point))
    }
}

/// Result of a shortest-path search.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SearchOutcome {
    Found(Path),
    NotFound,
}

impl SearchOutcome {
    pub fn path(&self) -> Option<&Path> {
        match self {
            SearchOutcome::Found(path) => Some(path),
            SearchOutcome::NotFound => None,
        }
    }

    pub fn into_path(self) -> Option<Path> {
        match self {
            SearchOutcome::Found(path) => Some(path),
            SearchOutcome::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found(_))
    }
}

impl From<Option<Path>> for SearchOutcome {
    fn from(path: Option<Path>) -> Self {
        path.map_or(SearchOutcome::NotFound, SearchOutcome::Found)
    }
}
