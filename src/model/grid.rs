// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Roadgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Roadgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::ops::RangeInclusive;

use tracing::warn;

use super::path::Path;

/// A cell coordinate. The first component is always the row, the second the column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    row: usize,
    column: usize,
}

impl Point {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn manhattan(&self, other: Point) -> usize {
        self.row.abs_diff(other.row) + self.column.abs_diff(other.column)
    }

    /// Applies a signed step, returning `None` when it would leave the non-negative quadrant.
    pub fn offset(self, d_row: isize, d_column: isize) -> Option<Self> {
        Some(Self {
            row: self.row.checked_add_signed(d_row)?,
            column: self.column.checked_add_signed(d_column)?,
        })
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

impl From<(usize, usize)> for Point {
    fn from((row, column): (usize, usize)) -> Self {
        Self::new(row, column)
    }
}

impl From<[usize; 2]> for Point {
    fn from([row, column]: [usize; 2]) -> Self {
        Self::new(row, column)
    }
}

/// State of a single grid cell.
///
/// The numeric encoding matches the wire matrix: `0` open, `1` obstacle, `n >= 2` path marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Open,
    Obstacle,
    PathMarker(u32),
}

impl Cell {
    pub fn is_walkable(self) -> bool {
        !matches!(self, Cell::Obstacle)
    }
}

impl From<u32> for Cell {
    fn from(value: u32) -> Self {
        match value {
            0 => Cell::Open,
            1 => Cell::Obstacle,
            n => Cell::PathMarker(n),
        }
    }
}

impl From<Cell> for u32 {
    fn from(cell: Cell) -> Self {
        match cell {
            Cell::Open => 0,
            Cell::Obstacle => 1,
            Cell::PathMarker(n) => n.max(2),
        }
    }
}

/// Largest cell count a grid or cell matrix may have.
pub const MAX_CELLS: usize = 1 << 24;

/// Row and column counts of a grid, without any cell state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    rows: usize,
    columns: usize,
}

impl Dimensions {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self { rows, columns }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn area(&self) -> usize {
        self.rows.saturating_mul(self.columns)
    }

    /// Cell count, or [`GridError::TooLarge`] above [`MAX_CELLS`].
    pub fn checked_area(&self) -> Result<usize, GridError> {
        self.rows.checked_mul(self.columns).filter(|area| *area <= MAX_CELLS).ok_or(
            GridError::TooLarge { rows: self.rows, columns: self.columns, max_cells: MAX_CELLS },
        )
    }

    pub fn contains(&self, point: Point) -> bool {
        point.row < self.rows && point.column < self.columns
    }

    /// True for points on row 0, the last row, column 0, or the last column.
    pub fn is_boundary(&self, point: Point) -> bool {
        self.contains(point) && (self.on_horizontal_edge(point) || self.on_vertical_edge(point))
    }

    /// True when two boundary conditions hold at once.
    pub fn is_corner(&self, point: Point) -> bool {
        self.contains(point) && self.on_horizontal_edge(point) && self.on_vertical_edge(point)
    }

    fn on_horizontal_edge(&self, point: Point) -> bool {
        point.row == 0 || point.row + 1 == self.rows
    }

    fn on_vertical_edge(&self, point: Point) -> bool {
        point.column == 0 || point.column + 1 == self.columns
    }

    pub(crate) fn idx_of(&self, point: Point) -> Option<usize> {
        if !self.contains(point) {
            return None;
        }
        point.row.checked_mul(self.columns)?.checked_add(point.column)
    }

    pub(crate) fn point_of(&self, idx: usize) -> Point {
        Point::new(idx / self.columns, idx % self.columns)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged { row: usize, expected: usize, found: usize },
    #[error("grid of {rows}x{columns} exceeds the limit of {max_cells} cells")]
    TooLarge { rows: usize, columns: usize, max_cells: usize },
}

/// Rectangular, row-major matrix of cell states.
///
/// Dimensions are fixed at construction; every row holds exactly `columns` cells.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    dims: Dimensions,
    cells: Vec<Cell>,
}

impl Grid {
    /// All-open grid of the given size. Sizes from outside the crate go through
    /// [`Grid::try_build`].
    pub fn build(rows: usize, columns: usize) -> Self {
        let dims = Dimensions::new(rows, columns);
        Self { dims, cells: vec![Cell::Open; dims.area()] }
    }

    /// All-open grid, refusing sizes above [`MAX_CELLS`].
    pub fn try_build(rows: usize, columns: usize) -> Result<Self, GridError> {
        let dims = Dimensions::new(rows, columns);
        let area = dims.checked_area()?;
        Ok(Self { dims, cells: vec![Cell::Open; area] })
    }

    /// Adopts a caller-provided matrix; the first row fixes the column count.
    pub fn from_matrix(matrix: Vec<Vec<Cell>>) -> Result<Self, GridError> {
        let rows = matrix.len();
        let columns = matrix.first().map_or(0, Vec::len);
        let mut cells = Vec::with_capacity(rows.saturating_mul(columns));
        for (row, cells_in_row) in matrix.into_iter().enumerate() {
            if cells_in_row.len() != columns {
                return Err(GridError::Ragged { row, expected: columns, found: cells_in_row.len() });
            }
            cells.extend(cells_in_row);
        }
        Ok(Self { dims: Dimensions::new(rows, columns), cells })
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    pub fn rows(&self) -> usize {
        self.dims.rows
    }

    pub fn columns(&self) -> usize {
        self.dims.columns
    }

    pub fn contains(&self, point: Point) -> bool {
        self.dims.contains(point)
    }

    pub fn get(&self, point: Point) -> Option<Cell> {
        self.dims.idx_of(point).map(|idx| self.cells[idx])
    }

    /// Writes one cell; returns `false` (and writes nothing) when the point is out of range.
    pub fn set(&mut self, point: Point, cell: Cell) -> bool {
        match self.dims.idx_of(point) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    pub fn is_walkable(&self, point: Point) -> bool {
        self.get(point).is_some_and(Cell::is_walkable)
    }

    /// Marks every listed point as an obstacle. Out-of-range points are skipped.
    ///
    /// Returns how many points were stamped.
    pub fn stamp_obstacles(&mut self, points: impl IntoIterator<Item = Point>) -> usize {
        let mut stamped = 0usize;
        for point in points {
            if self.set(point, Cell::Obstacle) {
                stamped += 1;
            } else {
                let (rows, columns) = (self.rows(), self.columns());
                warn!(%point, rows, columns, "obstacle outside grid ignored");
            }
        }
        stamped
    }

    /// Turns every row outside `rows` into obstacles.
    pub fn block_rows_outside(&mut self, rows: RangeInclusive<usize>) {
        for row in 0..self.rows() {
            if !rows.contains(&row) {
                self.fill_row(row, Cell::Obstacle);
            }
        }
    }

    /// Turns every row inside `rows` (clamped to the grid) into obstacles.
    pub fn block_rows_within(&mut self, rows: RangeInclusive<usize>) {
        for row in rows {
            if row >= self.rows() {
                break;
            }
            self.fill_row(row, Cell::Obstacle);
        }
    }

    fn fill_row(&mut self, row: usize, cell: Cell) {
        let columns = self.columns();
        let start = row * columns;
        self.cells[start..start + columns].fill(cell);
    }

    /// Stamps `PathMarker(2 + i)` onto the i-th point of `path`.
    pub fn mark_path(&mut self, path: &Path) {
        for (idx, point) in path.points().iter().enumerate() {
            let marker = u32::try_from(idx).map_or(u32::MAX, |idx| idx.saturating_add(2));
            self.set(*point, Cell::PathMarker(marker));
        }
    }

    /// Obstacle cells in row-major order.
    pub fn obstacle_points(&self) -> impl Iterator<Item = Point> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| matches!(cell, Cell::Obstacle))
            .map(|(idx, _)| self.dims.point_of(idx))
    }

    fn row_cells(&self, row: usize) -> &[Cell] {
        let columns = self.columns();
        &self.cells[row * columns..(row + 1) * columns]
    }

    pub fn to_matrix(&self) -> Vec<Vec<Cell>> {
        (0..self.rows()).map(|row| self.row_cells(row).to_vec()).collect()
    }

    pub(crate) fn cells(&self) -> &[Cell] {
        &self.cells
    }
}
