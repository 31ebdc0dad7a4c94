// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Roadgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Roadgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

use super::grid::Point;

/// Cardinal travel direction on the grid. North is toward row 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] =
        [Direction::North, Direction::South, Direction::East, Direction::West];

    /// `(d_row, d_column)` of one step in this direction.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::North => (-1, 0),
            Direction::South => (1, 0),
            Direction::East => (0, 1),
            Direction::West => (0, -1),
        }
    }

    /// Direction of a single 4-neighbour step, or `None` if the points are not adjacent.
    pub fn between(from: Point, to: Point) -> Option<Direction> {
        if from.manhattan(to) != 1 {
            return None;
        }
        Some(if to.row() > from.row() {
            Direction::South
        } else if to.row() < from.row() {
            Direction::North
        } else if to.column() > from.column() {
            Direction::East
        } else {
            Direction::West
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown direction {0:?} (expected north/south/east/west or up/down/left/right)")]
pub struct ParseDirectionError(String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "north" | "up" => Ok(Direction::North),
            "south" | "down" => Ok(Direction::South),
            "east" | "right" => Ok(Direction::East),
            "west" | "left" => Ok(Direction::West),
            _ => Err(ParseDirectionError(s.to_owned())),
        }
    }
}

/// Presentation key for what occupies a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum IconKey {
    #[default]
    Road,
    Pothole,
    Car,
    Bus,
    Building,
    Tree,
    City,
}

impl IconKey {
    pub fn as_str(self) -> &'static str {
        match self {
            IconKey::Road => "ROAD",
            IconKey::Pothole => "POTHOLE",
            IconKey::Car => "CAR",
            IconKey::Bus => "BUS",
            IconKey::Building => "BUILDING",
            IconKey::Tree => "TREE",
            IconKey::City => "CITY",
        }
    }

    /// Whether the icon has per-direction variants.
    pub fn is_directional(self) -> bool {
        matches!(self, IconKey::Road | IconKey::Car | IconKey::Bus)
    }
}

impl fmt::Display for IconKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown icon key {0:?}")]
pub struct ParseIconKeyError(String);

impl FromStr for IconKey {
    type Err = ParseIconKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ROAD" => Ok(IconKey::Road),
            "POTHOLE" => Ok(IconKey::Pothole),
            "CAR" => Ok(IconKey::Car),
            "BUS" => Ok(IconKey::Bus),
            "BUILDING" => Ok(IconKey::Building),
            "TREE" => Ok(IconKey::Tree),
            "CITY" => Ok(IconKey::City),
            _ => Err(ParseIconKeyError(s.to_owned())),
        }
    }
}

/// A set of cells sharing one icon, optionally facing a direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Obstacle {
    icon: IconKey,
    points: Vec<Point>,
    facing: Option<Direction>,
}

impl Obstacle {
    pub fn new(icon: IconKey, points: impl IntoIterator<Item = Point>) -> Self {
        Self { icon, points: points.into_iter().collect(), facing: None }
    }

    pub fn facing(mut self, direction: Direction) -> Self {
        self.facing = Some(direction);
        self
    }

    pub fn icon(&self) -> IconKey {
        self.icon
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn direction(&self) -> Option<Direction> {
        self.facing
    }
}
