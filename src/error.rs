// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Roadgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Roadgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Error types shared across the routing engine.
//!
//! "No route" is never an error here: searches report [`crate::model::SearchOutcome::NotFound`]
//! and the planner reports [`crate::route::RoutePlan::NotFound`].

use std::path::PathBuf;

use crate::model::{GridError, LaneConfigError, Point};

/// Why a start or end point cannot be handed to the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EndpointError {
    #[error("point {0} is outside the grid")]
    OutOfBounds(Point),
    #[error("point {0} is blocked by an obstacle")]
    Blocked(Point),
}

impl EndpointError {
    pub fn point(&self) -> Point {
        match self {
            EndpointError::OutOfBounds(point) | EndpointError::Blocked(point) => *point,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("invalid endpoints: {0}")]
    InvalidEndpoints(#[from] EndpointError),
    #[error("invalid lane configuration: {0}")]
    InvalidLaneConfig(#[from] LaneConfigError),
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Preconditions violated while inferring per-point travel directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AnnotateError {
    #[error("path is empty")]
    EmptyPath,
    #[error("path starts at {0}, which is not on the grid boundary")]
    InvalidPathStart(Point),
    #[error("path starts at corner {0} and no start direction can be inferred")]
    AmbiguousStartDirection(Point),
    #[error("segment {index} from {from} to {to} is not a single orthogonal step")]
    DegenerateSegment { index: usize, from: Point, to: Point },
    #[error("point {0} is outside the grid")]
    OutOfBounds(Point),
    #[error(transparent)]
    Grid(#[from] GridError),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}
