// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Roadgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Roadgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Route planning on top of the solver: single routes with potholes, concurrent
//! multi-lane negotiation, and the presentation data derived from paths.

pub mod directions;
pub mod icons;
pub mod moves;
pub mod multi_lane;
pub mod planner;

pub use directions::{annotate, annotate_all, DirectionSegments, PathDirections};
pub use icons::{icon_key, icons_for_obstacles, orient_along, IconMatrix, OrientedIcon};
pub use moves::{
    estimate, recommend_route, viability, MoveBreakdown, MoveEstimate, RouteRecommendation,
    Viability,
};
pub use multi_lane::{compose_lane_matrix, LaneCoordinator, LaneMatrix, LanePaths};
pub use planner::{plan_route, route_key, scatter_potholes, RoutePlan, RoutePlanner, RouteResult};
