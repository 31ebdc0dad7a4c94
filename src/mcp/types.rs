// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Roadgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Roadgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `[row, column]`.
pub type McpPoint = [usize; 2];

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct McpObstacle {
    /// `ROAD`, `POTHOLE`, `CAR`, `BUS`, `BUILDING`, `TREE`, or `CITY`.
    pub icon: String,
    pub points: Vec<McpPoint>,
    /// `north`/`south`/`east`/`west`; only kept for directional icons.
    #[serde(default)]
    pub facing: Option<String>,
}

/// Either `matrix` (0 = open, 1 = obstacle, n >= 2 = path marker) or `rows` + `columns`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct McpGrid {
    #[serde(default)]
    pub rows: Option<usize>,
    #[serde(default)]
    pub columns: Option<usize>,
    #[serde(default)]
    pub matrix: Option<Vec<Vec<u32>>>,
    #[serde(default)]
    pub obstacles: Vec<McpObstacle>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct RoutePlanParams {
    pub grid: McpGrid,
    /// Defaults to `[0, 0]`.
    #[serde(default)]
    pub start: Option<McpPoint>,
    /// Defaults to the bottom-right cell.
    #[serde(default)]
    pub end: Option<McpPoint>,
    #[serde(default)]
    pub pothole_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RoutePlanResponse {
    /// `found` or `not_found`.
    pub status: String,
    pub grid: Vec<Vec<u32>>,
    pub path: Vec<McpPoint>,
    pub potholes: Vec<McpPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct McpLane {
    pub lane_id: String,
    pub start_row: usize,
    pub end_row: usize,
    /// `fast` or `slow`.
    pub vehicle: String,
    pub start_points: Vec<McpPoint>,
    pub end_points: Vec<McpPoint>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct RoutePlanMultiLaneParams {
    pub grid: McpGrid,
    pub lanes: Vec<McpLane>,
    #[serde(default)]
    pub selected_lane: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct McpLanePath {
    /// `found` or `not_found`.
    pub status: String,
    pub path: Vec<McpPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RoutePlanMultiLaneResponse {
    pub lanes: BTreeMap<String, McpLanePath>,
    /// Base grid with other lanes' paths as obstacles and the selected path as markers.
    pub matrix: Vec<Vec<u32>>,
    pub selected_lane: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct RouteAnnotateDirectionsParams {
    pub path: Vec<McpPoint>,
    pub rows: usize,
    pub columns: usize,
    #[serde(default)]
    pub start_direction: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RouteAnnotateDirectionsResponse {
    pub start_direction: String,
    pub north: Vec<McpPoint>,
    pub south: Vec<McpPoint>,
    pub east: Vec<McpPoint>,
    pub west: Vec<McpPoint>,
    /// Per-cell direction, `null` off the path.
    pub matrix: Vec<Vec<Option<String>>>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct RouteEstimateMovesParams {
    pub path: Vec<McpPoint>,
    #[serde(default)]
    pub potholes: Vec<McpPoint>,
    #[serde(default)]
    pub pickups: Vec<McpPoint>,
    /// Move budget; omitted means unlimited.
    #[serde(default)]
    pub max_moves: Option<usize>,
    #[serde(default)]
    pub moves_used: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct McpMoveEstimate {
    pub path_length: usize,
    pub estimated_moves: usize,
    pub efficiency: f64,
    pub navigation_moves: usize,
    pub pothole_repairs: usize,
    pub pickups: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RouteEstimateMovesResponse {
    pub estimate: McpMoveEstimate,
    pub viable: bool,
    pub moves_remaining: Option<usize>,
    pub recommendation: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct RouteRecommendParams {
    pub paths: BTreeMap<String, Vec<McpPoint>>,
    #[serde(default)]
    pub potholes: Vec<McpPoint>,
    #[serde(default)]
    pub pickups: Vec<McpPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RouteRecommendResponse {
    pub recommended: Option<String>,
    pub analysis: BTreeMap<String, McpMoveEstimate>,
    pub strategy: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GridIconsParams {
    pub rows: usize,
    pub columns: usize,
    #[serde(default)]
    pub obstacles: Vec<McpObstacle>,
    /// Orients road cells along this path when given.
    #[serde(default)]
    pub path: Option<Vec<McpPoint>>,
    #[serde(default)]
    pub start_direction: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GridIconsResponse {
    /// Icon name per cell, e.g. `ROAD`, `CAR_NORTH`.
    pub icons: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct McpCacheStats {
    pub size: usize,
    pub max_entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    pub hit_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheStatsResponse {
    pub routes: McpCacheStats,
    pub lanes: McpCacheStats,
    pub icons: McpCacheStats,
    pub computations: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheClearResponse {
    pub cleared: bool,
}
