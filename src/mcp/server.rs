// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Roadgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Roadgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::{Json, Parameters};
use rmcp::model::{ServerCapabilities, ServerInfo};
use rmcp::{tool, tool_handler, tool_router, ErrorData, ServerHandler, ServiceExt};

use crate::cache::CacheStats;
use crate::engine::{GridSpec, RoutingEngine};
use crate::error::{AnnotateError, RouteError};
use crate::model::{
    Cell, Dimensions, Direction, GridError, IconKey, Lane, LaneId, MultiLaneConfig, Obstacle,
    Point, SearchOutcome, VehicleClass,
};
use crate::route::{viability, MoveEstimate, RoutePlan};

use super::types::*;

#[derive(Clone)]
pub struct RoadgridMcp {
    engine: Arc<RoutingEngine>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl RoadgridMcp {
    pub fn new(engine: Arc<RoutingEngine>) -> Self {
        Self { engine, tool_router: Self::tool_router() }
    }

    pub fn engine(&self) -> &Arc<RoutingEngine> {
        &self.engine
    }

    pub async fn serve_stdio(self) -> Result<(), rmcp::RmcpError> {
        let service = self.serve((tokio::io::stdin(), tokio::io::stdout())).await?;
        service.waiting().await?;
        Ok(())
    }

    /// Plan the shortest route between two cells and scatter potholes along it; returns the
    /// grid with path cells cleared and potholes blocked (`status: not_found` when unreachable).
    #[tool(name = "route.plan")]
    async fn route_plan(
        &self,
        params: Parameters<RoutePlanParams>,
    ) -> Result<Json<RoutePlanResponse>, ErrorData> {
        let RoutePlanParams { grid, start, end, pothole_count } = params.0;
        let spec = grid_spec(grid)?;

        let plan = self
            .engine
            .plan_route(&spec, start.map(Point::from), end.map(Point::from), pothole_count)
            .map_err(map_route_error)?;

        let response = match &plan {
            RoutePlan::Found(result) => RoutePlanResponse {
                status: STATUS_FOUND.to_owned(),
                grid: cells_to_wire(&result.grid().to_matrix()),
                path: points_to_wire(result.path().points()),
                potholes: points_to_wire(result.potholes()),
            },
            RoutePlan::NotFound { grid } => RoutePlanResponse {
                status: STATUS_NOT_FOUND.to_owned(),
                grid: cells_to_wire(&grid.to_matrix()),
                path: Vec::new(),
                potholes: Vec::new(),
            },
        };
        Ok(Json(response))
    }

    /// Plan one route per lane concurrently; the selected lane keeps its rows exclusive and
    /// other lanes never share a cell. A lane without a route reports `not_found`.
    #[tool(name = "route.plan_multi_lane")]
    async fn route_plan_multi_lane(
        &self,
        params: Parameters<RoutePlanMultiLaneParams>,
    ) -> Result<Json<RoutePlanMultiLaneResponse>, ErrorData> {
        let RoutePlanMultiLaneParams { grid, lanes, selected_lane } = params.0;
        let spec = grid_spec(grid)?;
        let config = lane_config(lanes, selected_lane)?;

        let plan = self.engine.plan_multi_lane(&spec, &config).await.map_err(map_route_error)?;

        let lanes = plan
            .paths
            .iter()
            .map(|(lane_id, outcome)| (lane_id.as_str().to_owned(), lane_path_to_wire(outcome)))
            .collect::<BTreeMap<_, _>>();

        Ok(Json(RoutePlanMultiLaneResponse {
            lanes,
            matrix: cells_to_wire(&plan.matrix.grid().to_matrix()),
            selected_lane: config.selected().map(|lane_id| lane_id.as_str().to_owned()),
        }))
    }

    /// Split a path into per-direction buckets and report the start direction; use before
    /// `grid.icons` to orient road tiles.
    #[tool(name = "route.annotate_directions")]
    async fn route_annotate_directions(
        &self,
        params: Parameters<RouteAnnotateDirectionsParams>,
    ) -> Result<Json<RouteAnnotateDirectionsResponse>, ErrorData> {
        let RouteAnnotateDirectionsParams { path, rows, columns, start_direction } = params.0;
        let declared = parse_direction(start_direction.as_deref())?;
        let path = points_from_wire(&path);

        let directions = self
            .engine
            .annotate_directions(&path, Dimensions::new(rows, columns), declared)
            .map_err(map_annotate_error)?;

        let segments = directions.segments();
        let matrix = directions
            .direction_matrix()
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|direction| direction.map(|direction| direction.as_str().to_owned()))
                    .collect()
            })
            .collect();

        Ok(Json(RouteAnnotateDirectionsResponse {
            start_direction: directions.start_direction().as_str().to_owned(),
            north: points_to_wire(segments.points(Direction::North)),
            south: points_to_wire(segments.points(Direction::South)),
            east: points_to_wire(segments.points(Direction::East)),
            west: points_to_wire(segments.points(Direction::West)),
            matrix,
        }))
    }

    /// Estimate the moves a path costs (navigation, pothole repairs, pickups) and check it
    /// against an optional move budget.
    #[tool(name = "route.estimate_moves")]
    async fn route_estimate_moves(
        &self,
        params: Parameters<RouteEstimateMovesParams>,
    ) -> Result<Json<RouteEstimateMovesResponse>, ErrorData> {
        let RouteEstimateMovesParams { path, potholes, pickups, max_moves, moves_used } = params.0;

        let estimate = self.engine.estimate_moves(
            &points_from_wire(&path),
            &points_from_wire(&potholes),
            &points_from_wire(&pickups),
        );
        let report = viability(&estimate, max_moves, moves_used);

        Ok(Json(RouteEstimateMovesResponse {
            estimate: estimate_to_wire(&estimate),
            viable: report.viable,
            moves_remaining: report.moves_remaining,
            recommendation: report.recommendation,
        }))
    }

    /// Compare candidate paths by move efficiency and recommend the best one.
    #[tool(name = "route.recommend")]
    async fn route_recommend(
        &self,
        params: Parameters<RouteRecommendParams>,
    ) -> Result<Json<RouteRecommendResponse>, ErrorData> {
        let RouteRecommendParams { paths, potholes, pickups } = params.0;
        let candidates = paths
            .into_iter()
            .map(|(key, path)| (key, points_from_wire(&path)))
            .collect::<BTreeMap<_, _>>();

        let recommendation = self.engine.recommend_route(
            &candidates,
            &points_from_wire(&potholes),
            &points_from_wire(&pickups),
        );

        Ok(Json(RouteRecommendResponse {
            recommended: recommendation.recommended,
            analysis: recommendation
                .analysis
                .iter()
                .map(|(key, estimate)| (key.clone(), estimate_to_wire(estimate)))
                .collect(),
            strategy: recommendation.strategy,
        }))
    }

    /// Icon name for every cell (default `ROAD`); pass `path` to orient road cells along it.
    #[tool(name = "grid.icons")]
    async fn grid_icons(
        &self,
        params: Parameters<GridIconsParams>,
    ) -> Result<Json<GridIconsResponse>, ErrorData> {
        let GridIconsParams { rows, columns, obstacles, path, start_direction } = params.0;
        let dims = Dimensions::new(rows, columns);
        let obstacles = obstacles_from_wire(obstacles)?;

        let icons = match path {
            Some(path) => {
                let declared = parse_direction(start_direction.as_deref())?;
                self.engine
                    .oriented_icons(dims, &obstacles, &points_from_wire(&path), declared)
                    .map_err(map_annotate_error)?
                    .to_names()
            }
            None => self
                .engine
                .icons_for_obstacles(dims, &obstacles)
                .map_err(map_grid_error)?
                .to_names(),
        };
        Ok(Json(GridIconsResponse { icons }))
    }

    /// Hit/miss/eviction counters for the route, lane, and icon caches.
    #[tool(name = "cache.stats")]
    async fn cache_stats(&self) -> Result<Json<CacheStatsResponse>, ErrorData> {
        let stats = self.engine.cache_stats();
        Ok(Json(CacheStatsResponse {
            routes: cache_stats_to_wire(&stats.routes),
            lanes: cache_stats_to_wire(&stats.lanes),
            icons: cache_stats_to_wire(&stats.icons),
            computations: self.engine.computations(),
        }))
    }

    /// Drop every cached result; the next request recomputes.
    #[tool(name = "cache.clear")]
    async fn cache_clear(&self) -> Result<Json<CacheClearResponse>, ErrorData> {
        self.engine.clear_caches();
        Ok(Json(CacheClearResponse { cleared: true }))
    }
}

#[tool_handler]
impl ServerHandler for RoadgridMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Roadgrid routing server (tools: route.plan, route.plan_multi_lane, route.annotate_directions, route.estimate_moves, route.recommend, grid.icons, cache.stats, cache.clear). Points are [row, column]."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

// Wire conversion and error mapping for the tool handlers.
include!("server/helpers.rs");

#[cfg(test)]
mod tests;
