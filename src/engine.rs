// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Roadgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Roadgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The routing engine façade: builds grids from requests and routes every operation
//! through the right cache.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, info};

use crate::cache::{CacheKey, CacheStats, CacheSweeper, Fingerprint, ResultCache, Sweep};
use crate::config::EngineConfig;
use crate::error::{AnnotateError, RouteError};
use crate::model::{
    Cell, Dimensions, Direction, Grid, GridError, MultiLaneConfig, Obstacle, Point,
};
use crate::route::planner::fingerprint_grid;
use crate::route::{
    annotate, compose_lane_matrix, estimate, icon_key, icons_for_obstacles, orient_along,
    recommend_route, IconMatrix, LaneCoordinator, LaneMatrix, LanePaths, MoveEstimate,
    PathDirections, RoutePlan, RoutePlanner, RouteRecommendation,
};

/// Where a request's grid comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridSource {
    /// All-open grid of this size.
    Dimensions(Dimensions),
    /// Caller-provided cells.
    Matrix(Vec<Vec<Cell>>),
}

/// A grid description plus the obstacles to stamp onto it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridSpec {
    source: GridSource,
    obstacles: Vec<Obstacle>,
}

impl GridSpec {
    pub fn dimensions(rows: usize, columns: usize) -> Self {
        let source = GridSource::Dimensions(Dimensions::new(rows, columns));
        Self { source, obstacles: Vec::new() }
    }

    pub fn matrix(matrix: Vec<Vec<Cell>>) -> Self {
        Self { source: GridSource::Matrix(matrix), obstacles: Vec::new() }
    }

    #[must_use]
    pub fn with_obstacles(mut self, obstacles: Vec<Obstacle>) -> Self {
        self.obstacles = obstacles;
        self
    }

    pub fn source(&self) -> &GridSource {
        &self.source
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Materializes the grid. Obstacles outside it are skipped.
    pub fn build(&self) -> Result<Grid, GridError> {
        let mut grid = match &self.source {
            GridSource::Dimensions(dims) => Grid::try_build(dims.rows(), dims.columns())?,
            GridSource::Matrix(matrix) => Grid::from_matrix(matrix.clone())?,
        };
        let points = self.obstacles.iter().flat_map(|obstacle| obstacle.points().iter().copied());
        grid.stamp_obstacles(points);
        Ok(grid)
    }
}

/// The three caches an engine routes through.
#[derive(Debug, Clone)]
pub struct EngineCaches {
    pub routes: Arc<ResultCache<RoutePlan>>,
    pub lanes: Arc<ResultCache<Arc<LanePaths>>>,
    pub icons: Arc<ResultCache<Arc<IconMatrix>>>,
}

impl EngineCaches {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            routes: Arc::new(ResultCache::new(
                "routes",
                config.route_cache.max_entries,
                config.route_cache.max_age(),
            )),
            lanes: Arc::new(ResultCache::new(
                "lanes",
                config.path_cache.max_entries,
                config.path_cache.max_age(),
            )),
            icons: Arc::new(ResultCache::new(
                "icons",
                config.icon_cache.max_entries,
                config.icon_cache.max_age(),
            )),
        }
    }

    fn sweepable(&self) -> Vec<Arc<dyn Sweep>> {
        vec![
            self.routes.clone() as Arc<dyn Sweep>,
            self.lanes.clone() as Arc<dyn Sweep>,
            self.icons.clone() as Arc<dyn Sweep>,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineCacheStats {
    pub routes: CacheStats,
    pub lanes: CacheStats,
    pub icons: CacheStats,
}

/// Per-lane outcomes plus the composed presentation matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiLanePlan {
    pub paths: Arc<LanePaths>,
    pub matrix: LaneMatrix,
}

#[derive(Debug)]
pub struct RoutingEngine {
    config: EngineConfig,
    caches: EngineCaches,
    planner: RoutePlanner,
    lanes: LaneCoordinator,
    lane_runs: AtomicU64,
}

impl RoutingEngine {
    pub fn new(config: EngineConfig) -> Self {
        let caches = EngineCaches::from_config(&config);
        Self::with_caches(config, caches)
    }

    /// Builds an engine around existing caches, e.g. to share them between engines.
    pub fn with_caches(config: EngineConfig, caches: EngineCaches) -> Self {
        let planner = RoutePlanner::new(caches.routes.clone(), config.pothole_seed);
        let lanes = LaneCoordinator::new(config.lane_polling);
        Self { config, caches, planner, lanes, lane_runs: AtomicU64::new(0) }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn caches(&self) -> &EngineCaches {
        &self.caches
    }

    /// Solver runs for single routes plus coordinator runs for lane sets.
    pub fn computations(&self) -> u64 {
        self.planner.searches() + self.lane_runs.load(Ordering::Relaxed)
    }

    /// Plans one route. Missing endpoints default to the top-left and bottom-right cells.
    pub fn plan_route(
        &self,
        spec: &GridSpec,
        start: Option<Point>,
        end: Option<Point>,
        pothole_count: usize,
    ) -> Result<RoutePlan, RouteError> {
        let grid = spec.build()?;
        let start = start.unwrap_or(Point::new(0, 0));
        let end = end.unwrap_or_else(|| {
            Point::new(grid.rows().saturating_sub(1), grid.columns().saturating_sub(1))
        });
        self.planner.plan(&grid, start, end, pothole_count)
    }

    /// Plans every lane concurrently, serving repeats from the lane cache.
    pub async fn plan_multi_lane(
        &self,
        spec: &GridSpec,
        config: &MultiLaneConfig,
    ) -> Result<MultiLanePlan, RouteError> {
        let grid = spec.build()?;
        config.validate(grid.rows())?;

        let key = lanes_key(&grid, config);
        let paths = match self.caches.lanes.get(&key) {
            Some(paths) => paths,
            None => {
                self.lane_runs.fetch_add(1, Ordering::Relaxed);
                let paths = Arc::new(self.lanes.plan(&grid, config).await?);
                let found = paths.values().filter(|outcome| outcome.is_found()).count();
                debug!(lanes = paths.len(), found, "planned lanes");
                self.caches.lanes.set(key, Arc::clone(&paths));
                paths
            }
        };
        let matrix = compose_lane_matrix(&grid, config, &paths);
        Ok(MultiLanePlan { paths, matrix })
    }

    pub fn annotate_directions(
        &self,
        path: &[Point],
        dims: Dimensions,
        declared: Option<Direction>,
    ) -> Result<PathDirections, AnnotateError> {
        annotate(path, dims, declared)
    }

    pub fn estimate_moves(
        &self,
        path: &[Point],
        potholes: &[Point],
        pickups: &[Point],
    ) -> MoveEstimate {
        estimate(path, potholes, pickups)
    }

    pub fn recommend_route(
        &self,
        candidates: &BTreeMap<String, Vec<Point>>,
        potholes: &[Point],
        pickups: &[Point],
    ) -> RouteRecommendation<String> {
        recommend_route(candidates, potholes, pickups)
    }

    /// Icon matrix for the obstacles, cached by dimensions and obstacle list.
    pub fn icons_for_obstacles(
        &self,
        dims: Dimensions,
        obstacles: &[Obstacle],
    ) -> Result<Arc<IconMatrix>, GridError> {
        let key = icon_key(dims, obstacles);
        if let Some(matrix) = self.caches.icons.get(&key) {
            return Ok(matrix);
        }
        let matrix = Arc::new(icons_for_obstacles(dims, obstacles)?);
        self.caches.icons.set(key, Arc::clone(&matrix));
        Ok(matrix)
    }

    /// Icon matrix with road cells along `path` facing the path's direction.
    pub fn oriented_icons(
        &self,
        dims: Dimensions,
        obstacles: &[Obstacle],
        path: &[Point],
        declared: Option<Direction>,
    ) -> Result<IconMatrix, AnnotateError> {
        let directions = annotate(path, dims, declared)?;
        let mut matrix = (*self.icons_for_obstacles(dims, obstacles)?).clone();
        orient_along(&mut matrix, &directions);
        Ok(matrix)
    }

    pub fn cache_stats(&self) -> EngineCacheStats {
        EngineCacheStats {
            routes: self.caches.routes.stats(),
            lanes: self.caches.lanes.stats(),
            icons: self.caches.icons.stats(),
        }
    }

    pub fn clear_caches(&self) {
        self.caches.routes.clear();
        self.caches.lanes.clear();
        self.caches.icons.clear();
        info!("cleared all caches");
    }

    /// Removes expired entries from every cache now; returns how many were removed.
    pub fn sweep_caches(&self) -> usize {
        self.caches.sweepable().iter().map(|cache| cache.sweep()).sum()
    }

    /// Starts the periodic expiry sweep on the current tokio runtime.
    pub fn spawn_sweeper(&self) -> CacheSweeper {
        CacheSweeper::spawn(self.caches.sweepable(), self.config.sweep_interval())
    }
}

fn lanes_key(grid: &Grid, config: &MultiLaneConfig) -> CacheKey {
    let mut fp = Fingerprint::new("lanes");
    fingerprint_grid(&mut fp, grid);
    for lane in config.lanes() {
        fp.text("lane", lane.id().as_str())
            .number("start_row", lane.start_row() as u64)
            .number("end_row", lane.end_row() as u64)
            .text("vehicle", lane.vehicle().as_str())
            .point_seq("starts", lane.start_points().iter().copied())
            .point_seq("ends", lane.end_points().iter().copied());
    }
    fp.optional_text("selected", config.selected().map(|id| id.as_str()));
    fp.finish()
}
