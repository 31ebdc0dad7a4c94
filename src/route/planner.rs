// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Roadgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Roadgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::cache::{CacheKey, Fingerprint, ResultCache};
use crate::error::RouteError;
use crate::model::{Cell, Grid, Path, Point, SearchOutcome};
use crate::search::{check_endpoints, PathFinder};

/// A solved route: the presentation grid, the full shortest path, and the potholes on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteResult {
    grid: Grid,
    path: Path,
    potholes: Vec<Point>,
}

impl RouteResult {
    /// Base grid with every non-pothole path cell `Open` and every pothole an `Obstacle`.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Pothole points in path order.
    pub fn potholes(&self) -> &[Point] {
        &self.potholes
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutePlan {
    Found(RouteResult),
    /// No route exists; carries the unchanged base grid.
    NotFound { grid: Grid },
}

impl RoutePlan {
    pub fn grid(&self) -> &Grid {
        match self {
            RoutePlan::Found(result) => result.grid(),
            RoutePlan::NotFound { grid } => grid,
        }
    }

    pub fn result(&self) -> Option<&RouteResult> {
        match self {
            RoutePlan::Found(result) => Some(result),
            RoutePlan::NotFound { .. } => None,
        }
    }
}

/// Picks `min(count, path.len())` distinct path points uniformly at random.
///
/// The returned points follow path order. Endpoints are eligible.
pub fn scatter_potholes<R: Rng + ?Sized>(path: &Path, count: usize, rng: &mut R) -> Vec<Point> {
    let amount = count.min(path.len());
    if amount == 0 {
        return Vec::new();
    }
    let mut indices = rand::seq::index::sample(rng, path.len(), amount).into_vec();
    indices.sort_unstable();
    indices.into_iter().map(|idx| path.points()[idx]).collect()
}

/// Solves one route over `base` and scatters `pothole_count` potholes along it.
///
/// Endpoints are validated first; an unreachable goal is `Ok(RoutePlan::NotFound)`.
pub fn plan_route<R: Rng + ?Sized>(
    finder: &mut PathFinder,
    base: &Grid,
    start: Point,
    end: Point,
    pothole_count: usize,
    rng: &mut R,
) -> Result<RoutePlan, RouteError> {
    check_endpoints(base, start, end)?;

    let path = match finder.find_path(base, start, end) {
        SearchOutcome::Found(path) => path,
        SearchOutcome::NotFound => return Ok(RoutePlan::NotFound { grid: base.clone() }),
    };

    let potholes = scatter_potholes(&path, pothole_count, rng);
    let mut grid = base.clone();
    for point in path.points() {
        grid.set(*point, Cell::Open);
    }
    for point in &potholes {
        grid.set(*point, Cell::Obstacle);
    }

    Ok(RoutePlan::Found(RouteResult { grid, path, potholes }))
}

/// Writes the dimensions and every non-open cell of `grid` into `fp`.
///
/// Cells are visited row-major, so equal grids always produce equal fingerprints.
pub fn fingerprint_grid(fp: &mut Fingerprint, grid: &Grid) {
    fp.number("rows", grid.rows() as u64)
        .number("columns", grid.columns() as u64)
        .point_set("obstacles", grid.obstacle_points());
    for (idx, cell) in grid.cells().iter().enumerate() {
        if let Cell::PathMarker(marker) = cell {
            fp.point("marker", grid.dimensions().point_of(idx)).number("n", u64::from(*marker));
        }
    }
}

pub fn route_key(base: &Grid, start: Point, end: Point, pothole_count: usize) -> CacheKey {
    let mut fp = Fingerprint::new("route");
    fingerprint_grid(&mut fp, base);
    fp.point("start", start).point("end", end).number("potholes", pothole_count as u64);
    fp.finish()
}

/// Cached single-route planning.
///
/// Holds the route cache and the pothole RNG. A fixed seed makes pothole placement
/// reproducible across runs.
#[derive(Debug)]
pub struct RoutePlanner {
    cache: Arc<ResultCache<RoutePlan>>,
    rng: Mutex<StdRng>,
    searches: AtomicU64,
}

impl RoutePlanner {
    pub fn new(cache: Arc<ResultCache<RoutePlan>>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { cache, rng: Mutex::new(rng), searches: AtomicU64::new(0) }
    }

    pub fn cache(&self) -> &Arc<ResultCache<RoutePlan>> {
        &self.cache
    }

    /// Number of solver runs so far; cache hits do not count.
    pub fn searches(&self) -> u64 {
        self.searches.load(Ordering::Relaxed)
    }

    pub fn plan(
        &self,
        base: &Grid,
        start: Point,
        end: Point,
        pothole_count: usize,
    ) -> Result<RoutePlan, RouteError> {
        check_endpoints(base, start, end)?;

        let key = route_key(base, start, end, pothole_count);
        self.cache.get_or_try_insert_with(&key, || {
            self.searches.fetch_add(1, Ordering::Relaxed);
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            let plan =
                plan_route(&mut PathFinder::new(), base, start, end, pothole_count, &mut *rng)?;
            debug!(
                %start,
                %end,
                pothole_count,
                found = matches!(plan, RoutePlan::Found(_)),
                "planned route"
            );
            Ok(plan)
        })
    }
}
