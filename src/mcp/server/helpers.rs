// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Roadgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Roadgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// MCP server helper functions:
/// wire conversion for points, grids, lanes and estimates, plus error mapping.
const STATUS_FOUND: &str = "found";
const STATUS_NOT_FOUND: &str = "not_found";

fn points_from_wire(points: &[McpPoint]) -> Vec<Point> {
    points.iter().copied().map(Point::from).collect()
}

fn points_to_wire(points: &[Point]) -> Vec<McpPoint> {
    points.iter().map(|point| [point.row(), point.column()]).collect()
}

fn cells_to_wire(matrix: &[Vec<Cell>]) -> Vec<Vec<u32>> {
    matrix.iter().map(|row| row.iter().copied().map(u32::from).collect()).collect()
}

fn parse_direction(raw: Option<&str>) -> Result<Option<Direction>, ErrorData> {
    raw.map(|raw| {
        raw.parse::<Direction>().map_err(|err| {
            ErrorData::invalid_params(
                format!("invalid direction: {err}"),
                Some(serde_json::json!({ "direction": raw })),
            )
        })
    })
    .transpose()
}

fn obstacles_from_wire(obstacles: Vec<McpObstacle>) -> Result<Vec<Obstacle>, ErrorData> {
    obstacles
        .into_iter()
        .map(|McpObstacle { icon, points, facing }| {
            let icon_key = icon.parse::<IconKey>().map_err(|err| {
                ErrorData::invalid_params(
                    format!("invalid obstacle icon: {err}"),
                    Some(serde_json::json!({ "icon": icon })),
                )
            })?;
            let obstacle = Obstacle::new(icon_key, points.into_iter().map(Point::from));
            Ok(match parse_direction(facing.as_deref())? {
                Some(direction) => obstacle.facing(direction),
                None => obstacle,
            })
        })
        .collect()
}

fn grid_spec(grid: McpGrid) -> Result<GridSpec, ErrorData> {
    let McpGrid { rows, columns, matrix, obstacles } = grid;
    let spec = match (matrix, rows, columns) {
        (Some(matrix), _, _) => GridSpec::matrix(
            matrix.into_iter().map(|row| row.into_iter().map(Cell::from).collect()).collect(),
        ),
        (None, Some(rows), Some(columns)) => GridSpec::dimensions(rows, columns),
        (None, rows, columns) => {
            return Err(ErrorData::invalid_params(
                "grid needs either `matrix` or both `rows` and `columns`",
                Some(serde_json::json!({ "rows": rows, "columns": columns })),
            ));
        }
    };
    Ok(spec.with_obstacles(obstacles_from_wire(obstacles)?))
}

fn lane_config(
    lanes: Vec<McpLane>,
    selected_lane: Option<String>,
) -> Result<MultiLaneConfig, ErrorData> {
    let lanes = lanes
        .into_iter()
        .map(|lane| {
            let lane_id = parse_lane_id(lane.lane_id)?;
            let vehicle = lane.vehicle.parse::<VehicleClass>().map_err(|err| {
                ErrorData::invalid_params(
                    format!("invalid vehicle: {err}"),
                    Some(serde_json::json!({
                        "lane_id": lane_id.as_str(),
                        "vehicle": lane.vehicle,
                    })),
                )
            })?;
            let mut parsed = Lane::new(lane_id, lane.start_row..=lane.end_row, vehicle);
            for point in lane.start_points {
                parsed = parsed.with_start(Point::from(point));
            }
            for point in lane.end_points {
                parsed = parsed.with_end(Point::from(point));
            }
            Ok(parsed)
        })
        .collect::<Result<Vec<_>, ErrorData>>()?;

    let config = MultiLaneConfig::new(lanes);
    Ok(match selected_lane {
        Some(selected) => config.with_selected(parse_lane_id(selected)?),
        None => config,
    })
}

fn parse_lane_id(raw: String) -> Result<LaneId, ErrorData> {
    LaneId::new(raw.clone()).map_err(|err| {
        ErrorData::invalid_params(
            format!("invalid lane_id: {err}"),
            Some(serde_json::json!({ "lane_id": raw })),
        )
    })
}

fn lane_path_to_wire(outcome: &SearchOutcome) -> McpLanePath {
    match outcome {
        SearchOutcome::Found(path) => {
            McpLanePath { status: STATUS_FOUND.to_owned(), path: points_to_wire(path.points()) }
        }
        SearchOutcome::NotFound => {
            McpLanePath { status: STATUS_NOT_FOUND.to_owned(), path: Vec::new() }
        }
    }
}

fn estimate_to_wire(estimate: &MoveEstimate) -> McpMoveEstimate {
    McpMoveEstimate {
        path_length: estimate.path_length,
        estimated_moves: estimate.estimated_moves,
        efficiency: estimate.efficiency,
        navigation_moves: estimate.breakdown.navigation_moves,
        pothole_repairs: estimate.breakdown.pothole_repairs,
        pickups: estimate.breakdown.pickups,
    }
}

fn cache_stats_to_wire(stats: &CacheStats) -> McpCacheStats {
    McpCacheStats {
        size: stats.size,
        max_entries: stats.max_entries,
        hits: stats.hits,
        misses: stats.misses,
        evictions: stats.evictions,
        expirations: stats.expirations,
        hit_rate: stats.hit_rate,
    }
}

fn map_route_error(err: RouteError) -> ErrorData {
    let data = match &err {
        RouteError::InvalidEndpoints(endpoint) => {
            let point = [endpoint.point().row(), endpoint.point().column()];
            serde_json::json!({ "kind": "invalid_endpoints", "point": point })
        }
        RouteError::InvalidLaneConfig(_) => serde_json::json!({ "kind": "invalid_lane_config" }),
        RouteError::Grid(_) => serde_json::json!({ "kind": "invalid_grid" }),
    };
    ErrorData::invalid_params(err.to_string(), Some(data))
}

fn map_annotate_error(err: AnnotateError) -> ErrorData {
    let kind = match err {
        AnnotateError::EmptyPath => "empty_path",
        AnnotateError::InvalidPathStart(_) => "invalid_path_start",
        AnnotateError::AmbiguousStartDirection(_) => "ambiguous_start_direction",
        AnnotateError::DegenerateSegment { .. } => "degenerate_segment",
        AnnotateError::OutOfBounds(_) => "out_of_bounds",
        AnnotateError::Grid(grid) => return map_grid_error(grid),
    };
    ErrorData::invalid_params(err.to_string(), Some(serde_json::json!({ "kind": kind })))
}

fn map_grid_error(err: GridError) -> ErrorData {
    ErrorData::invalid_params(err.to_string(), Some(serde_json::json!({ "kind": "invalid_grid" })))
}
