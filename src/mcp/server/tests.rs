// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Roadgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Roadgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::*;
use crate::config::{EngineConfig, LanePolling};
use rstest::{fixture, rstest};
use std::collections::BTreeSet;

#[fixture]
fn server() -> RoadgridMcp {
    let config =
        EngineConfig::default().with_pothole_seed(5).with_lane_polling(LanePolling::new(1, 20));
    RoadgridMcp::new(Arc::new(RoutingEngine::new(config)))
}

fn open_grid(rows: usize, columns: usize) -> McpGrid {
    McpGrid { rows: Some(rows), columns: Some(columns), ..McpGrid::default() }
}

fn lane(
    lane_id: &str,
    rows: (usize, usize),
    vehicle: &str,
    start: McpPoint,
    end: McpPoint,
) -> McpLane {
    McpLane {
        lane_id: lane_id.to_owned(),
        start_row: rows.0,
        end_row: rows.1,
        vehicle: vehicle.to_owned(),
        start_points: vec![start],
        end_points: vec![end],
    }
}

fn error_kind(err: &ErrorData) -> Option<&str> {
    err.data.as_ref().and_then(|data| data.get("kind")).and_then(|kind| kind.as_str())
}

#[test]
fn tools_advertise_descriptions_and_schemas() {
    let tools = RoadgridMcp::tool_router().list_all();
    assert!(!tools.is_empty(), "expected at least one tool");

    let mut seen_names = BTreeSet::new();
    let mut missing_description = Vec::new();
    let mut bad_schema = Vec::new();

    for tool in tools {
        let name = tool.name.to_string();
        assert!(seen_names.insert(name.clone()), "duplicate tool name: {name}");

        if tool.description.as_deref().map(|desc| desc.trim().is_empty()).unwrap_or(true) {
            missing_description.push(name.clone());
        }
        let input_is_object =
            tool.input_schema.get("type").and_then(|v| v.as_str()) == Some("object");
        let output_is_object = tool
            .output_schema
            .as_ref()
            .and_then(|schema| schema.get("type"))
            .and_then(|v| v.as_str())
            == Some("object");
        if !input_is_object || !output_is_object {
            bad_schema.push(name);
        }
    }

    assert!(missing_description.is_empty(), "tools without description: {missing_description:?}");
    assert!(bad_schema.is_empty(), "tools with non-object schemas: {bad_schema:?}");

    let expected = [
        "cache.clear",
        "cache.stats",
        "grid.icons",
        "route.annotate_directions",
        "route.estimate_moves",
        "route.plan",
        "route.plan_multi_lane",
        "route.recommend",
    ];
    assert_eq!(seen_names.iter().map(String::as_str).collect::<Vec<_>>(), expected);
}

#[rstest]
#[tokio::test]
async fn route_plan_defaults_endpoints_to_opposite_corners(server: RoadgridMcp) {
    let Json(response) = server
        .route_plan(Parameters(RoutePlanParams {
            grid: open_grid(6, 8),
            start: None,
            end: None,
            pothole_count: 2,
        }))
        .await
        .expect("route.plan");

    assert_eq!(response.status, "found");
    assert_eq!(response.path.first(), Some(&[0, 0]));
    assert_eq!(response.path.last(), Some(&[5, 7]));
    assert_eq!(response.path.len(), 13);
    assert_eq!(response.potholes.len(), 2);
    for [row, column] in &response.potholes {
        assert_eq!(response.grid[*row][*column], 1);
        assert!(response.path.contains(&[*row, *column]));
    }
}

#[rstest]
#[tokio::test]
async fn route_plan_reports_unreachable_goal_as_not_found(server: RoadgridMcp) {
    let Json(response) = server
        .route_plan(Parameters(RoutePlanParams {
            grid: McpGrid {
                matrix: Some(vec![vec![0, 1, 0], vec![0, 1, 0]]),
                ..McpGrid::default()
            },
            start: Some([0, 0]),
            end: Some([1, 2]),
            pothole_count: 3,
        }))
        .await
        .expect("route.plan");

    assert_eq!(response.status, "not_found");
    assert!(response.path.is_empty());
    assert!(response.potholes.is_empty());
    assert_eq!(response.grid, vec![vec![0, 1, 0], vec![0, 1, 0]]);
}

#[rstest]
#[tokio::test]
async fn route_plan_rejects_blocked_endpoints(server: RoadgridMcp) {
    let grid = McpGrid {
        obstacles: vec![McpObstacle { icon: "TREE".into(), points: vec![[0, 0]], facing: None }],
        ..open_grid(3, 3)
    };
    let err = server
        .route_plan(Parameters(RoutePlanParams { grid, start: None, end: None, pothole_count: 0 }))
        .await
        .err().expect("blocked start");
    assert_eq!(error_kind(&err), Some("invalid_endpoints"));
}

#[rstest]
#[tokio::test]
async fn route_plan_rejects_incomplete_grid_and_unknown_icons(server: RoadgridMcp) {
    let err = server
        .route_plan(Parameters(RoutePlanParams {
            grid: McpGrid { rows: Some(3), ..McpGrid::default() },
            start: None,
            end: None,
            pothole_count: 0,
        }))
        .await
        .err().expect("missing columns");
    assert!(err.message.contains("rows"));

    let grid = McpGrid {
        obstacles: vec![McpObstacle { icon: "LAVA".into(), points: vec![[1, 1]], facing: None }],
        ..open_grid(3, 3)
    };
    server
        .route_plan(Parameters(RoutePlanParams { grid, start: None, end: None, pothole_count: 0 }))
        .await
        .err().expect("unknown icon");
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn route_plan_multi_lane_keeps_lanes_apart(server: RoadgridMcp) {
    let Json(response) = server
        .route_plan_multi_lane(Parameters(RoutePlanMultiLaneParams {
            grid: open_grid(6, 8),
            lanes: vec![
                lane("fast", (0, 2), "fast", [1, 0], [1, 7]),
                lane("slow", (3, 5), "slow", [4, 0], [4, 7]),
            ],
            selected_lane: Some("fast".into()),
        }))
        .await
        .expect("route.plan_multi_lane");

    assert_eq!(response.selected_lane.as_deref(), Some("fast"));
    let fast = &response.lanes["fast"];
    let slow = &response.lanes["slow"];
    assert_eq!(fast.status, "found");
    assert_eq!(slow.status, "found");
    assert!(fast.path.iter().all(|[row, _]| *row <= 2));
    assert!(slow.path.iter().all(|[row, _]| *row >= 3));
    for [row, column] in &fast.path {
        assert!(response.matrix[*row][*column] >= 2);
    }
}

#[rstest]
#[tokio::test]
async fn route_plan_multi_lane_rejects_unknown_selection_and_vehicle(server: RoadgridMcp) {
    let err = server
        .route_plan_multi_lane(Parameters(RoutePlanMultiLaneParams {
            grid: open_grid(4, 4),
            lanes: vec![lane("a", (0, 1), "fast", [0, 0], [0, 3])],
            selected_lane: Some("b".into()),
        }))
        .await
        .err().expect("unknown selected lane");
    assert_eq!(error_kind(&err), Some("invalid_lane_config"));

    server
        .route_plan_multi_lane(Parameters(RoutePlanMultiLaneParams {
            grid: open_grid(4, 4),
            lanes: vec![lane("a", (0, 1), "hovercraft", [0, 0], [0, 3])],
            selected_lane: None,
        }))
        .await
        .err().expect("unknown vehicle");
}

#[rstest]
#[tokio::test]
async fn route_annotate_directions_buckets_points(server: RoadgridMcp) {
    let Json(response) = server
        .route_annotate_directions(Parameters(RouteAnnotateDirectionsParams {
            path: vec![[0, 1], [1, 1], [1, 2], [1, 3]],
            rows: 3,
            columns: 4,
            start_direction: Some("east".into()),
        }))
        .await
        .expect("route.annotate_directions");

    assert_eq!(response.start_direction, "south");
    assert_eq!(response.south, vec![[0, 1]]);
    assert_eq!(response.east, vec![[1, 1], [1, 2], [1, 3]]);
    assert!(response.north.is_empty());
    assert_eq!(response.matrix[1][3].as_deref(), Some("east"));
    assert_eq!(response.matrix[2][0], None);
}

#[rstest]
#[tokio::test]
async fn route_annotate_directions_maps_precondition_failures(server: RoadgridMcp) {
    let err = server
        .route_annotate_directions(Parameters(RouteAnnotateDirectionsParams {
            path: vec![[1, 1], [1, 2]],
            rows: 4,
            columns: 4,
            start_direction: None,
        }))
        .await
        .err().expect("interior start");
    assert_eq!(error_kind(&err), Some("invalid_path_start"));

    let err = server
        .route_annotate_directions(Parameters(RouteAnnotateDirectionsParams {
            path: vec![[0, 1], [2, 1]],
            rows: 4,
            columns: 4,
            start_direction: None,
        }))
        .await
        .err().expect("gap");
    assert_eq!(error_kind(&err), Some("degenerate_segment"));

    server
        .route_annotate_directions(Parameters(RouteAnnotateDirectionsParams {
            path: vec![[0, 1]],
            rows: 4,
            columns: 4,
            start_direction: Some("sideways".into()),
        }))
        .await
        .err().expect("bad direction");
}

#[rstest]
#[tokio::test]
async fn route_estimate_moves_checks_budget(server: RoadgridMcp) {
    let path = vec![[0, 0], [0, 1], [0, 2], [1, 2]];
    let Json(response) = server
        .route_estimate_moves(Parameters(RouteEstimateMovesParams {
            path: path.clone(),
            potholes: vec![[0, 1], [3, 3]],
            pickups: vec![[1, 2]],
            max_moves: Some(10),
            moves_used: 6,
        }))
        .await
        .expect("route.estimate_moves");

    assert_eq!(response.estimate.navigation_moves, 3);
    assert_eq!(response.estimate.pothole_repairs, 1);
    assert_eq!(response.estimate.pickups, 1);
    assert_eq!(response.estimate.estimated_moves, 5);
    assert!(!response.viable);
    assert_eq!(response.moves_remaining, Some(4));

    let Json(unlimited) = server
        .route_estimate_moves(Parameters(RouteEstimateMovesParams {
            path,
            potholes: Vec::new(),
            pickups: Vec::new(),
            max_moves: None,
            moves_used: 0,
        }))
        .await
        .expect("route.estimate_moves");
    assert!(unlimited.viable);
    assert_eq!(unlimited.moves_remaining, None);
}

#[rstest]
#[tokio::test]
async fn route_recommend_picks_the_direct_path(server: RoadgridMcp) {
    let mut paths = BTreeMap::new();
    paths.insert("direct".to_owned(), vec![[0, 0], [0, 1], [0, 2]]);
    paths.insert("detour".to_owned(), vec![[0, 0], [1, 0], [1, 1], [1, 2], [0, 2]]);

    let Json(response) = server
        .route_recommend(Parameters(RouteRecommendParams {
            paths,
            potholes: Vec::new(),
            pickups: Vec::new(),
        }))
        .await
        .expect("route.recommend");

    assert_eq!(response.recommended.as_deref(), Some("direct"));
    assert_eq!(response.analysis.len(), 2);
    assert!(response.strategy.starts_with("Recommended path: direct."));
}

#[rstest]
#[tokio::test]
async fn grid_icons_orients_roads_and_keeps_obstacles(server: RoadgridMcp) {
    let obstacles = vec![
        McpObstacle { icon: "BUILDING".into(), points: vec![[2, 2]], facing: None },
        McpObstacle { icon: "CAR".into(), points: vec![[2, 0]], facing: Some("west".into()) },
    ];

    let Json(plain) = server
        .grid_icons(Parameters(GridIconsParams {
            rows: 3,
            columns: 3,
            obstacles: obstacles.clone(),
            path: None,
            start_direction: None,
        }))
        .await
        .expect("grid.icons");
    assert_eq!(plain.icons[0][0], "ROAD");
    assert_eq!(plain.icons[2][2], "BUILDING");
    assert_eq!(plain.icons[2][0], "CAR_WEST");

    let Json(oriented) = server
        .grid_icons(Parameters(GridIconsParams {
            rows: 3,
            columns: 3,
            obstacles,
            path: Some(vec![[0, 1], [1, 1]]),
            start_direction: None,
        }))
        .await
        .expect("grid.icons");
    assert_eq!(oriented.icons[0][1], "ROAD_SOUTH");
    assert_eq!(oriented.icons[1][1], "ROAD_SOUTH");
    assert_eq!(oriented.icons[0][0], "ROAD");
    assert_eq!(oriented.icons[2][2], "BUILDING");
}

#[rstest]
#[tokio::test]
async fn cache_tools_report_and_reset_counters(server: RoadgridMcp) {
    let params = || {
        Parameters(RoutePlanParams {
            grid: open_grid(4, 4),
            start: None,
            end: None,
            pothole_count: 1,
        })
    };
    let Json(first) = server.route_plan(params()).await.expect("route.plan");
    let Json(second) = server.route_plan(params()).await.expect("route.plan");
    assert_eq!(first.potholes, second.potholes);

    let Json(stats) = server.cache_stats().await.expect("cache.stats");
    assert_eq!(stats.routes.size, 1);
    assert_eq!(stats.routes.hits, 1);
    assert_eq!(stats.computations, 1);

    let Json(cleared) = server.cache_clear().await.expect("cache.clear");
    assert!(cleared.cleared);
    let Json(stats) = server.cache_stats().await.expect("cache.stats");
    assert_eq!(stats.routes.size, 0);
}

#[rstest]
#[tokio::test]
async fn oversized_dimensions_are_rejected_as_invalid_grids(server: RoadgridMcp) {
    let huge = 1usize << 40;

    let err = server
        .route_plan(Parameters(RoutePlanParams {
            grid: open_grid(huge, huge),
            start: Some([0, 0]),
            end: Some([1, 1]),
            pothole_count: 0,
        }))
        .await
        .err().expect("oversized route grid");
    assert_eq!(error_kind(&err), Some("invalid_grid"));

    for path in [None, Some(vec![[0, 1], [1, 1]])] {
        let err = server
            .grid_icons(Parameters(GridIconsParams {
                rows: huge,
                columns: huge,
                obstacles: Vec::new(),
                path,
                start_direction: None,
            }))
            .await
            .err().expect("oversized icon matrix");
        assert_eq!(error_kind(&err), Some("invalid_grid"));
    }

    let err = server
        .route_annotate_directions(Parameters(RouteAnnotateDirectionsParams {
            path: vec![[0, 1], [1, 1]],
            rows: usize::MAX,
            columns: usize::MAX,
            start_direction: None,
        }))
        .await
        .err().expect("oversized direction matrix");
    assert_eq!(error_kind(&err), Some("invalid_grid"));
}
