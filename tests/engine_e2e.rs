// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Roadgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Roadgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use roadgrid::config::{EngineConfig, LanePolling};
use roadgrid::model::{
    Cell, Dimensions, Direction, IconKey, Lane, LaneId, MultiLaneConfig, Obstacle, Point,
    SearchOutcome, VehicleClass,
};
use roadgrid::route::{annotate_all, viability, RoutePlan};
use roadgrid::{GridSpec, RoutingEngine};

fn p(row: usize, column: usize) -> Point {
    Point::new(row, column)
}

fn lid(value: &str) -> LaneId {
    LaneId::new(value).expect("lane id")
}

fn engine(seed: u64) -> RoutingEngine {
    RoutingEngine::new(
        EngineConfig::default()
            .with_pothole_seed(seed)
            .with_lane_polling(LanePolling::new(1, 20)),
    )
}

#[test]
fn planned_route_with_potholes_costs_two_repairs_more_than_navigation() {
    let engine = engine(3);
    let plan = engine.plan_route(&GridSpec::dimensions(6, 8), Some(p(0, 0)), Some(p(5, 7)), 2);
    let plan = plan.expect("plan");
    let result = plan.result().expect("route");

    assert_eq!(result.path().len(), 13);
    assert_eq!(result.potholes().len(), 2);
    for pothole in result.potholes() {
        assert!(result.path().contains(*pothole));
        assert_eq!(result.grid().get(*pothole), Some(Cell::Obstacle));
    }
    for point in result.path().points().iter().filter(|point| !result.potholes().contains(*point)) {
        assert_eq!(result.grid().get(*point), Some(Cell::Open));
    }

    let estimate = engine.estimate_moves(result.path().points(), result.potholes(), &[]);
    assert_eq!(estimate.breakdown.navigation_moves, 12);
    assert_eq!(estimate.estimated_moves, estimate.breakdown.navigation_moves + 2);
    assert!((estimate.efficiency - 12.0 / 14.0).abs() < 1e-9);

    assert!(viability(&estimate, Some(20), 6).viable);
    assert!(!viability(&estimate, Some(20), 7).viable);
}

#[test]
fn obstacles_from_the_request_shape_the_route() {
    let engine = engine(1);
    let wall = (0..4).map(|row| p(row, 2));
    let spec =
        GridSpec::dimensions(5, 5).with_obstacles(vec![Obstacle::new(IconKey::Building, wall)]);

    let plan = engine.plan_route(&spec, Some(p(0, 0)), Some(p(0, 4)), 0).expect("plan");
    let path = plan.result().expect("route").path();
    assert_eq!(path.steps(), 12);
    assert!(path.contains(p(4, 2)));
}

#[test]
fn sealed_goal_is_not_found_rather_than_an_error() {
    let engine = engine(1);
    let ring = [p(1, 2), p(2, 1), p(2, 3), p(3, 2)];
    let spec = GridSpec::dimensions(5, 5).with_obstacles(vec![Obstacle::new(IconKey::Tree, ring)]);

    let plan = engine.plan_route(&spec, Some(p(0, 0)), Some(p(2, 2)), 4).expect("plan");
    assert!(matches!(plan, RoutePlan::NotFound { .. }));
    assert_eq!(plan.grid().get(p(1, 2)), Some(Cell::Obstacle));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn selected_lane_keeps_its_rows_while_others_route_around() {
    let engine = engine(1);
    let config = MultiLaneConfig::new(vec![
        Lane::new(lid("fast"), 0..=2, VehicleClass::Fast)
            .with_start(p(1, 0))
            .with_end(p(1, 9)),
        Lane::new(lid("slow"), 3..=5, VehicleClass::Slow)
            .with_start(p(4, 0))
            .with_end(p(4, 9)),
        Lane::new(lid("bus"), 6..=7, VehicleClass::Slow)
            .with_start(p(7, 0))
            .with_end(p(7, 9)),
    ])
    .with_selected(lid("slow"));

    let plan =
        engine.plan_multi_lane(&GridSpec::dimensions(8, 10), &config).await.expect("lanes");

    let found = plan
        .paths
        .iter()
        .map(|(lane_id, outcome)| (lane_id.clone(), outcome.path().expect("route").clone()))
        .collect::<BTreeMap<_, _>>();
    assert_eq!(found.len(), 3);

    let slow = &found[&lid("slow")];
    assert!(slow.points().iter().all(|point| (3..=5).contains(&point.row())));
    for (lane_id, path) in &found {
        if lane_id != &lid("slow") {
            assert!(path.points().iter().all(|point| !(3..=5).contains(&point.row())));
        }
    }
    assert!(!found[&lid("fast")].crosses(&found[&lid("bus")]));

    assert_eq!(plan.matrix.selected_path(), Some(slow));
    assert_eq!(plan.matrix.other_paths().len(), 2);

    let annotations = annotate_all(
        found.iter().map(|(lane_id, path)| (lane_id.clone(), path.points())),
        Dimensions::new(8, 10),
    );
    for annotated in annotations.values() {
        assert_eq!(annotated.as_ref().expect("annotate").start_direction(), Direction::East);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn crossing_lanes_resolve_to_a_single_winner() {
    let engine = engine(1);
    let config = MultiLaneConfig::new(vec![
        Lane::new(lid("across"), 0..=3, VehicleClass::Fast)
            .with_start(p(1, 0))
            .with_end(p(1, 5)),
        Lane::new(lid("down"), 0..=3, VehicleClass::Slow)
            .with_start(p(0, 2))
            .with_end(p(3, 2)),
    ]);

    let plan = engine.plan_multi_lane(&GridSpec::dimensions(4, 6), &config).await.expect("lanes");
    let winners = plan.paths.values().filter(|outcome| outcome.is_found()).count();
    let losers =
        plan.paths.values().filter(|outcome| matches!(outcome, SearchOutcome::NotFound)).count();
    assert_eq!((winners, losers), (1, 1));
    assert!(plan.matrix.selected_path().is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn cached_results_are_identical_and_survive_clearing_as_recomputations() {
    let engine = engine(9);
    let spec = GridSpec::dimensions(6, 8);

    let first = engine.plan_route(&spec, None, None, 3).expect("plan");
    let second = engine.plan_route(&spec, None, None, 3).expect("plan");
    assert_eq!(first, second);
    assert_eq!(engine.computations(), 1);

    engine.clear_caches();
    let third = engine.plan_route(&spec, None, None, 3).expect("plan");
    assert_eq!(engine.computations(), 2);
    assert_eq!(third.result().map(|r| r.path().len()), Some(13));

    let stats = engine.cache_stats();
    assert_eq!(stats.routes.size, 1);
    assert_eq!(stats.routes.hits, 1);
    assert_eq!(stats.routes.misses, 2);
}
