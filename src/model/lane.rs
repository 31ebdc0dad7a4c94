// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Roadgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Roadgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeSet;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use smallvec::SmallVec;

use super::grid::Point;
use super::ids::LaneId;

/// Vehicle class assigned to a lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VehicleClass {
    Fast,
    Slow,
}

impl VehicleClass {
    pub fn as_str(self) -> &'static str {
        match self {
            VehicleClass::Fast => "fast",
            VehicleClass::Slow => "slow",
        }
    }
}

impl fmt::Display for VehicleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown vehicle class {0:?} (expected fast or slow)")]
pub struct ParseVehicleClassError(String);

impl FromStr for VehicleClass {
    type Err = ParseVehicleClassError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fast" => Ok(VehicleClass::Fast),
            "slow" => Ok(VehicleClass::Slow),
            _ => Err(ParseVehicleClassError(s.to_owned())),
        }
    }
}

/// A horizontal band of rows reserved for one vehicle class.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Lane {
    id: LaneId,
    start_row: usize,
    end_row: usize,
    vehicle: VehicleClass,
    start_points: SmallVec<[Point; 2]>,
    end_points: SmallVec<[Point; 2]>,
}

impl Lane {
    pub fn new(id: LaneId, rows: RangeInclusive<usize>, vehicle: VehicleClass) -> Self {
        Self {
            id,
            start_row: *rows.start(),
            end_row: *rows.end(),
            vehicle,
            start_points: SmallVec::new(),
            end_points: SmallVec::new(),
        }
    }

    pub fn with_start(mut self, point: Point) -> Self {
        self.start_points.push(point);
        self
    }

    pub fn with_end(mut self, point: Point) -> Self {
        self.end_points.push(point);
        self
    }

    pub fn id(&self) -> &LaneId {
        &self.id
    }

    pub fn start_row(&self) -> usize {
        self.start_row
    }

    pub fn end_row(&self) -> usize {
        self.end_row
    }

    pub fn rows(&self) -> RangeInclusive<usize> {
        self.start_row..=self.end_row
    }

    pub fn vehicle(&self) -> VehicleClass {
        self.vehicle
    }

    pub fn start_points(&self) -> &[Point] {
        &self.start_points
    }

    pub fn end_points(&self) -> &[Point] {
        &self.end_points
    }

    pub fn contains_row(&self, row: usize) -> bool {
        self.rows().contains(&row)
    }

    /// Every `(start, end)` pair whose two points lie inside this lane's rows.
    pub fn candidate_pairs(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.start_points
            .iter()
            .filter(|start| self.contains_row(start.row()))
            .flat_map(move |start| {
                self.end_points
                    .iter()
                    .filter(|end| self.contains_row(end.row()))
                    .map(move |end| (*start, *end))
            })
    }
}

/// Ordered lanes plus the lane currently holding right-of-way.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct MultiLaneConfig {
    lanes: Vec<Lane>,
    selected: Option<LaneId>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LaneConfigError {
    #[error("lane {0} is defined more than once")]
    DuplicateLane(LaneId),
    #[error("selected lane {0} is not defined")]
    UnknownSelectedLane(LaneId),
    #[error("lane {lane} has inverted row range {start_row}..={end_row}")]
    InvertedRows { lane: LaneId, start_row: usize, end_row: usize },
    #[error("lane {lane} ends at row {end_row} but the grid has {rows} rows")]
    RowsOutsideGrid { lane: LaneId, end_row: usize, rows: usize },
}

impl MultiLaneConfig {
    pub fn new(lanes: Vec<Lane>) -> Self {
        Self { lanes, selected: None }
    }

    pub fn with_selected(mut self, lane_id: LaneId) -> Self {
        self.selected = Some(lane_id);
        self
    }

    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    pub fn selected(&self) -> Option<&LaneId> {
        self.selected.as_ref()
    }

    pub fn selected_lane(&self) -> Option<&Lane> {
        let selected = self.selected.as_ref()?;
        self.lanes.iter().find(|lane| lane.id() == selected)
    }

    pub fn is_selected(&self, lane: &Lane) -> bool {
        self.selected.as_ref() == Some(lane.id())
    }

    /// Checks lane ids, the selected id, and every row range against a grid of `rows` rows.
    pub fn validate(&self, rows: usize) -> Result<(), LaneConfigError> {
        let mut seen = BTreeSet::new();
        for lane in &self.lanes {
            if !seen.insert(lane.id()) {
                return Err(LaneConfigError::DuplicateLane(lane.id().clone()));
            }
            if lane.start_row > lane.end_row {
                return Err(LaneConfigError::InvertedRows {
                    lane: lane.id().clone(),
                    start_row: lane.start_row,
                    end_row: lane.end_row,
                });
            }
            if lane.end_row >= rows {
                return Err(LaneConfigError::RowsOutsideGrid {
                    lane: lane.id().clone(),
                    end_row: lane.end_row,
                    rows,
                });
            }
        }
        if let Some(selected) = &self.selected {
            if !seen.contains(selected) {
                return Err(LaneConfigError::UnknownSelectedLane(selected.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Lane, LaneConfigError, MultiLaneConfig, VehicleClass};
    use crate::model::{LaneId, Point};

    fn lid(value: &str) -> LaneId {
        LaneId::new(value).expect("lane id")
    }

    #[test]
    fn candidate_pairs_skip_points_outside_the_lane() {
        let lane = Lane::new(lid("fast"), 0..=2, VehicleClass::Fast)
            .with_start(Point::new(0, 0))
            .with_start(Point::new(4, 0))
            .with_end(Point::new(2, 7))
            .with_end(Point::new(1, 7));
        let pairs = lane.candidate_pairs().collect::<Vec<_>>();
        assert_eq!(
            pairs,
            vec![(Point::new(0, 0), Point::new(2, 7)), (Point::new(0, 0), Point::new(1, 7))]
        );
    }

    #[test]
    fn validate_rejects_malformed_configs() {
        let fast = Lane::new(lid("fast"), 0..=2, VehicleClass::Fast);
        let slow = Lane::new(lid("slow"), 3..=5, VehicleClass::Slow);

        let dup = MultiLaneConfig::new(vec![fast.clone(), fast.clone()]);
        assert_eq!(dup.validate(6), Err(LaneConfigError::DuplicateLane(lid("fast"))));

        let unknown = MultiLaneConfig::new(vec![fast.clone()]).with_selected(lid("bus"));
        assert_eq!(unknown.validate(6), Err(LaneConfigError::UnknownSelectedLane(lid("bus"))));

        let outside = MultiLaneConfig::new(vec![fast.clone(), slow.clone()]);
        assert_eq!(
            outside.validate(5),
            Err(LaneConfigError::RowsOutsideGrid { lane: lid("slow"), end_row: 5, rows: 5 })
        );

        let inverted = MultiLaneConfig::new(vec![Lane::new(lid("x"), 3..=1, VehicleClass::Slow)]);
        assert!(matches!(inverted.validate(6), Err(LaneConfigError::InvertedRows { .. })));

        let ok = MultiLaneConfig::new(vec![fast, slow]).with_selected(lid("slow"));
        assert_eq!(ok.validate(6), Ok(()));
        assert_eq!(ok.selected_lane().map(|lane| lane.vehicle()), Some(VehicleClass::Slow));
    }
}
