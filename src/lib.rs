// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Roadgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Roadgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Roadgrid: grid routing engine (A* + lanes + result caches + MCP).
//!
//! Grids are row-major and points are `(row, column)`. Start at [`engine::RoutingEngine`],
//! which owns the caches and exposes every routing operation; [`mcp::RoadgridMcp`] serves
//! those operations as MCP tools.

pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod mcp;
pub mod model;
pub mod route;
pub mod search;

pub use config::EngineConfig;
pub use engine::{GridSpec, RoutingEngine};
