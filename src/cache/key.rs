// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Roadgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Roadgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use crate::model::Point;

/// Canonical text fingerprint of a routing request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Builds a [`CacheKey`] from the semantic inputs of a request.
///
/// Every field is written as `name=value;`. Unordered inputs go through
/// [`Fingerprint::point_set`], which sorts and deduplicates, so two requests that list
/// the same obstacles in a different order produce the same key. Free text is
/// length-prefixed so no value can forge a field boundary.
#[derive(Debug, Clone)]
pub struct Fingerprint {
    buf: String,
}

impl Fingerprint {
    pub fn new(kind: &str) -> Self {
        let mut fp = Self { buf: String::with_capacity(64) };
        fp.buf.push_str(kind);
        fp.buf.push('|');
        fp
    }

    pub fn number(&mut self, name: &str, value: u64) -> &mut Self {
        self.open(name);
        self.write_u64(value);
        self.close()
    }

    pub fn flag(&mut self, name: &str, value: bool) -> &mut Self {
        self.open(name);
        self.buf.push(if value { '1' } else { '0' });
        self.close()
    }

    pub fn text(&mut self, name: &str, value: &str) -> &mut Self {
        self.open(name);
        self.write_u64(value.len() as u64);
        self.buf.push(':');
        self.buf.push_str(value);
        self.close()
    }

    pub fn optional_text(&mut self, name: &str, value: Option<&str>) -> &mut Self {
        match value {
            Some(value) => self.text(name, value),
            None => {
                self.open(name);
                self.buf.push('-');
                self.close()
            }
        }
    }

    pub fn point(&mut self, name: &str, point: Point) -> &mut Self {
        self.open(name);
        self.write_point(point);
        self.close()
    }

    /// Order-sensitive list of points.
    pub fn point_seq(&mut self, name: &str, points: impl IntoIterator<Item = Point>) -> &mut Self {
        self.open(name);
        for point in points {
            self.write_point(point);
        }
        self.close()
    }

    /// Order-insensitive set of points.
    pub fn point_set(&mut self, name: &str, points: impl IntoIterator<Item = Point>) -> &mut Self {
        let mut points = points.into_iter().collect::<Vec<_>>();
        points.sort_unstable();
        points.dedup();
        self.point_seq(name, points)
    }

    pub fn finish(&self) -> CacheKey {
        CacheKey(self.buf.clone())
    }

    fn open(&mut self, name: &str) {
        self.buf.push_str(name);
        self.buf.push('=');
    }

    fn close(&mut self) -> &mut Self {
        self.buf.push(';');
        self
    }

    fn write_u64(&mut self, value: u64) {
        self.buf.push_str(itoa::Buffer::new().format(value));
    }

    fn write_point(&mut self, point: Point) {
        self.buf.push('[');
        self.write_u64(point.row() as u64);
        self.buf.push(',');
        self.write_u64(point.column() as u64);
        self.buf.push(']');
    }
}
