//! Statistics Calculator Module
//! Per-(state, city) accumulation shared by all aggregations.

use crate::data::{GeoKey, GeoRecord};
use statrs::statistics::Statistics;
use std::collections::BTreeMap;

/// Mean coordinates of a group. An axis is `None` when the group had no value for it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Centroid {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Centroid {
    /// Both axes, or nothing. A point without both cannot be placed on a map.
    pub fn point(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}

/// Rows seen for one group plus the non-null values needed for its means.
#[derive(Debug, Clone, Default)]
pub struct GeoAccumulator {
    rows: usize,
    latitudes: Vec<f64>,
    longitudes: Vec<f64>,
    values: Vec<f64>,
}

impl GeoAccumulator {
    pub fn push<R: GeoRecord>(&mut self, row: &R, value: Option<f64>) {
        self.rows += 1;
        if let Some(lat) = row.latitude() {
            self.latitudes.push(lat);
        }
        if let Some(lng) = row.longitude() {
            self.longitudes.push(lng);
        }
        if let Some(v) = value {
            self.values.push(v);
        }
    }

    /// Rows in the group, including those with null coordinates.
    pub fn count(&self) -> usize {
        self.rows
    }

    pub fn centroid(&self) -> Centroid {
        Centroid {
            latitude: GeoAggregator::mean(&self.latitudes),
            longitude: GeoAggregator::mean(&self.longitudes),
        }
    }

    /// Mean of the extra per-row value, if any row supplied one.
    pub fn value_mean(&self) -> Option<f64> {
        GeoAggregator::mean(&self.values)
    }
}

/// Groups geolocated rows by (state, city) and summarizes each group.
pub struct GeoAggregator;

impl GeoAggregator {
    /// Arithmetic mean, `None` for an empty slice.
    pub fn mean(values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            None
        } else {
            Some(values.iter().mean())
        }
    }

    /// Accumulate rows per key, ordered by key. Unkeyed rows are skipped.
    pub fn group_rows<'a, R, I, F>(rows: I, value: F) -> BTreeMap<GeoKey, GeoAccumulator>
    where
        R: GeoRecord + 'a,
        I: IntoIterator<Item = &'a R>,
        F: Fn(&R) -> Option<f64>,
    {
        let mut groups: BTreeMap<GeoKey, GeoAccumulator> = BTreeMap::new();
        let mut skipped = 0usize;

        for row in rows {
            match row.geo_key() {
                Some(key) => groups.entry(key).or_default().push(row, value(row)),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            log::warn!("Skipped {skipped} rows without state or city");
        }
        groups
    }

    /// Row count per key.
    pub fn count_by_key<'a, R, I>(rows: I) -> BTreeMap<GeoKey, usize>
    where
        R: GeoRecord + 'a,
        I: IntoIterator<Item = &'a R>,
    {
        let mut counts: BTreeMap<GeoKey, usize> = BTreeMap::new();
        for key in rows.into_iter().filter_map(|row| row.geo_key()) {
            *counts.entry(key).or_default() += 1;
        }
        counts
    }
}
