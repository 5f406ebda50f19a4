//! Chart Plotter Module
//! Turns aggregated tables into ranked bar charts and weighted heatmaps.

use crate::stats::{GeoDistribution, InstallmentStats};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One bar of a ranked chart. `shade` drives the colour intensity when set.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    pub shade: Option<f64>,
}

/// Horizontal bar chart, bars in rank order (largest first).
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bars: Vec<Bar>,
}

/// A weighted point on the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub weight: f64,
}

/// Initial map position and heat layer styling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapView {
    pub center_lat: f64,
    pub center_lng: f64,
    pub zoom: u8,
    pub radius: f64,
    pub blur: f64,
}

impl Default for MapView {
    /// Centred on Brazil.
    fn default() -> Self {
        Self {
            center_lat: -14.2350,
            center_lng: -51.9253,
            zoom: 4,
            radius: 10.0,
            blur: 12.0,
        }
    }
}

/// Weighted geographic heatmap.
#[derive(Debug, Clone, PartialEq)]
pub struct Heatmap {
    pub title: String,
    pub points: Vec<HeatPoint>,
    pub view: MapView,
    pub max_zoom: Option<u8>,
}

/// Which population a distribution chart describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Population {
    Customer,
    Seller,
}

impl Population {
    pub fn label(&self) -> &'static str {
        match self {
            Population::Customer => "Customer",
            Population::Seller => "Seller",
        }
    }
}

/// Builds chart descriptions from aggregation results.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Top cities by count. Cities sharing a name across states are summed.
    pub fn top_cities(
        distribution: &[GeoDistribution],
        population: Population,
        top_n: usize,
    ) -> BarChart {
        let mut per_city: BTreeMap<&str, usize> = BTreeMap::new();
        for group in distribution {
            *per_city.entry(group.key.city.as_str()).or_default() += group.count;
        }

        let mut ranked: Vec<(&str, usize)> = per_city.into_iter().collect();
        // stable: equal counts keep alphabetical order
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        let label = population.label();
        BarChart {
            title: format!("Top {top_n} Cities by {label} Count"),
            x_label: format!("{label} Count"),
            y_label: "City".to_string(),
            bars: ranked
                .into_iter()
                .take(top_n)
                .map(|(city, count)| Bar {
                    label: city.to_string(),
                    value: count as f64,
                    shade: None,
                })
                .collect(),
        }
    }

    /// Top cities by installment tendency, shaded by transaction count.
    pub fn top_installment_cities(analysis: &[InstallmentStats], top_n: usize) -> BarChart {
        let mut ranked: Vec<&InstallmentStats> = analysis
            .iter()
            .filter(|stats| stats.installment_tendency.is_finite())
            .collect();
        ranked.sort_by(|a, b| b.installment_tendency.total_cmp(&a.installment_tendency));

        BarChart {
            title: format!(
                "Top {top_n} Cities with High Installment Tendency (Weighted by Transactions)"
            ),
            x_label: "Installment Tendency (%)".to_string(),
            y_label: "City".to_string(),
            bars: ranked
                .into_iter()
                .take(top_n)
                .map(|stats| Bar {
                    label: stats.key.city.clone(),
                    value: stats.installment_tendency,
                    shade: Some(stats.installment_transactions as f64),
                })
                .collect(),
        }
    }

    /// Density heatmap weighted by `ln(1 + count)`.
    pub fn count_heatmap(
        distribution: &[GeoDistribution],
        population: Population,
        view: MapView,
    ) -> Heatmap {
        let points = Self::heat_points(
            distribution
                .iter()
                .map(|group| (group.centroid.point(), (group.count as f64).ln_1p())),
        );

        Heatmap {
            title: format!("{} Distribution Heatmap", population.label()),
            points,
            view,
            max_zoom: None,
        }
    }

    /// Heatmap weighted by installment tendency.
    pub fn tendency_heatmap(analysis: &[InstallmentStats], view: MapView) -> Heatmap {
        let points = Self::heat_points(
            analysis
                .iter()
                .map(|stats| (stats.centroid.point(), stats.installment_tendency)),
        );

        Heatmap {
            title: "Credit Card Usage Distribution Heatmap".to_string(),
            points,
            view,
            max_zoom: Some(1),
        }
    }

    /// Keep only points with both coordinates and a finite weight.
    fn heat_points(candidates: impl Iterator<Item = (Option<(f64, f64)>, f64)>) -> Vec<HeatPoint> {
        let mut dropped = 0usize;
        let points: Vec<HeatPoint> = candidates
            .filter_map(|(point, weight)| match point {
                Some((latitude, longitude)) if weight.is_finite() => Some(HeatPoint {
                    latitude,
                    longitude,
                    weight,
                }),
                _ => {
                    dropped += 1;
                    None
                }
            })
            .collect();

        if dropped > 0 {
            log::warn!("Dropped {dropped} heatmap points without coordinates");
        }
        points
    }
}
