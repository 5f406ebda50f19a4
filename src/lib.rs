//! Olist Geo Dashboard - e-commerce customer, seller & installment dashboard
//!
//! Downloads the three datasets, groups them by (state, city) and renders a
//! single HTML page of ranked bar charts and geographic heatmaps.

pub mod charts;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod stats;
