//! Dashboard module - presentation seam, HTML page and pipeline driver

mod app;
mod page;

pub use app::{Dashboard, DashboardError};
pub use page::HtmlDashboard;

use crate::charts::{BarChart, ChartError, Heatmap};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Chart(#[from] ChartError),
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
    #[error("Failed to encode heatmap points: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to write page: {0}")]
    Io(#[from] std::io::Error),
}

/// Receives the dashboard content in page order.
///
/// The aggregation code never sees a concrete renderer; anything that can
/// show a heading, text, a bar chart and a heatmap can present the results.
pub trait Presenter {
    fn heading(&mut self, text: &str) -> Result<(), RenderError>;
    fn section(&mut self, title: &str) -> Result<(), RenderError>;
    fn note(&mut self, text: &str) -> Result<(), RenderError>;
    fn bar_chart(&mut self, chart: &BarChart) -> Result<(), RenderError>;
    fn heatmap(&mut self, heatmap: &Heatmap) -> Result<(), RenderError>;
}
