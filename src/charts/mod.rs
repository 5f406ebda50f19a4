//! Charts module - Chart preparation and rendering

mod plotter;
mod renderer;

pub use plotter::{Bar, BarChart, ChartPlotter, HeatPoint, Heatmap, MapView, Population};
pub use renderer::{ChartError, StaticChartRenderer};
