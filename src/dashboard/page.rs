//! HTML Dashboard Page
//! Collects presented content and renders it into one self-contained page:
//! bar charts as inline SVG, heatmaps as Leaflet heat layers.

use crate::charts::{BarChart, Heatmap, StaticChartRenderer};
use crate::dashboard::{Presenter, RenderError};
use minijinja::{context, Environment};
use serde::Serialize;
use std::fs;
use std::path::Path;

const TEMPLATE_NAME: &str = "dashboard.html";
const TEMPLATE: &str = include_str!("../../templates/dashboard.html");

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Block {
    Section {
        text: String,
    },
    Note {
        text: String,
    },
    Chart {
        title: String,
        svg: String,
    },
    Map {
        id: String,
        title: String,
        /// JSON array of `[lat, lng, weight]` triples.
        points: String,
        center_lat: f64,
        center_lng: f64,
        zoom: u8,
        radius: f64,
        blur: f64,
        max_zoom: Option<u8>,
    },
}

/// Presenter that renders the dashboard as a single HTML file.
pub struct HtmlDashboard {
    title: String,
    blocks: Vec<Block>,
    chart_size: (u32, u32),
    map_size: (u32, u32),
    map_count: usize,
}

impl Default for HtmlDashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlDashboard {
    pub fn new() -> Self {
        Self {
            title: String::new(),
            blocks: Vec::new(),
            chart_size: (900, 540),
            map_size: (800, 400),
            map_count: 0,
        }
    }

    pub fn with_map_size(mut self, width: u32, height: u32) -> Self {
        self.map_size = (width, height);
        self
    }

    /// Render the collected content to HTML.
    pub fn render(&self) -> Result<String, RenderError> {
        let mut env = Environment::new();
        env.add_template(TEMPLATE_NAME, TEMPLATE)?;
        let template = env.get_template(TEMPLATE_NAME)?;

        let html = template.render(context! {
            title => &self.title,
            blocks => &self.blocks,
            map_width => self.map_size.0,
            map_height => self.map_size.1,
        })?;
        Ok(html)
    }

    /// Render and write the page, creating parent directories as needed.
    pub fn write_to(&self, path: &Path) -> Result<(), RenderError> {
        let html = self.render()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, html)?;
        log::info!("Wrote dashboard to {}", path.display());
        Ok(())
    }
}

impl Presenter for HtmlDashboard {
    fn heading(&mut self, text: &str) -> Result<(), RenderError> {
        self.title = text.to_string();
        Ok(())
    }

    fn section(&mut self, title: &str) -> Result<(), RenderError> {
        self.blocks.push(Block::Section {
            text: title.to_string(),
        });
        Ok(())
    }

    fn note(&mut self, text: &str) -> Result<(), RenderError> {
        self.blocks.push(Block::Note {
            text: text.to_string(),
        });
        Ok(())
    }

    fn bar_chart(&mut self, chart: &BarChart) -> Result<(), RenderError> {
        let (width, height) = self.chart_size;
        let svg = StaticChartRenderer::render_bar_chart_svg(chart, width, height)?;
        log::debug!("Rendered '{}' with {} bars", chart.title, chart.bars.len());

        self.blocks.push(Block::Chart {
            title: chart.title.clone(),
            svg,
        });
        Ok(())
    }

    fn heatmap(&mut self, heatmap: &Heatmap) -> Result<(), RenderError> {
        let triples: Vec<[f64; 3]> = heatmap
            .points
            .iter()
            .map(|p| [p.latitude, p.longitude, p.weight])
            .collect();
        self.map_count += 1;
        log::debug!("Heatmap '{}' with {} points", heatmap.title, triples.len());

        self.blocks.push(Block::Map {
            id: format!("map-{}", self.map_count),
            title: heatmap.title.clone(),
            points: serde_json::to_string(&triples)?,
            center_lat: heatmap.view.center_lat,
            center_lng: heatmap.view.center_lng,
            zoom: heatmap.view.zoom,
            radius: heatmap.view.radius,
            blur: heatmap.view.blur,
            max_zoom: heatmap.max_zoom,
        });
        Ok(())
    }
}
