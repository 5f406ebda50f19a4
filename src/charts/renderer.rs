//! Static Chart Renderer
//! Draws ranked bar charts to inline SVG with plotters.
//!
//! Layout: one horizontal bar per rank, the largest on top, city names on the
//! y axis. Unshaded charts use a viridis ramp by rank; shaded charts use a
//! blue ramp scaled to the bar's shade value.

use crate::charts::{Bar, BarChart};
use plotters::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Failed to draw chart: {0}")]
    Draw(String),
}

const VIRIDIS: [RGBColor; 10] = [
    RGBColor(68, 1, 84),
    RGBColor(72, 40, 120),
    RGBColor(62, 74, 137),
    RGBColor(49, 104, 142),
    RGBColor(38, 130, 142),
    RGBColor(31, 158, 137),
    RGBColor(53, 183, 121),
    RGBColor(109, 205, 89),
    RGBColor(180, 222, 44),
    RGBColor(253, 231, 37),
];

const LIGHT_BLUE: (u8, u8, u8) = (198, 219, 239);
const DARK_BLUE: (u8, u8, u8) = (8, 48, 107);

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render the chart as a standalone `<svg>` document.
    pub fn render_bar_chart_svg(
        chart: &BarChart,
        width: u32,
        height: u32,
    ) -> Result<String, ChartError> {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(draw_error)?;

            // at least one slot so an empty chart still has axes
            let slots = chart.bars.len().max(1) as i32;
            let x_max = Self::x_max(&chart.bars);
            let labels: Vec<&str> = chart.bars.iter().map(|b| b.label.as_str()).collect();

            let mut ctx = ChartBuilder::on(&root)
                .margin(15)
                .x_label_area_size(45)
                .y_label_area_size((width / 4).max(80))
                .build_cartesian_2d(0.0..x_max, (0..slots).into_segmented())
                .map_err(draw_error)?;

            ctx.configure_mesh()
                .disable_y_mesh()
                .x_desc(chart.x_label.as_str())
                .y_desc(chart.y_label.as_str())
                .axis_desc_style(("sans-serif", 16))
                .label_style(("sans-serif", 14))
                .y_labels(slots as usize)
                .y_label_formatter(&|v: &SegmentValue<i32>| match v {
                    SegmentValue::CenterOf(slot) => Self::slot_rank(slots, *slot)
                        .and_then(|rank| labels.get(rank))
                        .map(|label| label.to_string())
                        .unwrap_or_default(),
                    _ => String::new(),
                })
                .draw()
                .map_err(draw_error)?;

            let shade_range = Self::shade_range(&chart.bars);
            ctx.draw_series(chart.bars.iter().enumerate().map(|(rank, bar)| {
                let slot = slots - 1 - rank as i32;
                let color = Self::bar_color(bar, rank, chart.bars.len(), shade_range);
                let mut rect = Rectangle::new(
                    [
                        (0.0, SegmentValue::Exact(slot)),
                        (bar.value, SegmentValue::Exact(slot + 1)),
                    ],
                    color.filled(),
                );
                rect.set_margin(4, 4, 0, 0);
                rect
            }))
            .map_err(draw_error)?;

            root.present().map_err(draw_error)?;
        }
        Ok(svg)
    }

    fn x_max(bars: &[Bar]) -> f64 {
        let max = bars
            .iter()
            .map(|b| b.value)
            .filter(|v| v.is_finite())
            .fold(0.0, f64::max);
        if max > 0.0 {
            max * 1.05
        } else {
            1.0
        }
    }

    /// Slots count upward from the x axis; rank 0 sits in the top slot.
    fn slot_rank(slots: i32, slot: i32) -> Option<usize> {
        let rank = slots - 1 - slot;
        usize::try_from(rank).ok()
    }

    fn shade_range(bars: &[Bar]) -> Option<(f64, f64)> {
        let shades: Vec<f64> = bars.iter().filter_map(|b| b.shade).collect();
        if shades.is_empty() {
            return None;
        }
        let min = shades.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = shades.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        Some((min, max))
    }

    fn bar_color(bar: &Bar, rank: usize, total: usize, shade_range: Option<(f64, f64)>) -> RGBColor {
        match (bar.shade, shade_range) {
            (Some(shade), Some((min, max))) => {
                let t = if max > min {
                    (shade - min) / (max - min)
                } else {
                    1.0
                };
                Self::blend(LIGHT_BLUE, DARK_BLUE, t)
            }
            _ => {
                let idx = if total > 1 {
                    rank * (VIRIDIS.len() - 1) / (total - 1)
                } else {
                    0
                };
                VIRIDIS[idx.min(VIRIDIS.len() - 1)]
            }
        }
    }

    fn blend(from: (u8, u8, u8), to: (u8, u8, u8), t: f64) -> RGBColor {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        RGBColor(mix(from.0, to.0), mix(from.1, to.1), mix(from.2, to.2))
    }
}

fn draw_error(err: impl std::fmt::Display) -> ChartError {
    ChartError::Draw(err.to_string())
}
