//! Runtime heatmap: one row per group, one column per tree height, cells
//! coloured on a base-2 log scale with a colour bar labelled `2^n`.

use std::error::Error;

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::config::{AppConfig, HeatmapConfig};
use crate::core::error::CoreError;
use crate::core::grid::Grid;
use crate::core::heatmap::Heatmap;
use crate::core::log_scale::{ScaleRange, normalize_grid};
use crate::core::ticks::is_exponent_tick;
use crate::render::colormap::LinearColormap;
use crate::render::{pt, px};

pub const SIZE_IN: (f64, f64) = (3.0, 1.5);

const COLORBAR_SLICES: usize = 128;

#[derive(Clone, Debug)]
pub struct HeatmapView {
    pub row_labels: Vec<String>,
    pub col_labels: Vec<String>,
    /// Normalized colour positions; `NaN` cells stay blank.
    pub positions: Grid,
    pub range: ScaleRange,
    pub tick_every: u32,
}

impl HeatmapView {
    /// Whether `exponent` gets a colour-bar label.
    pub fn is_tick(&self, exponent: f64) -> bool {
        is_exponent_tick(exponent, self.range.log2_min().ceil(), self.tick_every)
    }
}

pub fn prepare(heatmap: &Heatmap, cfg: &HeatmapConfig) -> Result<HeatmapView, CoreError> {
    let range = match cfg.range()? {
        Some(r) => r,
        None => ScaleRange::from_data(heatmap.grid.values())?,
    };
    let positions = normalize_grid(&heatmap.grid, Some(range), cfg.clip)?;
    Ok(HeatmapView {
        row_labels: heatmap.row_labels.clone(),
        col_labels: heatmap.col_keys.iter().map(|h| format!("2^{h}")).collect(),
        positions,
        range,
        tick_every: cfg.tick_every,
    })
}

pub fn draw<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    view: &HeatmapView,
    config: &AppConfig,
) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let cmap = LinearColormap::warm();
    let (w, _) = area.dim_in_pixel();
    let (main, bar) = area.split_horizontally((w as f64 * 0.8) as u32);
    draw_cells(&main, view, &cmap, config.render.dpi)?;
    draw_colorbar(&bar, view, &cmap, config.render.dpi)?;
    Ok(())
}

fn draw_cells<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    view: &HeatmapView,
    cmap: &LinearColormap,
    dpi: f64,
) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let rows = view.positions.rows();
    let cols = view.positions.cols();
    let font = ("sans-serif", pt(9.0, dpi));

    let mut chart = ChartBuilder::on(area)
        .margin(px(3.0, dpi))
        .x_label_area_size(px(14.0, dpi))
        .y_label_area_size(px(36.0, dpi))
        .build_cartesian_2d(0.0..cols as f64, 0.0..rows as f64)?;

    // First row on top.
    let row_at = |y: f64| rows.checked_sub(1 + y.floor().max(0.0) as usize);
    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(cols * 2 + 1)
        .y_labels(rows * 2 + 1)
        .x_label_formatter(&|x| centred_label(*x, &view.col_labels, column_at))
        .y_label_formatter(&|y| centred_label(*y, &view.row_labels, row_at))
        .label_style(font)
        .draw()?;

    chart.draw_series(
        view.positions
            .cells()
            .filter(|(_, _, t)| !t.is_nan())
            .map(|(r, c, t)| {
                let y = (rows - 1 - r) as f64;
                Rectangle::new(
                    [(c as f64, y), (c as f64 + 1.0, y + 1.0)],
                    cmap.sample(t).filled(),
                )
            }),
    )?;
    Ok(())
}

fn column_at(x: f64) -> Option<usize> {
    (x >= 0.0).then(|| x.floor() as usize)
}

/// Label for a tick that falls on a cell centre, blank elsewhere.
fn centred_label(v: f64, labels: &[String], index: impl Fn(f64) -> Option<usize>) -> String {
    if (v - v.floor() - 0.5).abs() > 1e-6 {
        return String::new();
    }
    index(v)
        .and_then(|i| labels.get(i))
        .cloned()
        .unwrap_or_default()
}

fn draw_colorbar<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    view: &HeatmapView,
    cmap: &LinearColormap,
    dpi: f64,
) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let lo = view.range.log2_min();
    let hi = view.range.log2_max();
    let span = view.range.log2_span();

    let mut chart = ChartBuilder::on(area)
        .margin(px(3.0, dpi))
        .margin_bottom(px(17.0, dpi))
        .y_label_area_size(px(22.0, dpi))
        .build_cartesian_2d(0.0..1.0, lo..hi)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_labels(span.ceil() as usize + 1)
        .y_label_formatter(&|e| {
            if view.is_tick(*e) {
                format!("2^{}", e.round() as i64)
            } else {
                String::new()
            }
        })
        .label_style(("sans-serif", pt(8.0, dpi)))
        .draw()?;

    let dy = span / COLORBAR_SLICES as f64;
    chart.draw_series((0..COLORBAR_SLICES).map(|i| {
        let y0 = lo + i as f64 * dy;
        let t = (i as f64 + 0.5) / COLORBAR_SLICES as f64;
        Rectangle::new([(0.0, y0), (1.0, y0 + dy)], cmap.sample(t).filled())
    }))?;
    Ok(())
}
