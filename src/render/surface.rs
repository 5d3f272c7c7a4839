//! Constraint surface in 3D: batch size on an inverted x axis, tree height
//! in depth, `log2 Z` as height. Each facet takes the colour of its
//! whole-exponent bucket.

use std::error::Error;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::config::{AppConfig, SurfaceConfig};
use crate::core::error::CoreError;
use crate::core::log_scale::BucketNorm;
use crate::core::surface::Surface;
use crate::core::ticks::is_exponent_tick;
use crate::render::colormap::LinearColormap;
use crate::render::{pt, px};

pub const SIZE_IN: (f64, f64) = (6.0, 4.0);

/// Facets drawn along each axis at most; denser grids are strided.
const MAX_FACETS: usize = 50;

#[derive(Clone, Debug)]
pub struct SurfaceView {
    pub surface: Surface,
    pub norm: BucketNorm,
    pub colors: Vec<RGBColor>,
    pub tick_every: u32,
}

impl SurfaceView {
    fn u_bounds(&self) -> (f64, f64) {
        let u = &self.surface.u;
        match (u.first(), u.last()) {
            (Some(&a), Some(&b)) => (a, b),
            _ => (0.0, 1.0),
        }
    }

    fn y_bounds(&self) -> (f64, f64) {
        let y = &self.surface.y;
        match (y.first(), y.last()) {
            (Some(&a), Some(&b)) => (a, b),
            _ => (0.0, 1.0),
        }
    }

    /// Exponent span of the buckets, the vertical axis range.
    fn log2_bounds(&self) -> (f64, f64) {
        match (self.norm.buckets().first(), self.norm.buckets().last()) {
            (Some(first), Some(last)) => (first.lo, last.hi),
            _ => (self.norm.range().log2_min(), self.norm.range().log2_max()),
        }
    }

    /// Batch-size axis label at `u`, `2^e` with `e` the base-2 exponent.
    pub fn batch_label(&self, u: f64) -> String {
        let e = self.surface.x_exponent(u);
        if (e - e.round()).abs() < 1e-6 {
            format!("2^{}", e.round() as i64)
        } else {
            format!("2^{e:.1}")
        }
    }

    /// `log2 Z` at the grid sample nearest to `(u, height)`.
    pub fn log2_at(&self, u: f64, height: f64) -> f64 {
        let c = nearest_index(&self.surface.u, u);
        let r = nearest_index(&self.surface.y, height);
        self.surface.log2_z.get(r, c).unwrap_or(f64::NAN)
    }

    /// Fill colour of the bucket holding `log2_z`.
    pub fn facet_color(&self, log2_z: f64) -> RGBColor {
        self.colors
            .get(self.norm.nearest_bucket_log2(log2_z))
            .copied()
            .unwrap_or(WHITE)
    }
}

pub fn prepare(surface: Surface, cfg: &SurfaceConfig) -> Result<SurfaceView, CoreError> {
    let norm = BucketNorm::new(cfg.bucket_range()?, cfg.bucket_step)?;
    let colors = LinearColormap::yellow_green().discrete(norm.n_buckets());
    Ok(SurfaceView {
        surface,
        norm,
        colors,
        tick_every: cfg.tick_every,
    })
}

/// Index of the sample in ascending `xs` closest to `x`.
fn nearest_index(xs: &[f64], x: f64) -> usize {
    let i = xs.partition_point(|&v| v < x);
    match (i.checked_sub(1), xs.get(i)) {
        (Some(before), Some(&at)) if x - xs[before] < at - x => before,
        (Some(before), None) => before,
        _ => i,
    }
}

/// Evenly strided samples of `xs`, at most `max` of them, always ending on
/// the last one.
fn strided(xs: &[f64], max: usize) -> Vec<f64> {
    let Some(&last) = xs.last() else {
        return Vec::new();
    };
    let step = xs.len().div_ceil(max.max(2) - 1).max(1);
    let mut out: Vec<f64> = xs.iter().step_by(step).copied().collect();
    if out.last() != Some(&last) {
        out.push(last);
    }
    out
}

pub fn draw<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    view: &SurfaceView,
    config: &AppConfig,
) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let (w, _) = area.dim_in_pixel();
    let (main, bar) = area.split_horizontally((w as f64 * 0.84) as u32);
    draw_surface(&main, view, config.render.dpi)?;
    draw_colorbar(&bar, view, config.render.dpi)?;
    Ok(())
}

fn draw_surface<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    view: &SurfaceView,
    dpi: f64,
) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let (u_min, u_max) = view.u_bounds();
    let (y_min, y_max) = view.y_bounds();
    let (z_lo, z_hi) = view.log2_bounds();
    let first_tick = view.norm.range().log2_min().ceil();

    // Mirrored coordinate s = u_max - u so larger batches sit on the left.
    let s_max = (u_max - u_min).max(f64::EPSILON);
    let y_top = if y_max > y_min { y_max } else { y_min + 1.0 };

    let mut chart = ChartBuilder::on(area)
        .margin(px(10.0, dpi))
        .build_cartesian_3d(0.0..s_max, z_lo..z_hi, y_min..y_top)?;
    chart.with_projection(|mut pb| {
        pb.yaw = 0.6;
        pb.pitch = 0.35;
        pb.scale = 0.8;
        pb.into_matrix()
    });

    chart
        .configure_axes()
        .light_grid_style(BLACK.mix(0.08))
        .max_light_lines(3)
        .x_labels(6)
        .y_labels((z_hi - z_lo).ceil() as usize + 1)
        .z_labels(5)
        .x_formatter(&|s| view.batch_label(u_max - *s))
        .y_formatter(&|e| {
            if is_exponent_tick(*e, first_tick, view.tick_every) {
                format!("2^{}", e.round() as i64)
            } else {
                String::new()
            }
        })
        .z_formatter(&|h| format!("{h:.0}"))
        .label_style(("sans-serif", pt(10.0, dpi)))
        .draw()?;

    let us: Vec<f64> = strided(&view.surface.u, MAX_FACETS)
        .into_iter()
        .map(|u| u_max - u)
        .collect();
    let heights = strided(&view.surface.y, MAX_FACETS);
    let facet_style = |z: &f64| view.facet_color(*z).filled();
    chart.draw_series(
        SurfaceSeries::xoz(us.into_iter(), heights.into_iter(), |s: f64, h: f64| {
            view.log2_at(u_max - s, h)
        })
        .style_func(&facet_style),
    )?;

    let title = TextStyle::from(("sans-serif", pt(12.0, dpi)))
        .pos(Pos::new(HPos::Center, VPos::Center));
    let below = z_lo - 0.12 * (z_hi - z_lo);
    chart.draw_series([
        Text::new("batch size b", (0.5 * s_max, below, y_min), title.clone()),
        Text::new("tree height h", (s_max, below, 0.5 * (y_min + y_top)), title.clone()),
        Text::new("log₂ constraints", (0.0, z_hi, y_top), title),
    ])?;
    Ok(())
}

fn draw_colorbar<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    view: &SurfaceView,
    dpi: f64,
) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let range = view.norm.range();
    let (Some(first), Some(last)) = (view.norm.buckets().first(), view.norm.buckets().last())
    else {
        return Ok(());
    };
    let (lo, hi) = (first.lo, last.hi);
    let first_tick = range.log2_min().ceil();

    let mut chart = ChartBuilder::on(area)
        .margin(px(6.0, dpi))
        .margin_bottom(px(40.0, dpi))
        .y_label_area_size(px(30.0, dpi))
        .build_cartesian_2d(0.0..1.0, lo..hi)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_labels((hi - lo).ceil() as usize + 1)
        .y_label_formatter(&|e| {
            if is_exponent_tick(*e, first_tick, view.tick_every) {
                format!("2^{}", e.round() as i64)
            } else {
                String::new()
            }
        })
        .label_style(("sans-serif", pt(12.0, dpi)))
        .draw()?;

    chart.draw_series(
        view.norm
            .buckets()
            .iter()
            .zip(&view.colors)
            .map(|(b, c)| Rectangle::new([(0.0, b.lo), (1.0, b.hi)], c.filled())),
    )?;
    Ok(())
}
