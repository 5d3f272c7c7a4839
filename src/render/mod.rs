//! Figure rendering on top of plotters. Each figure has a pure `prepare`
//! step, which does all the numeric work and can fail on bad data, and a
//! `draw` step generic over the drawing backend.

pub mod colormap;
pub mod comparison;
pub mod heatmap;
pub mod scaling;
pub mod surface;

use std::error::Error;
use std::fs;
use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::debug;

use crate::config::{AppConfig, ImageFormat};
use crate::core::heatmap::Heatmap;
use crate::core::paired::PairedSeries;
use crate::core::scaling::ScalingRecord;
use crate::core::surface::Surface;

/// Input of one figure.
#[derive(Clone, Debug)]
pub enum Figure {
    Comparison(PairedSeries),
    Heatmap(Heatmap),
    Surface(Surface),
    Scaling(Vec<ScalingRecord>),
}

enum Prepared {
    Comparison(comparison::ComparisonView),
    Heatmap(heatmap::HeatmapView),
    Surface(surface::SurfaceView),
    Scaling(scaling::ScalingView),
}

impl Prepared {
    fn size_in(&self) -> (f64, f64) {
        match self {
            Prepared::Comparison(_) => comparison::SIZE_IN,
            Prepared::Heatmap(_) => heatmap::SIZE_IN,
            Prepared::Surface(_) => surface::SIZE_IN,
            Prepared::Scaling(_) => scaling::SIZE_IN,
        }
    }

    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        config: &AppConfig,
    ) -> Result<(), Box<dyn Error>>
    where
        DB::ErrorType: 'static,
    {
        root.fill(&WHITE)?;
        match self {
            Prepared::Comparison(v) => comparison::draw(root, v, config)?,
            Prepared::Heatmap(v) => heatmap::draw(root, v, config)?,
            Prepared::Surface(v) => surface::draw(root, v, config)?,
            Prepared::Scaling(v) => scaling::draw(root, v, config)?,
        }
        root.present()?;
        Ok(())
    }
}

fn prepare(figure: Figure, config: &AppConfig) -> Result<Prepared, Box<dyn Error>> {
    Ok(match figure {
        Figure::Comparison(series) => {
            Prepared::Comparison(comparison::prepare(&series, &config.comparison)?)
        }
        Figure::Heatmap(hm) => Prepared::Heatmap(heatmap::prepare(&hm, &config.heatmap)?),
        Figure::Surface(s) => Prepared::Surface(surface::prepare(s, &config.surface)?),
        Figure::Scaling(records) => Prepared::Scaling(scaling::prepare(&records)?),
    })
}

/// Render `figure` to `out_path` in the configured image format. Nothing is
/// written when the data cannot be prepared.
pub fn render(figure: Figure, config: &AppConfig, out_path: &Path) -> Result<(), Box<dyn Error>> {
    let prepared = prepare(figure, config)?;
    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let (w_in, h_in) = prepared.size_in();
    let size = config.render.pixels(w_in, h_in);
    debug!("rendering {}x{} px to {}", size.0, size.1, out_path.display());
    match config.render.format {
        ImageFormat::Svg => {
            let root = SVGBackend::new(out_path, size).into_drawing_area();
            prepared.draw(&root, config)?;
        }
        ImageFormat::Png => {
            let root = BitMapBackend::new(out_path, size).into_drawing_area();
            prepared.draw(&root, config)?;
        }
    }
    Ok(())
}

/// Font size in pixels for `points` at `dpi`.
pub(crate) fn pt(points: f64, dpi: f64) -> f64 {
    points * dpi / 72.0
}

/// Layout length in whole pixels for `points` at `dpi`.
pub(crate) fn px(points: f64, dpi: f64) -> u32 {
    pt(points, dpi).round().max(0.0) as u32
}

/// Split a polyline into dash pieces. `pattern` alternates on/off lengths
/// measured after dividing x and y by `scale`; an empty pattern keeps the
/// line whole.
pub(crate) fn dash_polyline(
    points: &[(f64, f64)],
    scale: (f64, f64),
    pattern: &[f64],
) -> Vec<Vec<(f64, f64)>> {
    if points.len() < 2 || pattern.is_empty() || pattern.iter().all(|&p| p <= 0.0) {
        return vec![points.to_vec()];
    }
    let (sx, sy) = (scale.0.max(f64::EPSILON), scale.1.max(f64::EPSILON));

    let mut pieces = Vec::new();
    let mut current: Vec<(f64, f64)> = vec![points[0]];
    let mut slot = 0;
    let mut left = pattern[0];

    for w in points.windows(2) {
        let (a, b) = (w[0], w[1]);
        let len = (((b.0 - a.0) / sx).powi(2) + ((b.1 - a.1) / sy).powi(2)).sqrt();
        let mut t = 0.0;
        while len - t > left {
            t += left;
            let f = t / len;
            let p = (a.0 + (b.0 - a.0) * f, a.1 + (b.1 - a.1) * f);
            if slot % 2 == 0 {
                current.push(p);
                pieces.push(std::mem::take(&mut current));
            } else {
                current = vec![p];
            }
            slot = (slot + 1) % pattern.len();
            left = pattern[slot];
        }
        left -= len - t;
        if slot % 2 == 0 {
            current.push(b);
        }
    }
    if slot % 2 == 0 && current.len() >= 2 {
        pieces.push(current);
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::surface::{SurfaceParams, constraint_surface};
    use approx::assert_abs_diff_eq;

    #[test]
    fn points_to_pixels() {
        assert_abs_diff_eq!(pt(9.0, 72.0), 9.0);
        assert_abs_diff_eq!(pt(9.0, 200.0), 25.0);
        assert_eq!(px(3.6, 100.0), 5);
    }

    #[test]
    fn dashes_split_straight_line() {
        let pieces = dash_polyline(&[(0.0, 0.0), (10.0, 0.0)], (1.0, 1.0), &[2.0, 1.0]);
        assert_eq!(pieces.len(), 4);
        assert_eq!(pieces[0], vec![(0.0, 0.0), (2.0, 0.0)]);
        assert_eq!(pieces[1], vec![(3.0, 0.0), (5.0, 0.0)]);
        assert_eq!(pieces[3], vec![(9.0, 0.0), (10.0, 0.0)]);
    }

    #[test]
    fn dashes_follow_corners() {
        let pieces = dash_polyline(&[(0.0, 0.0), (1.0, 0.0), (1.0, 4.0)], (1.0, 1.0), &[2.0, 10.0]);
        assert_eq!(pieces, vec![vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]]);
    }

    #[test]
    fn empty_pattern_is_solid() {
        let line = vec![(0.0, 0.0), (1.0, 1.0)];
        assert_eq!(dash_polyline(&line, (1.0, 1.0), &[]), vec![line]);
    }

    #[test]
    #[ignore]
    fn renders_surface_svg() {
        let surface = constraint_surface(&SurfaceParams {
            u_steps: 40,
            y_steps: 10,
            ..SurfaceParams::default()
        })
        .unwrap();
        let out = std::env::temp_dir().join("costfig_surface_test.svg");
        let mut config = AppConfig::default();
        config.render.dpi = 72.0;
        render(Figure::Surface(surface), &config, &out).unwrap();
        assert!(fs::metadata(&out).unwrap().len() > 0);
    }
}
