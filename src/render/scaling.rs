//! Log-log runtime scaling chart: one colour and marker per hash family,
//! one line style per proving phase.

use std::error::Error;

use plotters::coord::Shift;
use plotters::element::DynElement;
use plotters::prelude::*;

use crate::config::AppConfig;
use crate::core::error::DomainError;
use crate::core::scaling::{Phase, ScalingLine, ScalingRecord, scaling_lines};
use crate::render::colormap::FAMILY_COLORS;
use crate::render::{dash_polyline, pt, px};

pub const SIZE_IN: (f64, f64) = (10.0, 6.0);

#[derive(Clone, Debug)]
pub struct ScalingView {
    pub lines: Vec<ScalingLine>,
    /// Families in first-seen order; index picks colour and marker.
    pub families: Vec<String>,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
}

impl ScalingView {
    fn family_index(&self, name: &str) -> usize {
        self.families.iter().position(|f| f == name).unwrap_or(0)
    }
}

pub fn prepare(records: &[ScalingRecord]) -> Result<ScalingView, DomainError> {
    let lines = scaling_lines(records)?;
    let mut families: Vec<String> = Vec::new();
    for line in &lines {
        if !families.contains(&line.name) {
            families.push(line.name.clone());
        }
    }
    let (xs, ys): (Vec<f64>, Vec<f64>) = lines.iter().flat_map(|l| l.points.iter().copied()).unzip();
    Ok(ScalingView {
        lines,
        families,
        x_range: padded_bounds(&xs),
        y_range: padded_bounds(&ys),
    })
}

fn padded_bounds(values: &[f64]) -> (f64, f64) {
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    let pad = ((hi - lo) * 0.05).max(0.1);
    (lo - pad, hi + pad)
}

/// On/off dash lengths in axis-fraction units.
fn phase_pattern(phase: Phase) -> &'static [f64] {
    match phase {
        Phase::Setup => &[],
        Phase::Prove => &[0.015, 0.008],
        Phase::Verify => &[0.003, 0.006],
    }
}

fn marker<DB: DrawingBackend>(
    family: usize,
    at: (f64, f64),
    size: u32,
    color: RGBColor,
) -> DynElement<'static, DB, (f64, f64)> {
    match family % 4 {
        0 => Circle::new(at, size, color.filled()).into_dyn(),
        1 => TriangleMarker::new(at, size + 1, color.filled()).into_dyn(),
        2 => Cross::new(at, size, color.stroke_width(2)).into_dyn(),
        _ => Circle::new(at, size, color.stroke_width(2)).into_dyn(),
    }
}

pub fn draw<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    view: &ScalingView,
    config: &AppConfig,
) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let dpi = config.render.dpi;
    let font = ("sans-serif", pt(14.0, dpi));
    let (x0, x1) = view.x_range;
    let (y0, y1) = view.y_range;

    let mut chart = ChartBuilder::on(area)
        .caption("Runtime by constraint count", ("sans-serif", pt(16.0, dpi)))
        .margin(px(10.0, dpi))
        .x_label_area_size(px(40.0, dpi))
        .y_label_area_size(px(50.0, dpi))
        .build_cartesian_2d(x0..x1, y0..y1)?;

    chart
        .configure_mesh()
        .light_line_style(BLACK.mix(0.05))
        .bold_line_style(BLACK.mix(0.15))
        .x_desc("Exponent (log₂ C)")
        .y_desc("Runtime (seconds, 10^x)")
        .x_label_formatter(&|x| format!("{x:.1}"))
        .y_label_formatter(&|y| format!("{y:.1}"))
        .label_style(font)
        .axis_desc_style(font)
        .draw()?;

    let marker_size = px(4.0, dpi).max(2);
    let scale = (x1 - x0, y1 - y0);
    for line in &view.lines {
        let family = view.family_index(&line.name);
        let color = FAMILY_COLORS[family % FAMILY_COLORS.len()];
        chart.draw_series(
            dash_polyline(&line.points, scale, phase_pattern(line.phase))
                .into_iter()
                .map(|piece| PathElement::new(piece, color.stroke_width(2))),
        )?;
        chart.draw_series(
            line.points
                .iter()
                .map(|&p| marker::<DB>(family, p, marker_size, color)),
        )?;
    }

    // Families by colour and marker.
    for (i, name) in view.families.iter().enumerate() {
        let color = FAMILY_COLORS[i % FAMILY_COLORS.len()];
        chart
            .draw_series(std::iter::empty::<PathElement<(f64, f64)>>())?
            .label(name.as_str())
            .legend(move |(x, y)| {
                EmptyElement::at((x, y))
                    + PathElement::new(vec![(0, 0), (20, 0)], color.stroke_width(2))
                    + Circle::new((10, 0), 3, color.filled())
            });
    }
    // Phases by line style.
    for phase in Phase::ALL {
        let [d0, d1, d2] = legend_dashes(phase);
        let dash = |(a, b): (i32, i32)| PathElement::new(vec![(a, 0), (b, 0)], BLACK.stroke_width(2));
        chart
            .draw_series(std::iter::empty::<PathElement<(f64, f64)>>())?
            .label(phase.label())
            .legend(move |(x, y)| EmptyElement::at((x, y)) + dash(d0) + dash(d1) + dash(d2));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .label_font(("sans-serif", pt(12.0, dpi)))
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK.mix(0.4))
        .draw()?;
    Ok(())
}

/// Pixel dash spans for a 20 px legend swatch.
fn legend_dashes(phase: Phase) -> [(i32, i32); 3] {
    match phase {
        Phase::Setup => [(0, 7), (7, 14), (14, 20)],
        Phase::Prove => [(0, 6), (9, 15), (18, 20)],
        Phase::Verify => [(0, 2), (9, 11), (18, 20)],
    }
}
