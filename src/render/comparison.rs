//! Dual-colour gas comparison scatter: one colour per comparison group,
//! faint connectors between the two values at each index, and dash-dot
//! lines at the overall means.

use std::error::Error;

use plotters::chart::SeriesAnno;
use plotters::coord::Shift;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::config::{AppConfig, ComparisonConfig};
use crate::core::error::ShapeMismatchError;
use crate::core::paired::{Comparator, Comparison, ComparisonGroup, PairedSeries};
use crate::core::ticks::format_scientific;
use crate::render::colormap::{GROUP_A, GROUP_A_CONNECTOR, GROUP_B, GROUP_B_CONNECTOR, MEAN_LINE};
use crate::render::{dash_polyline, pt, px};

/// Figure size in inches.
pub const SIZE_IN: (f64, f64) = (6.0, 1.5);

/// Dash, gap, dot, gap as fractions of the line length.
const DASH_DOT: [f64; 4] = [0.009, 0.004, 0.001, 0.004];

#[derive(Clone, Debug)]
pub struct ComparisonView {
    pub comparison: Comparison,
    pub n: usize,
    pub y_min: f64,
    pub y_max: f64,
    pub legend_a: String,
    pub legend_b: String,
}

pub fn prepare(
    series: &PairedSeries,
    cfg: &ComparisonConfig,
) -> Result<ComparisonView, ShapeMismatchError> {
    let comparison = Comparator::new(cfg.tie_break).compare(series)?;
    let lo = comparison
        .segments
        .iter()
        .map(|s| s.low)
        .fold(f64::INFINITY, f64::min);
    let hi = comparison
        .segments
        .iter()
        .map(|s| s.high)
        .fold(f64::NEG_INFINITY, f64::max);
    let (y_min, y_max) = padded(lo, hi);
    Ok(ComparisonView {
        n: series.len(),
        y_min,
        y_max,
        legend_a: format!("{} < {} gas used", cfg.baseline_label, cfg.candidate_label),
        legend_b: format!("{} ≥ {} gas used", cfg.baseline_label, cfg.candidate_label),
        comparison,
    })
}

/// Anchors for the `Mean:` caption and its value, stacked above and below
/// the mean line.
fn mean_label_anchors() -> [Pos; 2] {
    [
        Pos::new(HPos::Left, VPos::Bottom),
        Pos::new(HPos::Left, VPos::Top),
    ]
}

fn padded(lo: f64, hi: f64) -> (f64, f64) {
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    let span = hi - lo;
    if span.abs() < 1e-12 {
        let pad = lo.abs().max(1.0) * 0.05;
        return (lo - pad, hi + pad);
    }
    (lo - 0.05 * span, hi + 0.05 * span)
}

pub fn draw<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    view: &ComparisonView,
    config: &AppConfig,
) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let dpi = config.render.dpi;
    let font = ("sans-serif", pt(9.0, dpi));
    let n = view.n as f64;
    // Room on the right for the mean annotations.
    let x_max = n + 0.18 * n.max(1.0) + 1.0;

    let mut chart = ChartBuilder::on(area)
        .margin(px(4.0, dpi))
        .x_label_area_size(px(14.0, dpi))
        .y_label_area_size(px(32.0, dpi))
        .build_cartesian_2d(0.0..x_max, view.y_min..view.y_max)?;

    chart
        .configure_mesh()
        .light_line_style(BLACK.mix(0.05))
        .bold_line_style(BLACK.mix(0.12))
        .x_labels(6)
        .y_labels(5)
        .x_label_formatter(&|x| format!("{x:.0}"))
        .y_label_formatter(&|y| format_scientific(*y, 1))
        .y_desc(config.comparison.y_label.as_str())
        .label_style(font)
        .draw()?;

    let groups = [
        (&view.comparison.partition.group_a, GROUP_A, GROUP_A_CONNECTOR, &view.legend_a),
        (&view.comparison.partition.group_b, GROUP_B, GROUP_B_CONNECTOR, &view.legend_b),
    ];

    for (group, _, connector, _) in &groups {
        chart.draw_series(group.points.iter().map(|p| {
            let x = p.index as f64;
            PathElement::new(
                vec![
                    (x, p.baseline.min(p.candidate)),
                    (x, p.baseline.max(p.candidate)),
                ],
                connector.mix(0.25),
            )
        }))?;
    }

    let radius = px(0.8, dpi).max(1);
    for (group, color, _, legend) in &groups {
        let color = *color;
        draw_group_points(&mut chart, group, color, radius)?
            .label(legend.as_str())
            .legend(move |(x, y)| Circle::new((x, y), radius + 2, color.filled()));
    }

    let [caption_at, value_at] = mean_label_anchors();
    for mean in [view.comparison.baseline_mean, view.comparison.candidate_mean] {
        draw_dash_dot(&mut chart, 0.0, n, mean, MEAN_LINE)?;
        let x = n + 0.06 * n.max(1.0);
        chart.draw_series([
            Text::new("Mean:".to_string(), (x, mean), TextStyle::from(font).pos(caption_at)),
            Text::new(
                format_scientific(mean, 2),
                (x, mean),
                TextStyle::from(font).pos(value_at),
            ),
        ])?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerRight)
        .label_font(font)
        .background_style(WHITE.mix(0.5))
        .border_style(BLACK.mix(0.3))
        .draw()?;

    Ok(())
}

type Chart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Baseline and candidate points of one group, both in the group colour.
fn draw_group_points<'c, 'a, DB: DrawingBackend>(
    chart: &'c mut Chart<'a, DB>,
    group: &ComparisonGroup,
    color: RGBColor,
    radius: u32,
) -> Result<&'c mut SeriesAnno<'a, DB>, Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let style = color.mix(0.5).filled();
    chart.draw_series(
        group
            .baseline_points()
            .map(|(i, v)| Circle::new((i as f64, v), radius, style)),
    )?;
    let anno = chart.draw_series(
        group
            .candidate_points()
            .map(|(i, v)| Circle::new((i as f64, v), radius, style)),
    )?;
    Ok(anno)
}

/// Horizontal dash-dot line at `y` from `x0` to `x1`.
fn draw_dash_dot<DB: DrawingBackend>(
    chart: &mut Chart<'_, DB>,
    x0: f64,
    x1: f64,
    y: f64,
    color: RGBColor,
) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let pieces = dash_polyline(&[(x0, y), (x1, y)], (x1 - x0, 1.0), &DASH_DOT);
    chart.draw_series(
        pieces
            .into_iter()
            .map(|p| PathElement::new(p, color.stroke_width(2))),
    )?;
    Ok(())
}
