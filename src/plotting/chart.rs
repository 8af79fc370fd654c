use plotters::coord::ranged1d::{AsRangedCoord, ValueFormatter};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::error::Error;
use std::ops::Range;
use std::path::Path;

use crate::plotting::styles::{ChartStyle, ChartTheme};

pub type PlotError = Box<dyn Error + Send + Sync>;

const TREND_SAMPLES: usize = 100;

/// A scatter plot of one process metric against one quality metric
#[derive(Debug, Clone)]
pub struct ScatterPlot<'a> {
    pub title: String,
    pub subtitle: String,
    pub x_label: String,
    pub y_label: String,
    pub points: &'a [(f64, f64)],
    pub log_x: bool,
    /// Least-squares `(slope, intercept)` in data space
    pub trend: Option<(f64, f64)>,
}

/// Padded axis range covering `values`.
///
/// Log axes pad multiplicatively and require every value to be positive.
pub fn axis_range(values: &[f64], log: bool) -> Range<f64> {
    let finite = values.iter().copied().filter(|v| v.is_finite());
    let (min, max) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });

    if !min.is_finite() || !max.is_finite() {
        return if log { 1.0..10.0 } else { 0.0..1.0 };
    }

    if log {
        if min == max {
            return (min / 2.0)..(max * 2.0);
        }
        return (min / 1.2)..(max * 1.2);
    }

    if min == max {
        return (min - 1.0)..(max + 1.0);
    }
    let pad = (max - min) * 0.05;
    (min - pad)..(max + pad)
}

/// Points along the trend line across `x_range`, log-spaced on log axes
pub fn trend_points(trend: (f64, f64), x_range: &Range<f64>, log: bool) -> Vec<(f64, f64)> {
    let (slope, intercept) = trend;
    (0..=TREND_SAMPLES)
        .map(|i| {
            let t = i as f64 / TREND_SAMPLES as f64;
            let x = if log {
                let (lo, hi) = (x_range.start.ln(), x_range.end.ln());
                (lo + (hi - lo) * t).exp()
            } else {
                x_range.start + (x_range.end - x_range.start) * t
            };
            (x, slope * x + intercept)
        })
        .collect()
}

/// Render `plot` to a PNG at `path`
pub fn render_scatter(
    plot: &ScatterPlot,
    path: &Path,
    theme: &ChartTheme,
    style: &ChartStyle,
) -> Result<(), PlotError> {
    let root = BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
    root.fill(&theme.background_color)?;

    let title_font = ("sans-serif", style.title_font_size)
        .into_font()
        .color(&theme.text_color);
    let area = root.titled(&plot.title, title_font.clone())?;
    let area = area.titled(&plot.subtitle, title_font)?;

    let xs: Vec<f64> = plot.points.iter().map(|(x, _)| *x).collect();
    let x_range = axis_range(&xs, plot.log_x);

    let trend = plot
        .trend
        .map(|trend| trend_points(trend, &x_range, plot.log_x))
        .unwrap_or_default();
    let ys: Vec<f64> = plot
        .points
        .iter()
        .map(|(_, y)| *y)
        .chain(trend.iter().map(|(_, y)| *y))
        .collect();
    let y_range = axis_range(&ys, false);

    if plot.log_x {
        draw_chart(&area, x_range.log_scale(), y_range, plot, &trend, theme, style)?;
    } else {
        draw_chart(&area, x_range, y_range, plot, &trend, theme, style)?;
    }

    root.present()?;
    Ok(())
}

fn draw_chart<XS>(
    area: &DrawingArea<BitMapBackend, Shift>,
    x_spec: XS,
    y_range: Range<f64>,
    plot: &ScatterPlot,
    trend: &[(f64, f64)],
    theme: &ChartTheme,
    style: &ChartStyle,
) -> Result<(), PlotError>
where
    XS: AsRangedCoord<Value = f64>,
    XS::CoordDescType: ValueFormatter<f64>,
{
    let mut chart = ChartBuilder::on(area)
        .margin(style.margin)
        .set_all_label_area_size(style.label_area_size)
        .build_cartesian_2d(x_spec, y_range)?;

    let label_font = ("sans-serif", style.font_size)
        .into_font()
        .color(&theme.text_color);

    chart
        .configure_mesh()
        .x_desc(plot.x_label.as_str())
        .y_desc(plot.y_label.as_str())
        .axis_desc_style(label_font.clone())
        .label_style(label_font)
        .bold_line_style(theme.grid_color)
        .light_line_style(TRANSPARENT)
        .draw()?;

    let point_style = theme.point_color.filled();
    chart.draw_series(
        plot.points
            .iter()
            .map(|&(x, y)| Circle::new((x, y), style.point_size as i32, point_style)),
    )?;

    if !trend.is_empty() {
        chart.draw_series(LineSeries::new(
            trend.iter().copied(),
            theme.trend_color.stroke_width(style.line_width),
        ))?;
    }

    Ok(())
}
