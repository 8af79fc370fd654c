mod chart;
mod styles;


pub use chart::{axis_range, render_scatter, trend_points, PlotError, ScatterPlot};
pub use styles::{ChartStyle, ChartTheme};
