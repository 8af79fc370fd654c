use plotters::style::RGBAColor;

/// Chart theme configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartTheme {
    pub background_color: RGBAColor,
    pub text_color: RGBAColor,
    pub grid_color: RGBAColor,
    pub point_color: RGBAColor,
    pub trend_color: RGBAColor,
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self {
            background_color: RGBAColor(255, 255, 255, 1.0),
            text_color: RGBAColor(30, 30, 30, 1.0),
            grid_color: RGBAColor(0, 0, 0, 0.15),
            point_color: RGBAColor(31, 119, 180, 0.3),
            trend_color: RGBAColor(214, 39, 40, 1.0),
        }
    }
}

/// Chart style configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    pub point_size: u32,
    pub line_width: u32,
    pub title_font_size: u32,
    pub font_size: u32,
    pub margin: u32,
    pub label_area_size: u32,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 1500,
            height: 900,
            point_size: 3,
            line_width: 2,
            title_font_size: 26,
            font_size: 18,
            margin: 20,
            label_area_size: 70,
        }
    }
}
