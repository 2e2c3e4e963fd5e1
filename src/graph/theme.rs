use crate::graph::primitives::Color;

/// Colors and stroke widths for one appearance mode.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub background: Color,
    pub grid: Color,
    pub grid_width: f64,
    pub minor_grid: Color,
    pub minor_grid_width: f64,
    pub axis: Color,
    pub text: Color,
    /// Curve colors, assigned cyclically by expression position.
    pub series: &'static [Color],
}

/// Curve colors on a light background.
pub const LIGHT_SERIES: &[Color] = &[
    Color::rgb(0xF4, 0x43, 0x36), // red
    Color::rgb(0x21, 0x96, 0xF3), // blue
    Color::rgb(0x4C, 0xAF, 0x50), // green
    Color::rgb(0xFF, 0x98, 0x00), // orange
    Color::rgb(0x9C, 0x27, 0xB0), // purple
];

/// Brighter curve colors for a dark background.
pub const DARK_SERIES: &[Color] = &[
    Color::rgb(0xEF, 0x53, 0x50), // red
    Color::rgb(0x42, 0xA5, 0xF5), // blue
    Color::rgb(0x66, 0xBB, 0x6A), // green
    Color::rgb(0xFF, 0xA7, 0x26), // orange
    Color::rgb(0xAB, 0x47, 0xBC), // purple
];

impl Theme {
    pub fn light() -> Self {
        Self {
            background: Color::WHITE,
            grid: Color::rgb(0xBD, 0xBD, 0xBD),
            grid_width: 1.5,
            minor_grid: Color::rgb(0xE0, 0xE0, 0xE0),
            minor_grid_width: 1.2,
            axis: Color::BLACK,
            text: Color::BLACK,
            series: LIGHT_SERIES,
        }
    }

    pub fn dark() -> Self {
        Self {
            background: Color::BLACK,
            grid: Color::rgb(0x75, 0x75, 0x75),
            grid_width: 1.5,
            minor_grid: Color::rgb(0x9E, 0x9E, 0x9E),
            minor_grid_width: 1.2,
            axis: Color::WHITE,
            text: Color::WHITE,
            series: DARK_SERIES,
        }
    }

    pub fn for_mode(dark_mode: bool) -> Self {
        if dark_mode {
            Self::dark()
        } else {
            Self::light()
        }
    }

    /// Color of the `index`-th expression.
    pub fn series_color(&self, index: usize) -> Color {
        if self.series.is_empty() {
            return self.axis;
        }
        self.series[index % self.series.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_colors_cycle() {
        let theme = Theme::light();
        assert_eq!(theme.series_color(0), theme.series_color(5));
        assert_ne!(theme.series_color(0), theme.series_color(1));
    }

    #[test]
    fn test_modes_differ() {
        assert_ne!(Theme::for_mode(true).background, Theme::for_mode(false).background);
        assert_ne!(Theme::dark().series_color(0), Theme::light().series_color(0));
    }
}
