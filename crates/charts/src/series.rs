use foundation::color::Rgba;

/// Fill, outline and outline width of one plotted series.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SeriesStyle {
    pub background: Rgba,
    pub border: Rgba,
    pub border_width: f64,
}

impl SeriesStyle {
    /// Translucent fill over an opaque outline of the same hue.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            background: Rgba::from_rgb8(r, g, b, 0.2),
            border: Rgba::from_rgb8(r, g, b, 1.0),
            border_width: 2.0,
        }
    }

    pub fn global() -> Self {
        Self::from_rgb8(59, 130, 246)
    }

    pub fn region() -> Self {
        Self::from_rgb8(34, 197, 94)
    }

    pub fn city() -> Self {
        Self::from_rgb8(234, 179, 8)
    }
}

/// One named, colored sequence of values plotted on the radar.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub data: Vec<f64>,
    pub style: SeriesStyle,
}

/// Labels plus the Global / Region / City series, in that order.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub series: Vec<Series>,
}

impl ChartSeries {
    /// Largest plotted value, or 0 when there is nothing to plot.
    pub fn max_value(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|s| s.data.iter().copied())
            .filter(|v| v.is_finite())
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::{ChartSeries, Series, SeriesStyle};

    #[test]
    fn palette_matches_css() {
        assert_eq!(SeriesStyle::global().background.to_css(), "rgba(59,130,246,0.2)");
        assert_eq!(SeriesStyle::region().border.to_css(), "rgba(34,197,94,1)");
        assert_eq!(SeriesStyle::city().border_width, 2.0);
    }

    #[test]
    fn max_value_spans_all_series() {
        let chart = ChartSeries {
            labels: vec!["A".into(), "B".into()],
            series: vec![
                Series {
                    label: "Global".into(),
                    data: vec![1.0, 9.0],
                    style: SeriesStyle::global(),
                },
                Series {
                    label: "Warsaw".into(),
                    data: vec![12.5, -3.0],
                    style: SeriesStyle::city(),
                },
            ],
        };
        assert_eq!(chart.max_value(), 12.5);
    }
}
