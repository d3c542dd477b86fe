//! Screen-space geometry for a radar chart: spokes, tick rings and series
//! polygons. Screen coordinates have +y pointing down; the first spoke points
//! straight up and the rest follow clockwise.

use std::f64::consts::{FRAC_PI_2, TAU};

use foundation::math::Vec2;

use crate::series::ChartSeries;

/// One category spoke.
#[derive(Debug, Clone, PartialEq)]
pub struct Spoke {
    pub label: String,
    pub angle_rad: f64,
    /// Outer end of the spoke (scale maximum).
    pub end: Vec2,
    /// Where the category label is drawn, just past `end`.
    pub label_anchor: Vec2,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadarLayout {
    pub center: Vec2,
    pub radius: f64,
    /// Value mapped to `radius`. The scale always starts at zero.
    pub scale_max: f64,
    /// Tick values, ascending, ending at `scale_max`.
    pub ticks: Vec<f64>,
    pub spokes: Vec<Spoke>,
}

/// Padding between a spoke end and its label, in pixels.
const LABEL_GAP_PX: f64 = 14.0;

impl RadarLayout {
    pub fn new(chart: &ChartSeries, center: Vec2, radius: f64, max_ticks: u32) -> Self {
        let (scale_max, ticks) = nice_scale(chart.max_value(), max_ticks.max(1));
        let n = chart.labels.len();
        let spokes = chart
            .labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let angle_rad = spoke_angle(i, n);
                Spoke {
                    label: label.clone(),
                    angle_rad,
                    end: polar(center, angle_rad, radius),
                    label_anchor: polar(center, angle_rad, radius + LABEL_GAP_PX),
                }
            })
            .collect();

        Self {
            center,
            radius: radius.max(0.0),
            scale_max,
            ticks,
            spokes,
        }
    }

    /// Position of `value` on spoke `index`, shrunk toward the center by
    /// `progress` (animation). Negative values sit at the center.
    pub fn point(&self, index: usize, value: f64, progress: f64) -> Option<Vec2> {
        let spoke = self.spokes.get(index)?;
        let value = if value.is_finite() { value.max(0.0) } else { 0.0 };
        let r = self.radius * (value / self.scale_max) * progress.clamp(0.0, 1.0);
        Some(polar(self.center, spoke.angle_rad, r))
    }

    /// Closed polygon through `data`, one vertex per spoke. Missing values
    /// are drawn at the center.
    pub fn polygon(&self, data: &[f64], progress: f64) -> Vec<Vec2> {
        (0..self.spokes.len())
            .filter_map(|i| self.point(i, data.get(i).copied().unwrap_or(0.0), progress))
            .collect()
    }

    /// Grid ring for tick `value`.
    pub fn ring(&self, value: f64) -> Vec<Vec2> {
        (0..self.spokes.len())
            .filter_map(|i| self.point(i, value, 1.0))
            .collect()
    }

    /// Where to print tick `value`, along the first spoke.
    pub fn tick_anchor(&self, value: f64) -> Vec2 {
        let r = self.radius * (value / self.scale_max);
        polar(self.center, -FRAC_PI_2, r)
    }
}

fn spoke_angle(index: usize, count: usize) -> f64 {
    if count == 0 {
        return -FRAC_PI_2;
    }
    -FRAC_PI_2 + TAU * index as f64 / count as f64
}

fn polar(center: Vec2, angle_rad: f64, r: f64) -> Vec2 {
    let (s, c) = angle_rad.sin_cos();
    Vec2::new(center.x + r * c, center.y + r * s)
}

/// Zero-based scale covering `max_value` with at most `max_ticks` round steps.
pub fn nice_scale(max_value: f64, max_ticks: u32) -> (f64, Vec<f64>) {
    let max_ticks = max_ticks.max(1);
    if !(max_value.is_finite() && max_value > 0.0) {
        return (1.0, vec![1.0]);
    }

    let step = nice_step(max_value / max_ticks as f64);
    // Absorbs rounding in `max / step`: 0.07 / 0.01 is 7 steps, not 8.
    let steps = ((max_value / step) * (1.0 - 1e-12))
        .ceil()
        .clamp(1.0, max_ticks as f64) as u32;
    let mut ticks: Vec<f64> = (1..=steps).map(|k| step * k as f64).collect();
    let scale_max = (step * steps as f64).max(max_value);
    if let Some(last) = ticks.last_mut() {
        *last = scale_max;
    }
    (scale_max, ticks)
}

/// Smallest of 1, 2, 5 or 10 times a power of ten that is >= `raw`.
fn nice_step(raw: f64) -> f64 {
    let exp = raw.log10().floor();
    let base = 10f64.powf(exp);
    let fraction = raw / base;
    let nice = if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * base
}
