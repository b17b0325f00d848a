//! Maps ratios to pixel heights and arcs

use super::palette::{self, PaletteColor};
use super::ratios::{BarSeries, PieSpan};

/// Default bar area height in pixels
pub const DEFAULT_SCALE_HEIGHT: u32 = 160;
/// Default minimum bar height in pixels
pub const DEFAULT_MIN_FLOOR_PX: u32 = 6;

/// A bar ready to draw
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    pub height_px: u32,
}

/// Bar geometry settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarLayout {
    pub scale_height: u32,
    pub min_floor_px: u32,
}

impl Default for BarLayout {
    fn default() -> Self {
        Self {
            scale_height: DEFAULT_SCALE_HEIGHT,
            min_floor_px: DEFAULT_MIN_FLOOR_PX,
        }
    }
}

impl BarLayout {
    pub fn new(scale_height: u32, min_floor_px: u32) -> Self {
        Self {
            scale_height,
            min_floor_px,
        }
    }

    /// `max(min_floor_px, round(ratio * scale_height))` for each bar
    pub fn bars(&self, series: &BarSeries) -> Vec<Bar> {
        series
            .bars
            .iter()
            .map(|bar| Bar {
                label: bar.label.clone(),
                value: bar.value,
                height_px: self.height(bar.ratio),
            })
            .collect()
    }

    fn height(&self, ratio: f64) -> u32 {
        let scaled = (ratio * f64::from(self.scale_height)).round();
        scaled.max(f64::from(self.min_floor_px)) as u32
    }
}

/// One drawn pie arc
#[derive(Debug, Clone, PartialEq)]
pub struct PieArc {
    pub category: String,
    pub start: f64,
    pub end: f64,
    pub color: PaletteColor,
}

impl PieArc {
    pub fn start_degrees(&self) -> f64 {
        self.start * 360.0
    }

    pub fn end_degrees(&self) -> f64 {
        self.end * 360.0
    }

    pub fn sweep_degrees(&self) -> f64 {
        (self.end - self.start) * 360.0
    }
}

/// A pie ready to draw
#[derive(Debug, Clone, PartialEq)]
pub enum PieChart {
    /// Nothing to show; a single neutral full circle
    Placeholder { color: PaletteColor },
    Segments(Vec<PieArc>),
}

impl PieChart {
    /// Color the spans from the palette; empty input becomes the placeholder
    pub fn from_spans(spans: &[PieSpan]) -> Self {
        if spans.is_empty() {
            return Self::Placeholder {
                color: palette::NEUTRAL,
            };
        }

        Self::Segments(
            spans
                .iter()
                .map(|span| PieArc {
                    category: span.category.clone(),
                    start: span.start,
                    end: span.end,
                    color: palette::color_for(span.index),
                })
                .collect(),
        )
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder { .. })
    }
}
