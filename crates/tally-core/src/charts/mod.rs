//! Chart geometry
//!
//! [`ratios`] turns aggregates into fractions without any notion of pixels;
//! [`render`] maps those fractions to bar heights and colored arcs.

pub mod palette;
pub mod ratios;
pub mod render;

pub use palette::{NEUTRAL, PALETTE, PaletteColor};
pub use ratios::{BarInput, BarRatio, BarSeries, PieSpan, bar_ratios, pie_spans};
pub use render::{Bar, BarLayout, PieArc, PieChart};

use crate::models::{CategoryShare, CategoryTotal};

/// Bars for category totals using the default layout
pub fn category_bars(totals: &[CategoryTotal]) -> Vec<Bar> {
    let inputs: Vec<BarInput> = totals.iter().map(BarInput::from).collect();
    BarLayout::default().bars(&bar_ratios(&inputs))
}

/// Pie for category shares
pub fn category_pie(shares: &[CategoryShare]) -> PieChart {
    PieChart::from_spans(&pie_spans(shares))
}
