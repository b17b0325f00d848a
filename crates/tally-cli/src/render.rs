//! Terminal rendering of chart geometry

use colored::{Color, Colorize};
use tally_core::charts::{Bar, PaletteColor, PieChart};

/// Pixels represented by one block character
const PX_PER_CELL: u32 = 4;

/// Pie legend width in cells for a full circle
const PIE_WIDTH: f64 = 40.0;

fn terminal_color(color: PaletteColor) -> Color {
    color.name.parse().unwrap_or(Color::White)
}

/// Horizontal bars, one line each
pub fn bars(bars: &[Bar]) -> Vec<String> {
    let label_width = bars
        .iter()
        .map(|bar| bar.label.chars().count())
        .max()
        .unwrap_or(0);

    bars.iter()
        .map(|bar| {
            let cells = (bar.height_px / PX_PER_CELL).max(1) as usize;
            format!(
                "{:<width$}  {} {}",
                bar.label,
                "█".repeat(cells),
                format_amount(bar.value).dimmed(),
                width = label_width
            )
        })
        .collect()
}

/// A strip of colored segments followed by a legend
pub fn pie(chart: &PieChart) -> Vec<String> {
    match chart {
        PieChart::Placeholder { color } => vec![
            "○".repeat(PIE_WIDTH as usize)
                .color(terminal_color(*color))
                .to_string(),
            "No spending recorded".dimmed().to_string(),
        ],
        PieChart::Segments(arcs) => {
            let strip: String = arcs
                .iter()
                .map(|arc| {
                    let cells = ((arc.end - arc.start) * PIE_WIDTH).round().max(0.0) as usize;
                    "█".repeat(cells).color(terminal_color(arc.color)).to_string()
                })
                .collect();

            let mut lines = vec![strip];
            lines.extend(arcs.iter().map(|arc| {
                format!(
                    "{} {:<16} {:>5.1}%  [{:.0}°, {:.0}°)",
                    "■".color(terminal_color(arc.color)),
                    arc.category,
                    (arc.end - arc.start) * 100.0,
                    arc.start_degrees(),
                    arc.end_degrees()
                )
            }));
            lines
        }
    }
}

/// `₹1,234.50`
pub fn format_amount(value: f64) -> String {
    let negative = value < 0.0;
    let fixed = format!("{:.2}", value.abs());
    let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::new();
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}₹{}.{}", if negative { "-" } else { "" }, grouped, frac)
}
