//! Fixed segment colors

/// A palette color with a terminal-friendly name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteColor {
    pub name: &'static str,
    pub hex: &'static str,
}

const fn color(name: &'static str, hex: &'static str) -> PaletteColor {
    PaletteColor { name, hex }
}

/// Segment colors, assigned by `index % len`
pub const PALETTE: [PaletteColor; 8] = [
    color("blue", "#2563eb"),
    color("green", "#16a34a"),
    color("yellow", "#ca8a04"),
    color("red", "#dc2626"),
    color("magenta", "#9333ea"),
    color("cyan", "#0891b2"),
    color("bright blue", "#4f46e5"),
    color("bright red", "#db2777"),
];

/// Color of the placeholder circle drawn for an empty pie
pub const NEUTRAL: PaletteColor = color("white", "#cbd5e1");

/// Palette entry for segment `index`
pub fn color_for(index: usize) -> PaletteColor {
    PALETTE[index % PALETTE.len()]
}
