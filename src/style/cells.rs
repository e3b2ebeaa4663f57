//! Progress bar cell rendering.
//!
//! Maps a continuous fill fraction onto a fixed number of display cells,
//! using a style's threshold table for full, partial, and padding glyphs.

use super::StyleTable;

/// Render `fraction` (0.0 to 1.0) of `width` cells under `table`.
///
/// Whole units of `fraction * width` become full-cell glyphs. The remaining
/// fractional cell picks the largest partial threshold at or below its
/// percentage; ties round toward the larger key. Whatever is left of `width`
/// is padded with the table's empty-cell glyph.
pub fn render(table: &StyleTable, fraction: f64, width: usize) -> String {
    // A non-finite fraction (value/max with max == 0) renders as empty.
    let mut progress = if fraction.is_finite() {
        fraction * width as f64
    } else {
        0.0
    };

    let mut bar = String::new();
    let mut real_width = 0usize;

    let full = table.full();
    while progress >= 1.0 {
        bar.push_str(full);
        real_width += 1;
        progress -= 1.0;
    }

    if progress >= 0.0 {
        if let Some(glyph) = table.partial(progress * 100.0) {
            bar.push_str(glyph);
            real_width += 1;
        }
    }

    let pad = table.pad();
    for _ in 0..width.saturating_sub(real_width) {
        bar.push_str(pad);
    }

    bar
}
