//! Named animation and bar styles.
//!
//! Spinner styles are fixed frame sequences; bar styles are sparse threshold
//! tables mapping a fill percentage to the glyph that represents it. Style
//! names parse through [`FromStr`] and reject unknown names, so a bad style
//! key surfaces as a configuration error instead of silently defaulting.

pub mod cells;

use std::cmp::Ordering;
use std::str::FromStr;
use std::sync::LazyLock;

use crossterm::style::Stylize;

/// Errors raised when looking up a named style.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StyleError {
    /// The given name does not match any spinner style.
    #[error("unknown spinner style: {0}")]
    UnknownSpinnerStyle(String),
    /// The given name does not match any progress bar style.
    #[error("unknown progress bar style: {0}")]
    UnknownBarStyle(String),
}

const DOTS_FRAMES: &[&str] = &["⠇", "⠋", "⠙", "⠸", "⠴", "⠦"];
const GEOMETRY_FRAMES: &[&str] = &["▱▱▱▱▱", "▰▱▱▱▱", "▰▰▱▱▱", "▰▰▰▱▱", "▰▰▰▰▱", "▰▰▰▰▰"];
const CLASSIC_FRAMES: &[&str] = &["|", "/", "-", "\\"];
const FILL_FRAMES: &[&str] = &["▁", "▂", "▃", "▄", "▅", "▆", "▇", "█"];
const SUS_FRAMES: &[&str] = &["     ", "    ඞ", "   ඞ ", "  ඞ  ", " ඞ   ", "ඞ    ", "     "];

/// A named spinner animation.
///
/// Frame sequences have unequal lengths and unequal per-frame glyph widths
/// (some frames are several characters wide); nothing here assumes a fixed
/// width.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SpinnerStyle {
    /// Braille dots rotation.
    #[default]
    Dots,
    /// Five-cell geometric fill sweep.
    Geometry,
    /// The classic `|/-\` rotation.
    Classic,
    /// Vertical block fill ramp.
    Fill,
    /// A certain crewmate walking across five cells.
    Sus,
}

impl SpinnerStyle {
    /// All spinner styles, in declaration order.
    pub const ALL: [SpinnerStyle; 5] = [
        SpinnerStyle::Dots,
        SpinnerStyle::Geometry,
        SpinnerStyle::Classic,
        SpinnerStyle::Fill,
        SpinnerStyle::Sus,
    ];

    /// The frame sequence for this style.
    pub fn frames(self) -> &'static [&'static str] {
        match self {
            SpinnerStyle::Dots => DOTS_FRAMES,
            SpinnerStyle::Geometry => GEOMETRY_FRAMES,
            SpinnerStyle::Classic => CLASSIC_FRAMES,
            SpinnerStyle::Fill => FILL_FRAMES,
            SpinnerStyle::Sus => SUS_FRAMES,
        }
    }

    /// The configuration name of this style.
    pub fn name(self) -> &'static str {
        match self {
            SpinnerStyle::Dots => "dots",
            SpinnerStyle::Geometry => "geometry",
            SpinnerStyle::Classic => "classic",
            SpinnerStyle::Fill => "fill",
            SpinnerStyle::Sus => "sus",
        }
    }
}

impl FromStr for SpinnerStyle {
    type Err = StyleError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "dots" => Ok(SpinnerStyle::Dots),
            "geometry" => Ok(SpinnerStyle::Geometry),
            "classic" => Ok(SpinnerStyle::Classic),
            "fill" => Ok(SpinnerStyle::Fill),
            "sus" => Ok(SpinnerStyle::Sus),
            other => Err(StyleError::UnknownSpinnerStyle(other.to_string())),
        }
    }
}

static SHADOW_TABLE: LazyLock<StyleTable> = LazyLock::new(|| {
    StyleTable::new([(25.0, "░"), (50.0, "▒"), (75.0, "▓"), (100.0, "█")])
});

static BLOCK_TABLE: LazyLock<StyleTable> = LazyLock::new(|| {
    StyleTable::new([
        (12.5, "▏"),
        (25.0, "▎"),
        (37.5, "▍"),
        (50.0, "▌"),
        (62.5, "▋"),
        (75.0, "▊"),
        (87.5, "▉"),
        (100.0, "█"),
    ])
});

static CLASSIC_TABLE: LazyLock<StyleTable> = LazyLock::new(|| StyleTable::new([(100.0, "=")]));

static LINE_TABLE: LazyLock<StyleTable> = LazyLock::new(|| {
    StyleTable::new([
        (0.0, "─".dark_grey().to_string()),
        (100.0, "─".green().to_string()),
    ])
});

/// A named progress bar style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BarStyle {
    /// Shade blocks: `░ ▒ ▓ █`.
    #[default]
    Shadow,
    /// Eighth blocks, one partial glyph per 12.5% of a cell.
    Block,
    /// Plain `=` fill with no partial cells.
    Classic,
    /// A coloured line: green over grey.
    Line,
}

impl BarStyle {
    /// All bar styles, in declaration order.
    pub const ALL: [BarStyle; 4] = [
        BarStyle::Shadow,
        BarStyle::Block,
        BarStyle::Classic,
        BarStyle::Line,
    ];

    /// The threshold table backing this style.
    pub fn table(self) -> &'static StyleTable {
        match self {
            BarStyle::Shadow => &SHADOW_TABLE,
            BarStyle::Block => &BLOCK_TABLE,
            BarStyle::Classic => &CLASSIC_TABLE,
            BarStyle::Line => &LINE_TABLE,
        }
    }

    /// The configuration name of this style.
    pub fn name(self) -> &'static str {
        match self {
            BarStyle::Shadow => "shadow",
            BarStyle::Block => "block",
            BarStyle::Classic => "classic",
            BarStyle::Line => "line",
        }
    }
}

impl FromStr for BarStyle {
    type Err = StyleError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "shadow" => Ok(BarStyle::Shadow),
            "block" => Ok(BarStyle::Block),
            "classic" => Ok(BarStyle::Classic),
            "line" => Ok(BarStyle::Line),
            other => Err(StyleError::UnknownBarStyle(other.to_string())),
        }
    }
}

/// A sparse mapping from a fill-percentage threshold to a display glyph.
///
/// The `100` entry is the full-cell glyph; entries strictly between 0 and 100
/// are partial-cell glyphs; an optional `0` entry supplies the padding glyph
/// for empty cells. Tables are not validated beyond sorting; a table with no
/// `100` entry simply renders no full cells.
#[derive(Debug, Clone)]
pub struct StyleTable {
    entries: Vec<(f64, String)>,
}

impl StyleTable {
    /// Build a table from `(threshold, glyph)` pairs. Entries are kept
    /// sorted by threshold; duplicate thresholds keep their first glyph.
    pub fn new<G: Into<String>>(entries: impl IntoIterator<Item = (f64, G)>) -> Self {
        let mut entries: Vec<(f64, String)> = entries
            .into_iter()
            .map(|(threshold, glyph)| (threshold, glyph.into()))
            .collect();
        entries.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
        Self { entries }
    }

    /// The glyph for a completely filled cell, if the table defines one.
    pub(crate) fn full(&self) -> &str {
        self.glyph_at(100.0).unwrap_or("")
    }

    /// The glyph used to pad empty cells.
    pub(crate) fn pad(&self) -> &str {
        self.glyph_at(0.0).unwrap_or(" ")
    }

    /// The partial-cell glyph for a fractional fill of `percent`, selecting
    /// the largest threshold at or below it. The 100 entry (full cells) and
    /// the 0 entry (padding) never qualify.
    pub(crate) fn partial(&self, percent: f64) -> Option<&str> {
        self.entries
            .iter()
            .filter(|(threshold, _)| *threshold != 100.0 && *threshold != 0.0)
            .filter(|(threshold, _)| percent >= *threshold)
            .last()
            .map(|(_, glyph)| glyph.as_str())
    }

    fn glyph_at(&self, threshold: f64) -> Option<&str> {
        self.entries
            .iter()
            .find(|(t, _)| *t == threshold)
            .map(|(_, glyph)| glyph.as_str())
    }
}
