//! Live terminal widgets.
//!
//! A widget is a single-line terminal element that the console repaints in
//! place on every tick. Widgets are owned by the console's registry and
//! driven through caller-held handles.

pub mod progress;
pub mod spinner;

/// The live-widget capability: produce one line of display text.
///
/// Rendering is deliberately stateful: each call advances animation
/// cursors (and, for progress bars, samples the clock), so call frequency
/// is expected to match the redraw tick.
pub trait Widget: Send {
    /// Render the widget's current display line. Must not contain newlines.
    fn render(&mut self) -> String;
}
