//! Spinner widget: an animated activity indicator with a text label.

use std::io;
use std::sync::{Arc, Mutex, Weak};

use crossterm::style::Stylize;

use crate::console::{Level, Shared};
use crate::message::Arg;
use crate::style::SpinnerStyle;
use crate::widget::Widget;

/// Construction options for a spinner widget.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpinnerOptions {
    /// Animation style.
    pub style: SpinnerStyle,
}

pub(crate) struct SpinnerState {
    text: String,
    style: SpinnerStyle,
    frame: usize,
}

impl SpinnerState {
    pub(crate) fn new(text: String, style: SpinnerStyle) -> Self {
        Self {
            text,
            style,
            frame: 0,
        }
    }

    pub(crate) fn set_text(&mut self, text: String) {
        self.text = text;
    }
}

impl Widget for SpinnerState {
    fn render(&mut self) -> String {
        let frames = self.style.frames();
        let current = frames[self.frame];
        self.frame = (self.frame + 1) % frames.len();

        format!(
            "{}{}{} {}",
            "[".dark_grey(),
            current.yellow(),
            "]".dark_grey(),
            self.text
        )
    }
}

/// Caller-held handle to a live spinner.
///
/// The spinner keeps animating until [`success`](SpinnerHandle::success) or
/// [`error`](SpinnerHandle::error) removes it from the console.
pub struct SpinnerHandle {
    pub(crate) state: Arc<Mutex<SpinnerState>>,
    pub(crate) console: Weak<Shared>,
}

impl SpinnerHandle {
    /// Replace the spinner's label text.
    pub fn update(&self, text: impl Into<String>) {
        self.lock_state().set_text(text.into());
    }

    /// Remove the spinner and emit a one-shot success line.
    pub fn success(&self, message: &str) -> io::Result<()> {
        self.finish(Level::Success, message)
    }

    /// Remove the spinner and emit a one-shot error line.
    pub fn error(&self, message: &str) -> io::Result<()> {
        self.finish(Level::Error, message)
    }

    fn finish(&self, level: Level, message: &str) -> io::Result<()> {
        let Some(console) = self.console.upgrade() else {
            return Ok(());
        };
        console.remove_widget(Arc::as_ptr(&self.state).cast())?;
        console.emit(level, &[Arg::from(message)])
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, SpinnerState> {
        self.state.lock().unwrap_or_else(|err| err.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(rendered: &str) -> String {
        // Strip ANSI escape sequences so assertions see the visible text.
        let mut out = String::new();
        let mut chars = rendered.chars();
        while let Some(c) = chars.next() {
            if c == '\u{1b}' {
                for follow in chars.by_ref() {
                    if follow.is_ascii_alphabetic() {
                        break;
                    }
                }
            } else {
                out.push(c);
            }
        }
        out
    }

    #[test]
    fn test_render_advances_one_frame_per_call() {
        let mut spinner = SpinnerState::new("loading".to_string(), SpinnerStyle::Classic);
        let frames = SpinnerStyle::Classic.frames();
        for frame in frames {
            let line = plain(&spinner.render());
            assert_eq!(line, format!("[{frame}] loading"));
        }
    }

    #[test]
    fn test_render_wraps_to_first_frame() {
        let mut spinner = SpinnerState::new("x".to_string(), SpinnerStyle::Dots);
        let count = SpinnerStyle::Dots.frames().len();
        let first = plain(&spinner.render());
        for _ in 1..count {
            spinner.render();
        }
        // One full cycle later the original frame comes around again.
        assert_eq!(plain(&spinner.render()), first);
    }

    #[test]
    fn test_render_is_single_line() {
        let mut spinner = SpinnerState::new("multi word label".to_string(), SpinnerStyle::Sus);
        for _ in 0..10 {
            assert!(!spinner.render().contains('\n'));
        }
    }

    #[test]
    fn test_set_text_applies_to_next_render() {
        let mut spinner = SpinnerState::new("before".to_string(), SpinnerStyle::Classic);
        spinner.set_text("after".to_string());
        assert!(plain(&spinner.render()).ends_with("after"));
    }
}
