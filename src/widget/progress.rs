//! Progress bar widget: value/max tracking, ETA estimation, and a token
//! template composed from the cell renderer and spinner engine.

use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex, Weak};
use std::time::Instant;

use crate::console::Shared;
use crate::style::{cells, BarStyle, SpinnerStyle};
use crate::timefmt::format_delta_time;
use crate::widget::Widget;

/// Default bar width in cells.
pub const DEFAULT_WIDTH: usize = 20;

/// Default format template.
pub const DEFAULT_FORMAT: &str = "{bar}";

/// Shown for the ETA tokens while `value` is zero and the per-item rate is
/// still undefined.
const ETA_SENTINEL: &str = "∞";

/// Construction options for a progress bar widget.
#[derive(Debug, Clone)]
pub struct ProgressOptions {
    /// Initial value, clamped into `[0, max]`.
    pub value: f64,
    /// The value at which the bar is complete.
    pub max: f64,
    /// Bar cell style.
    pub style: BarStyle,
    /// Format template; `None` renders the bare `{bar}`.
    ///
    /// Recognised tokens: `{value}`, `{max}`, `{eta}`, `{eta_rounded}`,
    /// `{bar}`, `{progress}`, `{spinner}`. Unknown tokens are left verbatim.
    pub format: Option<String>,
    /// Bar width in cells.
    pub width: usize,
    /// Style for the `{spinner}` token.
    pub spinner_style: SpinnerStyle,
}

impl ProgressOptions {
    /// Options for a bar that completes at `max`, with all defaults.
    pub fn new(max: f64) -> Self {
        Self {
            value: 0.0,
            max,
            style: BarStyle::default(),
            format: None,
            width: DEFAULT_WIDTH,
            spinner_style: SpinnerStyle::default(),
        }
    }
}

/// Clamp into `[0, max]` without panicking on degenerate bounds.
fn clamp_value(value: f64, max: f64) -> f64 {
    value.min(max).max(0.0)
}

pub(crate) struct ProgressState {
    value: f64,
    options: ProgressOptions,
    start: Instant,
    anim: usize,
    extra_tokens: HashMap<String, String>,
}

impl ProgressState {
    pub(crate) fn new(options: ProgressOptions) -> Self {
        Self {
            value: clamp_value(options.value, options.max),
            start: Instant::now(),
            anim: 0,
            extra_tokens: HashMap::new(),
            options,
        }
    }

    pub(crate) fn set_value(&mut self, value: f64, extra_tokens: Option<HashMap<String, String>>) {
        self.value = clamp_value(value, self.options.max);
        if let Some(tokens) = extra_tokens {
            self.extra_tokens = tokens;
        }
    }

    pub(crate) fn advance(&mut self, delta: f64, extra_tokens: Option<HashMap<String, String>>) {
        self.set_value(self.value + delta, extra_tokens);
    }

    pub(crate) fn value(&self) -> f64 {
        self.value
    }

    fn next_spinner_frame(&mut self) -> &'static str {
        let frames = self.options.spinner_style.frames();
        let current = frames[self.anim];
        self.anim = (self.anim + 1) % frames.len();
        current
    }

    fn eta_token(eta_ms: f64, rounded: bool) -> String {
        if eta_ms.is_finite() {
            format_delta_time(eta_ms, rounded)
        } else {
            ETA_SENTINEL.to_string()
        }
    }
}

impl Widget for ProgressState {
    fn render(&mut self) -> String {
        let delta = self.start.elapsed().as_secs_f64() * 1000.0;
        // Undefined while value is zero; the ETA tokens then show a sentinel.
        let item_time = delta / self.value;
        let eta_ms = item_time * (self.options.max - self.value);
        let fraction = self.value / self.options.max;

        let tokens: [(&str, String); 7] = [
            ("value", self.value.to_string()),
            ("max", self.options.max.to_string()),
            ("eta", Self::eta_token(eta_ms, false)),
            ("eta_rounded", Self::eta_token(eta_ms, true)),
            (
                "bar",
                cells::render(self.options.style.table(), fraction, self.options.width),
            ),
            ("progress", (fraction * 100.0).round().to_string()),
            ("spinner", self.next_spinner_frame().to_string()),
        ];

        let mut line = self
            .options
            .format
            .clone()
            .unwrap_or_else(|| DEFAULT_FORMAT.to_string());

        for (name, value) in &tokens {
            line = line.replace(&format!("{{{name}}}"), value);
        }

        // Extra tokens resolve by key against the standard token set; their
        // supplied values are never injected.
        for key in self.extra_tokens.keys() {
            if let Some((_, value)) = tokens.iter().find(|(name, _)| name == key) {
                line = line.replace(&format!("{{{key}}}"), value);
            }
        }

        line
    }
}

/// Caller-held handle to a live progress bar.
pub struct ProgressHandle {
    pub(crate) state: Arc<Mutex<ProgressState>>,
    pub(crate) console: Weak<Shared>,
}

impl ProgressHandle {
    /// Set the current value, clamped into `[0, max]`.
    pub fn update(&self, value: f64) {
        self.lock_state().set_value(value, None);
    }

    /// Set the current value and replace the extra-token snapshot.
    pub fn update_with_tokens(&self, value: f64, extra_tokens: HashMap<String, String>) {
        self.lock_state().set_value(value, Some(extra_tokens));
    }

    /// Advance the current value by `delta`.
    pub fn step(&self, delta: f64) {
        self.lock_state().advance(delta, None);
    }

    /// Advance the current value and replace the extra-token snapshot.
    pub fn step_with_tokens(&self, delta: f64, extra_tokens: HashMap<String, String>) {
        self.lock_state().advance(delta, Some(extra_tokens));
    }

    /// The current value.
    pub fn value(&self) -> f64 {
        self.lock_state().value()
    }

    /// Remove the bar from the console, repainting immediately.
    pub fn stop(&self) -> io::Result<()> {
        let Some(console) = self.console.upgrade() else {
            return Ok(());
        };
        console.remove_widget(Arc::as_ptr(&self.state).cast())
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, ProgressState> {
        self.state.lock().unwrap_or_else(|err| err.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar_state(options: ProgressOptions) -> ProgressState {
        ProgressState::new(options)
    }

    #[test]
    fn test_update_clamps_to_max() {
        let mut state = bar_state(ProgressOptions::new(10.0));
        state.set_value(25.0, None);
        assert_eq!(state.value(), 10.0);
        state.set_value(-3.0, None);
        assert_eq!(state.value(), 0.0);
    }

    #[test]
    fn test_initial_value_is_clamped() {
        let state = bar_state(ProgressOptions {
            value: 99.0,
            ..ProgressOptions::new(10.0)
        });
        assert_eq!(state.value(), 10.0);
    }

    #[test]
    fn test_step_accumulates() {
        let mut state = bar_state(ProgressOptions::new(10.0));
        state.advance(3.0, None);
        state.advance(4.0, None);
        assert_eq!(state.value(), 7.0);
        state.advance(100.0, None);
        assert_eq!(state.value(), 10.0);
    }

    #[test]
    fn test_default_format_is_bare_bar() {
        let mut state = bar_state(ProgressOptions::new(10.0));
        state.set_value(10.0, None);
        assert_eq!(state.render(), "█".repeat(DEFAULT_WIDTH));
    }

    #[test]
    fn test_value_and_max_tokens_render_plain_numbers() {
        let mut state = bar_state(ProgressOptions {
            format: Some("{value}/{max}".to_string()),
            ..ProgressOptions::new(10.0)
        });
        state.set_value(5.0, None);
        assert_eq!(state.render(), "5/10");
    }

    #[test]
    fn test_progress_token_is_rounded_percentage() {
        let mut state = bar_state(ProgressOptions {
            format: Some("{progress}%".to_string()),
            ..ProgressOptions::new(3.0)
        });
        state.set_value(2.0, None);
        // 2/3 rounds to 67.
        assert_eq!(state.render(), "67%");
    }

    #[test]
    fn test_unknown_tokens_left_verbatim() {
        let mut state = bar_state(ProgressOptions {
            format: Some("{value} {mystery}".to_string()),
            ..ProgressOptions::new(10.0)
        });
        assert_eq!(state.render(), "0 {mystery}");
    }

    #[test]
    fn test_eta_is_sentinel_while_value_is_zero() {
        let mut state = bar_state(ProgressOptions {
            format: Some("{eta}/{eta_rounded}".to_string()),
            ..ProgressOptions::new(10.0)
        });
        assert_eq!(state.render(), "∞/∞");
    }

    #[test]
    fn test_eta_defined_once_value_is_positive() {
        let mut state = bar_state(ProgressOptions {
            format: Some("{eta}".to_string()),
            ..ProgressOptions::new(10.0)
        });
        state.set_value(5.0, None);
        let rendered = state.render();
        assert_ne!(rendered, "∞");
        // Elapsed time is tiny in a test, so the ETA lands in milliseconds.
        assert!(rendered.ends_with("ms"), "unexpected ETA {rendered:?}");
    }

    #[test]
    fn test_spinner_token_advances_each_render() {
        let mut state = bar_state(ProgressOptions {
            format: Some("{spinner}".to_string()),
            spinner_style: SpinnerStyle::Classic,
            ..ProgressOptions::new(10.0)
        });
        let frames = SpinnerStyle::Classic.frames();
        for frame in frames {
            assert_eq!(state.render(), *frame);
        }
        // Wrapped around.
        assert_eq!(state.render(), frames[0]);
    }

    #[test]
    fn test_extra_token_values_are_never_injected() {
        let mut state = bar_state(ProgressOptions {
            format: Some("{file}".to_string()),
            ..ProgressOptions::new(10.0)
        });
        let mut extra = HashMap::new();
        extra.insert("file".to_string(), "Hello.txt".to_string());
        state.set_value(1.0, Some(extra));
        // The key has no standard counterpart, so the token stays verbatim
        // and the supplied value never appears.
        assert_eq!(state.render(), "{file}");
    }

    #[test]
    fn test_extra_token_keys_resolve_to_standard_values() {
        let mut state = bar_state(ProgressOptions {
            format: Some("{value}".to_string()),
            ..ProgressOptions::new(10.0)
        });
        let mut extra = HashMap::new();
        extra.insert("value".to_string(), "not this".to_string());
        state.set_value(4.0, Some(extra));
        assert_eq!(state.render(), "4");
    }

    #[test]
    fn test_degenerate_max_never_panics() {
        let mut state = bar_state(ProgressOptions {
            format: Some("{bar}|{progress}|{eta}".to_string()),
            width: 4,
            ..ProgressOptions::new(0.0)
        });
        let rendered = state.render();
        // 0/0 has no defined fraction: empty bar, NaN percentage, ETA sentinel.
        assert_eq!(rendered, format!("{}|NaN|∞", " ".repeat(4)));
    }
}
