//! The console context: leveled line emitters plus the live-widget registry
//! and its redraw scheduler.
//!
//! A [`Console`] owns the output sink, the ordered list of live widgets, and
//! the count of widget lines currently occupying the terminal. Log lines are
//! written above the widget region; every write clears and repaints that
//! region so one-shot output and animated widgets never interleave mid-line.

mod ticker;

use std::backtrace::Backtrace;
use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};

use crossterm::style::Stylize;

use crate::message::{format_message, Arg};
use crate::style::SpinnerStyle;
use crate::widget::progress::{ProgressHandle, ProgressOptions, ProgressState};
use crate::widget::spinner::{SpinnerHandle, SpinnerOptions, SpinnerState};
use crate::widget::Widget;

use self::ticker::Ticker;

/// Blank lines kept between the log stream and the widget region when no
/// margin is configured.
const DEFAULT_MARGIN: usize = 1;

/// Carriage return plus erase-line: rewrite the current terminal line.
const CLEAR_LINE: &str = "\r\x1b[2K";

/// Line terminator used for all console output.
const LINE_END: &str = "\r\n";

/// Log severities, declared most to least verbose.
///
/// The declaration order is the filtering order: a configured threshold
/// allows a message whose level sits at or before the threshold in this
/// list. The default threshold is [`Level::Trace`], which allows everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Failures.
    Error,
    /// Warnings.
    Warn,
    /// Completed operations.
    Success,
    /// General information.
    Info,
    /// Diagnostic output.
    Debug,
    /// Call-origin traces (multi-line, includes a captured backtrace).
    Trace,
}

impl Level {
    /// All levels, most to least verbose.
    pub const ALL: [Level; 6] = [
        Level::Error,
        Level::Warn,
        Level::Success,
        Level::Info,
        Level::Debug,
        Level::Trace,
    ];

    /// The configuration name of this level.
    pub fn name(self) -> &'static str {
        match self {
            Level::Error => "error",
            Level::Warn => "warn",
            Level::Success => "success",
            Level::Info => "info",
            Level::Debug => "debug",
            Level::Trace => "trace",
        }
    }

    /// The bracketed single-glyph tag written before messages of this level.
    fn tag(self) -> String {
        let symbol = match self {
            Level::Error => "✗".red().to_string(),
            Level::Warn => "!".yellow().to_string(),
            Level::Success => "✓".green().to_string(),
            Level::Info => "i".blue().to_string(),
            Level::Debug => "d".dark_yellow().to_string(),
            Level::Trace => "t".cyan().to_string(),
        };
        format!("{}{}{}", "[".dark_grey(), symbol, "]".dark_grey())
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for a severity name that matches no [`Level`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log level: {name}")]
pub struct ParseLevelError {
    name: String,
}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Level::ALL
            .into_iter()
            .find(|level| level.name() == name)
            .ok_or_else(|| ParseLevelError {
                name: name.to_string(),
            })
    }
}

/// Console configuration.
///
/// Fields left `None` fall back to their defaults (one margin line, the
/// `trace` threshold). [`Console::configure`] merges: only fields supplied
/// as `Some` override the current configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsoleOptions {
    /// Blank cleared lines kept above the widget region.
    pub widget_margin: Option<usize>,
    /// Minimum-verbosity threshold for leveled output.
    pub log_level: Option<Level>,
}

impl ConsoleOptions {
    fn margin(&self) -> usize {
        self.widget_margin.unwrap_or(DEFAULT_MARGIN)
    }

    fn level(&self) -> Level {
        self.log_level.unwrap_or(Level::Trace)
    }

    fn allows(&self, level: Level) -> bool {
        level <= self.level()
    }

    fn merge(&mut self, other: ConsoleOptions) {
        if other.widget_margin.is_some() {
            self.widget_margin = other.widget_margin;
        }
        if other.log_level.is_some() {
            self.log_level = other.log_level;
        }
    }
}

/// Options for [`Console::spin_while`].
#[derive(Debug, Clone)]
pub struct TaskSpinnerOptions {
    /// Label shown while the task runs.
    pub message: String,
    /// Success line; defaults to `"success"`.
    pub success: Option<String>,
    /// Error line; defaults to `"error"`.
    pub error: Option<String>,
    /// Spinner animation style.
    pub style: SpinnerStyle,
}

impl TaskSpinnerOptions {
    /// Options with the given running label and all defaults.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: None,
            error: None,
            style: SpinnerStyle::default(),
        }
    }
}

/// State shared between the console, its widget handles, and the ticker.
pub(crate) struct Shared {
    state: Mutex<State>,
}

struct State {
    widgets: Vec<Arc<Mutex<dyn Widget>>>,
    last_painted: usize,
    options: ConsoleOptions,
    out: Box<dyn Write + Send>,
}

impl State {
    /// Clear and rewrite the widget region in place.
    ///
    /// Iterates the slots painted by the previous repaint, not the current
    /// widget count, so a shrinking widget set blanks its stale trailing
    /// lines; then leaves the cursor back at the top of the region and
    /// remembers the new count.
    fn repaint(&mut self) -> io::Result<()> {
        let live = self.widgets.len();
        if self.last_painted == 0 && live == 0 {
            return Ok(());
        }

        let margin = self.options.margin();
        let mut frame = String::new();
        for _ in 0..margin {
            frame.push_str(CLEAR_LINE);
            frame.push_str(LINE_END);
        }
        for index in 0..self.last_painted {
            frame.push_str(CLEAR_LINE);
            if let Some(widget) = self.widgets.get(index) {
                let line = widget.lock().unwrap_or_else(|err| err.into_inner()).render();
                frame.push_str(&line);
            }
            frame.push_str(LINE_END);
        }
        frame.push_str(&format!("\x1b[{}A", self.last_painted + margin));

        self.out.write_all(frame.as_bytes())?;
        self.out.flush()?;
        self.last_painted = live;
        Ok(())
    }
}

impl Shared {
    fn new(out: Box<dyn Write + Send>, options: ConsoleOptions) -> Self {
        Self {
            state: Mutex::new(State {
                widgets: Vec::new(),
                last_painted: 0,
                options,
                out,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A panicked widget render must not wedge the console.
        self.state.lock().unwrap_or_else(|err| err.into_inner())
    }

    pub(crate) fn emit(&self, level: Level, args: &[Arg]) -> io::Result<()> {
        let mut state = self.lock();
        if !state.options.allows(level) {
            return Ok(());
        }
        let line = format!(
            "{}{} {}{}",
            CLEAR_LINE,
            level.tag(),
            format_message(args),
            LINE_END
        );
        state.out.write_all(line.as_bytes())?;
        state.out.flush()?;
        state.repaint()
    }

    pub(crate) fn emit_trace(&self, args: &[Arg]) -> io::Result<()> {
        let mut state = self.lock();
        if !state.options.allows(Level::Trace) {
            return Ok(());
        }
        let backtrace = Backtrace::force_capture();
        let mut block = format!(
            "{}{} {}",
            CLEAR_LINE,
            Level::Trace.tag(),
            format_message(args)
        );
        for line in backtrace.to_string().lines() {
            block.push('\n');
            block.push_str(line);
        }
        block.push_str(LINE_END);
        state.out.write_all(block.as_bytes())?;
        state.out.flush()?;
        state.repaint()
    }

    fn add_widget(&self, widget: Arc<Mutex<dyn Widget>>) {
        self.lock().widgets.push(widget);
    }

    pub(crate) fn remove_widget(&self, key: *const ()) -> io::Result<()> {
        let mut state = self.lock();
        state
            .widgets
            .retain(|widget| Arc::as_ptr(widget).cast::<()>() != key);
        state.repaint()
    }

    fn remove_all_widgets(&self) -> io::Result<()> {
        let mut state = self.lock();
        state.widgets.clear();
        state.repaint()
    }

    pub(crate) fn repaint(&self) -> io::Result<()> {
        self.lock().repaint()
    }

    fn widget_count(&self) -> usize {
        self.lock().widgets.len()
    }
}

/// The console-output manager.
///
/// Construct one per process (or per output stream) and pass it around
/// explicitly; dropping it (or calling [`shutdown`](Console::shutdown))
/// revokes the redraw timer permanently.
pub struct Console {
    shared: Arc<Shared>,
    ticker: Option<Ticker>,
}

impl Console {
    /// A console writing to standard output with default options.
    ///
    /// Spawns the background redraw tick (every 100 ms).
    pub fn new() -> Self {
        Self::with_options(ConsoleOptions::default())
    }

    /// A console writing to standard output with the given options.
    pub fn with_options(options: ConsoleOptions) -> Self {
        let shared = Arc::new(Shared::new(Box::new(io::stdout()), options));
        let ticker = Ticker::spawn(Arc::clone(&shared));
        Self {
            shared,
            ticker: Some(ticker),
        }
    }

    /// A console writing to an injected sink.
    ///
    /// No redraw tick is spawned; the embedder drives repaints through
    /// [`redraw`](Console::redraw) (and every emit still repaints). This is
    /// the seam used by the integration tests.
    pub fn with_writer<W: Write + Send + 'static>(out: W, options: ConsoleOptions) -> Self {
        Self {
            shared: Arc::new(Shared::new(Box::new(out), options)),
            ticker: None,
        }
    }

    /// Merge `options` over the current configuration.
    pub fn configure(&self, options: ConsoleOptions) {
        self.shared.lock().options.merge(options);
    }

    /// The current configuration.
    pub fn options(&self) -> ConsoleOptions {
        self.shared.lock().options.clone()
    }

    /// Write a leveled line (dispatches `trace` to its multi-line form).
    pub fn log(&self, level: Level, args: &[Arg]) -> io::Result<()> {
        match level {
            Level::Trace => self.shared.emit_trace(args),
            _ => self.shared.emit(level, args),
        }
    }

    /// Write an error line.
    pub fn error(&self, args: &[Arg]) -> io::Result<()> {
        self.shared.emit(Level::Error, args)
    }

    /// Write a warning line.
    pub fn warn(&self, args: &[Arg]) -> io::Result<()> {
        self.shared.emit(Level::Warn, args)
    }

    /// Write a success line.
    pub fn success(&self, args: &[Arg]) -> io::Result<()> {
        self.shared.emit(Level::Success, args)
    }

    /// Write an info line.
    pub fn info(&self, args: &[Arg]) -> io::Result<()> {
        self.shared.emit(Level::Info, args)
    }

    /// Write a debug line.
    pub fn debug(&self, args: &[Arg]) -> io::Result<()> {
        self.shared.emit(Level::Debug, args)
    }

    /// Write a trace block: the tagged message spliced onto the first line
    /// of a captured backtrace.
    pub fn trace(&self, args: &[Arg]) -> io::Result<()> {
        self.shared.emit_trace(args)
    }

    /// Create a spinner widget with the default animation style.
    pub fn spinner(&self, text: impl Into<String>) -> SpinnerHandle {
        self.spinner_with(text, SpinnerOptions::default())
    }

    /// Create a spinner widget.
    pub fn spinner_with(&self, text: impl Into<String>, options: SpinnerOptions) -> SpinnerHandle {
        let state = Arc::new(Mutex::new(SpinnerState::new(text.into(), options.style)));
        let widget: Arc<Mutex<dyn Widget>> = state.clone();
        self.shared.add_widget(widget);
        SpinnerHandle {
            state,
            console: Arc::downgrade(&self.shared),
        }
    }

    /// Create a progress bar widget.
    pub fn progress(&self, options: ProgressOptions) -> ProgressHandle {
        let state = Arc::new(Mutex::new(ProgressState::new(options)));
        let widget: Arc<Mutex<dyn Widget>> = state.clone();
        self.shared.add_widget(widget);
        ProgressHandle {
            state,
            console: Arc::downgrade(&self.shared),
        }
    }

    /// Create a spinner and hand it to `body`. The spinner stays live until
    /// a terminal call removes it.
    pub fn with_spinner<T>(
        &self,
        text: impl Into<String>,
        body: impl FnOnce(&SpinnerHandle) -> T,
    ) -> T {
        let spinner = self.spinner(text);
        body(&spinner)
    }

    /// Create a progress bar and hand it to `body`. The bar stays live until
    /// [`stop`](ProgressHandle::stop) removes it.
    pub fn with_progress<T>(
        &self,
        options: ProgressOptions,
        body: impl FnOnce(&ProgressHandle) -> T,
    ) -> T {
        let bar = self.progress(options);
        body(&bar)
    }

    /// Run a fallible task under a spinner, resolving it to a success or
    /// error line. Returns the task's result alongside any write error.
    pub fn spin_while<T, E>(
        &self,
        options: TaskSpinnerOptions,
        task: impl FnOnce() -> Result<T, E>,
    ) -> io::Result<Result<T, E>> {
        let spinner = self.spinner_with(
            options.message,
            SpinnerOptions {
                style: options.style,
            },
        );
        let result = task();
        match &result {
            Ok(_) => spinner.success(options.success.as_deref().unwrap_or("success"))?,
            Err(_) => spinner.error(options.error.as_deref().unwrap_or("error"))?,
        }
        Ok(result)
    }

    /// Remove every live widget, repainting (and so blanking) the region.
    pub fn remove_all_widgets(&self) -> io::Result<()> {
        self.shared.remove_all_widgets()
    }

    /// Number of live widgets.
    pub fn widget_count(&self) -> usize {
        self.shared.widget_count()
    }

    /// Repaint the widget region now.
    pub fn redraw(&self) -> io::Result<()> {
        self.shared.repaint()
    }

    /// Stop the redraw tick permanently. Widgets and explicit calls keep
    /// working; nothing further happens in the background.
    pub fn shutdown(&mut self) {
        if let Some(mut ticker) = self.ticker.take() {
            ticker.stop();
        }
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Console {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_order_is_declaration_order() {
        assert!(Level::Error < Level::Warn);
        assert!(Level::Warn < Level::Success);
        assert!(Level::Success < Level::Info);
        assert!(Level::Info < Level::Debug);
        assert!(Level::Debug < Level::Trace);
    }

    #[test]
    fn test_warn_threshold_filtering() {
        let options = ConsoleOptions {
            log_level: Some(Level::Warn),
            ..Default::default()
        };
        assert!(options.allows(Level::Error));
        assert!(options.allows(Level::Warn));
        assert!(!options.allows(Level::Success));
        assert!(!options.allows(Level::Info));
        assert!(!options.allows(Level::Debug));
        assert!(!options.allows(Level::Trace));
    }

    #[test]
    fn test_default_threshold_allows_everything() {
        let options = ConsoleOptions::default();
        for level in Level::ALL {
            assert!(options.allows(level), "{level} should pass by default");
        }
    }

    #[test]
    fn test_level_parse_round_trip() {
        for level in Level::ALL {
            assert_eq!(level.name().parse::<Level>().unwrap(), level);
        }
        assert!("verbose".parse::<Level>().is_err());
    }

    #[test]
    fn test_configure_merges_only_supplied_fields() {
        let mut options = ConsoleOptions {
            widget_margin: Some(2),
            log_level: Some(Level::Debug),
        };
        options.merge(ConsoleOptions {
            log_level: Some(Level::Warn),
            ..Default::default()
        });
        assert_eq!(options.widget_margin, Some(2));
        assert_eq!(options.log_level, Some(Level::Warn));
    }

    #[test]
    fn test_margin_defaults_to_one() {
        assert_eq!(ConsoleOptions::default().margin(), 1);
        let options = ConsoleOptions {
            widget_margin: Some(0),
            ..Default::default()
        };
        assert_eq!(options.margin(), 0);
    }
}
