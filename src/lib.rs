//! glint - leveled console output with live, in-place-updating widgets.
//!
//! Log lines scroll as usual while spinners and progress bars animate below
//! them, repainted in place with cursor-control escape sequences. Assumes a
//! VT100-compatible ANSI terminal.
//!
//! ```no_run
//! use glint::{args, Console, ProgressOptions};
//!
//! # fn main() -> std::io::Result<()> {
//! let console = Console::new();
//! console.info(&args!["starting to download {}", "Hello.txt"])?;
//!
//! let bar = console.progress(ProgressOptions {
//!     format: Some("{spinner} {progress}% {bar} ETA: {eta}".to_string()),
//!     ..ProgressOptions::new(10.0)
//! });
//! for step in 1..=10 {
//!     bar.update(f64::from(step));
//!     std::thread::sleep(std::time::Duration::from_millis(300));
//! }
//! bar.stop()?;
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

/// Version string from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod console;
pub mod message;
pub mod style;
pub mod timefmt;
pub mod widget;

// Re-export key types for convenience
pub use console::{Console, ConsoleOptions, Level, ParseLevelError, TaskSpinnerOptions};
pub use message::{format_message, Arg};
pub use style::{BarStyle, SpinnerStyle, StyleError, StyleTable};
pub use widget::progress::{ProgressHandle, ProgressOptions};
pub use widget::spinner::{SpinnerHandle, SpinnerOptions};
pub use widget::Widget;
