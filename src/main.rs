//! glint - demo driver for the console-output manager.
//!
//! Walks the library through its paces: leveled lines with placeholder
//! arguments, one spinner per animation style, one progress bar per bar
//! style, and a task spinner.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use glint::{
    args, BarStyle, Console, ConsoleOptions, Level, ProgressOptions, SpinnerOptions, SpinnerStyle,
    TaskSpinnerOptions,
};

/// Leveled console output with live spinner and progress-bar widgets.
#[derive(Parser, Debug)]
#[command(name = "glint")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Minimum severity to print: error, warn, success, info, debug, trace.
    #[arg(long, default_value = "trace")]
    log_level: Level,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Demo scenarios.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print one line per severity, exercising `{}` placeholder arguments.
    Logs,
    /// Animate one spinner per style, then resolve them.
    Spinners {
        /// How long to keep the spinners alive, in milliseconds.
        #[arg(long, default_value_t = 3000)]
        duration_ms: u64,
    },
    /// Step one progress bar per style to completion.
    Progress {
        /// Number of update steps.
        #[arg(long, default_value_t = 10)]
        steps: u32,
        /// Delay between steps, in milliseconds.
        #[arg(long, default_value_t = 300)]
        step_ms: u64,
    },
    /// Full walkthrough: logs, spinners, progress bars, task spinner.
    All,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&interrupted);
    ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))?;

    let console = Console::with_options(ConsoleOptions {
        log_level: Some(cli.log_level),
        ..Default::default()
    });

    match cli.command.unwrap_or(Commands::All) {
        Commands::Logs => run_logs(&console)?,
        Commands::Spinners { duration_ms } => run_spinners(&console, &interrupted, duration_ms)?,
        Commands::Progress { steps, step_ms } => {
            run_progress(&console, &interrupted, steps, step_ms)?;
        }
        Commands::All => {
            run_logs(&console)?;
            run_spinners(&console, &interrupted, 2000)?;
            run_progress(&console, &interrupted, 10, 300)?;
            run_task_spinner(&console, &interrupted)?;
        }
    }

    if interrupted.load(Ordering::SeqCst) {
        console.remove_all_widgets()?;
        console.warn(&args!["interrupted"])?;
    }

    Ok(())
}

/// Sleep in short slices so Ctrl-C takes effect promptly.
///
/// Returns `true` when the full duration elapsed without an interrupt.
fn wait(interrupted: &AtomicBool, duration: Duration) -> bool {
    let slice = Duration::from_millis(50);
    let mut remaining = duration;
    while !remaining.is_zero() {
        if interrupted.load(Ordering::SeqCst) {
            return false;
        }
        let step = remaining.min(slice);
        thread::sleep(step);
        remaining -= step;
    }
    !interrupted.load(Ordering::SeqCst)
}

fn run_logs(console: &Console) -> Result<()> {
    let filename = "Hello.txt";
    console.info(&args!["starting to download {}", filename])?;
    console.warn(&args!["deprecation warning: --fast option was removed"])?;
    console.error(&args!["download failed"])?;
    console.success(&args!["download completed"])?;
    console.debug(&args!["found {} items in {}", 5, filename])?;
    console.trace(&args!["trace this!!"])?;
    console.info(&args![])?;
    Ok(())
}

fn run_spinners(console: &Console, interrupted: &AtomicBool, duration_ms: u64) -> Result<()> {
    let spinners: Vec<_> = SpinnerStyle::ALL
        .into_iter()
        .enumerate()
        .map(|(index, style)| {
            console.spinner_with(format!("loading... {}", index + 1), SpinnerOptions { style })
        })
        .collect();

    wait(interrupted, Duration::from_millis(duration_ms));

    for (index, spinner) in spinners.iter().enumerate() {
        spinner.success(&format!("loaded {}", index + 1))?;
    }
    Ok(())
}

fn run_progress(
    console: &Console,
    interrupted: &AtomicBool,
    steps: u32,
    step_ms: u64,
) -> Result<()> {
    let bars: Vec<_> = BarStyle::ALL
        .into_iter()
        .map(|style| {
            console.progress(ProgressOptions {
                style,
                format: Some("{spinner} {progress}% {bar} ETA: {eta}".to_string()),
                ..ProgressOptions::new(f64::from(steps))
            })
        })
        .collect();

    for step in 1..=steps {
        for bar in &bars {
            bar.update(f64::from(step));
        }
        if !wait(interrupted, Duration::from_millis(step_ms)) {
            break;
        }
    }

    for bar in &bars {
        bar.stop()?;
    }
    console.success(&args!["{} bars finished", bars.len()])?;
    Ok(())
}

fn run_task_spinner(console: &Console, interrupted: &AtomicBool) -> Result<()> {
    let options = TaskSpinnerOptions {
        success: Some("Done waiting!".to_string()),
        error: Some("Failed to wait?".to_string()),
        ..TaskSpinnerOptions::new("Waiting...")
    };
    console.spin_while(options, || -> Result<(), std::io::Error> {
        wait(interrupted, Duration::from_millis(1500));
        Ok(())
    })??;
    Ok(())
}
