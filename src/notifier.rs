//! Progress reporting for the manifest pipeline.
//!
//! [`Notifier`] prints the pipeline's progress lines (one per completed step) and,
//! under a single verbosity switch, decides how the step in flight is shown:
//! - [`VerbosityLevel::Quiet`] → an `indicatif` spinner on stderr names the running step.
//! - [`VerbosityLevel::Info`]/[`VerbosityLevel::Debug`]/[`VerbosityLevel::Trace`] → the
//!   running step is logged at info level instead.
//!
//! Progress lines always go to the notifier's output (stdout unless replaced with
//! [`Notifier::with_output`]), whatever the verbosity.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, LevelFilter};
use std::cell::RefCell;
use std::io::{self, Write};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VerbosityLevel {
    Quiet = 0, // Spinner, warnings only
    Info = 1,  // Text logs at info level
    Debug = 2, // Text logs at debug level
    Trace = 3, // Text logs at trace level
}

impl From<u8> for VerbosityLevel {
    fn from(level: u8) -> Self {
        match level {
            0 => VerbosityLevel::Quiet,
            1 => VerbosityLevel::Info,
            2 => VerbosityLevel::Debug,
            _ => VerbosityLevel::Trace,
        }
    }
}

impl VerbosityLevel {
    pub fn to_log_level(self) -> LevelFilter {
        match self {
            VerbosityLevel::Quiet => LevelFilter::Warn,
            VerbosityLevel::Info => LevelFilter::Info,
            VerbosityLevel::Debug => LevelFilter::Debug,
            VerbosityLevel::Trace => LevelFilter::Trace,
        }
    }
}

pub struct Notifier {
    verbosity: VerbosityLevel,
    output: RefCell<Box<dyn Write>>,
    active_spinner: RefCell<Option<ProgressBar>>,
}

impl Notifier {
    pub fn new(verbosity_level: u8) -> Self {
        Self::with_output(verbosity_level, Box::new(io::stdout()))
    }

    /// Sends progress lines to `output` instead of stdout.
    pub fn with_output(verbosity_level: u8, output: Box<dyn Write>) -> Self {
        Self {
            verbosity: VerbosityLevel::from(verbosity_level),
            output: RefCell::new(output),
            active_spinner: RefCell::new(None),
        }
    }

    /// Announces the step about to run.
    pub fn begin(&self, message: &str) {
        if self.use_spinner() {
            // Lazy initialize spinner on first use
            let mut spinner = self.active_spinner.borrow_mut();
            let spinner = spinner.get_or_insert_with(|| {
                let style = ProgressStyle::default_spinner()
                    .template("{spinner:.green} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner());
                let bar = ProgressBar::new_spinner();
                bar.set_style(style);
                bar.enable_steady_tick(Duration::from_millis(100));
                bar
            });
            spinner.set_message(message.to_string());
        } else {
            info!("{}", message);
        }
    }

    /// Prints a progress line for a completed step.
    pub fn step(&self, message: &str) -> Result<()> {
        let mut output = self.output.borrow_mut();
        let write = |output: &mut Box<dyn Write>| -> io::Result<()> {
            writeln!(output, "{}", message)?;
            output.flush()
        };

        let result = match self.active_spinner.borrow().as_ref() {
            Some(spinner) => spinner.suspend(|| write(&mut *output)),
            None => write(&mut *output),
        };
        result.context("Failed to write progress line")
    }

    /// Clears the spinner, if one was shown.
    pub fn finish(&self) {
        if let Some(spinner) = self.active_spinner.borrow_mut().take() {
            spinner.finish_and_clear();
        }
    }

    fn use_spinner(&self) -> bool {
        self.verbosity == VerbosityLevel::Quiet
    }
}

impl Drop for Notifier {
    fn drop(&mut self) {
        self.finish();
    }
}
