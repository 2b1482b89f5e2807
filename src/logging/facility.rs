//! The log facility: three severity channels over one console/file tee
//!
//! A [`Facility`] is built once at startup and cloned into whatever needs to
//! log. Every line goes to stdout and to `<base>/logfiles/<YYYY-MM-DD>.log`.
//! The file itself is owned by the [`LogFileGuard`] returned alongside it.

use std::any::Any;
use std::fmt::Display;
use std::io::{self, Write};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex};

use super::call_site::{lookup_call_chain, CallChain, StackLookup};
use super::channel::{join_spaced, join_tight, Channel, Severity};
use super::error::LogError;
use super::file_writer::{open_daily_file, LogFileGuard, TeeWriter};
use crate::config::Config;

/// Path suffix of [`Facility::error`] as it appears in symbolized frames
const ERROR_MARKER: &str = "Facility::error";

/// Handle to the info, warning and error channels
///
/// Cloning is cheap and all clones write through the same destinations.
#[derive(Clone)]
pub struct Facility {
    info: Channel,
    warning: Channel,
    error: Channel,
}

impl Facility {
    /// Open today's log file as described by `config` and build the channels
    ///
    /// Unlike [`initialize`], a directory creation failure is returned instead of
    /// terminating the process.
    pub fn open(config: &Config) -> Result<(Self, LogFileGuard), LogError> {
        Self::build(config, Box::new(io::stdout()))
    }

    /// Like [`Facility::open`] but mirrors to `console` instead of stdout
    pub fn open_with_console<W>(
        config: &Config,
        console: W,
    ) -> Result<(Self, LogFileGuard), LogError>
    where
        W: Write + Send + 'static,
    {
        Self::build(config, Box::new(console))
    }

    fn build(
        config: &Config,
        console: Box<dyn Write + Send>,
    ) -> Result<(Self, LogFileGuard), LogError> {
        let (path, file) = open_daily_file(config)?;
        let file = Arc::new(Mutex::new(Some(file)));
        let sink = Arc::new(TeeWriter::new(console, Arc::clone(&file)));

        let facility = Self {
            info: Channel::new(Severity::Info, Arc::clone(&sink)),
            warning: Channel::new(Severity::Warning, Arc::clone(&sink)),
            error: Channel::new(Severity::Error, sink),
        };

        Ok((facility, LogFileGuard::new(path, file)))
    }

    /// Log values joined by spaces on the info channel
    pub fn info(&self, values: &[&dyn Display]) {
        self.info.write(&join_spaced(values));
    }

    /// Log values joined by spaces on the warning channel
    pub fn warning(&self, values: &[&dyn Display]) {
        self.warning.write(&join_spaced(values));
    }

    /// Log values concatenated without separator on the error channel
    ///
    /// The message is prefixed with `<origin-file>:<line> -> <caller-file>:<line>: `,
    /// where the caller is the function calling this method and the origin is
    /// where that function was called from. Both are read from the stack. When
    /// the binary has no symbols to read them from, `fallback` is used instead
    /// ([`log_error!`] fills it in from compile-time locations). A caller entered
    /// straight from the runtime, such as `main` or a thread's entry closure, has
    /// no origin and gets the bare message.
    ///
    /// [`log_error!`]: crate::log_error
    #[inline(never)]
    pub fn error(&self, fallback: Option<CallChain>, values: &[&dyn Display]) {
        let chain = match lookup_call_chain(ERROR_MARKER) {
            StackLookup::Found(chain) => Some(chain),
            StackLookup::NoOrigin => None,
            StackLookup::Unavailable => fallback,
        };
        self.error_at(chain, values);
    }

    /// Log on the error channel with explicitly given frames
    pub fn error_at(&self, chain: Option<CallChain>, values: &[&dyn Display]) {
        let message = join_tight(values);
        match chain {
            Some(chain) => self.error.write(&format!("{}: {}", chain, message)),
            None => self.error.write(&message),
        }
    }

    /// Write an already formatted message on the channel for `severity`
    pub(crate) fn write(&self, severity: Severity, message: &str) {
        self.channel(severity).write(message);
    }

    fn channel(&self, severity: Severity) -> &Channel {
        match severity {
            Severity::Info => &self.info,
            Severity::Warning => &self.warning,
            Severity::Error => &self.error,
        }
    }

    /// Run `body`, turning a panic into an error line instead of unwinding further
    ///
    /// Returns `None` when `body` panicked. The line reads `Panic: <payload>`.
    pub fn catch_panic<F, R>(&self, body: F) -> Option<R>
    where
        F: FnOnce() -> R,
    {
        match panic::catch_unwind(AssertUnwindSafe(body)) {
            Ok(value) => Some(value),
            Err(payload) => {
                self.error
                    .write(&join_spaced(&[&"Panic:", &panic_message(payload.as_ref())]));
                None
            }
        }
    }
}

/// Text of a panic payload
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "Box<dyn Any>".to_string()
    }
}

/// Open `<cwd>/logfiles/<today>.log` and build the facility
///
/// If the log directory cannot be created the process exits with status 1,
/// since nothing could be logged anyway. Failing to open the file is returned
/// to the caller.
pub fn initialize() -> Result<(Facility, LogFileGuard), LogError> {
    match Facility::open(&Config::default()) {
        Err(err) if err.is_fatal() => {
            eprintln!("{}", err.user_message());
            std::process::exit(1);
        }
        result => result,
    }
}
