//! Severity channels and line rendering

use std::fmt::{Display, Write as _};
use std::sync::Arc;

use chrono::{DateTime, Local};

use super::file_writer::TeeWriter;

/// Timestamp layout: date, time and microseconds
pub(crate) const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S%.6f";

/// Severity of a log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    /// Literal prefix placed in front of the message
    pub(crate) fn prefix(&self) -> &'static str {
        match self {
            Severity::Info => "INFO: ",
            Severity::Warning => "WARNING: ",
            Severity::Error => "ERROR: ",
        }
    }
}

/// Render one line: `<date> <time.micros> <PREFIX><message>\n`
pub(crate) fn render_line(now: DateTime<Local>, severity: Severity, message: &str) -> String {
    let mut line = String::with_capacity(32 + severity.prefix().len() + message.len());
    let _ = write!(line, "{} ", now.format(TIMESTAMP_FORMAT));
    line.push_str(severity.prefix());
    line.push_str(message);
    if !line.ends_with('\n') {
        line.push('\n');
    }
    line
}

/// Join values with single spaces
pub(crate) fn join_spaced(values: &[&dyn Display]) -> String {
    let mut out = String::new();
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{}", value);
    }
    out
}

/// Concatenate values with no separator
pub(crate) fn join_tight(values: &[&dyn Display]) -> String {
    let mut out = String::new();
    for value in values {
        let _ = write!(out, "{}", value);
    }
    out
}

/// A named logger bound to the shared tee writer
#[derive(Clone)]
pub(crate) struct Channel {
    severity: Severity,
    sink: Arc<TeeWriter>,
}

impl Channel {
    pub(crate) fn new(severity: Severity, sink: Arc<TeeWriter>) -> Self {
        Self { severity, sink }
    }

    pub(crate) fn write(&self, message: &str) {
        let line = render_line(Local::now(), self.severity, message);
        self.sink.write_line(line.as_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2025, 6, 1, 10, 0, 0)
            .unwrap()
            + chrono::Duration::microseconds(123_456)
    }

    #[test]
    fn test_render_line_layout() {
        let line = render_line(fixed_time(), Severity::Warning, "disk low");
        assert_eq!(line, "2025/06/01 10:00:00.123456 WARNING: disk low\n");
    }

    #[test]
    fn test_render_line_keeps_single_newline() {
        let line = render_line(fixed_time(), Severity::Info, "already terminated\n");
        assert_eq!(line, "2025/06/01 10:00:00.123456 INFO: already terminated\n");
    }

    #[test]
    fn test_prefixes() {
        assert_eq!(Severity::Info.prefix(), "INFO: ");
        assert_eq!(Severity::Warning.prefix(), "WARNING: ");
        assert_eq!(Severity::Error.prefix(), "ERROR: ");
    }

    #[test]
    fn test_join_spaced_and_tight() {
        let count = 3;
        let values: [&dyn Display; 3] = [&"copied", &count, &"files"];
        assert_eq!(join_spaced(&values), "copied 3 files");
        assert_eq!(join_tight(&values), "copied3files");
        assert_eq!(join_spaced(&[]), "");
    }
}
