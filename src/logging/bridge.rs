//! `tracing` integration
//!
//! Forwards `tracing` events into a [`Facility`] so that code logging through
//! `tracing` macros lands in the same daily file.

use std::fmt::{self, Write as _};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

use super::channel::Severity;
use super::facility::Facility;

/// Layer routing `ERROR` to the error channel, `WARN` to warning and `INFO` to
/// info. `DEBUG` and `TRACE` events are not forwarded.
#[derive(Clone)]
pub struct FacilityLayer {
    facility: Facility,
}

impl FacilityLayer {
    pub fn new(facility: Facility) -> Self {
        Self { facility }
    }
}

/// Channel for a `tracing` level, if it is forwarded at all
fn severity_for(level: &Level) -> Option<Severity> {
    match *level {
        Level::ERROR => Some(Severity::Error),
        Level::WARN => Some(Severity::Warning),
        Level::INFO => Some(Severity::Info),
        _ => None,
    }
}

impl<S: Subscriber> Layer<S> for FacilityLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let Some(severity) = severity_for(event.metadata().level()) else {
            return;
        };

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        self.facility.write(severity, &visitor.finish());
    }
}

/// Collects the `message` field and renders the rest as `key=value`
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn push_field(&mut self, name: &str, value: fmt::Arguments<'_>) {
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{}={}", name, value);
    }

    fn finish(self) -> String {
        match (self.message.is_empty(), self.fields.is_empty()) {
            (_, true) => self.message,
            (true, false) => self.fields,
            (false, false) => format!("{} {}", self.message, self.fields),
        }
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.push_field(field.name(), format_args!("{}", value));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.push_field(field.name(), format_args!("{:?}", value));
        }
    }
}
