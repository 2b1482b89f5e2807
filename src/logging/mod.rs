//! Daily log facility
//!
//! Provides the dated log file, the console/file tee, the three severity
//! channels, error call-site annotation, the panic boundary and a `tracing`
//! bridge.

mod bridge;
#[cfg(test)]
mod buffer;
mod call_site;
mod channel;
mod error;
mod facility;
mod file_writer;
mod macros;

pub use bridge::FacilityLayer;
#[cfg(test)]
pub(crate) use buffer::SharedBuffer;
pub use call_site::{CallChain, CallSite};
pub use error::LogError;
pub use facility::{initialize, Facility};
pub use file_writer::LogFileGuard;
