//! daylog - a daily log file facility
//!
//! Mirrors `INFO`, `WARNING` and `ERROR` lines to stdout and to
//! `logfiles/<YYYY-MM-DD>.log`, annotates error lines with the two calling
//! frames and turns panics at the entry point into logged errors.

pub mod config;
pub mod logging;

pub use config::Config;
pub use logging::{initialize, CallChain, CallSite, Facility, FacilityLayer, LogError, LogFileGuard};
