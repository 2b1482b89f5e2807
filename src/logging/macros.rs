//! Variadic logging macros
//!
//! Each macro takes a [`Facility`](crate::Facility) followed by one or more
//! `Display` values.

/// Log values joined by spaces on the info channel
///
/// ```no_run
/// # let (log, _guard) = daylog::initialize().unwrap();
/// daylog::log_info!(log, "server listening on port", 8080);
/// ```
#[macro_export]
macro_rules! log_info {
    ($facility:expr, $($value:expr),+ $(,)?) => {
        $facility.info(&[$(&$value as &dyn ::std::fmt::Display),+])
    };
}

/// Log values joined by spaces on the warning channel
#[macro_export]
macro_rules! log_warning {
    ($facility:expr, $($value:expr),+ $(,)?) => {
        $facility.warning(&[$(&$value as &dyn ::std::fmt::Display),+])
    };
}

/// Log values concatenated on the error channel, annotated with two frames
///
/// The line reads `<origin-file>:<line> -> <caller-file>:<line>: <message>`,
/// where the caller frame is the function containing this macro and the origin
/// frame is the function that called it. Both are read from the stack at run
/// time. A function entered straight from `main` or a thread entry has no origin
/// and gets the bare message.
///
/// Without debug symbols the frames come from the macro site and
/// `Location::caller()` instead, which only names an origin when the enclosing
/// function is `#[track_caller]`.
///
/// ```no_run
/// # let (log, _guard) = daylog::initialize().unwrap();
/// fn load(log: &daylog::Facility, name: &str) {
///     daylog::log_error!(log, "missing asset: ", name);
/// }
///
/// fn start(log: &daylog::Facility) {
///     load(log, "ship.obj");
/// }
///
/// start(&log);
/// ```
#[macro_export]
macro_rules! log_error {
    ($facility:expr, $($value:expr),+ $(,)?) => {
        $facility.error(
            $crate::CallChain::resolve(
                $crate::CallSite::new(file!(), line!()),
                ::std::panic::Location::caller(),
            ),
            &[$(&$value as &dyn ::std::fmt::Display),+],
        )
    };
}
