//! Source locations used to annotate error lines
//!
//! The two frames above an error call are read from the stack at runtime. When
//! the binary carries no symbol information, the compile-time locations captured
//! by `log_error!` are used instead.

use std::borrow::Cow;
use std::fmt;
use std::panic::Location;
use std::path::Path;

use backtrace::Backtrace;

/// A source position: file and line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    pub file: Cow<'static, str>,
    pub line: u32,
}

impl CallSite {
    pub fn new(file: impl Into<Cow<'static, str>>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// File name without its directories
    pub fn base_name(&self) -> &str {
        Path::new(self.file.as_ref())
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(&self.file)
    }
}

impl From<&'static Location<'static>> for CallSite {
    fn from(location: &'static Location<'static>) -> Self {
        Self::new(location.file(), location.line())
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.base_name(), self.line)
    }
}

/// The two frames above an error call
///
/// `caller` is the function that logged the error, `origin` is where that
/// function was called from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallChain {
    pub origin: CallSite,
    pub caller: CallSite,
}

impl CallChain {
    pub fn new(origin: CallSite, caller: CallSite) -> Self {
        Self { origin, caller }
    }

    /// Pair the logging site with the location reported by `Location::caller()`
    ///
    /// Inside a `#[track_caller]` function `origin` is that function's call
    /// site. Anywhere else it is the logging site itself, which means there is
    /// no second frame to report and `None` is returned.
    ///
    /// `Location::caller()` passes through every `#[track_caller]` function in a
    /// row, so with nested attributed functions the origin is the outermost call.
    /// This is only the fallback for binaries without symbols.
    pub fn resolve(caller: CallSite, origin: &'static Location<'static>) -> Option<Self> {
        let origin = CallSite::from(origin);
        if origin.file == caller.file && origin.line == caller.line {
            None
        } else {
            Some(Self::new(origin, caller))
        }
    }
}

impl fmt::Display for CallChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.origin, self.caller)
    }
}

/// Outcome of reading the stack above a logging function
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StackLookup {
    /// Both frames are user code
    Found(CallChain),
    /// The caller was entered directly from the runtime (thread or program entry)
    NoOrigin,
    /// The logging function or its callers could not be symbolized
    Unavailable,
}

/// A symbolized stack entry, inlined frames included
struct Symbol {
    name: String,
    site: Option<CallSite>,
}

/// Read the two frames above the function whose path ends with `marker`
///
/// `marker` must name a non-inlined function on the current stack, e.g.
/// `"Facility::error"`.
#[inline(never)]
pub(crate) fn lookup_call_chain(marker: &str) -> StackLookup {
    let symbols = symbolize(&Backtrace::new());
    chain_after(&symbols, marker)
}

fn symbolize(backtrace: &Backtrace) -> Vec<Symbol> {
    backtrace
        .frames()
        .iter()
        .flat_map(|frame| frame.symbols())
        .map(|symbol| Symbol {
            name: symbol
                .name()
                .map(|name| format!("{:#}", name))
                .unwrap_or_default(),
            site: match (symbol.filename(), symbol.lineno()) {
                (Some(file), Some(line)) => {
                    Some(CallSite::new(file.to_string_lossy().into_owned(), line))
                }
                _ => None,
            },
        })
        .collect()
}

fn chain_after(symbols: &[Symbol], marker: &str) -> StackLookup {
    let suffix = format!("::{}", marker);
    let Some(start) = symbols.iter().position(|s| s.name.ends_with(&suffix)) else {
        return StackLookup::Unavailable;
    };

    let mut above = symbols[start + 1..].iter();
    let caller = match above.next() {
        Some(Symbol {
            site: Some(site),
            name,
        }) if !is_runtime(name, site) => site.clone(),
        _ => return StackLookup::Unavailable,
    };

    match above.next() {
        Some(Symbol {
            site: Some(site),
            name,
        }) if !is_runtime(name, site) => {
            StackLookup::Found(CallChain::new(site.clone(), caller))
        }
        Some(Symbol { site: Some(_), .. }) => StackLookup::NoOrigin,
        _ => StackLookup::Unavailable,
    }
}

/// Frames belonging to the standard library rather than the program
fn is_runtime(name: &str, site: &CallSite) -> bool {
    const RUNTIME_CRATES: [&str; 4] = ["std::", "core::", "alloc::", "test::"];

    let file = site.file.replace('\\', "/");
    if file.starts_with("/rustc/")
        || ["library/std/", "library/core/", "library/alloc/", "library/test/"]
            .iter()
            .any(|dir| file.contains(dir))
    {
        return true;
    }

    let name = name.trim_start_matches('<');
    RUNTIME_CRATES.iter().any(|krate| name.starts_with(krate))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbol(name: &str, file: &str, line: u32) -> Symbol {
        Symbol {
            name: name.to_string(),
            site: Some(CallSite::new(file.to_string(), line)),
        }
    }

    fn stack() -> Vec<Symbol> {
        vec![
            symbol("backtrace::backtrace::trace", "/cargo/backtrace/src/lib.rs", 10),
            symbol("app::log::Facility::error", "/src/app/log.rs", 20),
            symbol("app::jobs::import", "/src/app/jobs/import.rs", 41),
            symbol("app::main", "/src/app/main.rs", 12),
            symbol(
                "std::rt::lang_start::{{closure}}",
                "/rustc/abc/library/std/src/rt.rs",
                166,
            ),
        ]
    }

    #[test]
    fn test_base_name_strips_directories() {
        let site = CallSite::new("src/handlers/upload.rs", 42);
        assert_eq!(site.base_name(), "upload.rs");
        assert_eq!(site.to_string(), "upload.rs:42");
    }

    #[test]
    fn test_chain_display() {
        let chain = CallChain::new(
            CallSite::new("src/main.rs", 10),
            CallSite::new("src/jobs/worker.rs", 77),
        );
        assert_eq!(chain.to_string(), "main.rs:10 -> worker.rs:77");
    }

    #[test]
    fn test_chain_after_marker() {
        let lookup = chain_after(&stack(), "Facility::error");
        assert_eq!(
            lookup,
            StackLookup::Found(CallChain::new(
                CallSite::new("/src/app/main.rs", 12),
                CallSite::new("/src/app/jobs/import.rs", 41),
            ))
        );
    }

    #[test]
    fn test_chain_from_entry_point_has_no_origin() {
        // `main` logging directly: the frame above it is the runtime
        let lookup = chain_after(&stack()[2..], "jobs::import");
        assert_eq!(lookup, StackLookup::NoOrigin);
    }

    #[test]
    fn test_chain_without_symbols_is_unavailable() {
        let symbols = vec![
            symbol("app::log::Facility::error", "/src/app/log.rs", 20),
            Symbol {
                name: String::new(),
                site: None,
            },
        ];
        assert_eq!(
            chain_after(&symbols, "Facility::error"),
            StackLookup::Unavailable
        );
        assert_eq!(
            chain_after(&symbols, "Facility::warning"),
            StackLookup::Unavailable
        );
    }

    #[test]
    fn test_marker_must_match_whole_segment() {
        // `error_at` is not `error`
        let symbols = vec![symbol("app::log::Facility::error_at", "/src/app/log.rs", 20)];
        assert_eq!(
            chain_after(&symbols, "Facility::error"),
            StackLookup::Unavailable
        );
    }

    #[test]
    fn test_is_runtime() {
        let std_site = CallSite::new("/rustc/abc/library/core/src/ops/function.rs", 250);
        assert!(is_runtime("core::ops::function::FnOnce::call_once", &std_site));
        assert!(is_runtime(
            "<alloc::boxed::Box<F,A> as core::ops::function::FnOnce<Args>>::call_once",
            &CallSite::new("boxed.rs", 1)
        ));
        assert!(!is_runtime(
            "app::main",
            &CallSite::new("/home/dev/app/src/main.rs", 3)
        ));
    }

    #[test]
    fn test_resolve_without_track_caller_is_none() {
        let here = Location::caller();
        assert_eq!(CallChain::resolve(CallSite::from(here), here), None);
    }

    #[track_caller]
    fn tracked(caller: CallSite) -> Option<CallChain> {
        CallChain::resolve(caller, Location::caller())
    }

    #[test]
    fn test_resolve_through_track_caller() {
        let caller = CallSite::new(file!(), 1);
        let chain = tracked(caller.clone()).unwrap();
        assert_eq!(chain.caller, caller);
        assert_eq!(chain.origin.file, file!());
        assert_eq!(chain.origin.line, line!() - 3);
    }
}
