//! Panic capture around handler calls.
//!
//! A process-wide hook is installed on first use. While a thread is inside
//! [`catch`], the hook records the panic location and a backtrace taken at
//! the panic site instead of printing them; panics elsewhere go to the hook
//! that was installed before.

use std::any::Any;
use std::backtrace::Backtrace;
use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};

use once_cell::sync::OnceCell;

static HOOK: OnceCell<()> = OnceCell::new();

thread_local! {
    static CAPTURING: Cell<bool> = const { Cell::new(false) };
    static CAPTURED: RefCell<Option<Site>> = const { RefCell::new(None) };
}

struct Site {
    location: Option<String>,
    backtrace: String,
}

/// What a caught panic left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PanicReport {
    pub(crate) message: String,
    pub(crate) location: Option<String>,
    pub(crate) backtrace: String,
}

fn install_hook() {
    HOOK.get_or_init(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if CAPTURING.get() {
                CAPTURED.set(Some(Site {
                    location: info.location().map(ToString::to_string),
                    backtrace: Backtrace::force_capture().to_string(),
                }));
            } else {
                previous(info);
            }
        }));
    });
}

/// Runs `call`, turning a panic into a [`PanicReport`].
pub(crate) fn catch<T>(call: impl FnOnce() -> T) -> Result<T, PanicReport> {
    install_hook();
    let outer = CAPTURING.replace(true);
    let result = panic::catch_unwind(AssertUnwindSafe(call));
    CAPTURING.set(outer);
    result.map_err(|payload| {
        let site = CAPTURED.take();
        PanicReport {
            message: panic_message(payload.as_ref()),
            location: site.as_ref().and_then(|found| found.location.clone()),
            backtrace: site.map_or_else(
                || Backtrace::force_capture().to_string(),
                |found| found.backtrace,
            ),
        }
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| String::from("non-string panic payload"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_site_is_recorded() {
        let report = catch(|| -> u8 { panic!("gauge snapped") }).expect_err("panicked");
        assert_eq!(report.message, "gauge snapped");
        assert!(
            report
                .location
                .as_deref()
                .is_some_and(|location| location.contains("panics.rs")),
            "unexpected location: {:?}",
            report.location
        );
        assert!(!report.backtrace.trim().is_empty());
    }

    #[test]
    fn returning_calls_are_untouched() {
        assert_eq!(catch(|| 7), Ok(7));
    }

    #[test]
    fn formatted_payloads_keep_their_text() {
        let gauge = 3;
        let report = catch(|| -> u8 { panic!("gauge {gauge} snapped") }).expect_err("panicked");
        assert_eq!(report.message, "gauge 3 snapped");
    }
}
