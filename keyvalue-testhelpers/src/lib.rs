#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]
#![warn(clippy::std_instead_of_alloc)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

pub use color_eyre::eyre;
pub use keyvalue_testhelpers_macros::test;
pub use log::LevelFilter;

use core::{cell::Cell, str::FromStr};
use log::{Level, Log, Metadata, Record};
use owo_colors::{OwoColorize, Style};
use std::io::Write;
use std::sync::Once;

/// Environment variable holding the maximum log level of a test run (`trace` when unset)
pub const LOG_LEVEL_VAR: &str = "KEYVALUE_TEST_LOG";

std::thread_local! {
    // the harness runs every test on its own thread
    static TEST_LEVEL: Cell<Option<LevelFilter>> = const { Cell::new(None) };
}

struct TestLogger;

impl Log for TestLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
            && TEST_LEVEL
                .with(Cell::get)
                .is_none_or(|level| metadata.level() <= level)
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let level_style = match record.level() {
            Level::Error => Style::new().fg_rgb::<243, 139, 168>(),
            Level::Warn => Style::new().fg_rgb::<249, 226, 175>(),
            Level::Info => Style::new().fg_rgb::<166, 227, 161>(),
            Level::Debug => Style::new().fg_rgb::<137, 180, 250>(),
            Level::Trace => Style::new().fg_rgb::<148, 226, 213>(),
        };

        eprintln!(
            "{} - {}: {}",
            record.level().style(level_style),
            record.target().style(Style::new().fg_rgb::<137, 180, 250>()),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn max_level() -> LevelFilter {
    std::env::var(LOG_LEVEL_VAR)
        .ok()
        .and_then(|level| LevelFilter::from_str(&level).ok())
        .unwrap_or(LevelFilter::Trace)
}

/// Installs color-eyre and color-backtrace (except on miri) and a colored
/// logger. Only the first call in a process does anything.
pub fn setup() {
    static SETUP: Once = Once::new();
    SETUP.call_once(|| {
        #[cfg(not(miri))]
        install_hooks();

        if log::set_boxed_logger(Box::new(TestLogger)).is_ok() {
            log::set_max_level(max_level());
        }
    });
    TEST_LEVEL.with(|level| level.set(None));
}

/// [`setup`], then caps the log output of the calling test at `level`.
///
/// [`LOG_LEVEL_VAR`] still caps every test.
pub fn setup_with_level(level: LevelFilter) {
    setup();
    TEST_LEVEL.with(|current| current.set(Some(level)));
}

#[cfg(not(miri))]
fn install_hooks() {
    use color_eyre::config::HookBuilder;
    use regex::Regex;
    use std::sync::LazyLock;

    /// Frames from the panic machinery, the test harness and thread plumbing
    static IGNORE_FRAMES: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^(std::panic|core::panic|test::run_test|__pthread_cond_wait|std::sys::(pal|backtrace)|std::thread::Builder|core::ops::function|test::__rust_begin_short_backtrace|<core::panic::|<alloc::boxed::Box<F,A> as core::ops::function::FnOnce<Args>>::call_once)")
            .unwrap()
    });

    let eyre_filter = move |frames: &mut Vec<&color_eyre::config::Frame>| {
        frames.retain(|frame| {
            frame
                .name
                .as_ref()
                .is_none_or(|name| !IGNORE_FRAMES.is_match(&name.to_string()))
        });
    };

    // another harness in the same process may own the hook already
    let _ = HookBuilder::default()
        .add_frame_filter(Box::new(eyre_filter))
        .install();

    {
        use color_backtrace::{BacktracePrinter, Frame};

        let filter = move |frames: &mut Vec<&Frame>| {
            frames.retain(|frame| {
                frame
                    .name
                    .as_ref()
                    .is_none_or(|name| !IGNORE_FRAMES.is_match(name))
            });
        };

        let stderr = color_backtrace::termcolor::StandardStream::stderr(
            color_backtrace::termcolor::ColorChoice::Auto,
        );
        BacktracePrinter::new()
            .add_frame_filter(Box::new(filter))
            .install(Box::new(stderr));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled(level: Level) -> bool {
        TestLogger.enabled(&Metadata::builder().level(level).target("keyvalue").build())
    }

    #[::core::prelude::rust_2024::test]
    fn test_level_caps_the_calling_thread() {
        setup_with_level(LevelFilter::Warn);
        assert!(!enabled(Level::Info));
        assert!(!enabled(Level::Trace));

        std::thread::spawn(|| {
            setup();
            assert_eq!(TEST_LEVEL.with(Cell::get), None);
        })
        .join()
        .unwrap();

        setup();
        assert_eq!(TEST_LEVEL.with(Cell::get), None);
    }
}
