// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::Error;
use crate::Trap;
use crate::file::RollingFileWriter;
use crate::layout::TextLayout;
use crate::record::Level;
use crate::record::Record;

mod builder;
pub use self::builder::AppLoggerBuilder;

mod registry;

/// A named logger writing to a file that rolls over daily at local midnight.
///
/// Every logging call formats one line with [`TextLayout`] and appends it to the current log
/// file. The first call after a midnight renames the current file to `<log_file>.<YYYY-MM-DD>`,
/// reopens the current file, and deletes the oldest backups beyond the backup count.
///
/// Clones share the same file. Loggers built with the same name share it too, as long as one
/// handle is alive and [`shutdown`](AppLogger::shutdown) has not been called.
///
/// # Examples
///
/// ```no_run
/// use daylog::AppLogger;
///
/// let logger = AppLogger::new().unwrap();
/// logger.debug("Debug message").unwrap();
/// logger.info("Info message").unwrap();
/// logger.warning("Warning message").unwrap();
/// logger.error("Error message").unwrap();
/// logger.critical("Critical message").unwrap();
/// logger.shutdown().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct AppLogger {
    inner: Arc<Inner>,
}

#[derive(Debug)]
pub(crate) struct Inner {
    name: String,
    min_level: Level,
    layout: TextLayout,
    trap: Arc<dyn Trap>,
    // `None` once shut down
    writer: Mutex<Option<RollingFileWriter>>,
}

impl AppLogger {
    /// Create a logger with the default configuration of [`AppLoggerBuilder::new`].
    ///
    /// # Errors
    ///
    /// See [`AppLoggerBuilder::build`].
    pub fn new() -> Result<AppLogger, Error> {
        AppLoggerBuilder::new().build()
    }

    /// Create a new [`AppLoggerBuilder`].
    pub fn builder() -> AppLoggerBuilder {
        AppLoggerBuilder::new()
    }

    /// Return the live logger registered under `name`, if any.
    pub fn get(name: &str) -> Option<AppLogger> {
        registry::get(name)
    }

    pub(crate) fn from_writer(
        name: String,
        writer: RollingFileWriter,
        trap: Arc<dyn Trap>,
    ) -> AppLogger {
        let inner = Inner {
            name,
            min_level: Level::Debug,
            layout: TextLayout::default(),
            trap,
            writer: Mutex::new(Some(writer)),
        };
        AppLogger {
            inner: Arc::new(inner),
        }
    }

    fn writer(&self) -> MutexGuard<'_, Option<RollingFileWriter>> {
        self.inner.writer.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// The name this logger is registered under.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Whether records of `level` are written. Every level is enabled.
    pub fn enabled(&self, level: Level) -> bool {
        level >= self.inner.min_level
    }

    /// Whether [`shutdown`](AppLogger::shutdown) has been called on this logger or a clone.
    pub fn is_shutdown(&self) -> bool {
        self.writer().is_none()
    }

    pub(crate) fn trap(&self) -> &dyn Trap {
        self.inner.trap.as_ref()
    }

    /// Write `message` with the given level.
    ///
    /// # Errors
    ///
    /// Return an error if the logger has been shut down, if the message cannot be formatted, or
    /// if the rollover or the write fails.
    pub fn log(&self, level: Level, message: impl fmt::Display) -> Result<(), Error> {
        if !self.enabled(level) {
            return Ok(());
        }

        let mut writer = self.writer();
        let writer = writer
            .as_mut()
            .ok_or_else(|| Error::shutdown(self.name()))?;

        let now = writer.now();
        let mut bytes = self
            .inner
            .layout
            .format(&Record::new(&now, level, &message))?;
        bytes.push(b'\n');
        writer.append(&now, &bytes)
    }

    /// Write `message` with level [`Level::Debug`].
    ///
    /// # Errors
    ///
    /// See [`AppLogger::log`].
    pub fn debug(&self, message: impl fmt::Display) -> Result<(), Error> {
        self.log(Level::Debug, message)
    }

    /// Write `message` with level [`Level::Info`].
    ///
    /// # Errors
    ///
    /// See [`AppLogger::log`].
    pub fn info(&self, message: impl fmt::Display) -> Result<(), Error> {
        self.log(Level::Info, message)
    }

    /// Write `message` with level [`Level::Warning`].
    ///
    /// # Errors
    ///
    /// See [`AppLogger::log`].
    pub fn warning(&self, message: impl fmt::Display) -> Result<(), Error> {
        self.log(Level::Warning, message)
    }

    /// Write `message` with level [`Level::Error`].
    ///
    /// # Errors
    ///
    /// See [`AppLogger::log`].
    pub fn error(&self, message: impl fmt::Display) -> Result<(), Error> {
        self.log(Level::Error, message)
    }

    /// Write `message` with level [`Level::Critical`].
    ///
    /// # Errors
    ///
    /// See [`AppLogger::log`].
    pub fn critical(&self, message: impl fmt::Display) -> Result<(), Error> {
        self.log(Level::Critical, message)
    }

    /// Flush the current log file.
    ///
    /// # Errors
    ///
    /// Return an error if the logger has been shut down or the flush fails.
    pub fn flush(&self) -> Result<(), Error> {
        let mut writer = self.writer();
        let writer = writer
            .as_mut()
            .ok_or_else(|| Error::shutdown(self.name()))?;
        writer.flush()
    }

    /// Flush and close the current log file, and release the name of this logger.
    ///
    /// Every clone observes the shutdown: further logging calls fail with
    /// [`ErrorKind::Shutdown`](crate::ErrorKind::Shutdown). Calling `shutdown` again does
    /// nothing.
    ///
    /// # Errors
    ///
    /// Return an error if the final flush fails. The file is closed regardless.
    pub fn shutdown(&self) -> Result<(), Error> {
        let writer = self.writer().take();
        registry::remove(self);

        match writer {
            Some(mut writer) => writer.flush(),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::str::FromStr;
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    use jiff::Zoned;
    use jiff::tz::TimeZone;
    use tempfile::TempDir;

    use super::*;
    use crate::ErrorKind;
    use crate::file::clock::Clock;
    use crate::file::clock::ManualClock;

    // the registry is process-wide and tests run concurrently
    fn unique_name(prefix: &str) -> String {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        format!("{prefix}-{n}")
    }

    fn manual_logger(
        dir: &TempDir,
        start_time: &str,
        backup_count: usize,
    ) -> (AppLogger, ManualClock) {
        let clock = ManualClock::new(Zoned::from_str(start_time).unwrap());
        let logger = AppLogger::builder()
            .log_dir(dir.path())
            .name(unique_name("manual"))
            .backup_count(backup_count)
            .time_zone(TimeZone::UTC)
            .clock(Clock::ManualClock(clock.clone()))
            .build()
            .unwrap();
        (logger, clock)
    }

    fn read(dir: &TempDir, filename: &str) -> String {
        fs::read_to_string(dir.path().join(filename)).unwrap()
    }

    #[test]
    fn test_line_format_of_each_level() {
        let temp_dir = TempDir::new().unwrap();
        let (logger, _) = manual_logger(&temp_dir, "2024-03-02T08:44:21.389[UTC]", 30);

        logger.debug("Debug message").unwrap();
        logger.info("Info message").unwrap();
        logger.warning("Warning message").unwrap();
        logger.error("Error message").unwrap();
        logger.critical("Critical message").unwrap();
        logger.shutdown().unwrap();

        assert_eq!(
            read(&temp_dir, "log"),
            "2024-03-02 08:44:21,389 - DEBUG - Debug message\n\
             2024-03-02 08:44:21,389 - INFO - Info message\n\
             2024-03-02 08:44:21,389 - WARNING - Warning message\n\
             2024-03-02 08:44:21,389 - ERROR - Error message\n\
             2024-03-02 08:44:21,389 - CRITICAL - Critical message\n"
        );
    }

    #[test]
    fn test_timestamps_follow_configured_time_zone() {
        let temp_dir = TempDir::new().unwrap();
        let clock = ManualClock::new(Zoned::from_str("2024-03-02T08:44:21.389[UTC]").unwrap());
        let logger = AppLogger::builder()
            .log_dir(temp_dir.path())
            .name(unique_name("tz"))
            .time_zone(TimeZone::fixed(jiff::tz::offset(-5)))
            .clock(Clock::ManualClock(clock))
            .build()
            .unwrap();

        logger.info("east coast").unwrap();
        assert_eq!(
            read(&temp_dir, "log"),
            "2024-03-02 03:44:21,389 - INFO - east coast\n"
        );
    }

    #[test]
    fn test_three_rollovers_with_two_backups() {
        let temp_dir = TempDir::new().unwrap();
        let (logger, clock) = manual_logger(&temp_dir, "2024-03-01T10:00:00[UTC]", 2);

        for (time, message) in [
            ("2024-03-01T10:00:00[UTC]", "on D1"),
            ("2024-03-02T10:00:00[UTC]", "on D2"),
            ("2024-03-03T10:00:00[UTC]", "on D3"),
            ("2024-03-04T10:00:00[UTC]", "after D3"),
        ] {
            clock.set_now(Zoned::from_str(time).unwrap());
            logger.info(message).unwrap();
        }
        logger.shutdown().unwrap();

        assert!(!temp_dir.path().join("log.2024-03-01").exists());
        assert_eq!(
            read(&temp_dir, "log.2024-03-02"),
            "2024-03-02 10:00:00,000 - INFO - on D2\n"
        );
        assert_eq!(
            read(&temp_dir, "log.2024-03-03"),
            "2024-03-03 10:00:00,000 - INFO - on D3\n"
        );
        assert_eq!(
            read(&temp_dir, "log"),
            "2024-03-04 10:00:00,000 - INFO - after D3\n"
        );
    }

    #[test]
    fn test_write_after_shutdown_fails() {
        let temp_dir = TempDir::new().unwrap();
        let (logger, _) = manual_logger(&temp_dir, "2024-03-02T08:44:21.389[UTC]", 30);
        let clone = logger.clone();

        logger.info("before").unwrap();
        logger.shutdown().unwrap();
        assert!(clone.is_shutdown());

        let err = clone.error("after").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Shutdown);
        assert_eq!(clone.flush().unwrap_err().kind(), ErrorKind::Shutdown);

        // a second shutdown is a no-op
        logger.shutdown().unwrap();
        assert_eq!(
            read(&temp_dir, "log"),
            "2024-03-02 08:44:21,389 - INFO - before\n"
        );
    }

    #[test]
    fn test_same_name_shares_the_file() {
        let temp_dir = TempDir::new().unwrap();
        let other_dir = TempDir::new().unwrap();
        let name = unique_name("shared");

        let first = AppLogger::builder()
            .log_dir(temp_dir.path())
            .name(&name)
            .build()
            .unwrap();
        // the configuration of a later build is ignored while the name is taken
        let second = AppLogger::builder()
            .log_dir(other_dir.path())
            .name(&name)
            .build()
            .unwrap();
        assert!(Arc::ptr_eq(&first.inner, &second.inner));
        assert!(Arc::ptr_eq(
            &first.inner,
            &AppLogger::get(&name).unwrap().inner
        ));

        first.info("one").unwrap();
        second.info("two").unwrap();
        assert_eq!(read(&temp_dir, "log").lines().count(), 2);
        assert!(!other_dir.path().join("log").exists());

        // shutting down releases the name
        first.shutdown().unwrap();
        assert!(AppLogger::get(&name).is_none());
        let third = AppLogger::builder()
            .log_dir(other_dir.path())
            .name(&name)
            .build()
            .unwrap();
        assert!(!Arc::ptr_eq(&first.inner, &third.inner));
        third.info("three").unwrap();
        assert_eq!(read(&other_dir, "log").lines().count(), 1);
    }

    #[test]
    fn test_dropping_every_handle_releases_the_name() {
        let temp_dir = TempDir::new().unwrap();
        let name = unique_name("dropped");

        let logger = AppLogger::builder()
            .log_dir(temp_dir.path())
            .name(&name)
            .build()
            .unwrap();
        logger.info("hello").unwrap();
        assert!(AppLogger::get(&name).is_some());

        drop(logger);
        assert!(AppLogger::get(&name).is_none());
    }

    #[test]
    fn test_all_levels_enabled() {
        let temp_dir = TempDir::new().unwrap();
        let (logger, _) = manual_logger(&temp_dir, "2024-03-02T08:44:21.389[UTC]", 30);
        for level in Level::ALL {
            assert!(logger.enabled(level));
        }
    }
}
