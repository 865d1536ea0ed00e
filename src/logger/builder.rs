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

use std::path::PathBuf;
use std::sync::Arc;

use jiff::tz::TimeZone;

use crate::Error;
use crate::Trap;
use crate::file::RollingFileWriterBuilder;
#[cfg(test)]
use crate::file::clock::Clock;
use crate::logger::AppLogger;
use crate::logger::registry;
use crate::trap::DefaultTrap;

/// A builder to configure and create an [`AppLogger`].
///
/// # Examples
///
/// ```no_run
/// use daylog::AppLogger;
///
/// let logger = AppLogger::builder()
///     .log_dir("logs")
///     .log_file("app.log")
///     .name("app")
///     .backup_count(7)
///     .build()
///     .unwrap();
///
/// logger.info("service started").unwrap();
/// ```
#[derive(Debug)]
pub struct AppLoggerBuilder {
    log_dir: PathBuf,
    log_file: String,
    name: String,
    backup_count: usize,
    time_zone: Option<TimeZone>,
    trap: Box<dyn Trap>,
    #[cfg(test)]
    clock: Clock,
}

impl Default for AppLoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AppLoggerBuilder {
    /// Create a new builder with the default configuration:
    ///
    /// * `log_dir`: `logs`
    /// * `log_file`: `log`
    /// * `name`: `log`
    /// * `backup_count`: `30`
    /// * `time_zone`: the system time zone
    /// * `trap`: [`DefaultTrap`]
    pub fn new() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            log_file: "log".to_string(),
            name: "log".to_string(),
            backup_count: 30,
            time_zone: None,
            trap: Box::new(DefaultTrap::default()),
            #[cfg(test)]
            clock: Clock::DefaultClock,
        }
    }

    /// Set the directory of the current log file and its backups.
    ///
    /// The directory and its parents are created if missing.
    pub fn log_dir(mut self, log_dir: impl Into<PathBuf>) -> Self {
        self.log_dir = log_dir.into();
        self
    }

    /// Set the filename of the current log file. Backups append `.<YYYY-MM-DD>` to it.
    pub fn log_file(mut self, log_file: impl Into<String>) -> Self {
        self.log_file = log_file.into();
        self
    }

    /// Set the name the logger is registered under.
    ///
    /// Building a logger with the name of a live logger returns that logger.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the number of dated backups to keep.
    ///
    /// `0` deletes each backup as soon as it is rotated out.
    pub fn backup_count(mut self, n: usize) -> Self {
        self.backup_count = n;
        self
    }

    /// Set the time zone of the timestamps and of the midnight that ends a log file.
    ///
    /// Default to the system time zone.
    pub fn time_zone(mut self, tz: TimeZone) -> Self {
        self.time_zone = Some(tz);
        self
    }

    /// Set the trap for errors that cannot be returned to a caller.
    ///
    /// Default to [`DefaultTrap`].
    pub fn trap(mut self, trap: impl Into<Box<dyn Trap>>) -> Self {
        self.trap = trap.into();
        self
    }

    #[cfg(test)]
    pub(crate) fn clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Build the [`AppLogger`], or return the live logger already registered under the name.
    ///
    /// When a logger of the same name is live, the rest of this builder's configuration is
    /// ignored.
    ///
    /// # Errors
    ///
    /// Return an error if either:
    ///
    /// * The log directory cannot be created.
    /// * The configured filename is empty.
    /// * The current log file cannot be opened.
    pub fn build(self) -> Result<AppLogger, Error> {
        let name = self.name.clone();
        registry::get_or_try_insert(&name, move || {
            let trap: Arc<dyn Trap> = Arc::from(self.trap);
            let writer = RollingFileWriterBuilder::new(self.log_dir, self.log_file)
                .max_backups(self.backup_count)
                .time_zone(self.time_zone)
                .trap(trap.clone());
            #[cfg(test)]
            let writer = writer.clock(self.clock);
            let writer = writer.build()?;
            Ok(AppLogger::from_writer(self.name, writer, trap))
        })
    }
}
