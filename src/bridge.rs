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

//! A bridge to forward logs from the `log` crate to an [`AppLogger`].

use crate::AppLogger;
use crate::record::Level;

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Self::Error,
            log::Level::Warn => Self::Warning,
            log::Level::Info => Self::Info,
            log::Level::Debug => Self::Debug,
            // there is no level below debug in a log file
            log::Level::Trace => Self::Debug,
        }
    }
}

impl log::Log for AppLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        AppLogger::enabled(self, metadata.level().into())
    }

    fn log(&self, record: &log::Record) {
        if let Err(err) = AppLogger::log(self, record.level().into(), record.args()) {
            self.trap().trap(&err);
        }
    }

    fn flush(&self) {
        if let Err(err) = AppLogger::flush(self) {
            self.trap().trap(&err);
        }
    }
}

impl AppLogger {
    /// Set up this logger as the `log` crate global logger.
    ///
    /// All logs from the `log` crate are written to this logger's file. `Trace` records are
    /// written as [`Level::Debug`], `Warn` records as [`Level::Warning`]. Errors go to the
    /// logger's trap since there is no caller to return them to.
    ///
    /// This function will set the global maximum log level to `Trace`. To override this, call
    /// [`log::set_max_level`] after this function.
    ///
    /// # Errors
    ///
    /// Return an error if the log crate global logger has already been set.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use daylog::AppLogger;
    ///
    /// let logger = AppLogger::new().unwrap();
    /// if let Err(err) = logger.apply() {
    ///     eprintln!("failed to setup log crate: {err}");
    /// }
    ///
    /// log::info!("This log will be written to a rolling file.");
    /// ```
    pub fn apply(&self) -> Result<(), log::SetLoggerError> {
        log::set_boxed_logger(Box::new(self.clone()))?;
        log::set_max_level(log::LevelFilter::Trace);
        Ok(())
    }
}
