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

//! Log records and their severity levels.

use std::fmt;
use std::str::FromStr;

use jiff::Zoned;

use crate::Error;
use crate::ErrorKind;

/// An enum representing the available severity levels of a record.
///
/// Levels are ordered from the least to the most severe, so `Level::Debug < Level::Critical`.
#[repr(usize)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Level {
    /// Designates diagnostic information for developers.
    Debug = 10,
    /// Designates useful information.
    Info = 20,
    /// Designates hazardous situations.
    Warning = 30,
    /// Designates errors the application can survive.
    Error = 40,
    /// Designates errors the application may not survive.
    Critical = 50,
}

impl Level {
    /// All levels, from the least to the most severe.
    pub const ALL: [Level; 5] = [
        Level::Debug,
        Level::Info,
        Level::Warning,
        Level::Error,
        Level::Critical,
    ];

    /// Return the string representation of the `Level`.
    ///
    /// This returns the same string as the `fmt::Display` implementation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
        }
    }
}

impl fmt::Debug for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Level, Self::Err> {
        for level in Level::ALL {
            if s.eq_ignore_ascii_case(level.as_str()) {
                return Ok(level);
            }
        }

        // the abbreviation most other loggers use
        if s.eq_ignore_ascii_case("warn") {
            return Ok(Level::Warning);
        }

        Err(Error::new(ErrorKind::InvalidConfig, "malformed level").with_context("input", s))
    }
}

/// A single log record: when it happened, how severe it is, and what it says.
///
/// Records only live for the duration of a logging call.
#[derive(Clone, Copy)]
pub struct Record<'a> {
    time: &'a Zoned,
    level: Level,
    payload: &'a dyn fmt::Display,
}

impl fmt::Debug for Record<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("time", &self.time)
            .field("level", &self.level)
            .field("payload", &format_args!("{}", self.payload))
            .finish()
    }
}

impl<'a> Record<'a> {
    /// Create a new record.
    pub fn new(time: &'a Zoned, level: Level, payload: &'a dyn fmt::Display) -> Self {
        Self {
            time,
            level,
            payload,
        }
    }

    /// The instant the record was created, in the logger's time zone.
    pub fn time(&self) -> &'a Zoned {
        self.time
    }

    /// The severity of the record.
    pub fn level(&self) -> Level {
        self.level
    }

    /// The message of the record.
    pub fn payload(&self) -> &'a dyn fmt::Display {
        self.payload
    }
}
