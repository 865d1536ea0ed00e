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

//! Daylog is an application logger that writes leveled, timestamped lines to a file, rolls the
//! file over at local midnight, and keeps a bounded number of dated backups.
//!
//! # Overview
//!
//! An [`AppLogger`] owns one log file under a directory. Each logging call appends a line like
//!
//! ```text
//! 2024-03-02 08:44:21,389 - DEBUG - Debug message
//! ```
//!
//! The first call after midnight renames the file to `<log_file>.<YYYY-MM-DD>`, starts a fresh
//! file, and deletes the oldest backups beyond the configured count. Loggers are looked up by
//! name, so call sites can share one file without passing a handle around; cloning the handle
//! works too.
//!
//! # Examples
//!
//! Simple setup with the default configuration, writing to `logs/log`:
//!
//! ```no_run
//! use daylog::AppLogger;
//!
//! let logger = AppLogger::new().unwrap();
//! logger.info("This is an info message.").unwrap();
//! logger.shutdown().unwrap();
//! ```
//!
//! Custom directory and retention, and forwarding of the `log` crate:
//!
//! ```no_run
//! use daylog::AppLogger;
//!
//! let logger = AppLogger::builder()
//!     .log_dir("/var/log/my_app")
//!     .log_file("my_app.log")
//!     .name("my_app")
//!     .backup_count(7)
//!     .build()
//!     .unwrap();
//! logger.apply().unwrap();
//!
//! log::warn!("This warning lands in /var/log/my_app/my_app.log.");
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod layout;
pub mod record;
pub mod trap;

mod bridge;
mod error;
mod file;
mod logger;

pub use self::error::Error;
pub use self::error::ErrorKind;
pub use self::logger::AppLogger;
pub use self::logger::AppLoggerBuilder;
pub use self::record::Level;
pub use self::trap::Trap;
