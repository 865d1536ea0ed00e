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

use std::fs;
use std::fs::File;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use jiff::Timestamp;
use jiff::Zoned;
use jiff::civil::Date;
use jiff::tz::TimeZone;

use crate::Error;
use crate::ErrorKind;
use crate::file::clock::Clock;
use crate::file::rotation;
use crate::trap::DefaultTrap;
use crate::trap::Trap;

/// A writer for a log file that rolls over at local midnight.
#[derive(Debug)]
pub(crate) struct RollingFileWriter {
    state: State,
    writer: File,
}

impl Drop for RollingFileWriter {
    fn drop(&mut self) {
        if let Err(err) = self.writer.flush() {
            let err = Error::from_io_error(err).with_context("reason", "flush on dropped");
            self.state.trap.trap(&err);
        }
    }
}

impl RollingFileWriter {
    /// The current instant, in the time zone the writer rolls over in.
    pub(crate) fn now(&self) -> Zoned {
        self.state.localize(self.state.clock.now())
    }

    /// Append one record, rolling over first if `now` is past the next midnight.
    ///
    /// The bytes are written with a single `write_all` so that they are never split across
    /// files. A failed rollover does not hold the record back: it is written to whatever file
    /// is current, and the rollover error is returned afterwards.
    pub(crate) fn append(&mut self, now: &Zoned, bytes: &[u8]) -> Result<(), Error> {
        let rolled = if self.state.should_rollover(now) {
            self.rollover(now)
        } else {
            Ok(())
        };

        self.writer.write_all(bytes).map_err(|err| {
            Error::from_io_error(err).with_context("path", self.state.current_filepath().display())
        })?;

        rolled
    }

    pub(crate) fn flush(&mut self) -> Result<(), Error> {
        self.writer.flush().map_err(|err| {
            Error::from_io_error(err).with_context("path", self.state.current_filepath().display())
        })
    }

    /// Close the current file into a dated backup, reopen the current file and enforce the
    /// retention count.
    ///
    /// The schedule moves to the next midnight before any file is touched, so a failure is
    /// reported once and never retried against a backup that already holds the closed day.
    /// The first error is returned; later ones go to the trap.
    fn rollover(&mut self, now: &Zoned) -> Result<(), Error> {
        let closed = self.state.period;
        self.state.period = now.date();
        self.state.next_rollover = rotation::next_rollover(now);

        let trap = self.state.trap.clone();
        let mut errors = Errors::new(trap.as_ref());
        errors.push(self.flush());
        errors.push(self.state.archive_current_log(closed));

        // the previous handle may point to the archived file; dropping it closes that file
        match self.state.open_current_log() {
            Ok(new_file) => self.writer = new_file,
            Err(err) => errors.push(Err(err)),
        }

        errors.push(self.state.delete_oldest_backups());
        errors.finish()
    }
}

/// Keep the first error of a sequence of steps, and trap the rest.
struct Errors<'a> {
    first: Option<Error>,
    trap: &'a dyn Trap,
}

impl<'a> Errors<'a> {
    fn new(trap: &'a dyn Trap) -> Self {
        Self { first: None, trap }
    }

    fn push(&mut self, result: Result<(), Error>) {
        if let Err(err) = result {
            match self.first {
                None => self.first = Some(err),
                Some(_) => self.trap.trap(&err),
            }
        }
    }

    fn finish(self) -> Result<(), Error> {
        match self.first {
            None => Ok(()),
            Some(err) => Err(err),
        }
    }
}

/// A builder for configuring [`RollingFileWriter`].
#[derive(Debug)]
pub(crate) struct RollingFileWriterBuilder {
    // required
    basedir: PathBuf,
    filename: String,

    // has default
    max_backups: usize,
    time_zone: Option<TimeZone>,
    clock: Clock,
    trap: Arc<dyn Trap>,
}

impl RollingFileWriterBuilder {
    pub(crate) fn new(basedir: impl Into<PathBuf>, filename: impl Into<String>) -> Self {
        Self {
            basedir: basedir.into(),
            filename: filename.into(),
            max_backups: 30,
            time_zone: None,
            clock: Clock::DefaultClock,
            trap: Arc::new(DefaultTrap::default()),
        }
    }

    /// Set the maximum number of dated backups to keep; `0` deletes each backup right away.
    pub(crate) fn max_backups(mut self, n: usize) -> Self {
        self.max_backups = n;
        self
    }

    /// Set the time zone whose midnight ends a period. Default to the system time zone.
    pub(crate) fn time_zone(mut self, tz: Option<TimeZone>) -> Self {
        self.time_zone = tz;
        self
    }

    pub(crate) fn trap(mut self, trap: Arc<dyn Trap>) -> Self {
        self.trap = trap;
        self
    }

    #[cfg(test)]
    pub(crate) fn clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub(crate) fn build(self) -> Result<RollingFileWriter, Error> {
        let Self {
            basedir,
            filename,
            max_backups,
            time_zone,
            clock,
            trap,
        } = self;

        if filename.is_empty() {
            return Err(Error::new(
                ErrorKind::InvalidConfig,
                "filename must not be empty",
            ));
        }

        let (state, writer) = State::new(basedir, filename, max_backups, time_zone, clock, trap)?;
        Ok(RollingFileWriter { state, writer })
    }
}

#[derive(Debug)]
struct Backup {
    filepath: PathBuf,
    date: Date,
}

#[derive(Debug)]
struct State {
    log_dir: PathBuf,
    log_filename: String,
    max_backups: usize,
    /// The local date of the records the current file holds.
    period: Date,
    next_rollover: Option<Timestamp>,
    time_zone: Option<TimeZone>,
    clock: Clock,
    trap: Arc<dyn Trap>,
}

impl State {
    fn new(
        dir: impl AsRef<Path>,
        log_filename: String,
        max_backups: usize,
        time_zone: Option<TimeZone>,
        clock: Clock,
        trap: Arc<dyn Trap>,
    ) -> Result<(Self, File), Error> {
        let log_dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&log_dir).map_err(|err| {
            Error::new(ErrorKind::DirectoryCreation, "failed to create log directory")
                .with_context("path", log_dir.display())
                .with_source(err)
        })?;

        // a current log left behind by an earlier run belongs to the day it was last written,
        // unless its mtime is ahead of the clock
        let filepath = log_dir.join(&log_filename);
        let now = clock.now();
        let mtime = fs::metadata(&filepath)
            .and_then(|metadata| metadata.modified())
            .ok()
            .and_then(|mtime| Zoned::try_from(mtime).ok());
        let started = match mtime {
            Some(mtime) if mtime.timestamp() < now.timestamp() => mtime,
            _ => now,
        };
        let started = localize(started, time_zone.as_ref());

        let state = State {
            log_dir,
            log_filename,
            max_backups,
            period: started.date(),
            next_rollover: rotation::next_rollover(&started),
            time_zone,
            clock,
            trap,
        };

        let file = state.open_current_log()?;
        Ok((state, file))
    }

    fn localize(&self, time: Zoned) -> Zoned {
        localize(time, self.time_zone.as_ref())
    }

    fn current_filepath(&self) -> PathBuf {
        self.log_dir.join(&self.log_filename)
    }

    fn open_current_log(&self) -> Result<File, Error> {
        let filepath = self.current_filepath();
        OpenOptions::new()
            .append(true)
            .create(true)
            .open(&filepath)
            .map_err(|err| {
                Error::new(ErrorKind::FileAccess, "failed to open current log")
                    .with_context("path", filepath.display())
                    .with_source(err)
            })
    }

    /// Rename the current log to the backup of `closed`.
    ///
    /// A current log removed from outside leaves nothing to archive; the next open recreates it.
    fn archive_current_log(&self, closed: Date) -> Result<(), Error> {
        let current_filepath = self.current_filepath();
        if !fs::exists(&current_filepath).is_ok_and(|ok| ok) {
            return Ok(());
        }

        let archive_filepath = self
            .log_dir
            .join(rotation::backup_filename(&self.log_filename, closed));

        // a backup of the same day exists only if the clock went backwards; it is replaced
        if fs::exists(&archive_filepath).is_ok_and(|ok| ok) {
            fs::remove_file(&archive_filepath).map_err(|err| {
                Error::new(ErrorKind::FileAccess, "failed to replace backup log")
                    .with_context("path", archive_filepath.display())
                    .with_source(err)
            })?;
        }

        fs::rename(&current_filepath, &archive_filepath).map_err(|err| {
            Error::new(ErrorKind::FileAccess, "failed to archive log")
                .with_context("from", current_filepath.display())
                .with_context("to", archive_filepath.display())
                .with_source(err)
        })
    }

    fn list_backups(&self) -> Result<Vec<Backup>, Error> {
        let read_dir = fs::read_dir(&self.log_dir).map_err(|err| {
            Error::new(ErrorKind::FileAccess, "failed to read log dir")
                .with_context("path", self.log_dir.display())
                .with_source(err)
        })?;

        let backups = read_dir
            .filter_map(|entry| {
                let entry = entry.ok()?;
                let metadata = entry.metadata().ok()?;
                // the appender only creates files, not directories or symlinks
                if !metadata.is_file() {
                    return None;
                }

                let filename = entry.file_name();
                // if the filename is not a UTF-8 string, skip it
                let filename = filename.to_str()?;
                let date = rotation::parse_backup_date(&self.log_filename, filename)?;

                Some(Backup {
                    filepath: entry.path(),
                    date,
                })
            })
            .collect::<Vec<_>>();

        Ok(backups)
    }

    fn delete_oldest_backups(&self) -> Result<(), Error> {
        let mut backups = self.list_backups()?;
        if backups.len() <= self.max_backups {
            return Ok(());
        }

        // oldest first
        backups.sort_by_key(|backup| backup.date);
        let excess = backups.len() - self.max_backups;
        for backup in backups.iter().take(excess) {
            let filepath = &backup.filepath;
            fs::remove_file(filepath).map_err(|err| {
                Error::new(ErrorKind::FileAccess, "failed to remove old log")
                    .with_context("path", filepath.display())
                    .with_source(err)
            })?;
        }

        Ok(())
    }

    fn should_rollover(&self, now: &Zoned) -> bool {
        self.next_rollover.is_some_and(|ts| now.timestamp() >= ts)
    }
}

fn localize(time: Zoned, time_zone: Option<&TimeZone>) -> Zoned {
    match time_zone {
        Some(tz) => time.with_time_zone(tz.clone()),
        None => time,
    }
}
