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

//! The daily rollover schedule and the naming of dated backups.

use jiff::Timestamp;
use jiff::Zoned;
use jiff::civil::Date;

/// The `strftime` pattern of the date suffix of a backup.
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// Return the next local midnight strictly after `now`, in the time zone of `now`.
///
/// Return `None` if the next day is out of the supported range, which means never roll over.
pub(crate) fn next_rollover(now: &Zoned) -> Option<Timestamp> {
    let tomorrow = now.date().tomorrow().ok()?;
    // a midnight skipped by a DST transition resolves to the first instant of that day
    let midnight = tomorrow.to_zoned(now.time_zone().clone()).ok()?;
    Some(midnight.timestamp())
}

/// Return the filename of the backup that closes the period of `date`.
pub(crate) fn backup_filename(filename: &str, date: Date) -> String {
    format!("{filename}.{}", date.strftime(DATE_FORMAT))
}

/// Parse the date out of a backup filename, or return `None` if `candidate` is not a backup of
/// `filename`.
pub(crate) fn parse_backup_date(filename: &str, candidate: &str) -> Option<Date> {
    let suffix = candidate.strip_prefix(filename)?.strip_prefix('.')?;
    let date = Date::strptime(DATE_FORMAT, suffix).ok()?;
    // only names this appender would produce, e.g., reject "2024-3-1"
    if date.strftime(DATE_FORMAT).to_string() != suffix {
        return None;
    }
    Some(date)
}
