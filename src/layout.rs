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

use std::fmt::Write;

use crate::Error;
use crate::record::Record;

/// The layout every [`AppLogger`](crate::AppLogger) writes its records with.
///
/// Output format:
///
/// ```text
/// 2024-03-02 08:44:21,389 - CRITICAL - This is a critical message
/// 2024-03-02 08:44:31,399 - DEBUG - This is a debug message
/// 2024-03-02 08:44:31,403 - INFO - This is an info message
/// ```
///
/// The timestamp is printed in the time zone the record time carries, with millisecond
/// precision. No trailing line terminator is added; the writer appends it.
///
/// # Examples
///
/// ```
/// use daylog::layout::TextLayout;
///
/// let text_layout = TextLayout::default();
/// ```
#[derive(Debug, Clone, Default)]
#[non_exhaustive]
pub struct TextLayout {}

impl TextLayout {
    /// The `strftime` pattern of the timestamp column, up to the seconds.
    pub const TIME_FORMAT: &'static str = "%Y-%m-%d %H:%M:%S";

    /// Format a record into bytes.
    ///
    /// # Errors
    ///
    /// Return an error if the payload's `Display` implementation fails.
    pub fn format(&self, record: &Record) -> Result<Vec<u8>, Error> {
        let mut text = String::new();

        let time = record.time();
        let seconds = time.strftime(Self::TIME_FORMAT);
        let millis = time.millisecond();
        let level = record.level();
        let message = record.payload();
        write!(&mut text, "{seconds},{millis:03} - {level} - {message}")
            .map_err(Error::from_fmt_error)?;

        Ok(text.into_bytes())
    }
}
