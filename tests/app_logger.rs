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

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::thread;

use daylog::AppLogger;
use daylog::ErrorKind;
use daylog::Level;
use jiff::civil::DateTime;
use rand::Rng;
use rand::distr::Alphanumeric;
use tempfile::TempDir;

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

/// Split `<YYYY-MM-DD HH:MM:SS,mmm> - <LEVELNAME> - <message>` into level and message.
fn parse_line(line: &str) -> (Level, String) {
    let mut parts = line.splitn(3, " - ");
    let time = parts.next().unwrap();
    let level = parts.next().unwrap();
    let message = parts.next().unwrap();

    assert_eq!(time.len(), 23, "malformed timestamp: {time}");
    let (seconds, millis) = time.split_at(19);
    DateTime::strptime("%Y-%m-%d %H:%M:%S", seconds).unwrap();
    assert!(millis.starts_with(','), "malformed timestamp: {time}");
    assert!(millis[1..].bytes().all(|b| b.is_ascii_digit()), "malformed timestamp: {time}");

    assert_eq!(level, level.to_ascii_uppercase());
    (level.parse().unwrap(), message.to_string())
}

#[test]
fn test_build_creates_directory_and_empty_file() {
    let temp_dir = TempDir::new().unwrap();
    let log_dir = temp_dir.path().join("a").join("b");

    let logger = AppLogger::builder()
        .log_dir(&log_dir)
        .log_file("app.log")
        .name("creates-directory")
        .build()
        .unwrap();

    assert!(log_dir.is_dir());
    assert_eq!(fs::metadata(log_dir.join("app.log")).unwrap().len(), 0);
    logger.shutdown().unwrap();
}

#[test]
fn test_build_fails_on_blocked_directory() {
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("blocker");
    fs::write(&blocker, "").unwrap();

    let err = AppLogger::builder()
        .log_dir(blocker.join("logs"))
        .name("blocked-directory")
        .build()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DirectoryCreation);

    // a failed build does not take the name
    assert!(AppLogger::get("blocked-directory").is_none());
}

#[test]
fn test_build_fails_on_empty_filename() {
    let temp_dir = TempDir::new().unwrap();
    let err = AppLogger::builder()
        .log_dir(temp_dir.path())
        .log_file("")
        .name("empty-filename")
        .build()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidConfig);
}

#[test]
fn test_one_line_per_call() {
    let temp_dir = TempDir::new().unwrap();
    let logger = AppLogger::builder()
        .log_dir(temp_dir.path())
        .name("one-line-per-call")
        .build()
        .unwrap();

    logger.critical("This is a critical message").unwrap();
    logger.debug("This is a debug message").unwrap();
    logger.info("This is an info message").unwrap();
    logger.warning("This is a warning message").unwrap();
    logger.error(format_args!("failed after {} retries", 3)).unwrap();
    logger.log(Level::Info, 42).unwrap();
    logger.shutdown().unwrap();

    let lines = read_lines(&temp_dir.path().join("log"));
    let parsed = lines.iter().map(|line| parse_line(line)).collect::<Vec<_>>();
    assert_eq!(
        parsed,
        vec![
            (Level::Critical, "This is a critical message".to_string()),
            (Level::Debug, "This is a debug message".to_string()),
            (Level::Info, "This is an info message".to_string()),
            (Level::Warning, "This is a warning message".to_string()),
            (Level::Error, "failed after 3 retries".to_string()),
            (Level::Info, "42".to_string()),
        ]
    );
}

#[test]
fn test_reopen_appends() {
    let temp_dir = TempDir::new().unwrap();
    let build = || {
        AppLogger::builder()
            .log_dir(temp_dir.path())
            .name("reopen-appends")
            .build()
            .unwrap()
    };

    let logger = build();
    logger.info("first run").unwrap();
    logger.shutdown().unwrap();

    let logger = build();
    logger.info("second run").unwrap();
    logger.shutdown().unwrap();

    let messages = read_lines(&temp_dir.path().join("log"))
        .iter()
        .map(|line| parse_line(line).1)
        .collect::<Vec<_>>();
    assert_eq!(messages, vec!["first run", "second run"]);
}

#[test]
fn test_shared_by_name_across_call_sites() {
    let temp_dir = TempDir::new().unwrap();
    let logger = AppLogger::builder()
        .log_dir(temp_dir.path())
        .name("shared-by-name")
        .build()
        .unwrap();

    fn somewhere_else() {
        let logger = AppLogger::get("shared-by-name").unwrap();
        logger.warning("from somewhere else").unwrap();
    }
    somewhere_else();

    logger.shutdown().unwrap();
    assert!(AppLogger::get("shared-by-name").is_none());

    let lines = read_lines(&temp_dir.path().join("log"));
    assert_eq!(
        lines.iter().map(|line| parse_line(line)).collect::<Vec<_>>(),
        vec![(Level::Warning, "from somewhere else".to_string())]
    );
}

#[test]
fn test_concurrent_writers_never_interleave() {
    let threads = 8;
    let per_thread = 200;

    let temp_dir = TempDir::new().unwrap();
    let logger = AppLogger::builder()
        .log_dir(temp_dir.path())
        .name("concurrent-writers")
        .build()
        .unwrap();

    let mut expected = HashSet::new();
    let handles = (0..threads)
        .map(|t| {
            let messages = (0..per_thread)
                .map(|i| format!("thread {t} message {i} {}", generate_random_string()))
                .collect::<Vec<_>>();
            expected.extend(messages.iter().cloned());

            let logger = logger.clone();
            thread::spawn(move || {
                for message in messages {
                    logger.info(message).unwrap();
                }
            })
        })
        .collect::<Vec<_>>();
    for handle in handles {
        handle.join().unwrap();
    }
    logger.shutdown().unwrap();

    let actual = read_lines(&temp_dir.path().join("log"))
        .iter()
        .map(|line| parse_line(line).1)
        .collect::<HashSet<_>>();
    assert_eq!(actual.len(), threads * per_thread);
    assert_eq!(actual, expected);
}

fn generate_random_string() -> String {
    let mut rng = rand::rng();
    let len = rng.random_range(50..=100);
    let random_string: String = std::iter::repeat(())
        .map(|()| rng.sample(Alphanumeric))
        .map(char::from)
        .take(len)
        .collect();

    random_string
}
