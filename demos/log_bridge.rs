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

use daylog::AppLogger;

fn main() {
    let logger = AppLogger::builder()
        .log_dir("logs")
        .log_file("log_bridge.log")
        .name("log_bridge")
        .backup_count(7)
        .build()
        .unwrap();
    logger.apply().unwrap();

    log::error!("Hello error!");
    log::warn!("Hello warn!");
    log::info!("Hello info!");
    log::debug!("Hello debug!");
    log::trace!("Hello trace!");

    if let Err(err) = logger.shutdown() {
        eprintln!("failed to shut down logger: {err}");
    }
}
