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

//! The process-wide lookup of loggers by name.
//!
//! The registry holds weak references: a logger is released once its last handle is dropped
//! or it is shut down, and its name can then be built again.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::OnceLock;
use std::sync::Weak;

use crate::Error;
use crate::logger::AppLogger;
use crate::logger::Inner;

type Registry = HashMap<String, Weak<Inner>>;

fn registry() -> MutexGuard<'static, Registry> {
    static REGISTRY: OnceLock<Mutex<Registry>> = OnceLock::new();
    REGISTRY
        .get_or_init(Default::default)
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

fn upgrade(registry: &Registry, name: &str) -> Option<AppLogger> {
    let inner = registry.get(name)?.upgrade()?;
    let logger = AppLogger { inner };
    if logger.is_shutdown() {
        None
    } else {
        Some(logger)
    }
}

/// Return the live logger registered under `name`.
pub(crate) fn get(name: &str) -> Option<AppLogger> {
    upgrade(&registry(), name)
}

/// Return the live logger registered under `name`, or register the one `make` creates.
///
/// The registry stays locked while `make` runs, so racing builds of one name open one file.
pub(crate) fn get_or_try_insert(
    name: &str,
    make: impl FnOnce() -> Result<AppLogger, Error>,
) -> Result<AppLogger, Error> {
    let mut registry = registry();
    if let Some(logger) = upgrade(&registry, name) {
        return Ok(logger);
    }

    let logger = make()?;
    registry.retain(|_, weak| weak.strong_count() > 0);
    registry.insert(name.to_string(), Arc::downgrade(&logger.inner));
    Ok(logger)
}

/// Unregister `logger`, unless its name has been taken by another logger since.
pub(crate) fn remove(logger: &AppLogger) {
    let mut registry = registry();
    let registered = registry
        .get(logger.name())
        .is_some_and(|weak| Weak::ptr_eq(weak, &Arc::downgrade(&logger.inner)));
    if registered {
        registry.remove(logger.name());
    }
}
