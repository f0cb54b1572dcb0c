//! In-process mutual exclusion keyed by cache path.
//!
//! Each mirror path and each snapshot path gets its own mutex, created on
//! first use. Work on one path is serialized; work on different paths runs in
//! parallel.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::{Error, Result};

/// Table of per-path locks.
#[derive(Debug, Clone, Default)]
pub struct PathLocks {
    locks: Arc<Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>>,
}

impl PathLocks {
    /// Create an empty lock table
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` while holding the lock for `path`.
    pub fn with_lock<T, F>(&self, path: &Path, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let lock = {
            let mut locks = self.locks.lock().map_err(|_| Error::LockPoisoned {
                context: "path lock table".to_string(),
            })?;
            Arc::clone(locks.entry(path.to_path_buf()).or_default())
        };

        let _guard = lock.lock().map_err(|_| Error::LockPoisoned {
            context: format!("lock for {}", path.display()),
        })?;
        f()
    }
}
