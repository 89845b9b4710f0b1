//! Library search path with an explicitly invalidated resolution cache.
//!
//! # Design
//! - Directories prepended by the bootstrapper sit in front of a base list
//!   (the platform loader variable, or a fixed list in tests).
//! - The joined resolution is cached and dropped on every change; the next
//!   reader re-resolves lazily.
//! - The process environment is never mutated.

use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use once_cell::sync::Lazy;
use tracing::{debug, error};

use crate::error::{BootstrapError, BootstrapResult};

static GLOBAL: Lazy<Arc<LibrarySearchPath>> =
    Lazy::new(|| Arc::new(LibrarySearchPath::from_environment()));

#[derive(Debug)]
enum PathBase {
    Environment(&'static str),
    Fixed(Vec<PathBuf>),
}

#[derive(Debug, Default)]
struct SearchState {
    prepended: Vec<PathBuf>,
    resolved: Option<OsString>,
}

/// Ordered list of directories native libraries are resolved from.
#[derive(Debug)]
pub struct LibrarySearchPath {
    base: PathBase,
    state: RwLock<SearchState>,
}

impl LibrarySearchPath {
    /// Name of the dynamic loader variable for the running platform.
    #[must_use]
    pub const fn loader_variable() -> &'static str {
        if cfg!(windows) {
            "PATH"
        } else if cfg!(target_os = "macos") {
            "DYLD_LIBRARY_PATH"
        } else {
            "LD_LIBRARY_PATH"
        }
    }

    /// Search path whose base is read from the loader variable at resolution time.
    #[must_use]
    pub fn from_environment() -> Self {
        Self {
            base: PathBase::Environment(Self::loader_variable()),
            state: RwLock::new(SearchState::default()),
        }
    }

    /// Search path with a fixed base list.
    #[must_use]
    pub fn with_base(entries: Vec<PathBuf>) -> Self {
        Self {
            base: PathBase::Fixed(entries),
            state: RwLock::new(SearchState::default()),
        }
    }

    /// Process-wide search path shared by every bootstrapper that is not
    /// handed its own.
    #[must_use]
    pub fn global() -> Arc<Self> {
        Arc::clone(&*GLOBAL)
    }

    /// Put `dir` at the front of the search order and invalidate the cached
    /// resolution. A directory already present is moved, not duplicated.
    pub fn prepend(&self, dir: impl Into<PathBuf>) {
        let dir = dir.into();
        let mut state = self.write();
        state.prepended.retain(|existing| existing != &dir);
        state.prepended.insert(0, dir);
        state.resolved = None;
        drop(state);
        debug!("library search path updated");
    }

    /// Drop the cached resolution so the next read re-resolves.
    pub fn invalidate(&self) {
        self.write().resolved = None;
    }

    /// Whether a cached resolution is currently held.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.read().resolved.is_some()
    }

    /// All entries in search order.
    #[must_use]
    pub fn entries(&self) -> Vec<PathBuf> {
        let mut entries = self.read().prepended.clone();
        entries.extend(self.base_entries());
        entries
    }

    /// Joined search path, resolved lazily and cached until the next change.
    ///
    /// # Errors
    ///
    /// Returns an error if an entry contains the platform path separator.
    pub fn resolve(&self) -> BootstrapResult<OsString> {
        let cached = self.read().resolved.clone();
        if let Some(resolved) = cached {
            return Ok(resolved);
        }

        // Entries are read and the result stored under the same write lock.
        let mut state = self.write();
        if let Some(resolved) = state.resolved.clone() {
            return Ok(resolved);
        }
        let mut entries = state.prepended.clone();
        entries.extend(self.base_entries());
        let joined =
            env::join_paths(entries).map_err(|source| BootstrapError::JoinPaths { source })?;
        state.resolved = Some(joined.clone());
        Ok(joined)
    }

    /// First existing file named `file_name` in search order.
    #[must_use]
    pub fn find_library(&self, file_name: &str) -> Option<PathBuf> {
        self.entries()
            .into_iter()
            .map(|dir| dir.join(file_name))
            .find(|candidate| candidate.is_file())
    }

    fn base_entries(&self) -> Vec<PathBuf> {
        match &self.base {
            PathBase::Environment(variable) => env::var_os(variable)
                .map(|value| env::split_paths(&value).collect())
                .unwrap_or_default(),
            PathBase::Fixed(entries) => entries.clone(),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, SearchState> {
        match self.state.read() {
            Ok(guard) => guard,
            Err(poisoned) => {
                error!("library search path lock poisoned; continuing with recovered guard");
                poisoned.into_inner()
            }
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, SearchState> {
        match self.state.write() {
            Ok(guard) => guard,
            Err(poisoned) => {
                error!("library search path lock poisoned; continuing with recovered guard");
                poisoned.into_inner()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Barrier;
    use std::thread;
    use vbridge_test_support::fixtures::temp_dir;

    #[test]
    fn prepend_orders_before_base_without_duplicates() {
        let path = LibrarySearchPath::with_base(vec![PathBuf::from("/usr/lib")]);
        path.prepend("/opt/a");
        path.prepend("/opt/b");
        path.prepend("/opt/a");
        assert_eq!(
            path.entries(),
            vec![
                PathBuf::from("/opt/a"),
                PathBuf::from("/opt/b"),
                PathBuf::from("/usr/lib"),
            ]
        );
    }

    #[test]
    fn prepend_invalidates_cached_resolution() -> anyhow::Result<()> {
        let path = LibrarySearchPath::with_base(vec![PathBuf::from("/usr/lib")]);
        let before = path.resolve()?;
        assert!(path.is_resolved());
        assert_eq!(before, env::join_paths([PathBuf::from("/usr/lib")])?);

        path.prepend("/opt/native");
        assert!(!path.is_resolved());
        let after = path.resolve()?;
        assert_eq!(
            after,
            env::join_paths([PathBuf::from("/opt/native"), PathBuf::from("/usr/lib")])?
        );

        path.invalidate();
        assert!(!path.is_resolved());
        Ok(())
    }

    #[test]
    fn find_library_respects_search_order() -> anyhow::Result<()> {
        let temp = temp_dir("vbridge-search-")?;
        let first = temp.path().join("first");
        let second = temp.path().join("second");
        fs::create_dir_all(&first)?;
        fs::create_dir_all(&second)?;
        fs::write(second.join("libsrtp.so"), b"second")?;

        let path = LibrarySearchPath::with_base(vec![second.clone()]);
        assert_eq!(path.find_library("libsrtp.so"), Some(second.join("libsrtp.so")));

        fs::write(first.join("libsrtp.so"), b"first")?;
        path.prepend(&first);
        assert_eq!(path.find_library("libsrtp.so"), Some(first.join("libsrtp.so")));
        assert_eq!(path.find_library("libmissing.so"), None);
        Ok(())
    }

    #[test]
    fn resolve_racing_prepend_never_keeps_stale_entries() -> anyhow::Result<()> {
        let base: Vec<PathBuf> = (0..512)
            .map(|index| PathBuf::from(format!("/usr/lib/base{index}")))
            .collect();
        for round in 0..500 {
            let path = Arc::new(LibrarySearchPath::with_base(base.clone()));
            let barrier = Arc::new(Barrier::new(2));
            let reader = {
                let path = Arc::clone(&path);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    path.resolve().map(|_| ())
                })
            };

            let dir = PathBuf::from(format!("/opt/native{round}"));
            barrier.wait();
            path.prepend(&dir);
            reader.join().expect("resolver thread")?;

            let resolved = path.resolve()?;
            assert_eq!(env::split_paths(&resolved).next(), Some(dir), "round {round}");
        }
        Ok(())
    }

    #[test]
    fn global_instance_is_shared() {
        assert!(Arc::ptr_eq(
            &LibrarySearchPath::global(),
            &LibrarySearchPath::global()
        ));
    }
}
