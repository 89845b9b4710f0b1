//! One-time extraction of platform-specific native libraries.
//!
//! # Design
//! - A `native` directory next to the plugin binary marks bootstrap as done;
//!   its presence short-circuits every later call.
//! - Only files at the archive root are extracted. A failing entry is logged
//!   and skipped; the remaining entries are still copied.
//! - The resulting directory is prepended to the library search path, whose
//!   cached resolution is invalidated in the same step.

use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};
use zip::ZipArchive;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use crate::error::{BootstrapError, BootstrapResult};
use crate::platform::Platform;
use crate::search_path::LibrarySearchPath;

/// Directory created next to the plugin binary to hold extracted libraries.
pub const NATIVE_DIR_NAME: &str = "native";
/// Extension of the platform archive shipped next to the plugin binary.
pub const ARCHIVE_EXTENSION: &str = "zip";

/// What a bootstrap run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// No native archive exists for this platform; nothing was done.
    UnsupportedPlatform,
    /// The native directory already existed and was reused.
    AlreadyPresent {
        /// Native library directory.
        dir: PathBuf,
    },
    /// The archive was extracted into a fresh native directory.
    Extracted {
        /// Native library directory.
        dir: PathBuf,
        /// Number of files written.
        extracted: usize,
        /// Number of root-level entries that could not be written.
        failed: usize,
    },
}

/// Prepares native libraries shipped alongside the plugin binary.
#[derive(Debug, Clone)]
pub struct NativeBootstrapper {
    binary_path: PathBuf,
    platform: Option<Platform>,
    search_path: Arc<LibrarySearchPath>,
}

impl NativeBootstrapper {
    /// Bootstrapper for the plugin binary at `binary_path`, targeting the
    /// running platform.
    #[must_use]
    pub fn new(binary_path: impl Into<PathBuf>, search_path: Arc<LibrarySearchPath>) -> Self {
        Self {
            binary_path: binary_path.into(),
            platform: Platform::detect(),
            search_path,
        }
    }

    /// Override the detected platform.
    #[must_use]
    pub fn with_platform(mut self, platform: Option<Platform>) -> Self {
        self.platform = platform;
        self
    }

    /// Directory the native libraries live in.
    ///
    /// # Errors
    ///
    /// Returns an error if the binary path has no parent directory.
    pub fn native_dir(&self) -> BootstrapResult<PathBuf> {
        self.binary_dir().map(|dir| dir.join(NATIVE_DIR_NAME))
    }

    /// Archive holding the native libraries for `platform`.
    ///
    /// # Errors
    ///
    /// Returns an error if the binary path has no parent directory or stem.
    pub fn archive_path(&self, platform: Platform) -> BootstrapResult<PathBuf> {
        let stem = self
            .binary_path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| BootstrapError::InvalidBinaryPath {
                path: self.binary_path.clone(),
            })?;
        let file_name = format!("{stem}{}.{ARCHIVE_EXTENSION}", platform.archive_suffix());
        Ok(self.binary_dir()?.join(file_name))
    }

    /// Ensure native libraries are extracted and visible on the search path.
    ///
    /// Safe to call on every startup.
    ///
    /// # Errors
    ///
    /// Returns an error if the native directory cannot be created or the
    /// platform archive cannot be opened or decoded.
    pub fn ensure_native_resources(&self) -> BootstrapResult<BootstrapOutcome> {
        let Some(platform) = self.platform else {
            warn!("unable to determine native libraries for this platform");
            return Ok(BootstrapOutcome::UnsupportedPlatform);
        };

        let dir = self.native_dir()?;
        if dir.exists() {
            info!(dir = %dir.display(), "native library directory already exists");
            self.publish(&dir);
            return Ok(BootstrapOutcome::AlreadyPresent { dir });
        }

        fs::create_dir_all(&dir).map_err(|source| BootstrapError::CreateDir {
            path: dir.clone(),
            source,
        })?;

        let archive_path = self.archive_path(platform)?;
        debug!(archive = %archive_path.display(), %platform, "applicable native archive");
        let mut archive = match open_archive(&archive_path) {
            Ok(archive) => archive,
            Err(err) => {
                discard_empty_dir(&dir);
                return Err(err);
            }
        };

        let (extracted, failed) = extract_root_files(&mut archive, &dir);
        info!(
            dir = %dir.display(),
            extracted,
            failed,
            "native library directory created and natives extracted"
        );
        self.publish(&dir);
        Ok(BootstrapOutcome::Extracted {
            dir,
            extracted,
            failed,
        })
    }

    fn binary_dir(&self) -> BootstrapResult<&Path> {
        self.binary_path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .ok_or_else(|| BootstrapError::InvalidBinaryPath {
                path: self.binary_path.clone(),
            })
    }

    fn publish(&self, dir: &Path) {
        let canonical = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
        self.search_path.prepend(canonical);
    }
}

fn open_archive(path: &Path) -> BootstrapResult<ZipArchive<File>> {
    let file = File::open(path).map_err(|source| BootstrapError::OpenArchive {
        path: path.to_path_buf(),
        source,
    })?;
    ZipArchive::new(file).map_err(|source| BootstrapError::DecodeArchive {
        path: path.to_path_buf(),
        source,
    })
}

fn discard_empty_dir(dir: &Path) {
    if let Err(err) = fs::remove_dir(dir) {
        warn!(dir = %dir.display(), error = %err, "failed to remove empty native directory");
    }
}

fn extract_root_files(archive: &mut ZipArchive<File>, target: &Path) -> (usize, usize) {
    let mut extracted = 0;
    let mut failed = 0;
    for index in 0..archive.len() {
        match extract_entry(archive, index, target) {
            Ok(true) => extracted += 1,
            Ok(false) => {}
            Err(err) => {
                failed += 1;
                warn!(index, error = %err, "failed to copy native library");
            }
        }
    }
    (extracted, failed)
}

/// Copy one archive entry; `Ok(false)` means the entry is not at the root.
fn extract_entry(
    archive: &mut ZipArchive<File>,
    index: usize,
    target: &Path,
) -> BootstrapResult<bool> {
    let mut entry = archive
        .by_index(index)
        .map_err(|source| BootstrapError::ReadEntry { index, source })?;
    let name = entry.name().to_string();
    if entry.is_dir() || name.contains('/') || name.contains('\\') {
        return Ok(false);
    }

    let destination = target.join(root_file_name(&name)?);
    debug!(entry = %name, destination = %destination.display(), "copying native library");
    let mut output = File::create(&destination)
        .map_err(|source| BootstrapError::extract("create_file", &destination, source))?;
    io::copy(&mut entry, &mut output)
        .map_err(|source| BootstrapError::extract("copy", &destination, source))?;

    #[cfg(unix)]
    if let Some(mode) = entry.unix_mode() {
        fs::set_permissions(&destination, fs::Permissions::from_mode(mode))
            .map_err(|source| BootstrapError::extract("set_permissions", &destination, source))?;
    }

    Ok(true)
}

fn root_file_name(name: &str) -> BootstrapResult<&Path> {
    let path = Path::new(name);
    let mut components = path.components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(path),
        _ => Err(BootstrapError::InvalidEntry {
            name: name.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use vbridge_test_support::fixtures::{plugin_binary, temp_dir, write_zip_archive};

    fn bootstrapper(binary: &Path) -> (Arc<LibrarySearchPath>, NativeBootstrapper) {
        let search_path = Arc::new(LibrarySearchPath::with_base(Vec::new()));
        let bootstrapper = NativeBootstrapper::new(binary, Arc::clone(&search_path))
            .with_platform(Some(Platform::Linux64));
        (search_path, bootstrapper)
    }

    #[test]
    fn archive_path_substitutes_platform_suffix() -> Result<()> {
        let (_, bootstrapper) = bootstrapper(Path::new("/opt/plugins/bridge/lib/videobridge.so"));
        assert_eq!(
            bootstrapper.archive_path(Platform::Linux64)?,
            PathBuf::from("/opt/plugins/bridge/lib/videobridge-native-linux-64.zip")
        );
        assert_eq!(
            bootstrapper.native_dir()?,
            PathBuf::from("/opt/plugins/bridge/lib/native")
        );
        Ok(())
    }

    #[test]
    fn bare_file_name_is_rejected() {
        let (_, bootstrapper) = bootstrapper(Path::new("videobridge.so"));
        assert!(matches!(
            bootstrapper.native_dir(),
            Err(BootstrapError::InvalidBinaryPath { .. })
        ));
    }

    #[test]
    fn extracts_root_files_and_skips_nested_entries() -> Result<()> {
        let temp = temp_dir("vbridge-natives-")?;
        let binary = plugin_binary(temp.path(), "videobridge.so")?;
        let (search_path, bootstrapper) = bootstrapper(&binary);
        write_zip_archive(
            &bootstrapper.archive_path(Platform::Linux64)?,
            &[
                ("libjnopus.so", b"opus"),
                ("libjnsrtp.so", b"srtp"),
                ("META-INF/", b""),
                ("META-INF/MANIFEST.MF", b"manifest"),
            ],
        )?;

        let outcome = bootstrapper.ensure_native_resources()?;
        let dir = bootstrapper.native_dir()?;
        assert_eq!(
            outcome,
            BootstrapOutcome::Extracted {
                dir: dir.clone(),
                extracted: 2,
                failed: 0,
            }
        );
        assert_eq!(fs::read(dir.join("libjnopus.so"))?, b"opus");
        assert_eq!(fs::read(dir.join("libjnsrtp.so"))?, b"srtp");
        assert!(!dir.join("META-INF").exists());
        assert!(!dir.join("MANIFEST.MF").exists());

        assert_eq!(search_path.entries(), vec![dir.canonicalize()?]);
        assert!(search_path.find_library("libjnsrtp.so").is_some());
        Ok(())
    }

    #[test]
    fn second_run_is_a_no_op() -> Result<()> {
        let temp = temp_dir("vbridge-natives-")?;
        let binary = plugin_binary(temp.path(), "videobridge.so")?;
        let (search_path, bootstrapper) = bootstrapper(&binary);
        write_zip_archive(
            &bootstrapper.archive_path(Platform::Linux64)?,
            &[("libjnopus.so", b"opus")],
        )?;

        assert!(matches!(
            bootstrapper.ensure_native_resources()?,
            BootstrapOutcome::Extracted { extracted: 1, .. }
        ));
        let dir = bootstrapper.native_dir()?;
        fs::write(dir.join("libjnopus.so"), b"patched")?;

        assert_eq!(
            bootstrapper.ensure_native_resources()?,
            BootstrapOutcome::AlreadyPresent { dir: dir.clone() }
        );
        assert_eq!(fs::read(dir.join("libjnopus.so"))?, b"patched");
        assert_eq!(search_path.entries().len(), 1);
        Ok(())
    }

    #[test]
    fn unsupported_platform_does_nothing() -> Result<()> {
        let temp = temp_dir("vbridge-natives-")?;
        let binary = plugin_binary(temp.path(), "videobridge.so")?;
        let (search_path, bootstrapper) = bootstrapper(&binary);
        let bootstrapper = bootstrapper.with_platform(None);

        assert_eq!(
            bootstrapper.ensure_native_resources()?,
            BootstrapOutcome::UnsupportedPlatform
        );
        assert!(!bootstrapper.native_dir()?.exists());
        assert!(search_path.entries().is_empty());
        Ok(())
    }

    #[test]
    fn missing_archive_fails_and_allows_retry() -> Result<()> {
        let temp = temp_dir("vbridge-natives-")?;
        let binary = plugin_binary(temp.path(), "videobridge.so")?;
        let (search_path, bootstrapper) = bootstrapper(&binary);

        let err = bootstrapper.ensure_native_resources().unwrap_err();
        assert!(matches!(err, BootstrapError::OpenArchive { .. }));
        assert!(!bootstrapper.native_dir()?.exists());
        assert!(search_path.entries().is_empty());

        write_zip_archive(
            &bootstrapper.archive_path(Platform::Linux64)?,
            &[("libjnopus.so", b"opus")],
        )?;
        assert!(matches!(
            bootstrapper.ensure_native_resources()?,
            BootstrapOutcome::Extracted { extracted: 1, .. }
        ));
        Ok(())
    }

    #[test]
    fn corrupt_archive_is_reported() -> Result<()> {
        let temp = temp_dir("vbridge-natives-")?;
        let binary = plugin_binary(temp.path(), "videobridge.so")?;
        let (_, bootstrapper) = bootstrapper(&binary);
        fs::write(
            bootstrapper.archive_path(Platform::Linux64)?,
            b"not a zip archive",
        )?;

        let err = bootstrapper.ensure_native_resources().unwrap_err();
        assert!(matches!(err, BootstrapError::DecodeArchive { .. }));
        Ok(())
    }

    #[test]
    fn root_file_name_rejects_relative_segments() {
        assert!(root_file_name("libfoo.so").is_ok());
        assert!(matches!(
            root_file_name(".."),
            Err(BootstrapError::InvalidEntry { .. })
        ));
        assert!(root_file_name("").is_err());
    }
}
