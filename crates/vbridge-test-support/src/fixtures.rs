//! Test fixtures for filesystem-backed suites.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tempfile::TempDir;

/// Create an isolated temporary directory with a recognisable prefix.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn temp_dir(prefix: &str) -> Result<TempDir> {
    Ok(tempfile::Builder::new().prefix(prefix).tempdir()?)
}

/// Write a zip archive at `archive` containing `entries`.
///
/// Entry names ending in `/` are written as directories.
///
/// # Errors
///
/// Returns an error if the archive cannot be written.
pub fn write_zip_archive(archive: &Path, entries: &[(&str, &[u8])]) -> Result<()> {
    let file = File::create(archive)?;
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::FileOptions::default();
    for (path, contents) in entries {
        if path.ends_with('/') {
            zip.add_directory(*path, options)?;
        } else {
            zip.start_file(*path, options)?;
            zip.write_all(contents)?;
        }
    }
    zip.finish()?;
    Ok(())
}

/// Lay out a fake plugin binary inside `root` and return its path.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be created.
pub fn plugin_binary(root: &Path, file_name: &str) -> Result<PathBuf> {
    let lib_dir = root.join("lib");
    fs::create_dir_all(&lib_dir)?;
    let binary = lib_dir.join(file_name);
    fs::write(&binary, b"plugin")?;
    Ok(binary)
}
