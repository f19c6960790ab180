use std::{
    io::Write,
    path::{Path, PathBuf},
};

use log::info;
use tempfile::NamedTempFile;

use crate::error::Error;

/// Writes `contents` to `path` through a temporary file in the same directory
/// that is renamed over `path` only once fully written. On error nothing is
/// left at `path`.
pub fn write_atomic(path: &Path, contents: &str) -> Result<(), Error> {
    let io_error = |error: std::io::Error| Error::Io(path.to_path_buf(), error);
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(directory).map_err(io_error)?;
    file.write_all(contents.as_bytes()).map_err(io_error)?;
    file.as_file().sync_all().map_err(io_error)?;
    file.persist(path).map_err(|error| io_error(error.error))?;
    info!("wrote {} ({} bytes)", path.display(), contents.len());
    Ok(())
}

/// Writes every `(file name, contents)` pair into `directory`.
pub fn write_all_into(directory: &Path, files: &[(String, String)]) -> Result<Vec<PathBuf>, Error> {
    files
        .iter()
        .map(|(name, contents)| {
            let path = directory.join(name);
            write_atomic(&path, contents)?;
            Ok(path)
        })
        .collect()
}
