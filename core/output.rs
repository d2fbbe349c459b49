use crate::error::{AppError, Result};
use log;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Writes `content` to `path` so that readers only ever see the old file or the complete new one.
///
/// Missing parent directories are created. The text goes to a temporary file next to the target
/// and is renamed over it once fully flushed; on failure the previous file is left in place.
pub fn write_atomically(path: &Path, content: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => std::env::current_dir()?,
    };
    if !parent.exists() {
        log::debug!("Creating output directory {}", parent.display());
        fs::create_dir_all(&parent).map_err(|e| AppError::DirCreation {
            path: parent.clone(),
            source: e,
        })?;
    }

    let write_err = |e: std::io::Error| AppError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    };
    let mut staged = NamedTempFile::new_in(&parent).map_err(write_err)?;
    staged.write_all(content.as_bytes()).map_err(write_err)?;
    staged.as_file().sync_all().map_err(write_err)?;
    staged.persist(path).map_err(|e| write_err(e.error))?;

    log::info!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
