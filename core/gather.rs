use crate::error::{AppError, Result};
use log;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Lists the regular files under `source_folder` in a stable, name-sorted traversal order.
///
/// Symbolic links are neither followed nor listed, so a link loop cannot stall the scan and a
/// linked file is never merged twice. A flat scan only looks at the folder's direct children. `skip` names a file that must never
/// become a candidate, normally the output artifact when it lives inside the source tree.
pub fn gather_candidate_paths(
    source_folder: &Path,
    recursive: bool,
    skip: Option<&Path>,
) -> Result<Vec<PathBuf>> {
    if !source_folder.is_dir() {
        return Err(AppError::InvalidArgument(format!(
            "Source folder '{}' does not exist or is not a directory",
            source_folder.display()
        )));
    }

    let skip_canonical = skip.and_then(|p| p.canonicalize().ok());

    let mut walker = WalkDir::new(source_folder)
        .min_depth(1)
        .sort_by_file_name();
    if !recursive {
        walker = walker.max_depth(1);
    }

    log::info!(
        "Scanning {} ({})",
        source_folder.display(),
        if recursive { "recursive" } else { "flat" }
    );

    let mut candidates = Vec::new();
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            log::trace!("Skipping non-regular entry: {}", entry.path().display());
            continue;
        }
        if let Some(skip_path) = &skip_canonical {
            if entry.path().canonicalize().ok().as_ref() == Some(skip_path) {
                log::debug!(
                    "Skipping previous output inside the source folder: {}",
                    entry.path().display()
                );
                continue;
            }
        }
        log::trace!("Candidate: {}", entry.path().display());
        candidates.push(entry.into_path());
    }

    log::info!("Directory scan complete. Found {} files.", candidates.len());
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn flat_scan_ignores_subdirectories() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.h"), "").unwrap();
        fs::write(dir.path().join("a.cpp"), "").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/c.h"), "").unwrap();

        let found = gather_candidate_paths(dir.path(), false, None).unwrap();
        assert_eq!(names(&found), vec!["a.cpp", "b.h"]);
    }

    #[test]
    fn recursive_scan_descends_in_name_order() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("z.h"), "").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/c.h"), "").unwrap();
        fs::write(dir.path().join("a.cpp"), "").unwrap();

        let found = gather_candidate_paths(dir.path(), true, None).unwrap();
        assert_eq!(names(&found), vec!["a.cpp", "c.h", "z.h"]);
    }

    #[test]
    fn skips_the_given_output_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.cpp"), "").unwrap();
        fs::write(dir.path().join("All.hpp"), "stale").unwrap();

        let skip = dir.path().join("All.hpp");
        let found = gather_candidate_paths(dir.path(), false, Some(&skip)).unwrap();
        assert_eq!(names(&found), vec!["a.cpp"]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_not_followed() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.h"), "").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        std::os::unix::fs::symlink(dir.path(), dir.path().join("sub/loop")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("a.h"), dir.path().join("alias.h")).unwrap();

        let found = gather_candidate_paths(dir.path(), true, None).unwrap();
        assert_eq!(names(&found), vec!["a.h"]);
    }

    #[test]
    fn empty_folder_yields_nothing() {
        let dir = tempdir().unwrap();
        let found = gather_candidate_paths(dir.path(), true, None).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn missing_folder_is_an_error() {
        let dir = tempdir().unwrap();
        let err = gather_candidate_paths(&dir.path().join("nope"), false, None).unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
    }
}
