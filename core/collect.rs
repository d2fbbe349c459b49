use crate::error::{AppError, Result};
use crate::extract::{Extraction, extract_local_includes};
use log;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Position of a file inside its [`WorkingSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FileId(usize);

impl FileId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct FileRecord {
    pub path: PathBuf,
    pub name: String,
    pub extension: String,
    pub raw: String,
    pub body: String,
    pub includes: Vec<String>,
}

impl FileRecord {
    fn new(path: PathBuf, name: String) -> Self {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path,
            name,
            extension,
            raw: String::new(),
            body: String::new(),
            includes: Vec::new(),
        }
    }

    /// Path rendered with forward slashes, used for suffix matching of include targets.
    pub fn match_key(&self) -> String {
        self.path.to_string_lossy().replace('\\', "/")
    }
}

/// Supplies file contents to the engine.
pub trait SourceReader {
    fn read_source(&self, path: &Path) -> Result<String>;
}

/// Reads sources from disk.
///
/// Bytes that are not valid UTF-8 (a Latin-1 copyright sign, say) are replaced with U+FFFD and
/// the file is merged anyway, with a warning naming it.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsReader;

impl SourceReader for FsReader {
    fn read_source(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).map_err(|e| AppError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        match String::from_utf8(bytes) {
            Ok(text) => Ok(text),
            Err(e) => {
                log::warn!(
                    "{} is not valid UTF-8 ({}); invalid bytes are replaced with U+FFFD.",
                    path.display(),
                    e.utf8_error()
                );
                Ok(String::from_utf8_lossy(e.as_bytes()).into_owned())
            }
        }
    }
}

impl SourceReader for HashMap<PathBuf, String> {
    fn read_source(&self, path: &Path) -> Result<String> {
        self.get(path).cloned().ok_or_else(|| AppError::FileRead {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::NotFound, "no in-memory source for path"),
        })
    }
}

/// Splits a whitespace-delimited exclusion string into exact basenames.
pub fn parse_exclusions(spec: &str) -> HashSet<String> {
    spec.split_whitespace().map(str::to_string).collect()
}

/// The files taking part in one amalgamation run, in visiting order.
#[derive(Debug, Clone, Default)]
pub struct WorkingSet {
    records: Vec<FileRecord>,
    excluded: Vec<String>,
}

impl WorkingSet {
    /// Filters `candidates` by the exclusion list and pre-sorts them by extension.
    ///
    /// The sort is a plain lexical comparison of extensions and is stable, so a file with no
    /// extension or a `cpp` extension lands before `h`, `hpp` and `inc` files, and files sharing
    /// an extension keep the order the candidates were supplied in.
    pub fn collect<I>(candidates: I, exclusion_spec: &str) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let exclusions = parse_exclusions(exclusion_spec);
        log::debug!("Exclusion list: {:?}", exclusions);

        let mut seen = HashSet::new();
        let mut records = Vec::new();
        let mut excluded = Vec::new();

        for path in candidates {
            let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
                log::trace!("Skipping candidate without a file name: {}", path.display());
                continue;
            };
            if exclusions.contains(&name) {
                log::trace!("Excluding: {}", path.display());
                excluded.push(name);
                continue;
            }
            if !seen.insert(path.clone()) {
                log::trace!("Skipping duplicate candidate: {}", path.display());
                continue;
            }
            records.push(FileRecord::new(path, name));
        }

        records.sort_by(|a, b| a.extension.cmp(&b.extension));
        log::debug!(
            "Working set has {} files ({} excluded).",
            records.len(),
            excluded.len()
        );

        Self { records, excluded }
    }

    /// Reads every record and strips its local includes.
    ///
    /// Files are independent at this stage, so reading and extraction run in parallel; results
    /// are written back in working-set order.
    pub fn load<R>(&mut self, reader: &R) -> Result<()>
    where
        R: SourceReader + Sync,
    {
        log::info!("Reading {} source files...", self.records.len());
        let loaded = self
            .records
            .par_iter()
            .map(|record| -> Result<(String, Extraction)> {
                let raw = reader.read_source(&record.path)?;
                let extraction = extract_local_includes(&raw);
                log::trace!(
                    "{}: {} local include(s)",
                    record.name,
                    extraction.includes.len()
                );
                Ok((raw, extraction))
            })
            .collect::<Result<Vec<_>>>()?;

        for (record, (raw, extraction)) in self.records.iter_mut().zip(loaded) {
            record.raw = raw;
            record.body = extraction.body;
            record.includes = extraction.includes;
        }
        log::info!("File reading complete.");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = FileId> + '_ {
        (0..self.records.len()).map(FileId)
    }

    pub fn get(&self, id: FileId) -> &FileRecord {
        &self.records[id.0]
    }

    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    /// Basenames dropped by the exclusion list, in candidate order.
    pub fn excluded(&self) -> &[String] {
        &self.excluded
    }
}
