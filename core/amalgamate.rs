use crate::collect::{FsReader, SourceReader, WorkingSet};
use crate::error::{AppError, Result};
use crate::gather::gather_candidate_paths;
use crate::graph::DependencyMap;
use crate::merge::{MergeOptions, merge_bodies};
use crate::order::{Ordering, order_working_set};
use crate::output::write_atomically;
use log;
use std::path::PathBuf;

/// Everything needed for one amalgamation run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Params {
    pub source_folder: PathBuf,
    pub output: PathBuf,
    pub excluded: String,
    pub recursive: bool,
    pub merge: MergeOptions,
}

impl Params {
    pub fn validate(&self) -> Result<()> {
        if self.output.as_os_str().is_empty() {
            return Err(AppError::InvalidArgument(
                "Requires a valid output argument".to_string(),
            ));
        }
        if self.source_folder.as_os_str().is_empty() {
            return Err(AppError::InvalidArgument(
                "Requires a valid source folder argument".to_string(),
            ));
        }
        Ok(())
    }
}

/// The outcome of a run: the loaded files, their graph, the order and the merged text.
#[derive(Debug, Clone)]
pub struct Amalgamation {
    pub set: WorkingSet,
    pub graph: DependencyMap,
    pub ordering: Ordering,
    pub text: String,
}

/// Runs the engine over an explicit, already ordered list of candidate paths.
///
/// Returns `Ok(None)` when nothing is left after exclusion.
pub fn amalgamate<I, R>(
    candidates: I,
    excluded: &str,
    reader: &R,
    options: &MergeOptions,
) -> Result<Option<Amalgamation>>
where
    I: IntoIterator<Item = PathBuf>,
    R: SourceReader + Sync,
{
    let mut set = WorkingSet::collect(candidates, excluded);
    if set.is_empty() {
        log::info!("No files left to process after exclusions; nothing to do.");
        return Ok(None);
    }

    set.load(reader)?;

    let graph = DependencyMap::build(&set);
    let ordering = order_working_set(&set, &graph);
    let text = merge_bodies(&set, &ordering, options);
    log::debug!(
        "Merged {} files into {} bytes.",
        ordering.len(),
        text.len()
    );

    Ok(Some(Amalgamation {
        set,
        graph,
        ordering,
        text,
    }))
}

/// Scans the source folder and builds the amalgamation without writing it.
pub fn plan(params: &Params) -> Result<Option<Amalgamation>> {
    params.validate()?;
    let candidates =
        gather_candidate_paths(&params.source_folder, params.recursive, Some(&params.output))?;
    amalgamate(candidates, &params.excluded, &FsReader, &params.merge)
}

/// Scans, merges and writes the single-file header described by `params`.
///
/// An empty working set writes nothing and leaves any existing output untouched.
pub fn generate_header(params: &Params) -> Result<Option<Amalgamation>> {
    log::info!(
        "Generating {} from {}",
        params.output.display(),
        params.source_folder.display()
    );
    let Some(result) = plan(params)? else {
        return Ok(None);
    };
    write_atomically(&params.output, &result.text)?;
    Ok(Some(result))
}
