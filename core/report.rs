use crate::amalgamate::Amalgamation;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedFile {
    pub position: usize,
    pub name: String,
    pub path: String,
    pub extension: String,
    pub size: usize,
    pub merged_size: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unresolved: Vec<String>,
    pub forced: bool,
}

/// Describes what an amalgamation run would emit, in emission order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanReport {
    pub source_folder: String,
    pub output: String,
    pub total_files: usize,
    pub total_bytes: usize,
    pub edge_count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub excluded: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cycle_breaks: Vec<String>,
    pub files: Vec<PlannedFile>,
}

impl PlanReport {
    /// Builds the report; file paths are shown relative to `source_folder` where possible.
    pub fn build(result: &Amalgamation, source_folder: &Path, output: &Path) -> Self {
        let set = &result.set;
        let relative = |p: &Path| {
            pathdiff::diff_paths(p, source_folder)
                .filter(|rel| !rel.as_os_str().is_empty())
                .unwrap_or_else(|| p.to_path_buf())
                .to_string_lossy()
                .replace('\\', "/")
        };

        let files = result
            .ordering
            .sequence()
            .iter()
            .enumerate()
            .map(|(i, id)| {
                let record = set.get(*id);
                PlannedFile {
                    position: i + 1,
                    name: record.name.clone(),
                    path: relative(&record.path),
                    extension: record.extension.clone(),
                    size: record.raw.len(),
                    merged_size: record.body.len(),
                    dependencies: result
                        .graph
                        .dependencies(*id)
                        .iter()
                        .map(|dep| relative(&set.get(*dep).path))
                        .collect(),
                    unresolved: result.graph.unresolved(*id).to_vec(),
                    forced: result.ordering.was_forced(*id),
                }
            })
            .collect();

        Self {
            source_folder: source_folder.display().to_string(),
            output: output.display().to_string(),
            total_files: set.len(),
            total_bytes: result.text.len(),
            edge_count: result.graph.edge_count(),
            excluded: set.excluded().to_vec(),
            cycle_breaks: result
                .ordering
                .forced()
                .iter()
                .map(|id| set.get(*id).name.clone())
                .collect(),
            files,
        }
    }
}
