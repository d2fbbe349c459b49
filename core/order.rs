use crate::collect::{FileId, WorkingSet};
use crate::graph::DependencyMap;
use log;

/// A complete emission order over a working set.
///
/// Every file appears exactly once. `forced` lists the files that were placed while some of
/// their dependencies were still missing, which only happens when the graph has a cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ordering {
    sequence: Vec<FileId>,
    forced: Vec<FileId>,
}

impl Ordering {
    pub fn sequence(&self) -> &[FileId] {
        &self.sequence
    }

    pub fn forced(&self) -> &[FileId] {
        &self.forced
    }

    pub fn was_forced(&self, id: FileId) -> bool {
        self.forced.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

/// Orders files so that each one follows everything it depends on, as far as the graph allows.
///
/// Repeated passes over the working set append every file whose dependencies are all placed.
/// When a pass places nothing, the first unplaced file is appended regardless, which breaks one
/// cycle and guarantees termination after at most `n` such breaks.
pub fn topological_order(map: &DependencyMap) -> Ordering {
    let total = map.len();
    let mut placed = vec![false; total];
    let mut sequence: Vec<FileId> = Vec::with_capacity(total);
    let mut forced: Vec<FileId> = Vec::new();
    let mut passes = 0usize;

    while sequence.len() < total {
        passes += 1;
        let before = sequence.len();

        for index in 0..total {
            if placed[index] {
                continue;
            }
            let id = FileId::new(index);
            if map.dependencies(id).iter().all(|dep| placed[dep.index()]) {
                placed[index] = true;
                sequence.push(id);
            }
        }

        if sequence.len() == before {
            // No progress: everything left sits on or behind a cycle.
            let Some(index) = placed.iter().position(|done| !done) else {
                break;
            };
            let id = FileId::new(index);
            log::debug!(
                "No progress in pass {}; forcing file #{} with {} unmet dependencies.",
                passes,
                index,
                map.dependencies(id)
                    .iter()
                    .filter(|dep| !placed[dep.index()])
                    .count()
            );
            placed[index] = true;
            sequence.push(id);
            forced.push(id);
        }
    }

    log::debug!(
        "Ordered {} files in {} passes ({} cycle breaks).",
        sequence.len(),
        passes,
        forced.len()
    );
    Ordering { sequence, forced }
}

/// Convenience for callers holding the working set: logs forced files by name.
pub fn order_working_set(set: &WorkingSet, map: &DependencyMap) -> Ordering {
    let ordering = topological_order(map);
    for id in ordering.forced() {
        log::warn!(
            "{} was emitted before all of its dependencies (include cycle).",
            set.get(*id).name
        );
    }
    ordering
}
