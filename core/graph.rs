use crate::collect::{FileId, WorkingSet};
use log;

/// Resolved depends-on edges for every file of a [`WorkingSet`], indexed by [`FileId`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyMap {
    dependencies: Vec<Vec<FileId>>,
    unresolved: Vec<Vec<String>>,
}

impl DependencyMap {
    /// Resolves every include reference in `set` against the paths of `set` itself.
    ///
    /// A reference resolves to the first file, in working-set order, whose path ends with the
    /// reference text. References with no match are kept aside as unresolved; they produce no
    /// edge and are not an error.
    pub fn build(set: &WorkingSet) -> Self {
        log::debug!("Resolving include references for {} files...", set.len());
        let keys: Vec<String> = set.records().iter().map(|r| r.match_key()).collect();

        let mut dependencies = Vec::with_capacity(set.len());
        let mut unresolved = Vec::with_capacity(set.len());

        for id in set.ids() {
            let record = set.get(id);
            let mut deps: Vec<FileId> = Vec::new();
            let mut missing: Vec<String> = Vec::new();

            for reference in &record.includes {
                match resolve_suffix(&keys, reference) {
                    Some(target) if target == id => {
                        log::debug!("{}: ignoring self include \"{}\"", record.name, reference);
                    }
                    Some(target) => {
                        if !deps.contains(&target) {
                            log::trace!(
                                "{} depends on {}",
                                record.name,
                                set.get(target).name
                            );
                            deps.push(target);
                        }
                    }
                    None => {
                        log::debug!(
                            "{}: include \"{}\" is not in the working set, dropping it",
                            record.name,
                            reference
                        );
                        missing.push(reference.clone());
                    }
                }
            }

            dependencies.push(deps);
            unresolved.push(missing);
        }

        let edge_count: usize = dependencies.iter().map(Vec::len).sum();
        log::debug!("Dependency graph built with {} edges.", edge_count);
        Self {
            dependencies,
            unresolved,
        }
    }

    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }

    pub fn dependencies(&self, id: FileId) -> &[FileId] {
        &self.dependencies[id.index()]
    }

    pub fn unresolved(&self, id: FileId) -> &[String] {
        &self.unresolved[id.index()]
    }

    pub fn edge_count(&self) -> usize {
        self.dependencies.iter().map(Vec::len).sum()
    }
}

fn resolve_suffix(keys: &[String], reference: &str) -> Option<FileId> {
    let reference = reference.replace('\\', "/");
    keys.iter()
        .position(|key| key.ends_with(&reference))
        .map(FileId::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn loaded(files: &[(&str, &str)]) -> WorkingSet {
        let sources: HashMap<PathBuf, String> = files
            .iter()
            .map(|(p, text)| (PathBuf::from(p), text.to_string()))
            .collect();
        let mut set = WorkingSet::collect(files.iter().map(|(p, _)| PathBuf::from(p)), "");
        set.load(&sources).unwrap();
        set
    }

    fn dep_names<'a>(set: &'a WorkingSet, map: &DependencyMap, name: &str) -> Vec<&'a str> {
        let id = set.ids().find(|id| set.get(*id).name == name).unwrap();
        map.dependencies(id)
            .iter()
            .map(|d| set.get(*d).name.as_str())
            .collect()
    }

    #[test]
    fn resolves_by_path_suffix() {
        let set = loaded(&[
            ("root/src/a.cpp", "#include \"sub/b.h\"\n#include \"c.h\"\n"),
            ("root/src/sub/b.h", ""),
            ("root/include/c.h", ""),
        ]);
        let map = DependencyMap::build(&set);
        assert_eq!(dep_names(&set, &map, "a.cpp"), vec!["b.h", "c.h"]);
        assert_eq!(map.edge_count(), 2);
    }

    #[test]
    fn first_match_in_working_set_order_wins() {
        let set = loaded(&[
            ("x/util.h", ""),
            ("y/util.h", ""),
            ("main.cpp", "#include \"util.h\"\n"),
        ]);
        let map = DependencyMap::build(&set);
        let main = set.ids().find(|id| set.get(*id).name == "main.cpp").unwrap();
        let target = map.dependencies(main)[0];
        assert_eq!(set.get(target).path, PathBuf::from("x/util.h"));
    }

    #[test]
    fn unresolved_references_produce_no_edge() {
        let set = loaded(&[("a.cpp", "#include \"missing.h\"\nint a;\n")]);
        let map = DependencyMap::build(&set);
        let a = set.ids().next().unwrap();
        assert!(map.dependencies(a).is_empty());
        assert_eq!(map.unresolved(a), &["missing.h".to_string()]);
    }

    #[test]
    fn self_include_is_dropped() {
        let set = loaded(&[("a.h", "#include \"a.h\"\n")]);
        let map = DependencyMap::build(&set);
        let a = set.ids().next().unwrap();
        assert!(map.dependencies(a).is_empty());
        assert!(map.unresolved(a).is_empty());
    }

    #[test]
    fn two_references_to_one_file_give_one_edge() {
        let set = loaded(&[
            ("src/a.cpp", "#include \"b.h\"\n#include \"src/b.h\"\n"),
            ("src/b.h", ""),
        ]);
        let map = DependencyMap::build(&set);
        assert_eq!(dep_names(&set, &map, "a.cpp"), vec!["b.h"]);
    }
}
