use crate::collect::WorkingSet;
use crate::order::Ordering;
use log;

/// Text-level options applied while assembling the amalgamation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOptions {
    /// Emitted as an `#ifndef`/`#define` guard at the very top of the output.
    pub define: Option<String>,
    /// Macro whose uses (followed by a space) are rewritten to `inline `.
    pub inline_macro: Option<String>,
}

pub fn begin_marker(name: &str) -> String {
    format!("// begin --- {} --- ", name)
}

pub fn end_marker(name: &str) -> String {
    format!("// end --- {} --- ", name)
}

/// Concatenates the stripped bodies of `set` in `ordering`, each wrapped in begin/end markers.
pub fn merge_bodies(set: &WorkingSet, ordering: &Ordering, options: &MergeOptions) -> String {
    let capacity: usize = set.records().iter().map(|r| r.body.len() + 2 * r.name.len() + 64).sum();
    let mut output = String::with_capacity(capacity);

    if let Some(define) = options.define.as_deref().filter(|d| !d.trim().is_empty()) {
        let define = define.trim();
        log::debug!("Adding amalgamation define: {}", define);
        output.push_str("\n// Amalgamation-specific define");
        output.push_str(&format!("\n#ifndef {define}\n#define {define}\n#endif\n"));
    }

    for id in ordering.sequence() {
        let record = set.get(*id);
        log::trace!("Appending {} ({} bytes)", record.name, record.body.len());
        output.push('\n');
        output.push_str(&begin_marker(&record.name));
        output.push_str("\n\n");
        output.push_str(&record.body);
        output.push_str("\n\n");
        output.push_str(&end_marker(&record.name));
        output.push_str("\n\n");
    }

    if let Some(macro_name) = options.inline_macro.as_deref() {
        output = replace_inline_macro(&output, macro_name);
    }

    output
}

/// Rewrites every `<macro_name> ` to `inline `.
///
/// A trailing space is appended to `macro_name` when missing so that only whole-token uses
/// followed by whitespace are touched. An empty name leaves the text as is.
pub fn replace_inline_macro(text: &str, macro_name: &str) -> String {
    if macro_name.trim().is_empty() {
        return text.to_string();
    }
    let mut pattern = macro_name.to_string();
    if !pattern.ends_with(' ') {
        pattern.push(' ');
    }
    if pattern == "inline " {
        return text.to_string();
    }
    let hits = text.matches(pattern.as_str()).count();
    log::debug!("Rewriting {} use(s) of '{}' to 'inline '", hits, pattern.trim_end());
    text.replace(pattern.as_str(), "inline ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DependencyMap;
    use crate::order::topological_order;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn merged(files: &[(&str, &str)], options: &MergeOptions) -> String {
        let sources: HashMap<PathBuf, String> = files
            .iter()
            .map(|(p, text)| (PathBuf::from(p), text.to_string()))
            .collect();
        let mut set = WorkingSet::collect(files.iter().map(|(p, _)| PathBuf::from(p)), "");
        set.load(&sources).unwrap();
        let ordering = topological_order(&DependencyMap::build(&set));
        merge_bodies(&set, &ordering, options)
    }

    #[test]
    fn wraps_each_body_in_markers_in_dependency_order() {
        let out = merged(
            &[("a.cpp", "#include \"b.h\"\nint a;"), ("b.h", "int b;")],
            &MergeOptions::default(),
        );
        assert_eq!(
            out,
            "\n// begin --- b.h --- \n\nint b;\n\n// end --- b.h --- \n\n\
             \n// begin --- a.cpp --- \n\nint a;\n\n// end --- a.cpp --- \n\n"
        );
    }

    #[test]
    fn define_prelude_comes_first() {
        let options = MergeOptions {
            define: Some("LIB_HEADER_ONLY".to_string()),
            inline_macro: None,
        };
        let out = merged(&[("a.h", "int a;")], &options);
        assert!(out.starts_with(
            "\n// Amalgamation-specific define\n#ifndef LIB_HEADER_ONLY\n#define LIB_HEADER_ONLY\n#endif\n"
        ));
        assert!(out.contains("// begin --- a.h --- "));
    }

    #[test]
    fn blank_define_is_ignored() {
        let options = MergeOptions {
            define: Some("  ".to_string()),
            inline_macro: None,
        };
        let out = merged(&[("a.h", "int a;")], &options);
        assert!(!out.contains("#ifndef"));
    }

    #[test]
    fn inline_macro_is_rewritten() {
        let options = MergeOptions {
            define: None,
            inline_macro: Some("inline_t".to_string()),
        };
        let out = merged(
            &[("a.cpp", "inline_t int f() { return 1; }\n#define inline_t\n")],
            &options,
        );
        assert!(out.contains("inline int f() { return 1; }"));
        assert!(out.contains("#define inline_t\n"));
    }

    #[test]
    fn replace_inline_macro_respects_explicit_trailing_space() {
        assert_eq!(replace_inline_macro("MY_INL void f();", "MY_INL "), "inline void f();");
        assert_eq!(replace_inline_macro("MY_INL void f();", ""), "MY_INL void f();");
        assert_eq!(replace_inline_macro("inline void f();", "inline"), "inline void f();");
    }

    #[test]
    fn empty_ordering_produces_empty_text() {
        let set = WorkingSet::default();
        let out = merge_bodies(&set, &Ordering::default(), &MergeOptions::default());
        assert!(out.is_empty());
    }
}
