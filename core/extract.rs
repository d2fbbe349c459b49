use indexmap::IndexSet;
use log;
use once_cell::sync::Lazy;
use regex::Regex;

// One whole directive line: indentation, `#`, `include`, a quoted literal, the rest of the
// line and its terminator. `\n`, `\r\n` and a lone `\r` all end a line. Angle-bracket includes
// never match.
static LOCAL_INCLUDE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?mR)^[ \t]*#[ \t]*include[ \t]*"([^"\r\n]+)"[^\r\n]*(?:\r\n|\r|\n|\z)"#)
        .expect("local include pattern must compile")
});

/// Result of scanning one file for local include directives.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Extraction {
    /// The source text with every matched directive line removed.
    pub body: String,
    /// Quoted include targets in first-seen order, without duplicates.
    pub includes: Vec<String>,
}

/// Strips `#include "..."` lines out of `source` and collects their targets.
///
/// Matching is line based and left to right. Text between directives is copied through
/// untouched, so the relative order of everything that is not a local include is preserved.
///
/// A leading byte order mark is dropped so that it neither hides a first-line directive nor
/// ends up in the middle of the merged output.
pub fn extract_local_includes(source: &str) -> Extraction {
    let source = source.strip_prefix('\u{FEFF}').unwrap_or(source);
    let mut body = String::with_capacity(source.len());
    let mut includes: IndexSet<String> = IndexSet::new();
    let mut copied_up_to = 0;

    for caps in LOCAL_INCLUDE.captures_iter(source) {
        let Some(line) = caps.get(0) else { continue };
        body.push_str(&source[copied_up_to..line.start()]);
        copied_up_to = line.end();

        let target = &caps[1];
        if !includes.insert(target.to_string()) {
            log::trace!("Duplicate local include collapsed: \"{}\"", target);
        }
    }
    body.push_str(&source[copied_up_to..]);

    Extraction {
        body,
        includes: includes.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_local_include_lines_and_records_targets() {
        let src = "#include \"b.h\"\nint a() { return b(); }\n";
        let out = extract_local_includes(src);
        assert_eq!(out.body, "int a() { return b(); }\n");
        assert_eq!(out.includes, vec!["b.h".to_string()]);
    }

    #[test]
    fn leaves_system_includes_alone() {
        let src = "#include <vector>\n#include \"local.h\"\n#include <string>\n";
        let out = extract_local_includes(src);
        assert_eq!(out.body, "#include <vector>\n#include <string>\n");
        assert_eq!(out.includes, vec!["local.h".to_string()]);
    }

    #[test]
    fn accepts_indentation_and_spacing_around_hash() {
        let src = "  #  include   \"sub/dir/x.h\"  // trailing comment\n\t#include\"y.h\"\nbody\n";
        let out = extract_local_includes(src);
        assert_eq!(out.body, "body\n");
        assert_eq!(out.includes, vec!["sub/dir/x.h".to_string(), "y.h".to_string()]);
    }

    #[test]
    fn collapses_duplicate_targets_in_first_seen_order() {
        let src = "#include \"b.h\"\n#include \"a.h\"\n#include \"b.h\"\n";
        let out = extract_local_includes(src);
        assert_eq!(out.body, "");
        assert_eq!(out.includes, vec!["b.h".to_string(), "a.h".to_string()]);
    }

    #[test]
    fn handles_crlf_and_missing_final_newline() {
        let src = "first\r\n#include \"a.h\"\r\nsecond\r\n#include \"b.h\"";
        let out = extract_local_includes(src);
        assert_eq!(out.body, "first\r\nsecond\r\n");
        assert_eq!(out.includes, vec!["a.h".to_string(), "b.h".to_string()]);
    }

    #[test]
    fn handles_cr_only_line_endings() {
        let src = "#include \"b.h\"\rint a;\r#include \"c.h\"\rint c;\r";
        let out = extract_local_includes(src);
        assert_eq!(out.body, "int a;\rint c;\r");
        assert_eq!(out.includes, vec!["b.h".to_string(), "c.h".to_string()]);
    }

    #[test]
    fn leading_byte_order_mark_does_not_hide_first_directive() {
        let out = extract_local_includes("\u{FEFF}#include \"b.h\"\nint a;\n");
        assert_eq!(out.body, "int a;\n");
        assert_eq!(out.includes, vec!["b.h".to_string()]);

        let plain = extract_local_includes("\u{FEFF}int a;\n");
        assert_eq!(plain.body, "int a;\n");
    }

    #[test]
    fn ignores_directives_that_do_not_start_a_line() {
        let src = "const char* s = \"#include \\\"a.h\\\"\";\nfoo(); #include \"b.h\"\n";
        let out = extract_local_includes(src);
        assert_eq!(out.body, src);
        assert!(out.includes.is_empty());
    }

    #[test]
    fn text_without_directives_is_unchanged() {
        let src = "#pragma once\n\nstruct S {};\n";
        let out = extract_local_includes(src);
        assert_eq!(out.body, src);
        assert!(out.includes.is_empty());
    }
}
