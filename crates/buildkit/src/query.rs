//! Output-file query: expression building and result parsing.
//!
//! The query prints one record per configured target:
//!
//! ```text
//! @@//app/api:bundle<TAB>bazel-out/k8-fastbuild/bin/app/api/bundle.zip
//! ```
//!
//! with the output paths comma-separated and relative to the workspace root.

use crate::label;
use std::path::PathBuf;

/// Starlark expression that formats a target as `<label>\t<path>,<path>...`.
pub const STARLARK_EXPR: &str =
    r#""%s\t%s" % (str(target.label), ",".join([f.path for f in target.files.to_list()]))"#;

/// One parsed query record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRecord {
    /// Normalized target label
    pub label: String,
    /// Output paths as reported (workspace-relative)
    pub paths: Vec<PathBuf>,
}

/// Build the `set(...)` query expression for a list of targets.
pub fn set_expression(targets: &[String]) -> String {
    format!("set({})", targets.join(" "))
}

/// Parse query stdout into records.
///
/// Lines without a tab (warnings, blank lines) are skipped, and empty
/// entries in the path list are dropped.
pub fn parse(stdout: &str) -> Vec<OutputRecord> {
    stdout
        .lines()
        .map(str::trim)
        .filter_map(|line| line.split_once('\t'))
        .map(|(raw_label, paths_csv)| OutputRecord {
            label: label::normalize(raw_label).to_string(),
            paths: paths_csv
                .split(',')
                .filter(|p| !p.is_empty())
                .map(PathBuf::from)
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_expression() {
        let targets = vec!["//a:one".to_string(), "//b:two".to_string()];
        assert_eq!(set_expression(&targets), "set(//a:one //b:two)");
    }

    #[test]
    fn test_parse_records() {
        let stdout = "@@//app/api:bundle\tbazel-out/bin/app/api/bundle.zip\n\
                      @//web:site\tbazel-out/bin/web/site.tar\n";
        let records = parse(stdout);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].label, "//app/api:bundle");
        assert_eq!(
            records[0].paths,
            vec![PathBuf::from("bazel-out/bin/app/api/bundle.zip")]
        );
        assert_eq!(records[1].label, "//web:site");
    }

    #[test]
    fn test_parse_skips_lines_without_tab() {
        let stdout = "INFO: Analyzed 2 targets\n\n//a:one\tout/one.zip\n";
        let records = parse(stdout);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].label, "//a:one");
    }

    #[test]
    fn test_parse_multiple_and_empty_paths() {
        let records = parse("//a:many\tout/x.zip,,out/y.zip\n//a:none\t,\n");

        assert_eq!(records[0].paths.len(), 2);
        assert!(records[1].paths.is_empty());
    }

    #[test]
    fn test_starlark_expr_uses_tab_escape() {
        assert!(STARLARK_EXPR.starts_with(r#""%s\t%s""#));
    }
}
