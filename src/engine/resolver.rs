//! Artifact resolution - build every referenced target once, map each to
//! its output file.

use crate::error::Error;
use crate::manifest::ConfigurationRoot;
use crate::ui;
use buildkit::ArtifactMap;
use std::collections::BTreeSet;
use std::path::Path;

/// Deduplicated, sorted union of every root's target labels.
pub fn collect_targets(roots: &[ConfigurationRoot]) -> Vec<String> {
    roots
        .iter()
        .flat_map(|root| root.artifacts.values().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Build and resolve all targets referenced by `roots`.
///
/// With no referenced targets the build tool is never invoked.
pub fn resolve(
    build: &buildkit::Client,
    workspace_root: &Path,
    roots: &[ConfigurationRoot],
) -> Result<ArtifactMap, Error> {
    let targets = collect_targets(roots);
    if targets.is_empty() {
        log::debug!("no artifact labels referenced; skipping build");
        return Ok(ArtifactMap::new());
    }

    ui::info(&format!("Resolving {} artifact labels...", targets.len()));
    Ok(build.resolve(workspace_root, &targets)?)
}
