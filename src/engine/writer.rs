//! Variable files - one `*.tfvars.json` per root, holding only that root's
//! artifact paths.
//!
//! All files live in a single run-scoped temporary directory owned by
//! [`VarFiles`]; dropping it removes the directory and everything in it.

use crate::error::Error;
use crate::manifest::ConfigurationRoot;
use buildkit::ArtifactMap;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const TEMP_PREFIX: &str = "terraform-artifacts-";

#[derive(Serialize)]
struct VarFileDocument<'a> {
    artifacts: BTreeMap<&'a str, &'a Path>,
}

/// The run's variable files and the directory that owns them.
#[derive(Debug)]
pub struct VarFiles {
    dir: TempDir,
    by_root: BTreeMap<PathBuf, PathBuf>,
}

impl VarFiles {
    /// Directory holding the files.
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Variable file for the root running in `root_dir`.
    pub fn get(&self, root_dir: &Path) -> Option<&Path> {
        self.by_root.get(root_dir).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.by_root.len()
    }
}

/// `network/infra` becomes `network_infra.tfvars.json`.
///
/// Segments are joined with `_`; a literal `_` or `%` inside a segment is
/// percent-encoded, so distinct paths never share a name.
pub fn var_file_name(root: &ConfigurationRoot) -> String {
    let segments: Vec<String> = root
        .segments()
        .into_iter()
        .map(|segment| escape_segment(&segment))
        .collect();
    format!("{}.tfvars.json", segments.join("_"))
}

fn escape_segment(segment: &str) -> String {
    segment.replace('%', "%25").replace('_', "%5F")
}

/// Write one variable file per root into a fresh temporary directory.
pub fn write(roots: &[ConfigurationRoot], artifacts: &ArtifactMap) -> Result<VarFiles, Error> {
    let dir = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .tempdir()
        .map_err(|e| Error::io("failed to create variable file directory", e))?;

    let mut by_root = BTreeMap::new();
    for root in roots {
        let document = project(root, artifacts)?;
        let path = dir.path().join(var_file_name(root));

        let mut json = serde_json::to_string_pretty(&document).map_err(|e| {
            Error::io(
                format!("failed to serialize variables for {}", root.name),
                e.into(),
            )
        })?;
        json.push('\n');

        // create_new: two roots must never map onto the same file.
        let mut file = File::create_new(&path).map_err(|e| {
            Error::io(format!("failed to create {}", path.display()), e)
        })?;
        file.write_all(json.as_bytes())
            .map_err(|e| Error::io(format!("failed to write {}", path.display()), e))?;

        log::debug!("wrote {} for {}", path.display(), root.relative_path.display());
        by_root.insert(root.dir.clone(), path);
    }

    Ok(VarFiles { dir, by_root })
}

/// Project a root's artifact keys through the resolved map.
fn project<'a>(
    root: &'a ConfigurationRoot,
    artifacts: &'a ArtifactMap,
) -> Result<VarFileDocument<'a>, Error> {
    let mut projected = BTreeMap::new();
    for (key, target) in &root.artifacts {
        let path = artifacts
            .get(buildkit::label::normalize(target))
            .ok_or_else(|| Error::Resolution {
                target: target.clone(),
                message: format!("`{target}` (artifact `{key}` of {}) was not resolved", root.name),
            })?;
        projected.insert(key.as_str(), path.as_path());
    }
    Ok(VarFileDocument {
        artifacts: projected,
    })
}
