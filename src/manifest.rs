//! Terraform roots manifest.
//!
//! ```json
//! {
//!   "terraform_roots": [
//!     { "path": "network/infra", "artifacts": { "lambda_zip": "//network/lambda:zip" } }
//!   ]
//! }
//! ```
//!
//! Unknown fields are rejected so a typo fails here instead of surfacing as
//! a missing variable halfway through a plan.

use crate::error::Error;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestDocument {
    terraform_roots: Vec<RootEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RootEntry {
    path: String,
    artifacts: BTreeMap<String, String>,
}

/// One independently applied Terraform configuration directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationRoot {
    /// Path relative to the workspace root
    pub relative_path: PathBuf,
    /// Display name: the first segment of the relative path
    pub name: String,
    /// Absolute directory Terraform runs in
    pub dir: PathBuf,
    /// Artifact key to build target label
    pub artifacts: BTreeMap<String, String>,
}

impl ConfigurationRoot {
    /// Path segments of the relative path.
    pub fn segments(&self) -> Vec<String> {
        self.relative_path
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect()
    }
}

/// Read and validate the manifest at `path`.
pub fn load(path: &Path, workspace_root: &Path) -> Result<Vec<ConfigurationRoot>, Error> {
    let content = fs::read_to_string(path).map_err(|e| Error::Manifest {
        path: path.to_path_buf(),
        message: format!("could not read file: {e}"),
    })?;
    parse(&content, path, workspace_root)
}

/// Parse manifest text. `source` is only used in error messages.
pub fn parse(
    content: &str,
    source: &Path,
    workspace_root: &Path,
) -> Result<Vec<ConfigurationRoot>, Error> {
    let invalid = |message: String| Error::Manifest {
        path: source.to_path_buf(),
        message,
    };

    let document: ManifestDocument =
        serde_json::from_str(content).map_err(|e| invalid(e.to_string()))?;

    let mut roots = Vec::with_capacity(document.terraform_roots.len());
    let mut seen_names: HashMap<String, PathBuf> = HashMap::new();

    for (index, entry) in document.terraform_roots.into_iter().enumerate() {
        let relative_path = normalize_root_path(&entry.path)
            .map_err(|reason| invalid(format!("terraform_roots[{index}].path: {reason}")))?;

        let name = relative_path
            .components()
            .next()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .ok_or_else(|| invalid(format!("terraform_roots[{index}].path is empty")))?;

        // Plan files are keyed by display name.
        if let Some(previous) = seen_names.insert(name.clone(), relative_path.clone()) {
            return Err(invalid(format!(
                "roots `{}` and `{}` share the name `{name}`",
                previous.display(),
                relative_path.display()
            )));
        }

        roots.push(ConfigurationRoot {
            dir: workspace_root.join(&relative_path),
            name,
            relative_path,
            artifacts: entry.artifacts,
        });
    }

    Ok(roots)
}

/// Keep only normal segments of a workspace-relative path.
fn normalize_root_path(raw: &str) -> Result<PathBuf, String> {
    let mut normalized = PathBuf::new();
    for component in Path::new(raw).components() {
        match component {
            Component::Normal(segment) => normalized.push(segment),
            Component::CurDir => {}
            Component::ParentDir => return Err(format!("`{raw}` must not contain `..`")),
            Component::RootDir | Component::Prefix(_) => {
                return Err(format!("`{raw}` must be relative to the workspace root"));
            }
        }
    }
    if normalized.as_os_str().is_empty() {
        return Err("must not be empty".to_string());
    }
    Ok(normalized)
}
