//! # buildkit
//!
//! Build Bazel targets and resolve each one to the single file it produces.
//!
//! This crate provides:
//! - A [`Backend`](backend::Backend) trait over the build tool, with a real
//!   `bazel` implementation
//! - Parsing of the batched output-file query
//! - Strict resolution: every target must map to exactly one output file
//!
//! ## Example
//!
//! ```no_run
//! use buildkit::Client;
//! use std::path::Path;
//!
//! let client = Client::new("bazel");
//! let targets = vec!["//app/api:bundle".to_string()];
//! let artifacts = client.resolve(Path::new("/src/monorepo"), &targets)?;
//!
//! for (label, path) in &artifacts {
//!     println!("{label} -> {}", path.display());
//! }
//! # Ok::<(), buildkit::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod error;
pub mod label;
pub mod query;

pub use error::{Error, Result};

use backend::{Backend, bazel::BazelBackend};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Resolved artifacts: normalized target label to absolute output path.
pub type ArtifactMap = BTreeMap<String, PathBuf>;

/// High-level client for build operations.
pub struct Client {
    backend: Box<dyn Backend>,
}

impl Client {
    /// Create a client that runs the given bazel executable.
    pub fn new(bazel_bin: impl Into<String>) -> Self {
        Self {
            backend: Box::new(BazelBackend::new(bazel_bin)),
        }
    }

    /// Create a client with a custom backend (useful for testing).
    pub fn with_backend(backend: Box<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Build `targets` and resolve each to its single output file.
    ///
    /// `targets` should already be deduplicated and sorted. An empty list
    /// returns an empty map without touching the build tool.
    ///
    /// Output paths are joined onto `workspace`. A target reporting zero or
    /// several outputs fails with [`Error::Ambiguous`]; a target absent from
    /// the query output fails with [`Error::Missing`].
    pub fn resolve(&self, workspace: &Path, targets: &[String]) -> Result<ArtifactMap> {
        if targets.is_empty() {
            return Ok(ArtifactMap::new());
        }

        self.backend.build(workspace, targets)?;
        let stdout = self.backend.query_outputs(workspace, targets)?;

        let mut resolved = ArtifactMap::new();
        for record in query::parse(&stdout) {
            let [path] = record.paths.as_slice() else {
                return Err(Error::Ambiguous {
                    target: record.label,
                    paths: record.paths,
                });
            };
            log::debug!("resolved {} -> {}", record.label, path.display());
            resolved.insert(record.label, workspace.join(path));
        }

        for target in targets {
            let target = label::normalize(target);
            if !resolved.contains_key(target) {
                return Err(Error::Missing {
                    target: target.to_string(),
                });
            }
        }

        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Calls {
        builds: AtomicUsize,
        queries: AtomicUsize,
    }

    struct StubBackend {
        calls: Arc<Calls>,
        build_fails: bool,
        query_stdout: String,
    }

    impl StubBackend {
        fn client(query_stdout: &str, build_fails: bool) -> (Client, Arc<Calls>) {
            let calls = Arc::new(Calls::default());
            let backend = Self {
                calls: Arc::clone(&calls),
                build_fails,
                query_stdout: query_stdout.to_string(),
            };
            (Client::with_backend(Box::new(backend)), calls)
        }
    }

    impl Backend for StubBackend {
        fn build(&self, _workspace: &Path, _targets: &[String]) -> Result<()> {
            self.calls.builds.fetch_add(1, Ordering::SeqCst);
            if self.build_fails {
                return Err(Error::BuildFailed {
                    code: Some(1),
                    stderr: "ERROR: build did NOT complete successfully".to_string(),
                });
            }
            Ok(())
        }

        fn query_outputs(&self, _workspace: &Path, _targets: &[String]) -> Result<String> {
            self.calls.queries.fetch_add(1, Ordering::SeqCst);
            Ok(self.query_stdout.clone())
        }
    }

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_resolve_empty_targets_skips_backend() {
        let (client, calls) = StubBackend::client("", false);
        let resolved = client.resolve(Path::new("/ws"), &[]).unwrap();

        assert!(resolved.is_empty());
        assert_eq!(calls.builds.load(Ordering::SeqCst), 0);
        assert_eq!(calls.queries.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_resolve_joins_onto_workspace() {
        let (client, calls) = StubBackend::client(
            "@@//app/api:bundle\tbazel-out/bin/app/api/bundle.zip\n",
            false,
        );
        let resolved = client
            .resolve(Path::new("/ws"), &labels(&["//app/api:bundle"]))
            .unwrap();

        assert_eq!(
            resolved.get("//app/api:bundle"),
            Some(&PathBuf::from("/ws/bazel-out/bin/app/api/bundle.zip"))
        );
        assert_eq!(calls.builds.load(Ordering::SeqCst), 1);
        assert_eq!(calls.queries.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_resolve_rejects_multiple_outputs() {
        let (client, _) = StubBackend::client("//app:zip\tout/a.zip,out/b.zip\n", false);
        let err = client
            .resolve(Path::new("/ws"), &labels(&["//app:zip"]))
            .unwrap_err();

        match err {
            Error::Ambiguous { target, paths } => {
                assert_eq!(target, "//app:zip");
                assert_eq!(paths.len(), 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_resolve_rejects_zero_outputs() {
        let (client, _) = StubBackend::client("//app:empty\t,\n", false);
        let err = client
            .resolve(Path::new("/ws"), &labels(&["//app:empty"]))
            .unwrap_err();

        assert!(matches!(err, Error::Ambiguous { ref paths, .. } if paths.is_empty()));
    }

    #[test]
    fn test_resolve_reports_missing_target() {
        let (client, _) = StubBackend::client("//a:one\tout/one.zip\n", false);
        let err = client
            .resolve(Path::new("/ws"), &labels(&["//a:one", "//a:two"]))
            .unwrap_err();

        assert!(matches!(err, Error::Missing { ref target } if target == "//a:two"));
    }

    #[test]
    fn test_resolve_build_failure_skips_query() {
        let (client, calls) = StubBackend::client("", true);
        let err = client
            .resolve(Path::new("/ws"), &labels(&["//a:one"]))
            .unwrap_err();

        assert!(matches!(err, Error::BuildFailed { code: Some(1), .. }));
        assert_eq!(calls.queries.load(Ordering::SeqCst), 0);
    }
}
