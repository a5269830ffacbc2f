//! Scripted build and Terraform backends for engine tests.

use crate::confirm::ConfirmCallback;
use crate::error::Error;
use crate::manifest::ConfigurationRoot;
use execkit::CommandOutput;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

pub type Calls<T> = Arc<Mutex<Vec<T>>>;

/// A root at `/ws/<path>` with the given artifact keys.
pub fn root(path: &str, artifacts: &[(&str, &str)]) -> ConfigurationRoot {
    let relative_path = PathBuf::from(path);
    ConfigurationRoot {
        name: relative_path
            .components()
            .next()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .unwrap_or_default(),
        dir: Path::new("/ws").join(&relative_path),
        relative_path,
        artifacts: artifacts
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect(),
    }
}

// ============================================================================
// Build tool
// ============================================================================

pub struct FakeBuild {
    query_stdout: String,
    build_stderr: Option<String>,
    calls: Calls<String>,
}

impl FakeBuild {
    /// Builds succeed; the query prints `query_stdout`.
    pub fn client(query_stdout: &str) -> (buildkit::Client, Calls<String>) {
        Self::make(query_stdout, None)
    }

    /// Every build exits 1 with `stderr`.
    pub fn failing(stderr: &str) -> (buildkit::Client, Calls<String>) {
        Self::make("", Some(stderr.to_string()))
    }

    fn make(query_stdout: &str, build_stderr: Option<String>) -> (buildkit::Client, Calls<String>) {
        let calls = Calls::default();
        let backend = Self {
            query_stdout: query_stdout.to_string(),
            build_stderr,
            calls: Arc::clone(&calls),
        };
        (buildkit::Client::with_backend(Box::new(backend)), calls)
    }
}

impl buildkit::backend::Backend for FakeBuild {
    fn build(&self, _workspace: &Path, targets: &[String]) -> buildkit::Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("build {}", targets.join(" ")));
        match &self.build_stderr {
            Some(stderr) => Err(buildkit::Error::BuildFailed {
                code: Some(1),
                stderr: stderr.clone(),
            }),
            None => Ok(()),
        }
    }

    fn query_outputs(&self, _workspace: &Path, targets: &[String]) -> buildkit::Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("query {}", targets.join(" ")));
        Ok(self.query_stdout.clone())
    }
}

// ============================================================================
// Terraform
// ============================================================================

/// How one root's Terraform commands behave.
#[derive(Debug, Clone, Copy)]
pub struct Script {
    pub init_code: i32,
    pub plan_code: Option<i32>,
    pub show_code: i32,
    pub apply_code: Option<i32>,
    pub delay_ms: u64,
}

impl Script {
    pub const fn plan(code: i32) -> Self {
        Self {
            init_code: 0,
            plan_code: Some(code),
            show_code: 0,
            apply_code: Some(0),
            delay_ms: 0,
        }
    }

    pub const fn delay(mut self, ms: u64) -> Self {
        self.delay_ms = ms;
        self
    }

    pub const fn init_fails(mut self) -> Self {
        self.init_code = 1;
        self
    }

    pub const fn show_fails(mut self) -> Self {
        self.show_code = 1;
        self
    }

    pub const fn apply_fails(mut self) -> Self {
        self.apply_code = Some(1);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TfCall {
    Init(PathBuf),
    /// `vars` is the variable file's content at plan time
    Plan {
        dir: PathBuf,
        var_file: PathBuf,
        vars: String,
    },
    Show(PathBuf),
    Apply(PathBuf),
}

impl TfCall {
    pub fn is_apply(&self) -> bool {
        matches!(self, Self::Apply(_))
    }

    pub fn is_show(&self) -> bool {
        matches!(self, Self::Show(_))
    }
}

/// Observations shared between a [`FakeTerraform`] and the test.
#[derive(Default)]
pub struct TfLog {
    pub calls: Mutex<Vec<TfCall>>,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl TfLog {
    pub fn calls(&self) -> Vec<TfCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn applied(&self) -> Vec<PathBuf> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                TfCall::Apply(dir) => Some(dir),
                _ => None,
            })
            .collect()
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn record(&self, call: TfCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn enter(&self) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
    }

    fn leave(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Terraform backend keyed by root directory. Unscripted roots plan with no
/// changes.
pub struct FakeTerraform {
    scripts: HashMap<PathBuf, Script>,
    log: Arc<TfLog>,
}

impl FakeTerraform {
    pub fn client(scripts: &[(&str, Script)]) -> (terrakit::Client, Arc<TfLog>) {
        Self::client_in(Path::new("/ws"), scripts)
    }

    /// Like [`FakeTerraform::client`] with root paths relative to `workspace`.
    pub fn client_in(workspace: &Path, scripts: &[(&str, Script)]) -> (terrakit::Client, Arc<TfLog>) {
        let log = Arc::new(TfLog::default());
        let backend = Self {
            scripts: scripts
                .iter()
                .map(|(path, script)| (workspace.join(path), *script))
                .collect(),
            log: Arc::clone(&log),
        };
        (terrakit::Client::with_backend(Box::new(backend)), log)
    }

    fn script(&self, dir: &Path) -> Script {
        self.scripts.get(dir).copied().unwrap_or(Script::plan(0))
    }
}

impl terrakit::backend::Backend for FakeTerraform {
    fn init(&self, dir: &Path) -> terrakit::Result<CommandOutput> {
        self.log.record(TfCall::Init(dir.to_path_buf()));
        let script = self.script(dir);
        Ok(CommandOutput::new(
            Some(script.init_code),
            "Initializing the backend...",
            if script.init_code == 0 { "" } else { "Error: backend unreachable" },
        ))
    }

    fn plan(&self, dir: &Path, plan_file: &Path, var_file: &Path) -> terrakit::Result<CommandOutput> {
        let vars = fs::read_to_string(var_file).unwrap_or_default();
        self.log.record(TfCall::Plan {
            dir: dir.to_path_buf(),
            var_file: var_file.to_path_buf(),
            vars,
        });

        let script = self.script(dir);
        self.log.enter();
        thread::sleep(Duration::from_millis(script.delay_ms));
        self.log.leave();

        if matches!(script.plan_code, Some(0 | 2)) {
            fs::write(plan_file, b"plan").unwrap();
        }
        Ok(CommandOutput::new(
            script.plan_code,
            "Terraform will perform the following actions",
            if script.plan_code == Some(1) { "Error: invalid reference" } else { "" },
        ))
    }

    fn show(&self, dir: &Path, _plan_file: &Path) -> terrakit::Result<CommandOutput> {
        self.log.record(TfCall::Show(dir.to_path_buf()));
        let script = self.script(dir);
        Ok(CommandOutput::new(
            Some(script.show_code),
            format!("  # resource in {} will be updated", dir.display()),
            "",
        ))
    }

    fn apply(&self, dir: &Path, _plan_file: &Path) -> terrakit::Result<Option<i32>> {
        self.log.record(TfCall::Apply(dir.to_path_buf()));
        Ok(self.script(dir).apply_code)
    }
}

// ============================================================================
// Confirmation
// ============================================================================

/// Answers with a fixed string and remembers whether it was asked.
pub struct ScriptedConfirm {
    pub answer: &'static str,
    pub asked: bool,
}

impl ScriptedConfirm {
    pub const fn new(answer: &'static str) -> Self {
        Self {
            answer,
            asked: false,
        }
    }
}

impl ConfirmCallback for ScriptedConfirm {
    fn confirm(&mut self, _prompt: &str) -> Result<bool, Error> {
        self.asked = true;
        Ok(crate::confirm::is_confirmation(self.answer))
    }
}

