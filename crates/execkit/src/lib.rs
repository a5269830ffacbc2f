//! # execkit
//!
//! Subprocess invocations as explicit values.
//!
//! Every external call is described by an [`Invocation`]: the program, its
//! argument list and the working directory it runs in. The process-global
//! current directory is never consulted. Running an invocation yields either
//! a [`CommandOutput`] with captured streams, or just the exit code when the
//! child's output is streamed straight to the terminal.
//!
//! ## Example
//!
//! ```no_run
//! use execkit::Invocation;
//!
//! let output = Invocation::new("terraform", "/srv/infra/network")
//!     .args(["plan", "-detailed-exitcode"])
//!     .output()?;
//!
//! match output.code {
//!     Some(0) => println!("no changes"),
//!     Some(2) => println!("changes pending"),
//!     _ => eprintln!("{}", output.stderr),
//! }
//! # Ok::<(), execkit::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;

pub use error::{Error, Result};

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// A fully specified subprocess call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program name or path
    pub program: String,
    /// Arguments, in order
    pub args: Vec<String>,
    /// Working directory for the child
    pub cwd: PathBuf,
}

/// Exit code and captured streams of a finished subprocess.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, or `None` if the child was terminated by a signal
    pub code: Option<i32>,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

impl CommandOutput {
    /// Build an output from its parts.
    pub fn new(code: Option<i32>, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    /// Whether the child exited with status zero.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Human form of an exit code: `exit 1`, or `terminated by signal` when
/// there is none.
pub fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit {code}"),
        None => "terminated by signal".to_string(),
    }
}

impl Invocation {
    /// Create an invocation of `program` running in `cwd`.
    pub fn new(program: impl Into<String>, cwd: impl AsRef<Path>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.as_ref().to_path_buf(),
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run to completion with stdout and stderr captured.
    ///
    /// Stdin is closed so a tool that unexpectedly prompts fails instead of
    /// hanging.
    pub fn output(&self) -> Result<CommandOutput> {
        log::debug!("exec: {self}");
        let output = self
            .command()
            .stdin(Stdio::null())
            .output()
            .map_err(|e| self.spawn_error(e))?;

        let result = CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        log::trace!("exit {:?}: {}", result.code, self.program);
        Ok(result)
    }

    /// Run to completion with the terminal's stdio inherited.
    ///
    /// Returns the exit code, or `None` if the child was killed by a signal.
    pub fn status(&self) -> Result<Option<i32>> {
        log::debug!("exec (streamed): {self}");
        let status = self
            .command()
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| self.spawn_error(e))?;
        log::trace!("exit {:?}: {}", status.code(), self.program);
        Ok(status.code())
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).current_dir(&self.cwd);
        cmd
    }

    fn spawn_error(&self, source: std::io::Error) -> Error {
        if source.kind() == std::io::ErrorKind::NotFound && self.cwd.is_dir() {
            Error::NotFound {
                program: self.program.clone(),
            }
        } else {
            Error::Spawn {
                program: self.program.clone(),
                cwd: self.cwd.clone(),
                source,
            }
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        write!(f, " (in {})", self.cwd.display())
    }
}
