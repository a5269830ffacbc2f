//! Real Terraform backend using the `terraform` CLI.

use crate::backend::Backend;
use crate::error::Result;
use execkit::{CommandOutput, Invocation};
use std::path::Path;

/// Backend that executes real `terraform` commands.
pub struct TerraformBackend {
    /// Path or name of the terraform executable
    terraform_bin: String,
}

impl TerraformBackend {
    /// Create a backend that runs `terraform_bin`.
    pub fn new(terraform_bin: impl Into<String>) -> Self {
        Self {
            terraform_bin: terraform_bin.into(),
        }
    }

    /// `terraform init -input=false`
    pub fn init_invocation(&self, dir: &Path) -> Invocation {
        Invocation::new(&self.terraform_bin, dir).args(["init", "-input=false"])
    }

    /// `terraform plan -out=<plan> -detailed-exitcode -input=false -var-file=<vars>`
    pub fn plan_invocation(&self, dir: &Path, plan_file: &Path, var_file: &Path) -> Invocation {
        Invocation::new(&self.terraform_bin, dir).args([
            "plan".to_string(),
            format!("-out={}", plan_file.display()),
            "-detailed-exitcode".to_string(),
            "-input=false".to_string(),
            format!("-var-file={}", var_file.display()),
        ])
    }

    /// `terraform show <plan>`
    pub fn show_invocation(&self, dir: &Path, plan_file: &Path) -> Invocation {
        Invocation::new(&self.terraform_bin, dir)
            .arg("show")
            .arg(plan_file.display().to_string())
    }

    /// `terraform apply <plan>`
    pub fn apply_invocation(&self, dir: &Path, plan_file: &Path) -> Invocation {
        Invocation::new(&self.terraform_bin, dir)
            .arg("apply")
            .arg(plan_file.display().to_string())
    }
}

impl Default for TerraformBackend {
    fn default() -> Self {
        Self::new("terraform")
    }
}

impl Backend for TerraformBackend {
    fn init(&self, dir: &Path) -> Result<CommandOutput> {
        Ok(self.init_invocation(dir).output()?)
    }

    fn plan(&self, dir: &Path, plan_file: &Path, var_file: &Path) -> Result<CommandOutput> {
        Ok(self.plan_invocation(dir, plan_file, var_file).output()?)
    }

    fn show(&self, dir: &Path, plan_file: &Path) -> Result<CommandOutput> {
        Ok(self.show_invocation(dir, plan_file).output()?)
    }

    fn apply(&self, dir: &Path, plan_file: &Path) -> Result<Option<i32>> {
        Ok(self.apply_invocation(dir, plan_file).status()?)
    }
}
