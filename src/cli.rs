use clap::Parser;
use std::num::NonZeroUsize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tfroots")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Apply Terraform across manifest-defined infra directories", long_about = None)]
pub struct Cli {
    /// Path to a file in the workspace root (symlinks are followed)
    pub workspace_file: PathBuf,

    /// Path to the Terraform roots manifest
    pub manifest: PathBuf,

    /// Number of roots planned in parallel
    #[arg(short, long, env = "TFROOTS_JOBS")]
    pub jobs: Option<NonZeroUsize>,

    /// Directory for saved plan files
    #[arg(long, env = "TFROOTS_PLAN_DIR")]
    pub plan_dir: Option<PathBuf>,

    /// Bazel executable
    #[arg(long, env = "TFROOTS_BAZEL", default_value = "bazel")]
    pub bazel: String,

    /// Terraform executable
    #[arg(long, env = "TFROOTS_TERRAFORM", default_value = "terraform")]
    pub terraform: String,

    /// Plan and show diffs, then exit without applying
    #[arg(long, conflicts_with = "yes")]
    pub plan_only: bool,

    /// Apply without asking for confirmation
    #[arg(short, long)]
    pub yes: bool,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Hide the progress bar and per-root plan status lines
    #[arg(short, long)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positionals_and_defaults() {
        let cli = Cli::try_parse_from(["tfroots", "WORKSPACE", "infra/manifest.json"]).unwrap();

        assert_eq!(cli.workspace_file, PathBuf::from("WORKSPACE"));
        assert_eq!(cli.manifest, PathBuf::from("infra/manifest.json"));
        assert_eq!(cli.bazel, "bazel");
        assert_eq!(cli.terraform, "terraform");
        assert!(!cli.plan_only);
        assert!(!cli.yes);
    }

    #[test]
    fn test_manifest_is_required() {
        assert!(Cli::try_parse_from(["tfroots", "WORKSPACE"]).is_err());
    }

    #[test]
    fn test_zero_jobs_rejected() {
        assert!(Cli::try_parse_from(["tfroots", "WORKSPACE", "m.json", "--jobs", "0"]).is_err());
        let cli = Cli::try_parse_from(["tfroots", "WORKSPACE", "m.json", "-j", "3"]).unwrap();
        assert_eq!(cli.jobs.map(NonZeroUsize::get), Some(3));
    }

    #[test]
    fn test_plan_only_conflicts_with_yes() {
        assert!(
            Cli::try_parse_from(["tfroots", "WORKSPACE", "m.json", "--plan-only", "--yes"])
                .is_err()
        );
    }

    #[test]
    fn test_verbose_counts() {
        let cli = Cli::try_parse_from(["tfroots", "-vv", "WORKSPACE", "m.json"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
