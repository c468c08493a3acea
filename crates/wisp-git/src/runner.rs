use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

/// Failure modes for an external git invocation. An empty-stdout success is
/// `Ok("")`, never an error — callers distinguish "no output" from "failed".
#[derive(Debug, Error)]
pub enum GitError {
    /// The binary could not be started at all (missing git, bad cwd).
    #[error("failed to run git: {0}")]
    Spawn(#[from] std::io::Error),
    /// The command ran and reported a non-zero exit.
    #[error("git {args} exited with code {code}: {stderr}")]
    Failed {
        args: String,
        code: i32,
        stderr: String,
    },
}

/// Runs git against one working directory, capturing stdout and stderr.
///
/// The runner itself never reasons about repository state — mutating commands
/// are the caller's responsibility.
#[derive(Debug, Clone)]
pub struct GitRunner {
    cwd: PathBuf,
}

impl GitRunner {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into() }
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Run `git <args>` and return trimmed stdout.
    pub fn run(&self, args: &[&str]) -> Result<String, GitError> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.cwd)
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let code = output.status.code().unwrap_or(-1);
            tracing::debug!("git {} failed ({code}): {stderr}", args.join(" "));
            return Err(GitError::Failed {
                args: args.join(" "),
                code,
                stderr,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .trim_end_matches(['\n', '\r'])
            .to_string())
    }
}
