use wisp_core::{SquashReport, WipRun};
use wisp_git::{inspect, GitRunner};

/// Pipeline step tags, used to name where a consolidation went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SquashStep {
    Stash,
    Reset,
    Commit,
    Restore,
}

impl std::fmt::Display for SquashStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SquashStep::Stash => "stash",
            SquashStep::Reset => "reset",
            SquashStep::Commit => "commit",
            SquashStep::Restore => "restore",
        };
        f.write_str(name)
    }
}

/// Collapse a WIP run into a single commit carrying `message`.
///
/// Soft-reset squash: stash uncommitted changes if present, soft-reset to the
/// run's base (the WIP commits' content stays staged), commit, restore the
/// stash. No interactive rebase: that would need a scriptable editor
/// handshake, which is fragile across environments.
///
/// Every path that stashed attempts restoration before returning, whether the
/// squash succeeded or not. A restore conflict is a warning on an otherwise
/// successful report, never a failure: the new commit already exists, and the
/// user's in-progress edits stay recoverable in the stash.
pub fn squash(git: &GitRunner, run: &WipRun, message: &str) -> SquashReport {
    if run.is_empty() {
        // Nothing to do is success, not an error
        return SquashReport {
            success: true,
            new_commit: None,
            working_tree_restored: true,
            warning: None,
            error: None,
        };
    }

    let stashed = match snapshot_working_tree(git) {
        Ok(stashed) => stashed,
        Err(e) => return SquashReport::failed(format!("{} failed: {e}", SquashStep::Stash)),
    };

    // Move the branch pointer below the run; the run's content stays staged.
    let reset = match &run.base {
        Some(base) => git.run(&["reset", "--soft", &base.hash]),
        // Run extends to the repository root: drop HEAD so the replacement
        // commit becomes the new root.
        None => git.run(&["update-ref", "-d", "HEAD"]),
    };
    if let Err(e) = reset {
        let mut report = SquashReport::failed(format!("{} failed: {e}", SquashStep::Reset));
        restore_snapshot(git, stashed, &mut report);
        return report;
    }

    if let Err(e) = git.run(&["commit", "-m", message]) {
        let mut report = SquashReport::failed(format!("{} failed: {e}", SquashStep::Commit));
        restore_snapshot(git, stashed, &mut report);
        return report;
    }

    let new_commit = git.run(&["rev-parse", "HEAD"]).ok();
    tracing::debug!(
        "squashed {} WIP commits into {}",
        run.len(),
        new_commit.as_deref().unwrap_or("?")
    );

    let mut report = SquashReport {
        success: true,
        new_commit,
        working_tree_restored: true,
        warning: None,
        error: None,
    };
    restore_snapshot(git, stashed, &mut report);
    report
}

/// Stash staged + unstaged + untracked changes under a unique label.
/// Returns whether a stash was actually created.
fn snapshot_working_tree(git: &GitRunner) -> Result<bool, wisp_git::GitError> {
    if !inspect::status(git).is_dirty() {
        return Ok(false);
    }
    let label = format!("wisp-squash-{}", ulid::Ulid::new().to_string().to_lowercase());
    git.run(&["stash", "push", "--include-untracked", "-m", &label])?;
    Ok(true)
}

/// Restore the stash taken in [`snapshot_working_tree`]. `--index` keeps the
/// staged/unstaged split. Failure downgrades to a warning on the report.
fn restore_snapshot(git: &GitRunner, stashed: bool, report: &mut SquashReport) {
    if !stashed {
        return;
    }
    if let Err(e) = git.run(&["stash", "pop", "--index"]) {
        report.working_tree_restored = false;
        report.warning = Some(format!(
            "{} left a conflict: your uncommitted changes are kept in the stash; \
             run `git stash pop` and resolve manually ({e})",
            SquashStep::Restore
        ));
    }
}
