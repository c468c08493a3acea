use crate::inspect;
use crate::runner::GitRunner;
use wisp_core::{Commit, WipRun, WIP_SCAN_LIMIT};

/// Find the contiguous run of WIP commits sitting above the last real commit.
///
/// Only the most recent [`WIP_SCAN_LIMIT`] commits are classified; anything
/// older is treated as a boundary even if it carries the marker. Known
/// limitation: a marked commit outside the window is invisible here.
pub fn wip_run(git: &GitRunner) -> WipRun {
    // One extra commit past the window: if present it is a forced boundary,
    // so a window full of WIP commits still gets a correct base.
    let commits = inspect::recent_commits(git, WIP_SCAN_LIMIT + 1);
    scan(commits, WIP_SCAN_LIMIT)
}

/// Walk newest → oldest, collecting WIP commits until the first non-WIP
/// commit (the base) or the classification bound.
pub fn scan(commits: Vec<Commit>, limit: usize) -> WipRun {
    let mut run = WipRun::default();
    for (idx, commit) in commits.into_iter().enumerate() {
        if idx < limit && commit.is_wip() {
            run.commits.push(commit);
        } else {
            run.base = Some(commit);
            break;
        }
    }
    run
}
