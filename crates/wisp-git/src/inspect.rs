use crate::runner::GitRunner;
use wisp_core::Commit;

/// Staged/unstaged split of the working tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeStatus {
    pub has_staged: bool,
    pub has_unstaged: bool,
}

impl TreeStatus {
    pub fn is_dirty(&self) -> bool {
        self.has_staged || self.has_unstaged
    }
}

/// True when `cwd` is inside a git working tree. Never errors — this is the
/// guard every other operation sits behind.
pub fn is_repository(git: &GitRunner) -> bool {
    matches!(
        git.run(&["rev-parse", "--is-inside-work-tree"]).as_deref(),
        Ok("true")
    )
}

/// Parse `git status --porcelain` into the staged/unstaged split.
/// Degrades to a clean status on any error.
pub fn status(git: &GitRunner) -> TreeStatus {
    match git.run(&["status", "--porcelain"]) {
        Ok(out) => parse_status(&out),
        Err(e) => {
            tracing::debug!("status query failed, treating as clean: {e}");
            TreeStatus::default()
        }
    }
}

fn parse_status(porcelain: &str) -> TreeStatus {
    let mut st = TreeStatus::default();
    for line in porcelain.lines() {
        let mut chars = line.chars();
        let index = chars.next().unwrap_or(' ');
        let worktree = chars.next().unwrap_or(' ');

        if line.starts_with("??") {
            st.has_unstaged = true;
            continue;
        }
        if matches!(index, 'A' | 'M' | 'D' | 'R' | 'C') {
            st.has_staged = true;
        }
        if worktree != ' ' {
            st.has_unstaged = true;
        }
    }
    st
}

/// Most recent commits, newest first, bounded by `limit`. Absence of history
/// is not exceptional: any failure (including an unborn HEAD) yields an empty
/// vec.
pub fn recent_commits(git: &GitRunner, limit: usize) -> Vec<Commit> {
    recent_commits_matching(git, limit, None)
}

/// Like [`recent_commits`], keeping only commits whose message contains
/// `filter` (fixed string, not a regex) when one is given.
pub fn recent_commits_matching(git: &GitRunner, limit: usize, filter: Option<&str>) -> Vec<Commit> {
    let max = format!("--max-count={limit}");
    let grep = filter.map(|pattern| format!("--grep={pattern}"));
    let mut args = vec!["log", &max, "--pretty=format:%H%x09%ct%x09%s"];
    if let Some(grep) = &grep {
        args.push(grep);
        args.push("--fixed-strings");
    }
    let out = match git.run(&args) {
        Ok(out) => out,
        Err(e) => {
            tracing::debug!("log query failed, treating as empty history: {e}");
            return Vec::new();
        }
    };

    out.lines().filter_map(parse_log_line).collect()
}

fn parse_log_line(line: &str) -> Option<Commit> {
    let mut parts = line.splitn(3, '\t');
    let hash = parts.next()?.to_string();
    let timestamp = parts.next()?.parse::<i64>().ok()?;
    let message = parts.next().unwrap_or("").to_string();
    if hash.is_empty() {
        return None;
    }
    Some(Commit {
        hash,
        timestamp,
        message,
    })
}

/// Human-readable summary of changed paths ("2 added, 1 modified").
/// Empty string means "unknown", not "no changes" — callers must not conflate
/// the two.
pub fn changed_files_summary(git: &GitRunner) -> String {
    let out = match git.run(&["status", "--porcelain"]) {
        Ok(out) => out,
        Err(e) => {
            tracing::debug!("summary query failed: {e}");
            return String::new();
        }
    };
    if out.is_empty() {
        return "no changes".to_string();
    }

    let (mut added, mut modified, mut deleted) = (0usize, 0usize, 0usize);
    let mut unparsed = 0usize;
    for line in out.lines() {
        if line.len() < 3 {
            unparsed += 1;
            continue;
        }
        let code = &line[..2];
        if code == "??" || code.starts_with('A') {
            added += 1;
        } else if code.starts_with('D') || code.ends_with('D') {
            deleted += 1;
        } else if code.contains('M') || code.starts_with('R') || code.starts_with('C') {
            modified += 1;
        } else {
            unparsed += 1;
        }
    }

    if unparsed > 0 {
        // Odd porcelain lines: fall back to a raw count rather than guessing
        return format!("{} files changed", out.lines().count());
    }

    let mut parts = Vec::new();
    if added > 0 {
        parts.push(format!("{added} added"));
    }
    if modified > 0 {
        parts.push(format!("{modified} modified"));
    }
    if deleted > 0 {
        parts.push(format!("{deleted} deleted"));
    }
    parts.join(", ")
}
