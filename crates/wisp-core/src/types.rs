use serde::{Deserialize, Serialize};

/// Marker prefix for auto-generated checkpoint commits. Any commit whose
/// message does not start with this exact literal is treated as a boundary.
pub const WIP_PREFIX: &str = "[AUTO-WIP]";

/// Upper bound on how far back the scanner walks when classifying commits.
/// Known limitation: marked commits older than this window are invisible to
/// the scanner. Unbounded `git log` walks are too slow on large histories.
pub const WIP_SCAN_LIMIT: usize = 100;

/// A commit as read from `git log` — hash, author timestamp, subject line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commit {
    pub hash: String,
    /// Author timestamp, unix seconds.
    pub timestamp: i64,
    pub message: String,
}

impl Commit {
    /// True when the subject carries the WIP marker.
    pub fn is_wip(&self) -> bool {
        self.message.starts_with(WIP_PREFIX)
    }

    /// Subject with the WIP marker removed. Non-WIP messages pass through.
    pub fn subject(&self) -> &str {
        strip_wip_prefix(&self.message)
    }

    /// Abbreviated hash for display.
    pub fn short_hash(&self) -> &str {
        &self.hash[..self.hash.len().min(8)]
    }
}

/// Remove the WIP marker (and one following separator, if any) from a message.
pub fn strip_wip_prefix(message: &str) -> &str {
    match message.strip_prefix(WIP_PREFIX) {
        Some(rest) => rest.trim_start_matches([' ', ':']),
        None => message,
    }
}

/// A contiguous run of WIP commits above the last real commit, newest first.
///
/// Invariants: every member is a WIP commit; the run is contiguous; if
/// non-empty, the oldest member's parent is `base` (or the repository root
/// when `base` is `None`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WipRun {
    pub commits: Vec<Commit>,
    /// Nearest non-WIP ancestor. `None` means the run extends to the root.
    pub base: Option<Commit>,
}

impl WipRun {
    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    /// Most recent WIP commit (HEAD side).
    pub fn newest(&self) -> Option<&Commit> {
        self.commits.first()
    }

    /// Oldest WIP commit (base side).
    pub fn oldest(&self) -> Option<&Commit> {
        self.commits.last()
    }
}

/// Outcome of one consolidation attempt. Accumulated by the engine and
/// returned to the caller — never shared mutable state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SquashReport {
    pub success: bool,
    /// Hash of the replacement commit, when one was created.
    pub new_commit: Option<String>,
    /// False only when a stash was taken and could not be restored cleanly.
    pub working_tree_restored: bool,
    /// Non-fatal residue (e.g. a stash pop conflict the user must resolve).
    pub warning: Option<String>,
    pub error: Option<String>,
}

impl SquashReport {
    pub fn succeeded(new_commit: String) -> Self {
        Self {
            success: true,
            new_commit: Some(new_commit),
            working_tree_restored: true,
            warning: None,
            error: None,
        }
    }

    pub fn failed(error: String) -> Self {
        Self {
            success: false,
            new_commit: None,
            working_tree_restored: true,
            warning: None,
            error: Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commit(hash: &str, message: &str) -> Commit {
        Commit {
            hash: hash.to_string(),
            timestamp: 1_700_000_000,
            message: message.to_string(),
        }
    }

    #[test]
    fn wip_classification() {
        assert!(commit("a", "[AUTO-WIP] add parser").is_wip());
        assert!(!commit("b", "feat: real work").is_wip());
        // Marker must be a prefix, not merely present
        assert!(!commit("c", "revert [AUTO-WIP] thing").is_wip());
    }

    #[test]
    fn strip_prefix_variants() {
        assert_eq!(strip_wip_prefix("[AUTO-WIP] fix bug"), "fix bug");
        assert_eq!(strip_wip_prefix("[AUTO-WIP]: fix bug"), "fix bug");
        assert_eq!(strip_wip_prefix("[AUTO-WIP]fix bug"), "fix bug");
        assert_eq!(strip_wip_prefix("fix bug"), "fix bug");
    }

    #[test]
    fn run_ordering_accessors() {
        let run = WipRun {
            commits: vec![commit("new", "[AUTO-WIP] b"), commit("old", "[AUTO-WIP] a")],
            base: Some(commit("base", "initial")),
        };
        assert_eq!(run.len(), 2);
        assert_eq!(run.newest().unwrap().hash, "new");
        assert_eq!(run.oldest().unwrap().hash, "old");
    }

    #[test]
    fn empty_run_is_default() {
        let run = WipRun::default();
        assert!(run.is_empty());
        assert!(run.newest().is_none());
    }

    #[test]
    fn short_hash_handles_short_input() {
        assert_eq!(commit("abc", "x").short_hash(), "abc");
        assert_eq!(
            commit("0123456789abcdef", "x").short_hash(),
            "01234567"
        );
    }

    #[test]
    fn report_roundtrip_json() {
        let report = SquashReport::succeeded("abc123".into());
        let json = serde_json::to_string(&report).unwrap();
        let restored: SquashReport = serde_json::from_str(&json).unwrap();
        assert!(restored.success);
        assert_eq!(restored.new_commit.as_deref(), Some("abc123"));
    }
}
