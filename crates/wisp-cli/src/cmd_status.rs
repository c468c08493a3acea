use std::path::Path;
use wisp_core::{WIP_PREFIX, WIP_SCAN_LIMIT};
use wisp_git::{inspect, scan, GitRunner};

pub fn execute(cwd: &Path, json: bool) -> anyhow::Result<()> {
    let git = GitRunner::new(cwd);
    if !inspect::is_repository(&git) {
        anyhow::bail!("not a git repository (run wisp inside one)");
    }

    let st = inspect::status(&git);
    let summary = inspect::changed_files_summary(&git);
    let run = scan::wip_run(&git);
    // Marked commits anywhere in the window, contiguous or not
    let marked = inspect::recent_commits_matching(&git, WIP_SCAN_LIMIT, Some(WIP_PREFIX))
        .iter()
        .filter(|c| c.is_wip())
        .count();

    if json {
        let out = serde_json::json!({
            "working_tree": {
                "has_staged": st.has_staged,
                "has_unstaged": st.has_unstaged,
                "summary": summary,
            },
            "wip_run": {
                "length": run.len(),
                "base": run.base.as_ref().map(|c| c.hash.clone()),
            },
            "marked_in_window": marked,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if st.is_dirty() {
        let detail = if summary.is_empty() {
            "unknown".to_string()
        } else {
            summary
        };
        println!("Working tree: {detail}");
    } else {
        println!("Working tree: clean");
    }

    if run.is_empty() {
        println!("WIP run: none");
    } else {
        match &run.base {
            Some(base) => println!(
                "WIP run: {} checkpoint(s) atop {} \"{}\"",
                run.len(),
                base.short_hash(),
                base.subject()
            ),
            None => println!("WIP run: {} checkpoint(s), extends to root", run.len()),
        }
        for c in &run.commits {
            println!("  {} {}", c.short_hash(), c.subject());
        }
    }

    if marked > run.len() {
        println!(
            "note: {} older marked commit(s) are separated from the run by real commits",
            marked - run.len()
        );
    }
    Ok(())
}
