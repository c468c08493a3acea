use std::path::Path;
use wisp_core::WIP_PREFIX;
use wisp_git::{inspect, GitRunner};

pub fn execute(cwd: &Path, message: Option<&str>) -> anyhow::Result<()> {
    let git = GitRunner::new(cwd);
    if !inspect::is_repository(&git) {
        anyhow::bail!("not a git repository (run wisp inside one)");
    }

    if !inspect::status(&git).is_dirty() {
        println!("Nothing to checkpoint.");
        return Ok(());
    }

    // Summary before staging: porcelain codes still show the unstaged view
    let summary = inspect::changed_files_summary(&git);

    let description = match message {
        Some(m) if !m.trim().is_empty() => m.trim().to_string(),
        _ if summary.is_empty() => "checkpoint".to_string(),
        _ => format!("checkpoint: {summary}"),
    };

    git.run(&["add", "-A"])?;
    git.run(&["commit", "-m", &format!("{WIP_PREFIX} {description}")])?;

    let hash = git.run(&["rev-parse", "--short", "HEAD"]).unwrap_or_default();
    println!("Checkpoint {hash} \"{description}\"");
    Ok(())
}
