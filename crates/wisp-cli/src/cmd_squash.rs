use std::path::Path;
use wisp_core::config::WispConfig;
use wisp_core::WipRun;
use wisp_git::{inspect, scan, GitRunner};
use wisp_squash::generator::{ClaudeCliGenerator, MessageGenerator};
use wisp_squash::{engine, synth};

pub fn execute(cwd: &Path, override_message: Option<&str>, no_ai: bool) -> anyhow::Result<()> {
    let git = GitRunner::new(cwd);
    if !inspect::is_repository(&git) {
        anyhow::bail!("not a git repository (run wisp inside one)");
    }

    let run = scan::wip_run(&git);
    if run.is_empty() {
        println!("No WIP commits to squash.");
        return Ok(());
    }

    let config = WispConfig::load_or_default(cwd);
    let message = resolve_message(&run, override_message, no_ai, &config)?;

    if config.show_preview {
        print_preview(&run, &message);
    }

    let report = engine::squash(&git, &run, &message);

    if let Some(warning) = &report.warning {
        eprintln!("warning: {warning}");
    }
    if !report.success {
        anyhow::bail!(
            "squash failed: {}",
            report.error.as_deref().unwrap_or("unknown error")
        );
    }

    // Verify through the inspector rather than trusting our own bookkeeping
    let head = inspect::recent_commits(&git, 1);
    match (report.new_commit.as_deref(), head.first()) {
        (Some(hash), Some(commit)) if commit.hash == hash => {
            println!(
                "Squashed {} WIP commit(s) into {} \"{}\"",
                run.len(),
                commit.short_hash(),
                commit.subject()
            );
        }
        _ => println!("Squashed {} WIP commit(s).", run.len()),
    }
    Ok(())
}

/// Pick the commit message: override > single-commit strip > AI > fallback.
/// The AI collaborator is only consulted when config and flags allow it and
/// the `claude` binary is actually reachable.
fn resolve_message(
    run: &WipRun,
    override_message: Option<&str>,
    no_ai: bool,
    config: &WispConfig,
) -> anyhow::Result<String> {
    let wants_ai = !no_ai
        && config.auto_generate_message
        && run.len() > 1
        && override_message.map_or(true, |m| m.trim().is_empty());

    let generator = if wants_ai {
        let gen = ClaudeCliGenerator::new();
        match gen.verify_available() {
            Ok(()) => Some(gen),
            Err(e) => {
                tracing::debug!("AI collaborator unavailable: {e}");
                None
            }
        }
    } else {
        None
    };

    let rt = tokio::runtime::Runtime::new()?;
    Ok(rt.block_on(synth::synthesize(
        run,
        override_message,
        generator.as_ref().map(|g| g as &dyn MessageGenerator),
    )))
}

fn print_preview(run: &WipRun, message: &str) {
    println!("Squashing {} WIP commit(s):", run.len());
    for c in &run.commits {
        println!("  {} {}", c.short_hash(), c.subject());
    }
    match &run.base {
        Some(base) => println!("onto {} \"{}\"", base.short_hash(), base.subject()),
        None => println!("replacing the entire history (run extends to root)"),
    }
    println!("\nMessage:");
    for line in message.lines() {
        println!("  {line}");
    }
    println!();
}
