use std::path::Path;
use wisp_core::config::WispConfig;
use wisp_git::{inspect, GitRunner};
use wisp_squash::generator::ClaudeCliGenerator;

/// One environment check. `required: false` marks checks the tool can work
/// without (the fallback synthesis path needs no AI collaborator).
#[derive(Debug)]
pub struct DiagnosticCheck {
    pub name: &'static str,
    pub passed: bool,
    pub detail: Option<String>,
    pub required: bool,
}

/// Accumulated check results, returned to the caller — tallies are computed,
/// never kept as running mutable counters.
#[derive(Debug, Default)]
pub struct DiagnosticReport {
    pub checks: Vec<DiagnosticCheck>,
}

impl DiagnosticReport {
    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }

    pub fn failed_count(&self) -> usize {
        self.checks.len() - self.passed_count()
    }

    pub fn has_required_failure(&self) -> bool {
        self.checks.iter().any(|c| c.required && !c.passed)
    }
}

pub fn execute(cwd: &Path) -> anyhow::Result<()> {
    let report = run_checks(cwd);

    for check in &report.checks {
        let mark = if check.passed {
            "ok  "
        } else if check.required {
            "FAIL"
        } else {
            "warn"
        };
        match &check.detail {
            Some(detail) => println!("{mark} {} — {detail}", check.name),
            None => println!("{mark} {}", check.name),
        }
    }
    println!(
        "\n{} passed, {} failed",
        report.passed_count(),
        report.failed_count()
    );

    if report.has_required_failure() {
        anyhow::bail!("environment is not usable");
    }
    Ok(())
}

fn run_checks(cwd: &Path) -> DiagnosticReport {
    let git = GitRunner::new(cwd);
    let mut report = DiagnosticReport::default();

    let git_version = git.run(&["--version"]);
    report.checks.push(DiagnosticCheck {
        name: "git binary",
        passed: git_version.is_ok(),
        detail: git_version.ok(),
        required: true,
    });

    report.checks.push(DiagnosticCheck {
        name: "git repository",
        passed: inspect::is_repository(&git),
        detail: Some(cwd.display().to_string()),
        required: true,
    });

    let claude = ClaudeCliGenerator::new().verify_available();
    report.checks.push(DiagnosticCheck {
        name: "claude CLI (AI synthesis)",
        passed: claude.is_ok(),
        detail: claude
            .err()
            .map(|_| "not found — fallback messages will be used".to_string()),
        required: false,
    });

    let config = WispConfig::load(cwd);
    report.checks.push(DiagnosticCheck {
        name: "config (.wisp/config.json)",
        passed: config.is_ok(),
        detail: config.err().map(|e| e.to_string()),
        required: false,
    });

    report
}
