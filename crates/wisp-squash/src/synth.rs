use crate::generator::MessageGenerator;
use std::time::Duration;
use wisp_core::WipRun;

/// Bounded attempts against the text-generation collaborator.
pub const GEN_ATTEMPTS: u32 = 3;
/// Per-attempt timeout.
pub const GEN_TIMEOUT: Duration = Duration::from_secs(30);

/// Tagged outcome of the bounded-attempt loop.
#[derive(Debug)]
pub enum GenOutcome {
    Ok(String),
    TimedOut,
    Failed(String),
}

/// Produce the consolidated commit message for a WIP run.
///
/// Priority: a non-empty override is returned verbatim; a single-commit run
/// yields its de-prefixed message; otherwise the collaborator is asked, and
/// [`fallback_message`] backstops every failure path. Pass `generator: None`
/// to skip the collaborator entirely (config `auto_generate_message = false`).
pub async fn synthesize(
    run: &WipRun,
    override_message: Option<&str>,
    generator: Option<&dyn MessageGenerator>,
) -> String {
    if let Some(msg) = override_message {
        if !msg.trim().is_empty() {
            return msg.to_string();
        }
    }

    if run.len() == 1 {
        let subject = run.newest().map(|c| c.subject()).unwrap_or("");
        if !subject.is_empty() {
            return subject.to_string();
        }
        return fallback_message(run);
    }

    let Some(generator) = generator else {
        return fallback_message(run);
    };

    let prompt = build_prompt(run);
    match generate_with_retry(generator, &prompt, GEN_ATTEMPTS, GEN_TIMEOUT).await {
        GenOutcome::Ok(text) => {
            let text = text.trim().to_string();
            if text.is_empty() {
                fallback_message(run)
            } else {
                text
            }
        }
        GenOutcome::TimedOut => {
            tracing::debug!("message generation timed out, using fallback");
            fallback_message(run)
        }
        GenOutcome::Failed(reason) => {
            tracing::debug!("message generation failed ({reason}), using fallback");
            fallback_message(run)
        }
    }
}

/// Run the collaborator with bounded attempts, a per-attempt timeout, and
/// linear backoff (attempt × 1 s) between attempts.
///
/// The timeout is a race: the generation future against a sleep, first to
/// complete wins. The collaborator cannot be cancelled — on timeout the
/// in-flight future is dropped, the spawned subprocess may keep running in
/// the background, and whatever it eventually prints is discarded.
pub async fn generate_with_retry(
    generator: &dyn MessageGenerator,
    prompt: &str,
    attempts: u32,
    timeout: Duration,
) -> GenOutcome {
    let mut last = GenOutcome::Failed("no attempts made".to_string());
    for attempt in 1..=attempts {
        if attempt > 1 {
            // Linear backoff: one second per attempt already spent
            tokio::time::sleep(Duration::from_secs(u64::from(attempt - 1))).await;
        }

        last = tokio::select! {
            result = generator.generate(prompt) => match result {
                Ok(text) => return GenOutcome::Ok(text),
                Err(e) => GenOutcome::Failed(e.to_string()),
            },
            _ = tokio::time::sleep(timeout) => GenOutcome::TimedOut,
        };
        tracing::debug!("generation attempt {attempt}/{attempts}: {last:?}");
    }
    last
}

/// Prompt enumerating each commit's de-prefixed message, oldest first, with
/// index and timestamp.
pub fn build_prompt(run: &WipRun) -> String {
    let mut lines = vec![
        format!(
            "Summarize the following {} work-in-progress checkpoints into a \
             single concise git commit message. Respond with the message only.",
            run.len()
        ),
        String::new(),
    ];
    for (idx, commit) in run.commits.iter().rev().enumerate() {
        lines.push(format!(
            "{}. [{}] {}",
            idx + 1,
            format_timestamp(commit.timestamp),
            commit.subject()
        ));
    }
    lines.join("\n")
}

fn format_timestamp(unix: i64) -> String {
    time::OffsetDateTime::from_unix_timestamp(unix)
        .ok()
        .and_then(|t| t.format(&time::format_description::well_known::Rfc3339).ok())
        .unwrap_or_else(|| unix.to_string())
}

const HEADLINE_LIMIT: usize = 50;

/// Deterministic fallback: the newest commit's de-prefixed message as the
/// headline, remaining messages as a bulleted block. Pure function of the
/// run, always non-empty.
pub fn fallback_message(run: &WipRun) -> String {
    let headline = run.newest().map(|c| c.subject()).unwrap_or("");
    let mut headline = truncate_headline(headline);
    if headline.is_empty() {
        headline = "wip checkpoint".to_string();
    }

    let details: Vec<String> = run
        .commits
        .iter()
        .skip(1)
        .map(|c| format!("- {}", c.subject()))
        .collect();

    if details.is_empty() {
        headline
    } else {
        format!("{headline}\n\n{}", details.join("\n"))
    }
}

fn truncate_headline(text: &str) -> String {
    let mut out = String::new();
    for (idx, ch) in text.chars().enumerate() {
        if idx >= HEADLINE_LIMIT {
            out.push('…');
            break;
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::MockGenerator;
    use wisp_core::Commit;

    fn commit(hash: &str, message: &str) -> Commit {
        Commit {
            hash: hash.to_string(),
            timestamp: 1_700_000_000,
            message: message.to_string(),
        }
    }

    fn run_of(messages: &[&str]) -> WipRun {
        WipRun {
            commits: messages
                .iter()
                .enumerate()
                .map(|(i, m)| commit(&format!("h{i}"), m))
                .collect(),
            base: None,
        }
    }

    #[tokio::test]
    async fn override_wins_over_everything() {
        let run = run_of(&["[AUTO-WIP] a", "[AUTO-WIP] b"]);
        let gen = MockGenerator::new();
        gen.push_ok("ai message");
        let msg = synthesize(&run, Some("feature X"), Some(&gen)).await;
        assert_eq!(msg, "feature X");
    }

    #[tokio::test]
    async fn blank_override_is_ignored() {
        let run = run_of(&["[AUTO-WIP] fix bug"]);
        let msg = synthesize(&run, Some("   "), None).await;
        assert_eq!(msg, "fix bug");
    }

    #[tokio::test]
    async fn single_commit_strips_marker() {
        let run = run_of(&["[AUTO-WIP] fix bug"]);
        let msg = synthesize(&run, None, None).await;
        assert_eq!(msg, "fix bug");
    }

    #[tokio::test]
    async fn single_bare_marker_still_yields_message() {
        let run = run_of(&["[AUTO-WIP]"]);
        let msg = synthesize(&run, None, None).await;
        assert_eq!(msg, "wip checkpoint");
    }

    #[tokio::test]
    async fn multi_commit_uses_generator() {
        let run = run_of(&["[AUTO-WIP] b", "[AUTO-WIP] a"]);
        let gen = MockGenerator::new();
        gen.push_ok("implement the feature");
        let msg = synthesize(&run, None, Some(&gen)).await;
        assert_eq!(msg, "implement the feature");
    }

    #[tokio::test]
    async fn generator_failures_fall_back() {
        let run = run_of(&["[AUTO-WIP] newest", "[AUTO-WIP] older"]);
        let gen = MockGenerator::new();
        gen.push_err("down");
        gen.push_err("still down");
        gen.push_err("gone");
        let msg = synthesize(&run, None, Some(&gen)).await;
        assert!(msg.starts_with("newest"));
        assert!(msg.contains("- older"));
    }

    #[tokio::test]
    async fn no_generator_falls_back() {
        let run = run_of(&["[AUTO-WIP] newest", "[AUTO-WIP] older"]);
        let msg = synthesize(&run, None, None).await;
        assert!(msg.starts_with("newest"));
    }

    #[tokio::test]
    async fn retry_recovers_after_one_failure() {
        let gen = MockGenerator::new();
        gen.push_err("transient");
        gen.push_ok("recovered");
        let outcome =
            generate_with_retry(&gen, "p", 3, Duration::from_secs(5)).await;
        assert!(matches!(outcome, GenOutcome::Ok(t) if t == "recovered"));
    }

    #[tokio::test]
    async fn slow_generator_times_out() {
        tokio::time::pause();
        let gen = MockGenerator::new().with_delay(Duration::from_secs(600));
        let handle = tokio::spawn(async move {
            generate_with_retry(&gen, "p", 2, Duration::from_secs(1)).await
        });
        // Paused clock: sleeps auto-advance as the runtime idles
        let outcome = handle.await.unwrap();
        assert!(matches!(outcome, GenOutcome::TimedOut));
    }

    #[test]
    fn fallback_truncates_long_headline() {
        let long = format!("[AUTO-WIP] {}", "x".repeat(80));
        let run = run_of(&[&long]);
        let msg = fallback_message(&run);
        assert_eq!(msg.chars().count(), HEADLINE_LIMIT + 1);
        assert!(msg.ends_with('…'));
    }

    #[test]
    fn fallback_single_commit_has_no_bullets() {
        let run = run_of(&["[AUTO-WIP] only one"]);
        assert_eq!(fallback_message(&run), "only one");
    }

    #[test]
    fn fallback_lists_older_commits() {
        let run = run_of(&["[AUTO-WIP] c", "[AUTO-WIP] b", "[AUTO-WIP] a"]);
        let msg = fallback_message(&run);
        assert_eq!(msg, "c\n\n- b\n- a");
    }

    #[test]
    fn prompt_enumerates_oldest_first() {
        let run = run_of(&["[AUTO-WIP] second", "[AUTO-WIP] first"]);
        let prompt = build_prompt(&run);
        let first_pos = prompt.find("first").unwrap();
        let second_pos = prompt.find("second").unwrap();
        assert!(first_pos < second_pos);
        assert!(prompt.contains("1. "));
        assert!(prompt.contains("2. "));
    }
}
