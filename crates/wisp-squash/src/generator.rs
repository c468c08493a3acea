use anyhow::Result;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

/// Trait for the external text-generation collaborator. Implemented by
/// MockGenerator (tests) and ClaudeCliGenerator (real).
///
/// The only contract is "may take arbitrarily long or fail" — timeout and
/// retry live in the caller, not here.
#[async_trait::async_trait]
pub trait MessageGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Generates text by spawning `claude -p <prompt>`.
pub struct ClaudeCliGenerator {
    pub claude_bin: PathBuf,
}

impl Default for ClaudeCliGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaudeCliGenerator {
    pub fn new() -> Self {
        Self {
            claude_bin: PathBuf::from("claude"),
        }
    }

    pub fn with_bin(claude_bin: PathBuf) -> Self {
        Self { claude_bin }
    }

    /// Check that the Claude CLI binary is reachable.
    pub fn verify_available(&self) -> Result<()> {
        let status = std::process::Command::new(&self.claude_bin)
            .arg("--version")
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status();
        match status {
            Ok(s) if s.success() => Ok(()),
            _ => anyhow::bail!(
                "Claude CLI not found (looked for {:?}).\n\
                 Install: npm install -g @anthropic-ai/claude-code",
                self.claude_bin
            ),
        }
    }
}

#[async_trait::async_trait]
impl MessageGenerator for ClaudeCliGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let output = tokio::process::Command::new(&self.claude_bin)
            .arg("-p")
            .arg(prompt)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("claude exited non-zero: {}", stderr.trim());
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if text.is_empty() {
            anyhow::bail!("claude returned empty output");
        }
        Ok(text)
    }
}

/// Mock generator for testing. Pops queued responses on each call; an
/// exhausted queue yields a default message. An optional delay simulates a
/// slow collaborator for timeout tests.
pub struct MockGenerator {
    delay: Option<Duration>,
    responses: std::sync::Mutex<VecDeque<Result<String, String>>>,
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGenerator {
    pub fn new() -> Self {
        Self {
            delay: None,
            responses: std::sync::Mutex::new(VecDeque::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn push_ok(&self, text: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(text.to_string()));
    }

    pub fn push_err(&self, error: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(error.to_string()));
    }
}

#[async_trait::async_trait]
impl MessageGenerator for MockGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(Ok(text)) => Ok(text),
            Some(Err(e)) => anyhow::bail!("{e}"),
            None => Ok("(mock) generated message".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_returns_default_when_exhausted() {
        let gen = MockGenerator::new();
        let text = gen.generate("prompt").await.unwrap();
        assert!(text.contains("(mock)"));
    }

    #[tokio::test]
    async fn mock_pops_sequential_responses() {
        let gen = MockGenerator::new();
        gen.push_err("boom");
        gen.push_ok("second try");

        assert!(gen.generate("p").await.is_err());
        assert_eq!(gen.generate("p").await.unwrap(), "second try");
    }

    #[test]
    fn verify_available_fails_for_missing_binary() {
        let gen = ClaudeCliGenerator::with_bin(PathBuf::from("/no/such/claude-bin"));
        assert!(gen.verify_available().is_err());
    }
}
