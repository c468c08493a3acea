use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Workspace config, read from `.wisp/config.json`. Missing file → defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WispConfig {
    /// Ask the AI collaborator to synthesize the squash message when no
    /// override is given. Off → the deterministic fallback is used directly.
    #[serde(default = "default_true")]
    pub auto_generate_message: bool,
    /// Print the WIP run and the chosen message before rewriting history.
    #[serde(default = "default_true")]
    pub show_preview: bool,
}

fn default_true() -> bool {
    true
}

impl Default for WispConfig {
    fn default() -> Self {
        Self {
            auto_generate_message: true,
            show_preview: true,
        }
    }
}

/// Path to the config file under a repository root.
pub fn config_path(repo_root: &Path) -> PathBuf {
    repo_root.join(".wisp").join("config.json")
}

impl WispConfig {
    pub fn load(repo_root: &Path) -> anyhow::Result<Self> {
        let path = config_path(repo_root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Best-effort load for the squash path: a malformed config file must not
    /// block an otherwise-valid consolidation.
    pub fn load_or_default(repo_root: &Path) -> Self {
        match Self::load(repo_root) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::debug!("config load failed, using defaults: {e}");
                Self::default()
            }
        }
    }
}

/// Read the raw config map. Returns empty map if the file doesn't exist.
pub fn read_map(repo_root: &Path) -> anyhow::Result<serde_json::Map<String, serde_json::Value>> {
    let path = config_path(repo_root);
    if !path.exists() {
        return Ok(serde_json::Map::new());
    }
    let content = std::fs::read_to_string(&path)?;
    let val: serde_json::Value = serde_json::from_str(&content)?;
    match val {
        serde_json::Value::Object(map) => Ok(map),
        _ => Ok(serde_json::Map::new()),
    }
}

/// Write the raw config map atomically.
pub fn write_map(
    repo_root: &Path,
    map: &serde_json::Map<String, serde_json::Value>,
) -> anyhow::Result<()> {
    let path = config_path(repo_root);
    let json = serde_json::to_string_pretty(map)?;
    write_atomic(&path, json.as_bytes())
}

/// Parse a string value into an appropriate JSON value (bool/number/string).
pub fn parse_value(s: &str) -> serde_json::Value {
    match s {
        "true" => serde_json::Value::Bool(true),
        "false" => serde_json::Value::Bool(false),
        _ => {
            if let Ok(n) = s.parse::<i64>() {
                serde_json::Value::Number(n.into())
            } else if let Ok(f) = s.parse::<f64>() {
                serde_json::json!(f)
            } else {
                serde_json::Value::String(s.to_string())
            }
        }
    }
}

fn write_atomic(path: &Path, data: &[u8]) -> anyhow::Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("no parent dir for {}", path.display()))?;
    std::fs::create_dir_all(parent)?;
    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(data)?;
    tmp.flush()?;
    tmp.persist(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = WispConfig::load(tmp.path()).unwrap();
        assert!(cfg.auto_generate_message);
        assert!(cfg.show_preview);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join(".wisp");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("config.json"), r#"{"show_preview": false}"#).unwrap();

        let cfg = WispConfig::load(tmp.path()).unwrap();
        assert!(cfg.auto_generate_message);
        assert!(!cfg.show_preview);
    }

    #[test]
    fn malformed_file_degrades_to_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join(".wisp");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("config.json"), "not json").unwrap();

        assert!(WispConfig::load(tmp.path()).is_err());
        let cfg = WispConfig::load_or_default(tmp.path());
        assert!(cfg.show_preview);
    }

    #[test]
    fn map_roundtrip_preserves_unknown_keys() {
        let tmp = tempfile::tempdir().unwrap();
        let mut map = serde_json::Map::new();
        map.insert("show_preview".into(), serde_json::Value::Bool(false));
        map.insert("custom_key".into(), serde_json::json!(42));
        write_map(tmp.path(), &map).unwrap();

        let restored = read_map(tmp.path()).unwrap();
        assert_eq!(restored.get("custom_key"), Some(&serde_json::json!(42)));
        // Typed load still works alongside the unknown key
        let cfg = WispConfig::load(tmp.path()).unwrap();
        assert!(!cfg.show_preview);
    }

    #[test]
    fn parse_value_types() {
        assert_eq!(parse_value("true"), serde_json::Value::Bool(true));
        assert_eq!(parse_value("7"), serde_json::json!(7));
        assert_eq!(parse_value("hi"), serde_json::json!("hi"));
    }
}
