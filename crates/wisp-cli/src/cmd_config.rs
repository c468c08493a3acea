use clap::Subcommand;
use std::path::Path;
use wisp_core::config;

// ── CLI Schema ──

#[derive(Subcommand)]
pub enum ConfigCmd {
    /// Set a config value
    Set {
        /// Config key (e.g. auto_generate_message)
        key: String,
        /// Config value (true/false/number/string)
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
}

// ── Dispatch ──

pub fn run(cmd: ConfigCmd, repo_root: &Path) -> anyhow::Result<()> {
    match cmd {
        ConfigCmd::Set { key, value } => set(repo_root, &key, &value),
        ConfigCmd::Get { key } => get(repo_root, &key),
        ConfigCmd::List => list(repo_root),
    }
}

// ── Command Implementations ──

/// `wisp config set <key> <value>`
pub fn set(repo_root: &Path, key: &str, value: &str) -> anyhow::Result<()> {
    let mut map = config::read_map(repo_root)?;
    map.insert(key.to_string(), config::parse_value(value));
    config::write_map(repo_root, &map)?;
    println!("{key} = {value}");
    Ok(())
}

/// `wisp config get <key>`
pub fn get(repo_root: &Path, key: &str) -> anyhow::Result<()> {
    let map = config::read_map(repo_root)?;
    match map.get(key) {
        Some(value) => println!("{value}"),
        None => println!("(not set)"),
    }
    Ok(())
}

/// `wisp config list`
pub fn list(repo_root: &Path) -> anyhow::Result<()> {
    let map = config::read_map(repo_root)?;
    if map.is_empty() {
        println!("(empty — defaults apply)");
        return Ok(());
    }
    for (key, value) in &map {
        println!("{key} = {value}");
    }
    Ok(())
}
