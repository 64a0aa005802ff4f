//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.parley/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.
//! Everything is read once at startup.

use log::{debug, info, warn};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ParleyConfig {
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AgentConfig {
    pub endpoint_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct UiConfig {
    pub title: Option<String>,
    pub placeholder: Option<String>,
    pub thinking_text: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

/// Environment variable holding the agent endpoint URL.
pub const ENDPOINT_ENV_VAR: &str = "AGENT_ENDPOINT_URL";

pub const DEFAULT_TITLE: &str = "Agent Chat";
pub const DEFAULT_PLACEHOLDER: &str = "How can I help you today?";
pub const DEFAULT_THINKING_TEXT: &str = "The agent is thinking...";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub endpoint_url: Url,
    pub title: String,
    pub placeholder: String,
    pub thinking_text: String,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    /// No endpoint from the CLI, the environment or the config file.
    MissingEndpoint,
    /// The endpoint is not an absolute http(s) URL.
    InvalidEndpoint(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
            ConfigError::MissingEndpoint => write!(
                f,
                "no agent endpoint configured (use --endpoint, {ENDPOINT_ENV_VAR}, or [agent] endpoint_url)"
            ),
            ConfigError::InvalidEndpoint(msg) => write!(f, "invalid agent endpoint: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.parley/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".parley").join("config.toml"))
}

/// Load config from `~/.parley/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `ParleyConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<ParleyConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(ParleyConfig::default());
        }
    };

    load_config_from(&path)
}

fn load_config_from(path: &Path) -> Result<ParleyConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(ParleyConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: ParleyConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Parley Configuration
# All settings are optional except the agent endpoint, which may also come
# from the AGENT_ENDPOINT_URL env var (or a .env file) or --endpoint.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [agent]
# endpoint_url = "https://example.lambda-url.us-east-2.on.aws/"

# [ui]
# title = "Agent Chat"
# placeholder = "How can I help you today?"
# thinking_text = "The agent is thinking..."
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_endpoint` is the `--endpoint` flag (None = not specified).
pub fn resolve(
    config: &ParleyConfig,
    cli_endpoint: Option<&str>,
) -> Result<ResolvedConfig, ConfigError> {
    resolve_with_env(config, cli_endpoint, std::env::var(ENDPOINT_ENV_VAR).ok())
}

/// Same as [`resolve`], with the environment value passed in explicitly.
pub fn resolve_with_env(
    config: &ParleyConfig,
    cli_endpoint: Option<&str>,
    env_endpoint: Option<String>,
) -> Result<ResolvedConfig, ConfigError> {
    // Endpoint: CLI → env → config
    let raw_endpoint = cli_endpoint
        .map(|s| s.to_string())
        .or(env_endpoint)
        .or_else(|| config.agent.endpoint_url.clone())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or(ConfigError::MissingEndpoint)?;

    let endpoint_url = parse_endpoint(&raw_endpoint)?;

    Ok(ResolvedConfig {
        endpoint_url,
        title: config
            .ui
            .title
            .clone()
            .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        placeholder: config
            .ui
            .placeholder
            .clone()
            .unwrap_or_else(|| DEFAULT_PLACEHOLDER.to_string()),
        thinking_text: config
            .ui
            .thinking_text
            .clone()
            .unwrap_or_else(|| DEFAULT_THINKING_TEXT.to_string()),
    })
}

fn parse_endpoint(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidEndpoint(format!("{raw}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidEndpoint(format!(
            "{raw}: unsupported scheme '{other}'"
        ))),
    }
}
