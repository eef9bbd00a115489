pub mod schema;

pub use schema::BridgeConfig;

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable holding the gateway base URL.
pub const ENV_GATEWAY_URL: &str = "OPENCLAW_GATEWAY_URL";
/// Environment variable holding the gateway bearer token.
pub const ENV_GATEWAY_TOKEN: &str = "OPENCLAW_GATEWAY_TOKEN";
/// Environment variable holding the request timeout in seconds.
pub const ENV_GATEWAY_TIMEOUT: &str = "OPENCLAW_GATEWAY_TIMEOUT";

/// Default config file location (~/.openclaw/tools-mcp.toml).
pub fn default_config_path() -> PathBuf {
    directories::BaseDirs::new()
        .map(|d| d.home_dir().join(".openclaw").join("tools-mcp.toml"))
        .unwrap_or_else(|| PathBuf::from(".openclaw/tools-mcp.toml"))
}

/// Expand `~` in a user-supplied path.
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

/// Load config from the given path, or return defaults.
pub fn load_config(path: &Path) -> Result<BridgeConfig> {
    if path.exists() {
        let contents =
            std::fs::read_to_string(path).context("Failed to read tools-mcp config file")?;
        let config: BridgeConfig =
            toml::from_str(&contents).context("Failed to parse tools-mcp config (TOML)")?;
        if config.timeout_secs == 0 {
            bail!("timeout_secs must be at least 1 second");
        }
        debug!("Loaded config from {}", path.display());
        Ok(config)
    } else {
        Ok(BridgeConfig::default())
    }
}

/// Save config to the given path (TOML format). Refuses to overwrite.
pub fn save_config(config: &BridgeConfig, path: &Path) -> Result<()> {
    if path.exists() {
        bail!("Config file already exists: {}", path.display());
    }
    let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents).context("Failed to write config file")?;
    Ok(())
}

/// Load `.env` from the working directory. Already-set variables win.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("Ignoring unreadable .env file: {e}"),
    }
}

/// Apply `OPENCLAW_GATEWAY_*` overrides from the process environment.
pub fn apply_env(config: &mut BridgeConfig) -> Result<()> {
    apply_env_with(config, |key| std::env::var(key).ok())
}

/// Apply overrides from an arbitrary lookup. Empty values are ignored.
pub fn apply_env_with<F>(config: &mut BridgeConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(url) = get(ENV_GATEWAY_URL) {
        config.gateway_url = url;
    }
    if let Some(token) = get(ENV_GATEWAY_TOKEN) {
        config.gateway_token = token;
    }
    if let Some(timeout) = get(ENV_GATEWAY_TIMEOUT) {
        let secs: u64 = timeout
            .trim()
            .parse()
            .with_context(|| format!("{ENV_GATEWAY_TIMEOUT} must be whole seconds, got {timeout:?}"))?;
        if secs == 0 {
            bail!("{ENV_GATEWAY_TIMEOUT} must be at least 1 second");
        }
        config.timeout_secs = secs;
    }
    Ok(())
}
