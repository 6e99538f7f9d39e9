use anyhow::{anyhow, Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_HOSTED_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_HOSTED_MODEL: &str = "gpt-4";
pub const DEFAULT_LOCAL_URL: &str = "http://localhost:1234/v1/chat/completions";
pub const DEFAULT_LOCAL_MODEL: &str = "model-identifier";

/// Value written by `--init`; never accepted as a real key.
pub const PLACEHOLDER_API_KEY: &str = "changeme";

pub const ENV_CONFIG_PATH: &str = "BASHGPT_CONFIG";
pub const ENV_API_KEY: &str = "bashGPT4_API_KEY";
pub const ENV_BASE_URL: &str = "BASHGPT_BASE_URL";
pub const ENV_MODEL: &str = "BASHGPT_MODEL";
pub const ENV_LOCAL_URL: &str = "BASHGPT_LOCAL_URL";
pub const ENV_LOCAL_MODEL: &str = "BASHGPT_LOCAL_MODEL";

/// Config file structure. Every field is optional; env vars win over it.
#[derive(Debug, Default, Serialize, Deserialize, Clone)]
pub struct FileConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosted: Option<HostedConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local: Option<LocalConfig>,
}

#[derive(Debug, Default, Serialize, Deserialize, Clone)]
pub struct HostedConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, Clone)]
pub struct LocalConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalSettings {
    pub url: String,
    pub model: String,
}

/// Provider resolved after merging env + file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderSettings {
    Hosted(HostedSettings),
    Local(LocalSettings),
}

pub fn find_config_path() -> PathBuf {
    if let Some(path) = non_empty(env::var(ENV_CONFIG_PATH).ok()) {
        return PathBuf::from(path);
    }
    let base = config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("bashgpt").join("config.yaml")
}

pub fn load_config(path: &Path) -> Result<FileConfig> {
    if !path.exists() {
        return Ok(FileConfig::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    if content.trim().is_empty() {
        return Ok(FileConfig::default());
    }
    let cfg: FileConfig = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config YAML {}", path.display()))?;
    Ok(cfg)
}

/// Merges `file` with the overrides `lookup` returns for the `ENV_*` keys.
pub fn resolve_provider_with<F>(file: FileConfig, use_local: bool, lookup: F) -> Result<ProviderSettings>
where
    F: Fn(&str) -> Option<String>,
{
    let env_or = |file_value: Option<String>, key: &str| non_empty(lookup(key)).or(non_empty(file_value));

    if use_local {
        let local = file.local.unwrap_or_default();
        return Ok(ProviderSettings::Local(LocalSettings {
            url: env_or(local.url, ENV_LOCAL_URL).unwrap_or_else(|| DEFAULT_LOCAL_URL.to_string()),
            model: env_or(local.model, ENV_LOCAL_MODEL)
                .unwrap_or_else(|| DEFAULT_LOCAL_MODEL.to_string()),
        }));
    }

    let hosted = file.hosted.unwrap_or_default();
    let api_key = env_or(hosted.api_key, ENV_API_KEY).ok_or_else(|| {
        anyhow!(
            "No API key configured for the hosted provider: set {} or hosted.api_key in the config file",
            ENV_API_KEY
        )
    })?;
    if api_key.trim() == PLACEHOLDER_API_KEY {
        return Err(anyhow!(
            "The hosted API key is still the '{}' placeholder: set {} or edit hosted.api_key in the config file",
            PLACEHOLDER_API_KEY,
            ENV_API_KEY
        ));
    }

    Ok(ProviderSettings::Hosted(HostedSettings {
        api_key,
        base_url: env_or(hosted.base_url, ENV_BASE_URL)
            .unwrap_or_else(|| DEFAULT_HOSTED_BASE_URL.to_string()),
        model: env_or(hosted.model, ENV_MODEL).unwrap_or_else(|| DEFAULT_HOSTED_MODEL.to_string()),
    }))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
