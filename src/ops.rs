use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::Path;

const CONFIG_TEMPLATE: &str = r#"# bashgpt configuration. Environment variables override these values:
#   bashGPT4_API_KEY, BASHGPT_BASE_URL, BASHGPT_MODEL,
#   BASHGPT_LOCAL_URL, BASHGPT_LOCAL_MODEL
hosted:
  api_key: changeme
  model: gpt-4
  # base_url: https://api.openai.com/v1

local:
  url: http://localhost:1234/v1/chat/completions
  model: model-identifier
"#;

pub fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        return Err(anyhow!(
            "Config file already exists at {}. Refusing to overwrite.",
            path.display()
        ));
    }

    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create config directory {}", dir.display()))?;
    }

    fs::write(path, CONFIG_TEMPLATE)
        .with_context(|| format!("Failed to write default config file to {}", path.display()))?;

    println!("Default configuration written to {}", path.display());
    println!("Replace the placeholder API key (or set bashGPT4_API_KEY) before using the hosted API.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{load_config, resolve_provider_with, ProviderSettings};
    use tempfile::TempDir;

    #[test]
    fn writes_template_that_loads_and_refuses_overwrite() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.yaml");

        init_config(&path).unwrap();
        let cfg = load_config(&path).unwrap();

        // The placeholder key must not pass for a real credential.
        let err = resolve_provider_with(cfg.clone(), false, |_| None).unwrap_err();
        assert!(err.to_string().contains("placeholder"));
        assert!(matches!(
            resolve_provider_with(cfg, true, |_| None).unwrap(),
            ProviderSettings::Local(_)
        ));

        let err = init_config(&path).unwrap_err();
        assert!(err.to_string().contains("Refusing to overwrite"));
    }
}
