//! Configuration management with file persistence

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Graphloom configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub llm: LlmConfig,
    pub pipeline: PipelineConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(skip)]
    pub api_key: Option<String>,
    pub default_model: String,
    pub fallback_models: Vec<String>,
    pub temperature: f32,
    pub max_tokens: usize,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Refinement loop iteration budget
    pub max_iterations: usize,
    /// Characters of the source document handed to the extraction step
    pub text_preview_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path of the persisted knowledge-base file; defaults to the
    /// platform data directory when unset
    pub knowledge_base: Option<PathBuf>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_model: "google/gemini-2.0-flash-001".to_string(),
            fallback_models: vec![
                "anthropic/claude-3-5-haiku-latest".to_string(),
                "openai/gpt-4o-mini".to_string(),
            ],
            temperature: 0.7,
            max_tokens: 8192,
            timeout_secs: 120,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            pipeline: PipelineConfig {
                max_iterations: 5,
                text_preview_chars: 6000,
            },
            store: StoreConfig {
                knowledge_base: None,
            },
        }
    }
}

impl LlmConfig {
    pub fn resolved_api_key(&self) -> anyhow::Result<Option<String>> {
        self.enforce_env_only()?;

        Ok(env::var("GRAPHLOOM_API_KEY")
            .or_else(|_| env::var("OPENROUTER_API_KEY"))
            .ok())
    }

    pub fn redacted_api_key(&self) -> anyhow::Result<Option<String>> {
        self.resolved_api_key().map(|opt| {
            opt.map(|key| {
                if key.len() <= 4 {
                    "***".to_string()
                } else {
                    let suffix = &key[key.len() - 4..];
                    format!("***{}", suffix)
                }
            })
        })
    }

    pub fn enforce_env_only(&self) -> anyhow::Result<()> {
        if self.api_key.is_some() {
            return Err(anyhow!(
                "LLM API keys must be provided via environment variables, not stored in configuration"
            ));
        }
        Ok(())
    }
}

impl StoreConfig {
    /// Resolve the knowledge-base path, falling back to the platform
    /// data directory
    pub fn resolved_path(&self) -> anyhow::Result<PathBuf> {
        if let Some(path) = &self.knowledge_base {
            return Ok(path.clone());
        }
        let dir = dirs::data_dir()
            .ok_or_else(|| anyhow!("Could not determine data directory"))?
            .join("graphloom");
        Ok(dir.join("knowledge.ttl"))
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        let dir = if let Ok(custom_dir) = env::var("GRAPHLOOM_CONFIG_DIR") {
            PathBuf::from(custom_dir)
        } else {
            dirs::config_dir()
                .ok_or_else(|| anyhow!("Could not determine config directory"))?
                .join("graphloom")
        };
        Ok(dir)
    }

    /// Get the config file path
    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from file, or create default if it doesn't exist
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: Config = toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            config.validate()?;
            Ok(config)
        } else {
            // Return default config without creating file
            Ok(Config::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> anyhow::Result<()> {
        self.validate()?;

        let dir = Self::config_dir()?;
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;

        let path = Self::config_path()?;
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        self.llm.enforce_env_only()?;
        if self.pipeline.max_iterations == 0 {
            return Err(anyhow!("pipeline.max_iterations must be at least 1"));
        }
        Ok(())
    }

    /// Get a configuration value by key
    pub fn get(&self, key: &str) -> anyhow::Result<String> {
        match key {
            // LLM settings
            "llm.default_model" => Ok(self.llm.default_model.clone()),
            "llm.fallback_models" => Ok(self.llm.fallback_models.join(", ")),
            "llm.temperature" => Ok(self.llm.temperature.to_string()),
            "llm.max_tokens" => Ok(self.llm.max_tokens.to_string()),
            "llm.timeout_secs" => Ok(self.llm.timeout_secs.to_string()),

            // Pipeline settings
            "pipeline.max_iterations" => Ok(self.pipeline.max_iterations.to_string()),
            "pipeline.text_preview_chars" => Ok(self.pipeline.text_preview_chars.to_string()),

            // Store settings
            "store.knowledge_base" => Ok(self
                .store
                .resolved_path()
                .map(|p| p.display().to_string())?),

            // API key (special handling - show redacted)
            "llm.api_key" | "api_key" => match self.llm.redacted_api_key()? {
                Some(redacted) => Ok(redacted),
                None => Ok(
                    "(not set - use GRAPHLOOM_API_KEY or OPENROUTER_API_KEY env var)".to_string(),
                ),
            },

            _ => Err(anyhow!(
                "Unknown configuration key: {}. Use `graphloom config list` to see available keys.",
                key
            )),
        }
    }

    /// Set a configuration value by key
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            // LLM settings
            "llm.default_model" => {
                self.llm.default_model = value.to_string();
            }
            "llm.fallback_models" => {
                self.llm.fallback_models = value
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
            }
            "llm.temperature" => {
                let temp: f32 = value
                    .parse()
                    .with_context(|| format!("Invalid temperature value: {}", value))?;
                if !(0.0..=2.0).contains(&temp) {
                    return Err(anyhow!("Temperature must be between 0.0 and 2.0"));
                }
                self.llm.temperature = temp;
            }
            "llm.max_tokens" => {
                self.llm.max_tokens = value
                    .parse()
                    .with_context(|| format!("Invalid max_tokens value: {}", value))?;
            }
            "llm.timeout_secs" => {
                self.llm.timeout_secs = value
                    .parse()
                    .with_context(|| format!("Invalid timeout_secs value: {}", value))?;
            }

            // Pipeline settings
            "pipeline.max_iterations" => {
                let iterations: usize = value
                    .parse()
                    .with_context(|| format!("Invalid max_iterations value: {}", value))?;
                if iterations == 0 {
                    return Err(anyhow!("max_iterations must be at least 1"));
                }
                self.pipeline.max_iterations = iterations;
            }
            "pipeline.text_preview_chars" => {
                self.pipeline.text_preview_chars = value
                    .parse()
                    .with_context(|| format!("Invalid text_preview_chars value: {}", value))?;
            }

            // Store settings
            "store.knowledge_base" => {
                self.store.knowledge_base = Some(PathBuf::from(value));
            }

            // API key cannot be set via config
            "llm.api_key" | "api_key" => {
                return Err(anyhow!(
                    "API keys cannot be stored in configuration for security. \
                     Set the GRAPHLOOM_API_KEY or OPENROUTER_API_KEY environment variable instead."
                ));
            }

            _ => {
                return Err(anyhow!(
                    "Unknown configuration key: {}. Use `graphloom config list` to see available keys.",
                    key
                ));
            }
        }
        Ok(())
    }

    /// List all configuration keys and their values
    pub fn list(&self) -> anyhow::Result<Vec<(String, String)>> {
        let keys = vec![
            "llm.default_model",
            "llm.fallback_models",
            "llm.temperature",
            "llm.max_tokens",
            "llm.timeout_secs",
            "llm.api_key",
            "pipeline.max_iterations",
            "pipeline.text_preview_chars",
            "store.knowledge_base",
        ];

        keys.into_iter()
            .map(|key| {
                let value = self.get(key)?;
                Ok((key.to_string(), value))
            })
            .collect()
    }

    /// Reset configuration to defaults
    pub fn reset() -> anyhow::Result<()> {
        let path = Self::config_path()?;
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove config file: {}", path.display()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.pipeline.max_iterations, 5);
        assert_eq!(config.pipeline.text_preview_chars, 6000);
        assert!(config.store.knowledge_base.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_get_and_set_pipeline_keys() {
        let mut config = Config::default();
        config.set("pipeline.max_iterations", "3").unwrap();
        assert_eq!(config.get("pipeline.max_iterations").unwrap(), "3");

        assert!(config.set("pipeline.max_iterations", "0").is_err());
        assert!(config.set("pipeline.max_iterations", "many").is_err());
    }

    #[test]
    fn test_set_rejects_api_key() {
        let mut config = Config::default();
        assert!(config.set("llm.api_key", "secret").is_err());
    }

    #[test]
    fn test_unknown_key() {
        let config = Config::default();
        assert!(config.get("nope.nothing").is_err());
    }

    #[test]
    fn test_store_path_explicit() {
        let mut config = Config::default();
        config.set("store.knowledge_base", "/tmp/kb.ttl").unwrap();
        assert_eq!(
            config.store.resolved_path().unwrap(),
            PathBuf::from("/tmp/kb.ttl")
        );
    }

    #[test]
    fn test_config_roundtrip_toml() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.llm.default_model, config.llm.default_model);
        assert_eq!(parsed.pipeline.max_iterations, 5);
    }
}
