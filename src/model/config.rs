use serde::Deserialize;
use std::fs;
use std::path::Path;

const ENV_CONFIG_PATH: &str = "CLAIM_INTEL_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

fn default_fast_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_summary_model() -> String {
    "gpt-4o".to_string()
}

fn default_max_results() -> usize {
    10
}

/// Model selection for the four LLM-backed operations.
///
/// Query refinement, stance classification and claim breakdown default to a
/// small fast model; summary synthesis gets the larger one.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelsConfig {
    #[serde(default = "default_fast_model")]
    pub refine: String,
    #[serde(default = "default_fast_model")]
    pub classify: String,
    #[serde(default = "default_fast_model")]
    pub breakdown: String,
    #[serde(default = "default_summary_model")]
    pub summarize: String,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            refine: default_fast_model(),
            classify: default_fast_model(),
            breakdown: default_fast_model(),
            summarize: default_summary_model(),
        }
    }
}

/// Literature search configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Maximum number of PubMed ids requested per search. Also bounds the
    /// classification fan-out width.
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
        }
    }
}

/// YAML configuration file structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub models: ModelsConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub models: ModelsConfig,
    pub search: SearchConfig,
    pub port: u16,
    pub host: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            models: ModelsConfig::default(),
            search: SearchConfig::default(),
            port: 8080,
            host: "127.0.0.1".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment and config file
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let config_path =
            std::env::var(ENV_CONFIG_PATH).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let file = Self::load_config_file(&config_path).unwrap_or_default();

        Self {
            models: file.models,
            search: file.search,
            port,
            host,
        }
    }

    /// Load configuration from YAML file
    fn load_config_file(path: &str) -> Option<ConfigFile> {
        let path = Path::new(path);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => {
                // Handle empty file
                let contents = contents.trim();
                if contents.is_empty() {
                    tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
                    return Some(ConfigFile::default());
                }

                match serde_yaml::from_str(contents) {
                    Ok(config) => {
                        tracing::info!(path = %path.display(), "Loaded configuration from file");
                        Some(config)
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Failed to parse config file, using defaults");
                        None
                    }
                }
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read config file, using defaults");
                None
            }
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_models() {
        let models = ModelsConfig::default();
        assert_eq!(models.refine, "gpt-4o-mini");
        assert_eq!(models.classify, "gpt-4o-mini");
        assert_eq!(models.breakdown, "gpt-4o-mini");
        assert_eq!(models.summarize, "gpt-4o");
    }

    #[test]
    fn config_file_partial_yaml() {
        let file: ConfigFile = serde_yaml::from_str(
            r#"
models:
  summarize: gpt-4-turbo
search:
  max_results: 5
"#,
        )
        .unwrap();

        assert_eq!(file.models.summarize, "gpt-4-turbo");
        assert_eq!(file.models.classify, "gpt-4o-mini");
        assert_eq!(file.search.max_results, 5);
    }
}
