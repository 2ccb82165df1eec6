use crate::error::{AutosalesError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const CONFIG_FILE_NAME: &str = ".autosales.yml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AutosalesConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub llm: LlmSettings,

    #[serde(default)]
    pub data_service: DataServiceSettings,

    #[serde(default)]
    pub router: RouterSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Usually supplied through `OPENAI_API_KEY` rather than the file.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    #[serde(default = "default_llm_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataServiceSettings {
    /// Without a base URL the service runs on the in-memory context store only.
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default = "default_data_service_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouterSettings {
    #[serde(default)]
    pub classifier: ClassifierMode,
}

/// How the router decides which intent a prompt carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierMode {
    Keyword,
    #[default]
    Llm,
}

impl fmt::Display for ClassifierMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassifierMode::Keyword => write!(f, "keyword"),
            ClassifierMode::Llm => write!(f, "llm"),
        }
    }
}

impl FromStr for ClassifierMode {
    type Err = AutosalesError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "keyword" | "keywords" => Ok(ClassifierMode::Keyword),
            "llm" | "ai" => Ok(ClassifierMode::Llm),
            _ => Err(AutosalesError::Config(format!("Invalid classifier: {}", s))),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_llm_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_llm_timeout() -> u64 {
    15
}

fn default_temperature() -> f32 {
    0.7
}

fn default_data_service_timeout() -> u64 {
    5
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_llm_base_url(),
            model: default_model(),
            timeout_secs: default_llm_timeout(),
            temperature: default_temperature(),
        }
    }
}

impl Default for DataServiceSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: default_data_service_timeout(),
        }
    }
}

impl AutosalesConfig {
    /// Loads configuration for the process.
    ///
    /// An explicit path must exist. Otherwise `.autosales.yml` is searched
    /// upward from `start_path`, and defaults are used when none is found.
    /// Environment variables are applied last.
    pub fn load(explicit: Option<&Path>, start_path: &Path) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match Self::find_config_file(start_path) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AutosalesConfig = serde_yaml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    pub fn find_config_file(start_path: &Path) -> Option<PathBuf> {
        let mut current = start_path.to_path_buf();
        loop {
            let config_path = current.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return Some(config_path);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Overrides file values with environment variables read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = lookup("OPENAI_API_KEY") {
            self.llm.api_key = Some(key);
        }
        if let Some(url) = lookup("OPENAI_BASE_URL") {
            self.llm.base_url = url;
        }
        if let Some(model) = lookup("AUTOSALES_MODEL") {
            self.llm.model = model;
        }
        if let Some(url) = lookup("DATA_SERVICE_URL") {
            self.data_service.base_url = Some(url);
        }
        if let Some(mode) = lookup("AUTOSALES_CLASSIFIER") {
            self.router.classifier = mode.parse()?;
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = AutosalesConfig::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.llm.timeout_secs, 15);
        assert_eq!(config.data_service.timeout_secs, 5);
        assert!(config.data_service.base_url.is_none());
        assert_eq!(config.router.classifier, ClassifierMode::Llm);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            "server:\n  port: 9100\nrouter:\n  classifier: keyword\n",
        )
        .unwrap();

        let config = AutosalesConfig::from_file(&path).unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.router.classifier, ClassifierMode::Keyword);
        assert_eq!(config.llm.model, "gpt-4o");
    }

    #[test]
    fn test_find_config_walks_upward() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a/b/c");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(temp_dir.path().join(CONFIG_FILE_NAME), "{}\n").unwrap();

        let found = AutosalesConfig::find_config_file(&nested).unwrap();
        assert_eq!(found, temp_dir.path().join(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("OPENAI_API_KEY", "sk-env"),
            ("DATA_SERVICE_URL", "http://localhost:8080"),
            ("AUTOSALES_CLASSIFIER", "keyword"),
            ("AUTOSALES_MODEL", ""),
        ]
        .into_iter()
        .collect();

        let mut config = AutosalesConfig::default();
        config
            .apply_env(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.llm.api_key.as_deref(), Some("sk-env"));
        assert_eq!(
            config.data_service.base_url.as_deref(),
            Some("http://localhost:8080")
        );
        assert_eq!(config.router.classifier, ClassifierMode::Keyword);
        // Blank values do not override.
        assert_eq!(config.llm.model, "gpt-4o");
    }

    #[test]
    fn test_invalid_classifier_env_is_error() {
        let mut config = AutosalesConfig::default();
        let result = config.apply_env(|key| {
            (key == "AUTOSALES_CLASSIFIER").then(|| "magic".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_save_omits_api_key() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.yml");
        let mut config = AutosalesConfig::default();
        config.llm.api_key = Some("sk-secret".to_string());
        config.save(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains("sk-secret"));
        let reloaded = AutosalesConfig::from_file(&path).unwrap();
        assert!(reloaded.llm.api_key.is_none());
    }
}
