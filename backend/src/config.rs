//! Configuration for the Kairos dashboard.

use std::env;
use std::path::Path;

use config::{Config as ConfigLoader, ConfigBuilder, Environment, File, Map};
use config::builder::DefaultState;
use serde::Deserialize;

/// Main configuration structure.
///
/// Credentials are optional here: a missing key is reported to the user
/// when the action that needs it runs, not at startup.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub supabase: SupabaseConfig,
    #[serde(default)]
    pub openai: OpenAiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Backend-as-a-service settings. URL and anon key are exposed to the page.
#[derive(Debug, Clone, Deserialize)]
pub struct SupabaseConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub anon_key: Option<String>,
    /// Table holding question/answer rows.
    #[serde(default = "default_table")]
    pub table: String,
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            anon_key: None,
            table: default_table(),
        }
    }
}

/// Completion API settings. The key never leaves the server.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_openai_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_openai_url(),
            model: default_model(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Validated backend-as-a-service credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupabaseCredentials {
    pub url: String,
    pub anon_key: String,
    pub table: String,
}

/// Validated completion API credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenAiCredentials {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required setting: {0}")]
    MissingSetting(&'static str),
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

// Default values
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    3000
}
fn default_table() -> String {
    "learn_requests".to_string()
}
fn default_openai_url() -> String {
    "https://api.openai.com".to_string()
}
fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

/// Blank strings count as absent.
fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Configuration sources (in order of precedence):
    /// 1. `SUPABASE_URL`, `SUPABASE_ANON_KEY`, `OPENAI_API_KEY`
    /// 2. Environment variables (KAIROS__SECTION__KEY format)
    /// 3. The given file, or `config.toml` if present
    /// 4. Built-in defaults
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let vars = env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect();
        Self::load_with_env(path, vars)
    }

    /// Same as [`Config::load`], reading variables from `vars` instead of the process.
    pub fn load_with_env(path: Option<&Path>, vars: Map<String, String>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name("config").required(false),
        };
        let var = |name: &str| vars.get(name).cloned();

        let loader = Self::defaults()?
            .add_source(file)
            .add_source(
                Environment::with_prefix("KAIROS")
                    .separator("__")
                    .try_parsing(true)
                    .source(Some(vars.clone())),
            )
            .set_override_option("supabase.url", var("SUPABASE_URL"))?
            .set_override_option("supabase.anon_key", var("SUPABASE_ANON_KEY"))?
            .set_override_option("openai.api_key", var("OPENAI_API_KEY"))?
            .build()?;

        Ok(loader.try_deserialize()?)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Ok(ConfigLoader::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port() as i64)?
            .set_default("supabase.table", default_table())?
            .set_default("openai.base_url", default_openai_url())?
            .set_default("openai.model", default_model())?
            .set_default("logging.level", default_log_level())?)
    }

    /// Supabase URL and anon key, or the first one that is missing.
    pub fn supabase_credentials(&self) -> Result<SupabaseCredentials, ConfigError> {
        let url = present(&self.supabase.url).ok_or(ConfigError::MissingSetting("supabase.url"))?;
        let anon_key = present(&self.supabase.anon_key)
            .ok_or(ConfigError::MissingSetting("supabase.anon_key"))?;

        Ok(SupabaseCredentials {
            url,
            anon_key,
            table: self.supabase.table.clone(),
        })
    }

    /// Completion API key plus endpoint settings.
    pub fn openai_credentials(&self) -> Result<OpenAiCredentials, ConfigError> {
        let api_key =
            present(&self.openai.api_key).ok_or(ConfigError::MissingSetting("openai.api_key"))?;

        Ok(OpenAiCredentials {
            api_key,
            base_url: self.openai.base_url.clone(),
            model: self.openai.model.clone(),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claim::{assert_err, assert_ok};
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.supabase.table, "learn_requests");
        assert_eq!(config.openai.base_url, "https://api.openai.com");
        assert_eq!(config.openai.model, "gpt-3.5-turbo");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_default_config_has_no_credentials() {
        let config = Config::default();
        assert!(matches!(
            config.supabase_credentials(),
            Err(ConfigError::MissingSetting("supabase.url"))
        ));
        assert!(matches!(
            config.openai_credentials(),
            Err(ConfigError::MissingSetting("openai.api_key"))
        ));
    }

    #[test]
    fn test_blank_values_count_as_missing() {
        let mut config = Config::default();
        config.supabase.url = Some("https://project.supabase.co".to_string());
        config.supabase.anon_key = Some("   ".to_string());
        config.openai.api_key = Some(String::new());

        assert!(matches!(
            config.supabase_credentials(),
            Err(ConfigError::MissingSetting("supabase.anon_key"))
        ));
        assert_err!(config.openai_credentials());
    }

    #[test]
    fn test_credentials_are_trimmed() {
        let mut config = Config::default();
        config.supabase.url = Some(" https://project.supabase.co ".to_string());
        config.supabase.anon_key = Some("anon".to_string());
        config.openai.api_key = Some("sk-test\n".to_string());

        let supabase = assert_ok!(config.supabase_credentials());
        assert_eq!(supabase.url, "https://project.supabase.co");
        assert_eq!(supabase.table, "learn_requests");

        let openai = assert_ok!(config.openai_credentials());
        assert_eq!(openai.api_key, "sk-test");
        assert_eq!(openai.model, "gpt-3.5-turbo");
    }

    fn vars(pairs: &[(&str, &str)]) -> Map<String, String> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn test_load_file() {
        let file = write_config(
            r#"
            [server]
            port = 8081

            [supabase]
            url = "https://project.supabase.co"
            anon_key = "anon-key"

            [openai]
            api_key = "sk-test"
            model = "gpt-4o-mini"
            "#,
        );

        let config = Config::load_with_env(Some(file.path()), Map::new()).unwrap();
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.bind_address(), "0.0.0.0:8081");
        assert_eq!(config.openai.model, "gpt-4o-mini");
        assert_eq!(config.openai.base_url, "https://api.openai.com");
        assert_ok!(config.supabase_credentials());
        assert_ok!(config.openai_credentials());
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load_with_env(Some(&dir.path().join("absent.toml")), Map::new());
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }

    #[test]
    fn test_prefixed_env_overrides_file() {
        let file = write_config(
            r#"
            [server]
            port = 8081

            [openai]
            model = "gpt-4o-mini"
            "#,
        );

        let config = Config::load_with_env(
            Some(file.path()),
            vars(&[
                ("KAIROS__SERVER__PORT", "9090"),
                ("KAIROS__OPENAI__MODEL", "gpt-4o"),
                ("KAIROS__SUPABASE__TABLE", "questions"),
            ]),
        )
        .unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.openai.model, "gpt-4o");
        assert_eq!(config.supabase.table, "questions");
    }

    #[test]
    fn test_conventional_env_takes_precedence() {
        let file = write_config(
            r#"
            [supabase]
            url = "https://from-file.supabase.co"
            anon_key = "file-anon"

            [openai]
            api_key = "sk-file"
            "#,
        );

        let config = Config::load_with_env(
            Some(file.path()),
            vars(&[
                ("KAIROS__SUPABASE__URL", "https://from-prefixed.supabase.co"),
                ("SUPABASE_URL", "https://from-env.supabase.co"),
                ("SUPABASE_ANON_KEY", "env-anon"),
                ("OPENAI_API_KEY", "sk-env"),
            ]),
        )
        .unwrap();

        let supabase = assert_ok!(config.supabase_credentials());
        assert_eq!(supabase.url, "https://from-env.supabase.co");
        assert_eq!(supabase.anon_key, "env-anon");
        assert_eq!(assert_ok!(config.openai_credentials()).api_key, "sk-env");
    }

    #[test]
    fn test_blank_env_key_is_missing() {
        let file = write_config(
            r#"
            [openai]
            api_key = "sk-file"
            "#,
        );

        let config =
            Config::load_with_env(Some(file.path()), vars(&[("OPENAI_API_KEY", "")])).unwrap();

        assert!(matches!(
            config.openai_credentials(),
            Err(ConfigError::MissingSetting("openai.api_key"))
        ));
    }
}
