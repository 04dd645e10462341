//! Configuration management for the digital twin service.
//!
//! Configuration is layered, later sources winning:
//! - Built-in defaults
//! - Config file (`.twin/config.yaml` in the workspace, or `TWIN_CONFIG`)
//! - Environment variables
//! - Command-line flags
//!
//! Secrets (LLM and mail API keys) are only ever read from the environment.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Default Groq chat model.
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

/// Profile document file name, resolved against the workspace.
pub const DEFAULT_PROFILE_FILE: &str = "digitaltwin.json";

/// Providers the factory knows how to build.
pub const KNOWN_PROVIDERS: [&str; 3] = ["groq", "ollama", "mock"];

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .twin/ and the profile document)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Explicit profile document path; defaults to `<workspace>/digitaltwin.json`
    pub profile_path: Option<PathBuf>,

    /// LLM provider ("groq", "ollama", "mock")
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Custom provider endpoint
    pub endpoint: Option<String>,

    /// API key for the LLM provider
    pub api_key: Option<String>,

    /// Completion token cap
    pub max_tokens: u32,

    /// Sampling temperature; provider default when unset
    pub temperature: Option<f32>,

    /// Number of profile chunks passed to the model as context
    pub top_k: usize,

    /// HTTP bind address for `serve`
    pub bind_addr: String,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// Emit JSON log lines
    pub log_json: bool,

    /// Contact relay settings
    pub mail: MailConfig,

    /// LLM provider configurations from the config file
    pub llm: Option<LlmConfig>,
}

/// Contact form delivery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Resend API key (`RESEND_API_KEY`)
    #[serde(skip_serializing)]
    pub resend_api_key: Option<String>,

    /// SendGrid API key (`SENDGRID_API_KEY`)
    #[serde(skip_serializing)]
    pub sendgrid_api_key: Option<String>,

    /// Recipient of contact messages (`CONTACT_EMAIL`)
    pub contact_email: Option<String>,

    /// Sender address used with Resend
    pub resend_from: String,

    /// Sender address used with SendGrid
    pub sendgrid_from: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            resend_api_key: None,
            sendgrid_api_key: None,
            contact_email: None,
            resend_from: "contact@yourportfolio.com".to_string(),
            sendgrid_from: "noreply@yourportfolio.com".to_string(),
        }
    }
}

impl MailConfig {
    /// Whether any mail provider key is configured.
    pub fn has_provider(&self) -> bool {
        self.resend_api_key.is_some() || self.sendgrid_api_key.is_some()
    }

    /// A configured provider needs somewhere to deliver to.
    pub fn validate(&self) -> AppResult<()> {
        let recipient_missing = self
            .contact_email
            .as_deref()
            .is_none_or(|email| email.trim().is_empty());

        if self.has_provider() && recipient_missing {
            return Err(AppError::Config(
                "A mail provider key is set but no recipient is configured \
                 (set CONTACT_EMAIL or mail.contactEmail)"
                    .to_string(),
            ));
        }

        Ok(())
    }
}

/// LLM configuration from config.yaml.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(rename = "activeProvider")]
    pub active_provider: String,

    #[serde(rename = "maxTokens", default)]
    pub max_tokens: Option<u32>,

    #[serde(default)]
    pub temperature: Option<f32>,

    #[serde(rename = "topK", default)]
    pub top_k: Option<usize>,

    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

/// Provider-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProviderConfig {
    Groq {
        #[serde(rename = "apiKeyEnv")]
        api_key_env: String,
        model: String,
        endpoint: Option<String>,
    },
    Ollama {
        endpoint: String,
        model: String,
        timeout: Option<u64>,
    },
}

impl ProviderConfig {
    pub fn model(&self) -> &str {
        match self {
            Self::Groq { model, .. } | Self::Ollama { model, .. } => model,
        }
    }

    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Self::Groq { endpoint, .. } => endpoint.as_deref(),
            Self::Ollama { endpoint, .. } => Some(endpoint),
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    llm: Option<LlmConfig>,
    profile: Option<ProfileSection>,
    server: Option<ServerSection>,
    mail: Option<MailSection>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProfileSection {
    path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ServerSection {
    #[serde(rename = "bindAddr")]
    bind_addr: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MailSection {
    #[serde(rename = "contactEmail")]
    contact_email: Option<String>,
    #[serde(rename = "resendFrom")]
    resend_from: Option<String>,
    #[serde(rename = "sendgridFrom")]
    sendgrid_from: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
    json: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            profile_path: None,
            provider: "groq".to_string(),
            model: DEFAULT_MODEL.to_string(),
            endpoint: None,
            api_key: None,
            max_tokens: 1024,
            temperature: None,
            top_k: 3,
            bind_addr: "127.0.0.1:3000".to_string(),
            log_level: None,
            verbose: false,
            no_color: false,
            log_json: false,
            mail: MailConfig::default(),
            llm: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment and defaults.
    ///
    /// Environment variables:
    /// - `TWIN_WORKSPACE`: Override workspace path
    /// - `TWIN_CONFIG`: Path to config file
    /// - `TWIN_PROFILE`: Path to the profile document
    /// - `TWIN_PROVIDER` / `TWIN_MODEL`: LLM provider and model
    /// - `TWIN_API_KEY`: API key (falls back to the provider's own variable)
    /// - `TWIN_BIND_ADDR`: HTTP bind address
    /// - `RESEND_API_KEY`, `SENDGRID_API_KEY`, `CONTACT_EMAIL`,
    ///   `RESEND_FROM_EMAIL`, `SENDGRID_FROM_EMAIL`: contact relay
    /// - `RUST_LOG`, `NO_COLOR`
    ///
    /// # Example
    /// ```no_run
    /// use twin_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Profile: {:?}", config.profile_path());
    /// ```
    pub fn load() -> AppResult<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load configuration using `env` as the variable source.
    pub fn load_with<F>(env: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(workspace) = env("TWIN_WORKSPACE") {
            config.workspace = PathBuf::from(workspace);
        }

        if let Some(config_file) = env("TWIN_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = config
            .config_file
            .clone()
            .unwrap_or_else(|| config.twin_dir().join("config.yaml"));

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        } else if config.config_file.is_some() {
            return Err(AppError::Config(format!(
                "Config file not found: {:?}",
                config_path
            )));
        }

        // Environment variables override YAML config
        if let Some(profile) = env("TWIN_PROFILE") {
            config.profile_path = Some(PathBuf::from(profile));
        }

        if let Some(provider) = env("TWIN_PROVIDER") {
            config.provider = provider;
        }

        if let Some(model) = env("TWIN_MODEL") {
            config.model = model;
        }

        if let Some(addr) = env("TWIN_BIND_ADDR") {
            config.bind_addr = addr;
        }

        config.provider = config.provider.to_ascii_lowercase();

        config.api_key = env("TWIN_API_KEY").or_else(|| {
            config
                .api_key_env(&config.provider)
                .and_then(|var| env(&var))
        });

        config.mail.resend_api_key = env("RESEND_API_KEY").filter(|k| !k.is_empty());
        config.mail.sendgrid_api_key = env("SENDGRID_API_KEY").filter(|k| !k.is_empty());
        if let Some(contact) = env("CONTACT_EMAIL") {
            config.mail.contact_email = Some(contact);
        }
        if let Some(from) = env("RESEND_FROM_EMAIL") {
            config.mail.resend_from = from;
        }
        if let Some(from) = env("SENDGRID_FROM_EMAIL") {
            config.mail.sendgrid_from = from;
        }

        if let Some(level) = env("RUST_LOG") {
            config.log_level = Some(level);
        }

        if env("NO_COLOR").is_some() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self;

        if let Some(profile) = config_file.profile {
            if let Some(p) = profile.path {
                result.profile_path = Some(result.workspace.join(p));
            }
        }

        if let Some(server) = config_file.server {
            if let Some(addr) = server.bind_addr {
                result.bind_addr = addr;
            }
        }

        if let Some(mail) = config_file.mail {
            if mail.contact_email.is_some() {
                result.mail.contact_email = mail.contact_email;
            }
            if let Some(from) = mail.resend_from {
                result.mail.resend_from = from;
            }
            if let Some(from) = mail.sendgrid_from {
                result.mail.sendgrid_from = from;
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
            if let Some(json) = logging.json {
                result.log_json = json;
            }
        }

        if let Some(llm) = config_file.llm {
            result.provider = llm.active_provider.clone();

            if let Some(max_tokens) = llm.max_tokens {
                result.max_tokens = max_tokens;
            }
            if llm.temperature.is_some() {
                result.temperature = llm.temperature;
            }
            if let Some(top_k) = llm.top_k {
                result.top_k = top_k;
            }

            if let Some(provider_config) = llm.providers.get(&llm.active_provider) {
                result.model = provider_config.model().to_string();
                result.endpoint = provider_config.endpoint().map(str::to_string);
            }

            result.llm = Some(llm);
        }

        tracing::debug!("Merged config file {:?}", path);
        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over environment and file values.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        workspace: Option<PathBuf>,
        config_file: Option<PathBuf>,
        provider: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
        log_json: bool,
    ) -> Self {
        if let Some(workspace) = workspace {
            self.workspace = workspace;
        }

        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(provider) = provider {
            self.provider = provider.to_ascii_lowercase();
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        if log_json {
            self.log_json = true;
        }

        self
    }

    /// Get the path to the .twin directory.
    pub fn twin_dir(&self) -> PathBuf {
        self.workspace.join(".twin")
    }

    /// Resolved location of the profile document.
    pub fn profile_path(&self) -> PathBuf {
        self.profile_path
            .clone()
            .unwrap_or_else(|| self.workspace.join(DEFAULT_PROFILE_FILE))
    }

    /// Get the configuration block for a provider, if the config file had one.
    pub fn get_provider_config(&self, provider: &str) -> Option<&ProviderConfig> {
        self.llm.as_ref().and_then(|llm| llm.providers.get(provider))
    }

    /// Environment variable holding the API key for `provider`.
    fn api_key_env(&self, provider: &str) -> Option<String> {
        match self.get_provider_config(provider) {
            Some(ProviderConfig::Groq { api_key_env, .. }) => Some(api_key_env.clone()),
            Some(ProviderConfig::Ollama { .. }) => None,
            None if provider == "groq" => Some("GROQ_API_KEY".to_string()),
            None => None,
        }
    }

    /// Validate configuration for the active provider.
    pub fn validate(&self) -> AppResult<()> {
        let provider = self.provider.as_str();

        if !KNOWN_PROVIDERS.contains(&provider) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                provider,
                KNOWN_PROVIDERS.join(", ")
            )));
        }

        if provider == "groq" && self.api_key.is_none() {
            let var = self
                .api_key_env(provider)
                .unwrap_or_else(|| "TWIN_API_KEY".to_string());
            return Err(AppError::Config(format!(
                "API key not found in environment variable: {}",
                var
            )));
        }

        if self.top_k == 0 {
            return Err(AppError::Config("topK must be at least 1".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.provider, "groq");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_tokens, 1024);
        assert_eq!(config.top_k, 3);
        assert!(!config.verbose);
        assert!(!config.no_color);
    }

    #[test]
    fn test_profile_path_defaults_to_workspace() {
        let config = AppConfig::default();
        assert!(config.profile_path().ends_with(DEFAULT_PROFILE_FILE));
        assert!(config.twin_dir().ends_with(".twin"));
    }

    #[test]
    fn test_load_reads_environment() {
        let temp = TempDir::new().unwrap();
        let workspace = temp.path().to_string_lossy().to_string();
        let config = AppConfig::load_with(env_from(&[
            ("TWIN_WORKSPACE", workspace.as_str()),
            ("GROQ_API_KEY", "gsk-test"),
            ("CONTACT_EMAIL", "me@example.com"),
            ("RESEND_API_KEY", "re-test"),
            ("SENDGRID_API_KEY", ""),
        ]))
        .unwrap();

        assert_eq!(config.workspace, temp.path());
        assert_eq!(config.api_key.as_deref(), Some("gsk-test"));
        assert_eq!(config.mail.contact_email.as_deref(), Some("me@example.com"));
        assert_eq!(config.mail.resend_api_key.as_deref(), Some("re-test"));
        assert!(config.mail.sendgrid_api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_missing_workspace() {
        let result = AppConfig::load_with(env_from(&[(
            "TWIN_WORKSPACE",
            "/definitely/not/a/real/workspace",
        )]));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_load_merges_yaml() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join(".twin")).unwrap();
        std::fs::write(
            temp.path().join(".twin/config.yaml"),
            r#"
llm:
  activeProvider: ollama
  topK: 5
  temperature: 0.4
  providers:
    ollama:
      endpoint: http://localhost:11434
      model: llama3.2
profile:
  path: data/me.json
server:
  bindAddr: 0.0.0.0:8080
mail:
  contactEmail: owner@example.com
logging:
  level: debug
  json: true
"#,
        )
        .unwrap();

        let workspace = temp.path().to_string_lossy().to_string();
        let config = AppConfig::load_with(env_from(&[("TWIN_WORKSPACE", workspace.as_str())])).unwrap();

        assert_eq!(config.provider, "ollama");
        assert_eq!(config.model, "llama3.2");
        assert_eq!(config.endpoint.as_deref(), Some("http://localhost:11434"));
        assert_eq!(config.top_k, 5);
        assert_eq!(config.temperature, Some(0.4));
        assert_eq!(config.profile_path(), temp.path().join("data/me.json"));
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(
            config.mail.contact_email.as_deref(),
            Some("owner@example.com")
        );
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert!(config.log_json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides_yaml() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("twin.yaml");
        std::fs::write(
            &config_path,
            "llm:\n  activeProvider: groq\n  providers:\n    groq:\n      apiKeyEnv: MY_GROQ\n      model: llama-3.3-70b-versatile\n",
        )
        .unwrap();

        let workspace = temp.path().to_string_lossy().to_string();
        let config_file = config_path.to_string_lossy().to_string();
        let config = AppConfig::load_with(env_from(&[
            ("TWIN_WORKSPACE", workspace.as_str()),
            ("TWIN_CONFIG", config_file.as_str()),
            ("MY_GROQ", "from-custom-var"),
            ("TWIN_MODEL", "override-model"),
        ]))
        .unwrap();

        assert_eq!(config.api_key.as_deref(), Some("from-custom-var"));
        assert_eq!(config.model, "override-model");
    }

    #[test]
    fn test_explicit_config_file_must_exist() {
        let temp = TempDir::new().unwrap();
        let workspace = temp.path().to_string_lossy().to_string();
        let result = AppConfig::load_with(env_from(&[
            ("TWIN_WORKSPACE", workspace.as_str()),
            ("TWIN_CONFIG", "/nope/config.yaml"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_with_overrides() {
        let config = AppConfig::default();
        let overridden = config.with_overrides(
            None,
            None,
            Some("ollama".to_string()),
            Some("llama3.2".to_string()),
            None,
            true,
            false,
            true,
        );

        assert_eq!(overridden.provider, "ollama");
        assert_eq!(overridden.model, "llama3.2");
        assert!(overridden.verbose);
        assert!(overridden.log_json);
        assert_eq!(overridden.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_provider_name_is_case_insensitive() {
        let temp = TempDir::new().unwrap();
        let workspace = temp.path().to_string_lossy().to_string();
        let config = AppConfig::load_with(env_from(&[
            ("TWIN_WORKSPACE", workspace.as_str()),
            ("TWIN_PROVIDER", "GROQ"),
            ("GROQ_API_KEY", "gsk-test"),
        ]))
        .unwrap();

        assert_eq!(config.provider, "groq");
        assert_eq!(config.api_key.as_deref(), Some("gsk-test"));
        assert!(config.validate().is_ok());

        let overridden = AppConfig::default().with_overrides(
            None,
            None,
            Some("Mock".to_string()),
            None,
            None,
            false,
            false,
            false,
        );
        assert_eq!(overridden.provider, "mock");
        assert!(overridden.validate().is_ok());
    }

    #[test]
    fn test_mail_provider_requires_recipient() {
        assert!(MailConfig::default().validate().is_ok());

        let mut mail = MailConfig {
            resend_api_key: Some("re-test".to_string()),
            ..MailConfig::default()
        };
        let err = mail.validate().unwrap_err();
        assert!(err.to_string().contains("CONTACT_EMAIL"));

        mail.contact_email = Some("  ".to_string());
        assert!(mail.validate().is_err());

        mail.contact_email = Some("owner@example.com".to_string());
        assert!(mail.validate().is_ok());
    }

    #[test]
    fn test_validate_unknown_provider() {
        let config = AppConfig {
            provider: "unknown".to_string(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_groq_requires_key() {
        let config = AppConfig::default();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("GROQ_API_KEY"));
    }

    #[test]
    fn test_validate_ollama() {
        let config = AppConfig {
            provider: "ollama".to_string(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_ok());
    }
}
