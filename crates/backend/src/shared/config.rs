use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub image: ImageConfig,
    #[serde(default)]
    pub uploads: UploadsConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory with the built frontend bundle
    pub static_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            static_dir: "dist".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LlmConfig {
    /// Usually supplied through `OPENAI_API_KEY` rather than the file
    pub api_key: Option<String>,
    pub api_base: String,
    /// Upper bound on generated tokens per completion
    pub max_tokens: u32,
    /// No local timeout when absent
    pub timeout_secs: Option<u64>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: "https://api.openai.com/v1".to_string(),
            max_tokens: 4000,
            timeout_secs: None,
        }
    }
}

impl LlmConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ImageConfig {
    pub size: String,
    pub model: Option<String>,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            size: "1024x1024".to_string(),
            model: None,
        }
    }
}

/// What to do with an attachment whose MIME type has no extractor
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnsupportedPolicy {
    /// Contribute an empty string, no error
    #[default]
    Skip,
    /// Fail the whole request
    Reject,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct UploadsConfig {
    pub dir: PathBuf,
    pub max_files: usize,
    pub max_body_bytes: usize,
    pub unsupported: UnsupportedPolicy,
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("uploads"),
            max_files: 5,
            max_body_bytes: 25 * 1024 * 1024,
            unsupported: UnsupportedPolicy::Skip,
        }
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
host = "0.0.0.0"
port = 3001
static_dir = "dist"

[llm]
api_base = "https://api.openai.com/v1"
max_tokens = 4000

[image]
size = "1024x1024"

[uploads]
dir = "uploads"
max_files = 5
max_body_bytes = 26214400
unsupported = "skip"
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
///
/// Environment overrides (`OPENAI_API_KEY`, `OPENAI_API_BASE`, `PORT`) are
/// applied on top of whichever file was used.
pub fn load_config() -> anyhow::Result<Config> {
    let mut config = load_file_config()?;
    config.apply_env_overrides(|key| std::env::var(key).ok())?;

    if config.llm.api_key.as_deref().map_or(true, str::is_empty) {
        tracing::warn!("OPENAI_API_KEY is not set, provider calls will fail");
    }

    Ok(config)
}

fn load_file_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&contents)?;
                return Ok(config);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

impl Config {
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("OPENAI_API_KEY") {
            self.llm.api_key = Some(key);
        }
        if let Some(base) = lookup("OPENAI_API_BASE") {
            self.llm.api_base = base;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid PORT {:?}: {}", port, e))?;
        }
        Ok(())
    }
}

/// Resolves the uploads directory relative to the current directory and
/// makes sure it exists
pub fn ensure_uploads_dir(config: &Config) -> anyhow::Result<PathBuf> {
    let dir: &Path = &config.uploads.dir;
    std::fs::create_dir_all(dir)?;
    Ok(dir.to_path_buf())
}
