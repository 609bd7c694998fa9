use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::ConfigError;

pub const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";
pub const DEFAULT_MAX_TOKENS: u32 = 1000;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_CLOUDINARY_BASE_URL: &str = "https://api.cloudinary.com";
pub const DEFAULT_AVATAR_FOLDER: &str = "studybuddy-avatars";

pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const CLOUDINARY_CLOUD_NAME_ENV: &str = "CLOUDINARY_CLOUD_NAME";
pub const CLOUDINARY_API_KEY_ENV: &str = "CLOUDINARY_API_KEY";
pub const CLOUDINARY_API_SECRET_ENV: &str = "CLOUDINARY_API_SECRET";

/// Chat and embedding tuning. Never taken from individual requests.
#[derive(Debug, Clone, PartialEq)]
pub struct AiConfig {
    pub model: String,
    pub embedding_model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub base_url: String,
    pub request_timeout_secs: Option<u64>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_CHAT_MODEL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            request_timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaConfig {
    /// Storage folder; also the prefix of every derived public id.
    pub folder: String,
    pub base_url: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            folder: DEFAULT_AVATAR_FOLDER.to_string(),
            base_url: DEFAULT_CLOUDINARY_BASE_URL.to_string(),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct CloudinaryCredentials {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

impl fmt::Debug for CloudinaryCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudinaryCredentials")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &"<redacted>")
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// On-disk TOML layout. Every key is optional.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    pub ai: AiSection,
    pub media: MediaSection,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AiSection {
    pub model: Option<String>,
    pub embedding_model: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct MediaSection {
    pub folder: Option<String>,
    pub base_url: Option<String>,
}

/// Process-wide settings, resolved once at startup.
#[derive(Clone)]
pub struct Settings {
    pub openai_api_key: Option<String>,
    pub cloudinary: Option<CloudinaryCredentials>,
    pub ai: AiConfig,
    pub media: MediaConfig,
    /// File the tuning came from, if any.
    pub config_path: Option<PathBuf>,
}

impl Settings {
    /// Reads `.env`, the optional TOML file and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "loaded environment file");
        }
        let (file, path) = load_file()?;
        Self::resolve(file, path, |key| env::var(key).ok())
    }

    /// Builds settings from an already parsed file and an environment lookup.
    pub fn resolve(
        file: FileConfig,
        config_path: Option<PathBuf>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let defaults = AiConfig::default();
        let ai = AiConfig {
            model: file.ai.model.unwrap_or(defaults.model),
            embedding_model: file.ai.embedding_model.unwrap_or(defaults.embedding_model),
            max_tokens: file.ai.max_tokens.unwrap_or(defaults.max_tokens),
            temperature: file.ai.temperature.unwrap_or(defaults.temperature),
            base_url: trim_url(file.ai.base_url.unwrap_or(defaults.base_url)),
            request_timeout_secs: file.ai.request_timeout_secs,
        };
        let media_defaults = MediaConfig::default();
        let media = MediaConfig {
            folder: file.media.folder.unwrap_or(media_defaults.folder),
            base_url: trim_url(file.media.base_url.unwrap_or(media_defaults.base_url)),
        };
        validate(&ai, &media)?;

        let openai_api_key = credential(&lookup, OPENAI_API_KEY_ENV);
        let cloudinary = match (
            credential(&lookup, CLOUDINARY_CLOUD_NAME_ENV),
            credential(&lookup, CLOUDINARY_API_KEY_ENV),
            credential(&lookup, CLOUDINARY_API_SECRET_ENV),
        ) {
            (Some(cloud_name), Some(api_key), Some(api_secret)) => Some(CloudinaryCredentials {
                cloud_name,
                api_key,
                api_secret,
            }),
            _ => None,
        };

        Ok(Self {
            openai_api_key,
            cloudinary,
            ai,
            media,
            config_path,
        })
    }
}

/// Parses a tuning file, failing loudly on unreadable or malformed content.
pub fn parse_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn load_file() -> Result<(FileConfig, Option<PathBuf>), ConfigError> {
    if let Some(explicit) = non_empty_env("SB_CONFIG") {
        let path = PathBuf::from(explicit);
        let file = parse_file(&path)?;
        return Ok((file, Some(path)));
    }

    match default_config_path() {
        Some(path) if path.exists() => {
            let file = parse_file(&path)?;
            Ok((file, Some(path)))
        }
        _ => Ok((FileConfig::default(), None)),
    }
}

fn default_config_path() -> Option<PathBuf> {
    if let Some(xdg) = non_empty_env("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(xdg).join("studybuddy").join("config.toml"));
    }
    non_empty_env("HOME").map(|home| {
        PathBuf::from(home)
            .join(".config")
            .join("studybuddy")
            .join("config.toml")
    })
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

// Blank values and the `your-...` placeholders shipped in sample .env files
// both count as "not configured".
fn credential(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty() && !value.starts_with("your-"))
}

fn trim_url(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn validate(ai: &AiConfig, media: &MediaConfig) -> Result<(), ConfigError> {
    if !(0.0..=2.0).contains(&ai.temperature) {
        return Err(ConfigError::Invalid {
            key: "ai.temperature",
            reason: format!("{} is outside 0.0..=2.0", ai.temperature),
        });
    }
    if ai.max_tokens == 0 {
        return Err(ConfigError::Invalid {
            key: "ai.max_tokens",
            reason: "must be greater than zero".to_string(),
        });
    }
    for (key, url) in [("ai.base_url", &ai.base_url), ("media.base_url", &media.base_url)] {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                key,
                reason: format!("'{url}' is not an http(s) URL"),
            });
        }
    }
    // Public ids are rebuilt from URLs by cutting at the first '.', so the
    // folder itself must not contain one.
    let folder = media.folder.trim();
    if folder.is_empty() || folder.contains('.') || folder.starts_with('/') || folder.ends_with('/')
    {
        return Err(ConfigError::Invalid {
            key: "media.folder",
            reason: format!("'{folder}' must be non-empty, without '.' or leading/trailing '/'"),
        });
    }
    Ok(())
}
