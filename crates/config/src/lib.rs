use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_CONFIG_FILES: &[&str] = &[
    "chitchat.toml",
    "config/chitchat.toml",
    "crates/config/chitchat.toml",
    "../chitchat.toml",
    "../config/chitchat.toml",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub session: SessionConfig,
}

/// Where and how the client reaches the chat backend.
///
/// ```
/// use chitchat_config::ApiConfig;
///
/// let api = ApiConfig::default();
/// assert_eq!(api.base_url, "http://localhost:5000/api");
/// assert_eq!(api.auth_header, "x-auth-key");
/// assert_eq!(api.endpoints.search_users, "/user/getUser");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default = "ApiConfig::default_request_timeout")]
    pub request_timeout_seconds: u64,
    #[serde(default = "ApiConfig::default_auth_header")]
    pub auth_header: String,
    #[serde(default)]
    pub endpoints: EndpointConfig,
}

impl ApiConfig {
    fn default_base_url() -> String {
        "http://localhost:5000/api".to_string()
    }

    const fn default_request_timeout() -> u64 {
        30
    }

    fn default_auth_header() -> String {
        "x-auth-key".to_string()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            request_timeout_seconds: Self::default_request_timeout(),
            auth_header: Self::default_auth_header(),
            endpoints: EndpointConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub search_users: String,
    pub access_chat: String,
    pub fetch_chats: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            search_users: "/user/getUser".to_string(),
            access_chat: "/chat/createChat".to_string(),
            fetch_chats: "/chat/fetchChats".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// How long a notice stays visible
    #[serde(default = "SessionConfig::default_notice_duration")]
    pub notice_duration_ms: u64,
    /// Buffered session events per subscriber
    #[serde(default = "SessionConfig::default_event_capacity")]
    pub event_capacity: usize,
}

impl SessionConfig {
    const fn default_notice_duration() -> u64 {
        5_000
    }

    const fn default_event_capacity() -> usize {
        64
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            notice_duration_ms: Self::default_notice_duration(),
            event_capacity: Self::default_event_capacity(),
        }
    }
}

/// Load the client configuration by combining defaults, files, and environment overrides.
///
/// ```
/// use chitchat_config::load;
///
/// std::env::remove_var("CHITCHAT_CONFIG");
///
/// let config = load().expect("configuration should load with defaults");
/// assert!(!config.api.base_url.is_empty());
/// ```
pub fn load() -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::default();

    let request_timeout = i64::try_from(defaults.api.request_timeout_seconds).unwrap_or(i64::MAX);
    let notice_duration = i64::try_from(defaults.session.notice_duration_ms).unwrap_or(i64::MAX);
    let event_capacity = i64::try_from(defaults.session.event_capacity).unwrap_or(i64::MAX);

    let mut builder = config::Config::builder()
        .set_default("api.base_url", defaults.api.base_url.clone())?
        .set_default("api.request_timeout_seconds", request_timeout)?
        .set_default("api.auth_header", defaults.api.auth_header.clone())?
        .set_default(
            "api.endpoints.search_users",
            defaults.api.endpoints.search_users.clone(),
        )?
        .set_default(
            "api.endpoints.access_chat",
            defaults.api.endpoints.access_chat.clone(),
        )?
        .set_default(
            "api.endpoints.fetch_chats",
            defaults.api.endpoints.fetch_chats.clone(),
        )?
        .set_default("session.notice_duration_ms", notice_duration)?
        .set_default("session.event_capacity", event_capacity)?;

    let environment_overrides = config::Environment::with_prefix("CHITCHAT").separator("__");

    let mut config_file_attached = false;

    if let Ok(path) = std::env::var("CHITCHAT_CONFIG") {
        builder = builder.add_source(config::File::from(PathBuf::from(&path)));
        config_file_attached = true;
        debug!(path, "loading configuration via CHITCHAT_CONFIG");
    } else if let Ok(cwd) = std::env::current_dir() {
        let fallback = DEFAULT_CONFIG_FILES
            .iter()
            .map(|candidate| cwd.join(candidate))
            .find(|path| path.exists());

        if let Some(path) = fallback {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
            config_file_attached = true;
        }
    }

    if !config_file_attached {
        debug!("no configuration file found, relying on defaults and environment overrides");
    }

    builder = builder.add_source(environment_overrides);

    let cfg = builder.build().context("unable to build configuration")?;

    let mut config = cfg
        .try_deserialize::<AppConfig>()
        .context("invalid configuration")?;

    if config.session.event_capacity == 0 {
        debug!("event capacity of zero is not usable, falling back to default");
        config.session.event_capacity = SessionConfig::default_event_capacity();
    }

    debug!(?config, "loaded client configuration");
    Ok(config)
}
