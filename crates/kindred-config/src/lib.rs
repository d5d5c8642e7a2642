use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use chrono::FixedOffset;
use kindred_core::domain::validate_goal_days;
use kindred_core::time::parse_offset;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

const APP_DIR: &str = "kindred";
const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_GOAL_DAYS: i32 = 30;
pub const DEFAULT_PUSH_TIMEOUT_SECONDS: u64 = 10;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    /// Offset used to turn timestamps into calendar days. `None` means the
    /// host's local offset at the time of the request.
    pub utc_offset: Option<FixedOffset>,
    pub default_goal_days: i32,
    pub push: PushConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
}

#[derive(Debug, Clone)]
pub struct PushConfig {
    pub enabled: bool,
    pub backend: PushBackend,
    pub relay_url: Option<Url>,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PushBackend {
    Log,
    Relay,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind: default_bind(),
            },
            utc_offset: None,
            default_goal_days: DEFAULT_GOAL_DAYS,
            push: PushConfig {
                enabled: false,
                backend: PushBackend::Log,
                relay_url: None,
                timeout_seconds: DEFAULT_PUSH_TIMEOUT_SECONDS,
            },
        }
    }
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3000))
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("config file permissions too permissive: {0}")]
    InsecurePermissions(PathBuf),
    #[error("invalid server.bind value: {0}")]
    InvalidBind(String),
    #[error("invalid utc_offset value: {0}")]
    InvalidUtcOffset(String),
    #[error("invalid default_goal_days value: {0}")]
    InvalidGoalDays(i32),
    #[error("invalid push.{field}: {message}")]
    InvalidPushField {
        field: &'static str,
        message: String,
    },
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    utc_offset: Option<String>,
    default_goal_days: Option<i32>,
    server: Option<ServerFile>,
    push: Option<PushFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ServerFile {
    bind: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PushFile {
    enabled: Option<bool>,
    backend: Option<PushBackend>,
    relay_url: Option<String>,
    timeout_seconds: Option<u64>,
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    ensure_permissions(path)?;
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(merge_config(parsed)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(raw) = parsed.utc_offset {
        let offset = parse_offset(&raw).map_err(|_| ConfigError::InvalidUtcOffset(raw.clone()))?;
        config.utc_offset = Some(offset);
    }

    if let Some(goal_days) = parsed.default_goal_days {
        validate_goal_days(goal_days).map_err(|_| ConfigError::InvalidGoalDays(goal_days))?;
        config.default_goal_days = goal_days;
    }

    if let Some(bind) = parsed.server.and_then(|server| server.bind) {
        config.server.bind = bind
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidBind(bind.clone()))?;
    }

    if let Some(push) = parsed.push {
        if let Some(enabled) = push.enabled {
            config.push.enabled = enabled;
        }
        if let Some(backend) = push.backend {
            config.push.backend = backend;
        }
        if let Some(raw) = push.relay_url {
            let url = Url::parse(raw.trim()).map_err(|err| ConfigError::InvalidPushField {
                field: "relay_url",
                message: err.to_string(),
            })?;
            if url.scheme() != "https" && url.scheme() != "http" {
                return Err(ConfigError::InvalidPushField {
                    field: "relay_url",
                    message: format!("unsupported scheme {}", url.scheme()),
                });
            }
            config.push.relay_url = Some(url);
        }
        if let Some(seconds) = push.timeout_seconds {
            if seconds == 0 {
                return Err(ConfigError::InvalidPushField {
                    field: "timeout_seconds",
                    message: "must be greater than zero".to_string(),
                });
            }
            config.push.timeout_seconds = seconds;
        }
    }

    if config.push.enabled
        && config.push.backend == PushBackend::Relay
        && config.push.relay_url.is_none()
    {
        return Err(ConfigError::InvalidPushField {
            field: "relay_url",
            message: "required when backend = \"relay\"".to_string(),
        });
    }

    Ok(config)
}

#[cfg(unix)]
fn ensure_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mode = metadata.permissions().mode();
    if mode & 0o077 != 0 {
        return Err(ConfigError::InsecurePermissions(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
