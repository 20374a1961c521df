use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const SOURCE_TOKEN_PLACEHOLDER: &str = "YOUR_YANDEX_MUSIC_TOKEN_HERE";
pub const CLIENT_ID_PLACEHOLDER: &str = "your_client_id_here";
pub const CLIENT_SECRET_PLACEHOLDER: &str = "your_client_secret_here";

const TEMPLATE: &str = r#"# Configuration for moving liked tracks from Yandex Music to YouTube Music
version = 1

[source]
token = "YOUR_YANDEX_MUSIC_TOKEN_HERE"

[destination]
client_id = "your_client_id_here"
client_secret = "your_client_secret_here"
# OAuth token obtained for the client above
token_file = "oauth.json"

[proxy]
enabled = true  # set to false to connect directly
host = "127.0.0.1"
port = 9150
"#;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file {path} not found, a template was written there")]
    Missing { path: PathBuf },

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("`{key}` is not set in the config file")]
    Placeholder { key: &'static str },
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub version: u32,
    pub source: Source,
    pub destination: Destination,
    #[serde(default)]
    pub proxy: Proxy,
}

impl Config {
    /// Loads the config. A missing file is replaced with a template to fill in.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                std::fs::write(path, TEMPLATE)?;
                return Err(ConfigError::Missing {
                    path: path.to_path_buf(),
                });
            }
            Err(e) => return Err(e.into()),
        };
        Ok(toml::from_str(&contents)?)
    }

    /// rejects credentials still holding template values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("source.token", &self.source.token, SOURCE_TOKEN_PLACEHOLDER),
            (
                "destination.client_id",
                &self.destination.client_id,
                CLIENT_ID_PLACEHOLDER,
            ),
            (
                "destination.client_secret",
                &self.destination.client_secret,
                CLIENT_SECRET_PLACEHOLDER,
            ),
        ];
        for (key, value, placeholder) in checks {
            let value = value.trim();
            if value.is_empty() || value == placeholder {
                return Err(ConfigError::Placeholder { key });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct Source {
    pub token: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Destination {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_token_file")]
    pub token_file: PathBuf,
}

fn default_token_file() -> PathBuf {
    PathBuf::from("oauth.json")
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Proxy {
    pub enabled: bool,
    pub host: String,
    pub port: u16,
}

impl Default for Proxy {
    fn default() -> Self {
        Self {
            enabled: true,
            host: "127.0.0.1".to_string(),
            port: 9150,
        }
    }
}

impl Proxy {
    /// the proxy to use, if any, after the command line override
    pub fn effective(&self, disabled_by_flag: bool) -> Option<Proxy> {
        (self.enabled && !disabled_by_flag).then(|| self.clone())
    }

    pub fn url(&self) -> String {
        format!("socks5://{}:{}", self.host, self.port)
    }
}
