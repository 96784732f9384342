use std::path::PathBuf;
use std::time::Duration;

use config::ConfigError;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use url::Url;

use crate::api::authorize::AuthConfiguration;
use crate::utils;

const CONFIG: &str = include_str!("../.config/config.json5");

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub _data_dir: PathBuf,
    #[serde(default)]
    pub _config_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default, flatten)]
    pub config: AppConfig,
    #[serde(default)]
    pub access_key: String,
    #[serde(default = "empty_secret")]
    pub secret_key: SecretString,
    #[serde(default)]
    pub redirect_uri: String,
    #[serde(default)]
    pub scopes: String,
    #[serde(default)]
    pub api_base_url: String,
    #[serde(default)]
    pub oauth_base_url: String,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub request_timeout_secs: u64,
}

fn empty_secret() -> SecretString {
    SecretString::from(String::new())
}

impl Config {
    #[allow(clippy::unwrap_used)]
    pub fn new() -> Result<Self, ConfigError> {
        let default_config: Config = json5::from_str(CONFIG)
            .map_err(|e| ConfigError::Message(format!("Failed to load default config: {e}")))?;
        let data_dir = utils::get_data_dir();
        let config_dir = utils::get_config_dir();
        let mut builder = config::Config::builder()
            .set_default("_data_dir", data_dir.to_str().unwrap())?
            .set_default("_config_dir", config_dir.to_str().unwrap())?;

        let config_files = [
            ("config.json5", config::FileFormat::Json5),
            ("config.json", config::FileFormat::Json),
            ("config.yaml", config::FileFormat::Yaml),
            ("config.toml", config::FileFormat::Toml),
            ("config.ini", config::FileFormat::Ini),
        ];
        let mut found_config = false;
        for (file, format) in &config_files {
            builder = builder.add_source(
                config::File::from(config_dir.join(file))
                    .format(*format)
                    .required(false),
            );
            if config_dir.join(file).exists() {
                found_config = true
            }
        }
        if !found_config {
            log::error!("No configuration file found");
            return Err(ConfigError::Message(String::from(
                "No configuration file found",
            )));
        }

        let mut cfg: Self = builder.build()?.try_deserialize()?;

        // Fill unset fields from the embedded defaults
        if cfg.redirect_uri.is_empty() {
            cfg.redirect_uri.clone_from(&default_config.redirect_uri);
        }
        if cfg.scopes.is_empty() {
            cfg.scopes.clone_from(&default_config.scopes);
        }
        if cfg.api_base_url.is_empty() {
            cfg.api_base_url.clone_from(&default_config.api_base_url);
        }
        if cfg.oauth_base_url.is_empty() {
            cfg.oauth_base_url.clone_from(&default_config.oauth_base_url);
        }
        if cfg.page_size == 0 {
            cfg.page_size = default_config.page_size;
        }
        if cfg.request_timeout_secs == 0 {
            cfg.request_timeout_secs = default_config.request_timeout_secs;
        }

        if cfg.access_key.is_empty() {
            return Err(ConfigError::NotFound(String::from("access_key")));
        }
        if cfg.secret_key.expose_secret().is_empty() {
            return Err(ConfigError::NotFound(String::from("secret_key")));
        }

        Ok(cfg)
    }

    pub fn api_base(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.api_base_url)
            .map_err(|e| ConfigError::Message(format!("Invalid api_base_url: {e}")))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn auth_configuration(&self) -> Result<AuthConfiguration, ConfigError> {
        let oauth_base = Url::parse(&self.oauth_base_url)
            .map_err(|e| ConfigError::Message(format!("Invalid oauth_base_url: {e}")))?;
        Ok(AuthConfiguration {
            access_key: self.access_key.clone(),
            secret_key: SecretString::from(self.secret_key.expose_secret().to_string()),
            redirect_uri: self.redirect_uri.clone(),
            scopes: self.scopes.clone(),
            oauth_base,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_defaults_parse() {
        let cfg: Config = json5::from_str(CONFIG).expect("embedded config parses");
        assert_eq!(cfg.page_size, 30);
        assert_eq!(cfg.request_timeout_secs, 10);
        assert!(cfg.access_key.is_empty());
        assert!(cfg.api_base().is_ok());
        // The defaults alone cannot produce credentials
        assert!(cfg.secret_key.expose_secret().is_empty());
    }

    #[test]
    fn test_config() {
        // Depending on the environment a user config file may or may not
        // exist; both outcomes are acceptable here, failures just have to
        // be the expected ones.
        match Config::new() {
            Ok(cfg) => {
                assert!(!cfg.access_key.is_empty());
                assert!(!cfg.api_base_url.is_empty());
            }
            Err(e) => {
                let err_msg = format!("{e:?}");
                assert!(
                    err_msg.contains("No configuration file found")
                        || err_msg.contains("access_key")
                        || err_msg.contains("secret_key"),
                    "Unexpected config error: {e:?}",
                );
            }
        }
    }
}
