//! Configuration types and loading.
//!
//! Config is loaded from a JSON file (e.g. `~/.menubot/config.json`) and environment.
//! The Twilio credentials are the only required values; everything else has a default.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Env var holding the WhatsApp-enabled sender number (without the `whatsapp:` prefix).
pub const TWILIO_NUMBER_ENV: &str = "TWILIO_NUMBER";
/// Env var holding the Twilio account SID.
pub const TWILIO_SID_ENV: &str = "TWILIO_SID";
/// Env var holding the Twilio auth token.
pub const TWILIO_TOKEN_ENV: &str = "TWILIO_TOKEN";

/// Top-level application config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Gateway server settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Twilio account and sender settings.
    #[serde(default)]
    pub twilio: TwilioConfig,
}

/// Gateway bind and port.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    /// Port for the webhook HTTP server (default 5000).
    #[serde(default = "default_gateway_port")]
    pub port: u16,

    /// Bind address (default "127.0.0.1").
    #[serde(default = "default_gateway_bind")]
    pub bind: String,
}

fn default_gateway_port() -> u16 {
    5000
}

fn default_gateway_bind() -> String {
    "127.0.0.1".to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_gateway_port(),
            bind: default_gateway_bind(),
        }
    }
}

/// Twilio settings. Each credential is overridden by its env var when set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwilioConfig {
    /// Sender number, e.g. "+14155238886". Overridden by TWILIO_NUMBER.
    pub number: Option<String>,
    /// Account SID. Overridden by TWILIO_SID.
    pub account_sid: Option<String>,
    /// Auth token. Overridden by TWILIO_TOKEN.
    pub auth_token: Option<String>,
    /// REST API base (default https://api.twilio.com). Only useful for tests or proxies.
    pub api_base: Option<String>,
}

/// Validated Twilio credentials, injected into the outbound client at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct TwilioCredentials {
    pub number: String,
    pub account_sid: String,
    pub auth_token: String,
}

impl std::fmt::Debug for TwilioCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwilioCredentials")
            .field("number", &self.number)
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("twilio credentials are missing: {}", .0.join(", "))]
    MissingCredentials(Vec<&'static str>),
}

fn non_empty(s: &str) -> Option<String> {
    let t = s.trim();
    if t.is_empty() {
        None
    } else {
        Some(t.to_string())
    }
}

/// Env value wins over the config value; blank strings count as absent.
fn env_or_config(
    env: &impl Fn(&str) -> Option<String>,
    var: &str,
    configured: Option<&String>,
) -> Option<String> {
    env(var)
        .and_then(|s| non_empty(&s))
        .or_else(|| configured.and_then(|s| non_empty(s)))
}

/// Resolve the three Twilio credentials from env (TWILIO_NUMBER, TWILIO_SID, TWILIO_TOKEN) and config.
/// Fails when any of them is missing or blank.
pub fn resolve_credentials(config: &Config) -> Result<TwilioCredentials, ConfigError> {
    resolve_credentials_with(config, |var| std::env::var(var).ok())
}

fn resolve_credentials_with(
    config: &Config,
    env: impl Fn(&str) -> Option<String>,
) -> Result<TwilioCredentials, ConfigError> {
    let twilio = &config.twilio;
    let number = env_or_config(&env, TWILIO_NUMBER_ENV, twilio.number.as_ref());
    let account_sid = env_or_config(&env, TWILIO_SID_ENV, twilio.account_sid.as_ref());
    let auth_token = env_or_config(&env, TWILIO_TOKEN_ENV, twilio.auth_token.as_ref());
    match (number, account_sid, auth_token) {
        (Some(number), Some(account_sid), Some(auth_token)) => Ok(TwilioCredentials {
            number,
            account_sid,
            auth_token,
        }),
        (number, account_sid, auth_token) => {
            let mut missing = Vec::new();
            if number.is_none() {
                missing.push(TWILIO_NUMBER_ENV);
            }
            if account_sid.is_none() {
                missing.push(TWILIO_SID_ENV);
            }
            if auth_token.is_none() {
                missing.push(TWILIO_TOKEN_ENV);
            }
            Err(ConfigError::MissingCredentials(missing))
        }
    }
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var("MENUBOT_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(".menubot").join("config.json"))
                .unwrap_or_else(|| PathBuf::from("config.json"))
        })
}

/// Load config from the given path, MENUBOT_CONFIG_PATH, or the default path. Missing file => default config.
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(default_config_path);
    if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        return Ok(Config::default());
    }
    let s = std::fs::read_to_string(&path)
        .with_context(|| format!("reading config from {}", path.display()))?;
    let config = serde_json::from_str(&s)
        .with_context(|| format!("parsing config from {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn default_gateway_port_and_bind() {
        let g = GatewayConfig::default();
        assert_eq!(g.port, 5000);
        assert_eq!(g.bind, "127.0.0.1");
    }

    #[test]
    fn parses_camel_case_twilio_section() {
        let config: Config = serde_json::from_str(
            r#"{"gateway":{"port":8080},"twilio":{"number":"+1555","accountSid":"AC1","authToken":"t"}}"#,
        )
        .unwrap();
        assert_eq!(config.gateway.port, 8080);
        assert_eq!(config.gateway.bind, "127.0.0.1");
        assert_eq!(config.twilio.account_sid.as_deref(), Some("AC1"));
        assert_eq!(config.twilio.api_base, None);
    }

    #[test]
    fn credentials_from_env() {
        let env = env_from(&[
            ("TWILIO_NUMBER", "+14155238886"),
            ("TWILIO_SID", "AC123"),
            ("TWILIO_TOKEN", "secret"),
        ]);
        let creds = resolve_credentials_with(&Config::default(), env).unwrap();
        assert_eq!(creds.number, "+14155238886");
        assert_eq!(creds.account_sid, "AC123");
        assert_eq!(creds.auth_token, "secret");
    }

    #[test]
    fn env_overrides_config_and_blank_env_falls_back() {
        let mut config = Config::default();
        config.twilio.number = Some("+1000".to_string());
        config.twilio.account_sid = Some("ACcfg".to_string());
        config.twilio.auth_token = Some("cfg-token".to_string());
        let env = env_from(&[("TWILIO_SID", "ACenv"), ("TWILIO_TOKEN", "   ")]);
        let creds = resolve_credentials_with(&config, env).unwrap();
        assert_eq!(creds.number, "+1000");
        assert_eq!(creds.account_sid, "ACenv");
        assert_eq!(creds.auth_token, "cfg-token");
    }

    #[test]
    fn missing_credentials_are_all_reported() {
        let env = env_from(&[("TWILIO_SID", "AC123"), ("TWILIO_TOKEN", "")]);
        let err = resolve_credentials_with(&Config::default(), env).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingCredentials(vec!["TWILIO_NUMBER", "TWILIO_TOKEN"])
        );
        assert_eq!(
            err.to_string(),
            "twilio credentials are missing: TWILIO_NUMBER, TWILIO_TOKEN"
        );
    }

    #[test]
    fn each_single_missing_credential_fails() {
        let all = [
            ("TWILIO_NUMBER", "+1555"),
            ("TWILIO_SID", "AC1"),
            ("TWILIO_TOKEN", "tok"),
        ];
        for skip in 0..all.len() {
            let pairs: Vec<(&str, &str)> = all
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != skip)
                .map(|(_, p)| *p)
                .collect();
            let err = resolve_credentials_with(&Config::default(), env_from(&pairs)).unwrap_err();
            assert_eq!(err, ConfigError::MissingCredentials(vec![all[skip].0]));
        }
    }

    #[test]
    fn credentials_debug_redacts_token() {
        let creds = TwilioCredentials {
            number: "+1".to_string(),
            account_sid: "AC".to_string(),
            auth_token: "very-secret".to_string(),
        };
        assert!(!format!("{:?}", creds).contains("very-secret"));
    }

    #[test]
    fn load_config_missing_file_is_default() {
        let path = std::env::temp_dir().join("menubot-config-does-not-exist.json");
        let config = load_config(Some(path)).unwrap();
        assert_eq!(config.gateway.port, 5000);
        assert!(config.twilio.number.is_none());
    }
}
