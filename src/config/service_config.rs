use crate::utils::error::{Result, ServiceError};
use crate::utils::validation::{
    validate_non_empty_string, validate_range, validate_socket_addr, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

pub const DEFAULT_API_BASE_URL: &str = "https://api.airtable.com/v0";
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub airtable: AirtableConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

/// Credentials and location of the records API.
#[derive(Clone, Serialize, Deserialize)]
pub struct AirtableConfig {
    pub api_key: String,
    pub space_id: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    pub request_timeout_secs: Option<u64>,
}

fn default_bind_address() -> String {
    DEFAULT_BIND_ADDRESS.to_string()
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

impl fmt::Debug for AirtableConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AirtableConfig")
            .field("api_key", &"***")
            .field("space_id", &self.space_id)
            .field("api_base_url", &self.api_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl AirtableConfig {
    /// Reads `AIRTABLE_KEY`, `AIRTABLE_APP`, and optionally `AIRTABLE_API_URL`
    /// and `AIRTABLE_TIMEOUT_SECS` from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name).ok_or_else(|| ServiceError::MissingConfigError {
                field: name.to_string(),
            })
        };

        let request_timeout_secs = match lookup("AIRTABLE_TIMEOUT_SECS") {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|e| {
                ServiceError::InvalidConfigValueError {
                    field: "AIRTABLE_TIMEOUT_SECS".to_string(),
                    value: raw.clone(),
                    reason: e.to_string(),
                }
            })?),
            None => None,
        };

        Ok(Self {
            api_key: required("AIRTABLE_KEY")?,
            space_id: required("AIRTABLE_APP")?,
            api_base_url: lookup("AIRTABLE_API_URL").unwrap_or_else(default_api_base_url),
            request_timeout_secs,
        })
    }
}

impl Validate for AirtableConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("airtable.api_key", &self.api_key)?;
        validate_non_empty_string("airtable.space_id", &self.space_id)?;
        validate_url("airtable.api_base_url", &self.api_base_url)?;
        if let Some(timeout) = self.request_timeout_secs {
            validate_range("airtable.request_timeout_secs", timeout, 1, 300)?;
        }
        Ok(())
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<()> {
        validate_socket_addr("server.bind_address", &self.bind_address)
    }
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            server: ServerConfig::default(),
            airtable: AirtableConfig::from_env()?,
        })
    }

    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ServiceError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::from_toml_str_with(content, |name| std::env::var(name).ok())
    }

    /// Parses TOML after replacing `${VAR}` references through `lookup`.
    /// Unknown variables are left as written.
    pub fn from_toml_str_with<F>(content: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let processed = substitute_vars(content, lookup)?;

        toml::from_str(&processed).map_err(|e| ServiceError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }
}

impl Validate for ServiceConfig {
    fn validate(&self) -> Result<()> {
        self.server.validate()?;
        self.airtable.validate()?;
        tracing::debug!("Configuration validation passed");
        Ok(())
    }
}

fn substitute_vars<F>(content: &str, lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| ServiceError::ConfigError {
        message: format!("invalid substitution pattern: {}", e),
    })?;

    let result = re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        lookup(var_name).unwrap_or_else(|| format!("${{{}}}", var_name))
    });

    Ok(result.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_from_lookup_reads_required_values() {
        let config =
            AirtableConfig::from_lookup(env(&[("AIRTABLE_KEY", "key"), ("AIRTABLE_APP", "app1")]))
                .unwrap();

        assert_eq!(config.api_key, "key");
        assert_eq!(config.space_id, "app1");
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.request_timeout_secs, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_lookup_requires_key_and_space() {
        let err = AirtableConfig::from_lookup(env(&[("AIRTABLE_APP", "app1")])).unwrap_err();
        assert!(
            matches!(err, ServiceError::MissingConfigError { ref field } if field == "AIRTABLE_KEY")
        );

        let err = AirtableConfig::from_lookup(env(&[("AIRTABLE_KEY", "key")])).unwrap_err();
        assert!(
            matches!(err, ServiceError::MissingConfigError { ref field } if field == "AIRTABLE_APP")
        );
    }

    #[test]
    fn test_from_lookup_rejects_bad_timeout() {
        let err = AirtableConfig::from_lookup(env(&[
            ("AIRTABLE_KEY", "key"),
            ("AIRTABLE_APP", "app1"),
            ("AIRTABLE_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidConfigValueError { .. }));
    }

    #[test]
    fn test_debug_hides_api_key() {
        let config = AirtableConfig::from_lookup(env(&[
            ("AIRTABLE_KEY", "super-secret"),
            ("AIRTABLE_APP", "app1"),
        ]))
        .unwrap();
        let printed = format!("{:?}", config);
        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("app1"));
    }

    #[test]
    fn test_toml_with_substitution() {
        let content = r#"
[server]
bind_address = "127.0.0.1:9000"

[airtable]
api_key = "${TEST_AIRTABLE_KEY}"
space_id = "app1"
request_timeout_secs = 10
"#;

        let config =
            ServiceConfig::from_toml_str_with(content, env(&[("TEST_AIRTABLE_KEY", "from-env")]))
                .unwrap();

        assert_eq!(config.server.bind_address, "127.0.0.1:9000");
        assert_eq!(config.airtable.api_key, "from-env");
        assert_eq!(config.airtable.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.airtable.request_timeout_secs, Some(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_unknown_variable_is_kept() {
        let content = r#"
[airtable]
api_key = "${NOT_SET_ANYWHERE}"
space_id = "app1"
"#;

        let config = ServiceConfig::from_toml_str_with(content, env(&[])).unwrap();
        assert_eq!(config.airtable.api_key, "${NOT_SET_ANYWHERE}");
        assert_eq!(config.server.bind_address, DEFAULT_BIND_ADDRESS);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = ServiceConfig::from_toml_str_with(
            "[airtable]\napi_key = \"k\"\nspace_id = \"app1\"\n",
            env(&[]),
        )
        .unwrap();
        assert!(config.validate().is_ok());

        config.airtable.api_base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        config.airtable.api_base_url = DEFAULT_API_BASE_URL.to_string();
        config.server.bind_address = "not-an-address".to_string();
        assert!(config.validate().is_err());

        config.server.bind_address = DEFAULT_BIND_ADDRESS.to_string();
        config.airtable.request_timeout_secs = Some(0);
        assert!(config.validate().is_err());
    }
}
