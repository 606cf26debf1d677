use crate::core::zenodo::ZenodoEnvironment;
use crate::utils::error::{Result, ZenodoError};
use crate::utils::validation::{require_token, validate_base_url, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const TOKEN_ENV: &str = "ZENODO_API_TOKEN";
pub const SANDBOX_TOKEN_ENV: &str = "ZENODO_SANDBOX_API_TOKEN";

/// Optional credentials file, e.g. `~/.config/anon-to-zenodo/config.toml`:
///
/// ```toml
/// api_token = "${ZENODO_TOKEN}"
/// sandbox_api_token = "abc123"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    pub api_token: Option<String>,
    pub sandbox_api_token: Option<String>,
    pub base_url: Option<String>,
    pub sandbox_base_url: Option<String>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ZenodoError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ZenodoError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// `<config_dir>/anon-to-zenodo/config.toml`, when the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("anon-to-zenodo").join("config.toml"))
    }

    /// Loads `explicit` (which must exist) or the default file if present.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => {
                tracing::debug!("Loading config from {}", path.display());
                Self::from_file(path)
            }
            None => match Self::default_path() {
                Some(path) if path.is_file() => {
                    tracing::debug!("Loading config from {}", path.display());
                    Self::from_file(path)
                }
                _ => Ok(Self::default()),
            },
        }
    }

    // Replaces ${VAR}; unknown variables are left as written.
    fn substitute_env_vars(content: &str) -> String {
        let re = match Regex::new(r"\$\{([^}]+)\}") {
            Ok(re) => re,
            Err(_) => return content.to_string(),
        };

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    pub fn token_for(&self, environment: ZenodoEnvironment) -> Option<&str> {
        match environment {
            ZenodoEnvironment::Production => self.api_token.as_deref(),
            ZenodoEnvironment::Sandbox => self.sandbox_api_token.as_deref(),
        }
    }

    pub fn base_url_for(&self, environment: ZenodoEnvironment) -> Option<&str> {
        match environment {
            ZenodoEnvironment::Production => self.base_url.as_deref(),
            ZenodoEnvironment::Sandbox => self.sandbox_base_url.as_deref(),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        for (field, url) in [
            ("base_url", &self.base_url),
            ("sandbox_base_url", &self.sandbox_base_url),
        ] {
            if let Some(url) = url {
                validate_base_url(field, url)?;
            }
        }
        Ok(())
    }
}

/// Picks the API token: explicit flag, then the environment, then the config file.
///
/// `env` is the environment lookup, `std::env::var(..).ok()` outside tests.
pub fn resolve_token<F>(
    explicit: Option<&str>,
    environment: ZenodoEnvironment,
    file: &TomlConfig,
    env: F,
) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let env_name = match environment {
        ZenodoEnvironment::Production => TOKEN_ENV,
        ZenodoEnvironment::Sandbox => SANDBOX_TOKEN_ENV,
    };

    let non_blank = |t: String| (!t.trim().is_empty()).then(|| t.trim().to_string());

    let token = explicit
        .map(str::to_string)
        .and_then(non_blank)
        .or_else(|| env(env_name).and_then(non_blank))
        .or_else(|| file.token_for(environment).map(str::to_string).and_then(non_blank));

    require_token(env_name, token)
}
