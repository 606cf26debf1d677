use crate::utils::error::{Result, ZenodoError};
use regex::Regex;
use std::path::Path;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: &str, reason: impl Into<String>) -> ZenodoError {
    ZenodoError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// A Zenodo instance root: http(s), a host, and nothing the API paths would be appended after.
pub fn validate_base_url(field: &str, value: &str) -> Result<Url> {
    if value.trim().is_empty() {
        return Err(invalid(field, value, "URL cannot be empty"));
    }

    let url = Url::parse(value).map_err(|e| invalid(field, value, format!("Invalid URL format: {}", e)))?;
    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(invalid(field, value, format!("Unsupported URL scheme: {}", scheme))),
    }
    if url.host_str().is_none() {
        return Err(invalid(field, value, "URL has no host"));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid(
            field,
            value,
            "URL must not carry a query or fragment; API paths are appended to it",
        ));
    }
    // the token goes in the Authorization header
    if !url.username().is_empty() || url.password().is_some() {
        return Err(invalid(field, value, "URL must not embed credentials"));
    }
    Ok(url)
}

/// Where `--save-archive` writes: a `.zip` file name that is not an existing directory.
pub fn validate_save_archive_path(field: &str, path: &Path) -> Result<()> {
    let display = path.display().to_string();
    if path.as_os_str().is_empty() {
        return Err(invalid(field, &display, "Path cannot be empty"));
    }
    if path.is_dir() {
        return Err(invalid(field, &display, "Path is a directory; give a file name ending in .zip"));
    }

    let is_zip = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("zip"))
        .unwrap_or(false);
    if !is_zip {
        return Err(invalid(field, &display, "Archive file name must end in .zip"));
    }
    Ok(())
}

const SPDX_ID_PATTERN: &str = r"^[A-Za-z0-9][A-Za-z0-9.+-]*$";

/// License identifiers are SPDX ids such as `CC0-1.0` or `CC-BY-4.0`.
pub fn validate_license(field: &str, value: &str) -> Result<()> {
    let spdx_id = Regex::new(SPDX_ID_PATTERN).map_err(|e| ZenodoError::ConfigValidationError {
        field: field.to_string(),
        message: e.to_string(),
    })?;
    if !spdx_id.is_match(value) {
        return Err(invalid(
            field,
            value,
            "Expected an SPDX license identifier such as CC0-1.0 or CC-BY-4.0",
        ));
    }
    Ok(())
}

pub fn validate_non_empty_string(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field, value, "Value cannot be empty or whitespace-only"));
    }
    Ok(())
}

/// Unwraps a resolved token, naming the environment variable that would have supplied it.
pub fn require_token(env_name: &str, token: Option<String>) -> Result<String> {
    token.ok_or_else(|| ZenodoError::MissingConfigError {
        field: env_name.to_string(),
    })
}
