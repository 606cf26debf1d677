use crate::config::toml_config::{resolve_token, TomlConfig};
use crate::config::CliConfig;
use crate::core::output::render;
use crate::core::upload::UploadEngine;
use crate::core::zenodo::ZenodoClient;
use crate::utils::error::Result;
use crate::utils::validation::Validate;

/// Archives `config.dir`, uploads it and returns the text to print on stdout.
///
/// Everything that can fail locally (flags, metadata, token, archive) is checked
/// before the first HTTP request. `env` looks up environment variables.
pub async fn run<F>(config: &CliConfig, env: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    config.validate()?;

    let file_config = TomlConfig::load(config.config.as_deref())?;
    file_config.validate()?;

    let metadata = config.metadata_builder().build()?;
    tracing::debug!(
        "Metadata: title='{}', {} creator(s), license={}, upload_type={:?}",
        metadata.title,
        metadata.creators.len(),
        metadata.license,
        metadata.upload_type
    );

    let environment = config.environment();
    let token = resolve_token(config.token.as_deref(), environment, &file_config, &env)?;

    let archive = config.archiver().zip_directory(&config.dir)?;
    if let Some(path) = &config.save_archive {
        archive.write_to(path)?;
    }

    let base_url = config
        .base_url
        .as_deref()
        .or_else(|| file_config.base_url_for(environment))
        .unwrap_or(environment.base_url());
    tracing::info!("Using Zenodo at {}", base_url);

    let client = ZenodoClient::with_base_url(base_url, token)?;
    let engine = UploadEngine::new(client).with_publish(config.publish());
    let outcome = engine.run(&metadata, archive).await?;

    tracing::info!(
        "Deposition {} {}",
        outcome.deposition_id,
        if outcome.published { "published" } else { "saved as draft" }
    );

    render(&outcome, config.output_format())
}
