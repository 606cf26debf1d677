use crate::core::archive::Archiver;
use crate::core::metadata::{MetadataBuilder, DEFAULT_LICENSE};
use crate::core::output::OutputFormat;
use crate::core::zenodo::ZenodoEnvironment;
use crate::domain::model::UploadType;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_base_url, validate_license, validate_non_empty_string, validate_save_archive_path, Validate,
};
use clap::{ArgAction, Parser};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Parser)]
#[command(name = "anon-to-zenodo", version)]
#[command(about = "Zip a directory and upload it to Zenodo using existing credentials")]
pub struct CliConfig {
    /// Title for the deposition (default: directory name)
    #[arg(long)]
    pub title: Option<String>,

    /// Description / abstract (default: 'automatic anonymization and upload to zenodo')
    #[arg(long)]
    pub description: Option<String>,

    /// Creator as 'Family, Given'; repeat for several, order is kept
    #[arg(long = "creator", value_name = "FAMILY, GIVEN")]
    pub creators: Vec<String>,

    /// Replace creators with the anonymous placeholder (implied when no --creator is given)
    #[arg(long)]
    pub anonymous: bool,

    /// Directory to archive
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    /// SPDX license identifier
    #[arg(long, default_value = DEFAULT_LICENSE)]
    pub license: String,

    #[arg(long, value_enum, default_value_t = UploadType::Dataset)]
    pub upload_type: UploadType,

    /// Keyword for the deposition; repeatable
    #[arg(long = "keyword")]
    pub keywords: Vec<String>,

    /// Extra file or directory name to leave out of the archive; repeatable
    #[arg(long = "ignore", value_name = "NAME")]
    pub ignore: Vec<String>,

    /// Also write the archive to this path
    #[arg(long, value_name = "PATH")]
    pub save_archive: Option<PathBuf>,

    /// Use Zenodo sandbox (https://sandbox.zenodo.org)
    #[arg(long)]
    pub sandbox: bool,

    /// Create the deposition as a draft and do not publish it
    #[arg(long)]
    pub no_publish: bool,

    /// Print the JSON response instead of the URL
    #[arg(long)]
    pub json: bool,

    /// API token (default: ZENODO_API_TOKEN / ZENODO_SANDBOX_API_TOKEN, then the config file)
    #[arg(long)]
    pub token: Option<String>,

    /// Path to a TOML config file with credentials
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "ZENODO_BASE_URL", hide = true)]
    pub base_url: Option<String>,

    /// Increase verbosity (repeat for more)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,
}

impl CliConfig {
    pub fn environment(&self) -> ZenodoEnvironment {
        ZenodoEnvironment::from_sandbox_flag(self.sandbox)
    }

    pub fn output_format(&self) -> OutputFormat {
        OutputFormat::from_json_flag(self.json)
    }

    pub fn publish(&self) -> bool {
        !self.no_publish
    }

    pub fn is_anonymous(&self) -> bool {
        self.anonymous || self.creators.is_empty()
    }

    /// `--title`, or the name of the archived directory.
    pub fn resolved_title(&self) -> String {
        if let Some(title) = &self.title {
            return title.clone();
        }
        directory_name(&self.dir)
    }

    pub fn metadata_builder(&self) -> MetadataBuilder {
        let mut builder = MetadataBuilder::new()
            .title(self.resolved_title())
            .creators(self.creators.iter().cloned())
            .anonymous(self.is_anonymous())
            .license(self.license.clone())
            .upload_type(self.upload_type)
            .keywords(self.keywords.iter().cloned());
        if let Some(description) = &self.description {
            builder = builder.description(description.clone());
        }
        builder
    }

    pub fn archiver(&self) -> Archiver {
        let archiver = Archiver::new().with_ignored(self.ignore.iter().cloned());
        match &self.save_archive {
            Some(path) => archiver.skipping_path(path),
            None => archiver,
        }
    }
}

fn directory_name(dir: &Path) -> String {
    let resolved = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
    resolved
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("dir", &self.dir.to_string_lossy())?;
        validate_license("license", &self.license)?;
        if let Some(title) = &self.title {
            validate_non_empty_string("title", title)?;
        }
        if let Some(base_url) = &self.base_url {
            validate_base_url("base_url", base_url)?;
        }
        if let Some(path) = &self.save_archive {
            validate_save_archive_path("save_archive", path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Creator;

    fn parse(args: &[&str]) -> CliConfig {
        let mut argv = vec!["anon-to-zenodo"];
        argv.extend_from_slice(args);
        CliConfig::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]);
        assert_eq!(config.dir, PathBuf::from("."));
        assert_eq!(config.license, "CC0-1.0");
        assert_eq!(config.upload_type, UploadType::Dataset);
        assert_eq!(config.environment(), ZenodoEnvironment::Production);
        assert_eq!(config.output_format(), OutputFormat::Link);
        assert!(config.publish());
        assert!(config.is_anonymous());
    }

    #[test]
    fn test_repeatable_creators_keep_order() {
        let config = parse(&["--creator", "Doe, Jane", "--creator", "Smith, John", "--title", "T"]);
        assert!(!config.is_anonymous());

        let metadata = config.metadata_builder().build().unwrap();
        assert_eq!(
            metadata.creators,
            vec![Creator::new("Doe", "Jane"), Creator::new("Smith", "John")]
        );
    }

    #[test]
    fn test_flags() {
        let config = parse(&["--sandbox", "--no-publish", "--json", "-vv", "--upload-type", "software"]);
        assert_eq!(config.environment(), ZenodoEnvironment::Sandbox);
        assert!(!config.publish());
        assert_eq!(config.output_format(), OutputFormat::Json);
        assert_eq!(config.verbose, 2);
        assert_eq!(config.upload_type, UploadType::Software);
    }

    #[test]
    fn test_title_defaults_to_directory_name() {
        let dir = tempfile::TempDir::new().unwrap();
        let project = dir.path().join("field-data");
        std::fs::create_dir(&project).unwrap();

        let config = parse(&["--dir", project.to_str().unwrap()]);
        assert_eq!(config.resolved_title(), "field-data");

        let config = parse(&["--dir", project.to_str().unwrap(), "--title", "Explicit"]);
        assert_eq!(config.resolved_title(), "Explicit");
    }

    #[test]
    fn test_validate_rejects_blank_title_and_bad_base_url() {
        assert!(parse(&["--title", " "]).validate().is_err());
        assert!(parse(&["--base-url", "not a url"]).validate().is_err());
        assert!(parse(&["--base-url", "http://127.0.0.1:9000"]).validate().is_ok());
        assert!(parse(&["--base-url", "https://zenodo.org/?token=x"]).validate().is_err());
    }

    #[test]
    fn test_validate_checks_license_and_save_archive() {
        let dir = tempfile::TempDir::new().unwrap();
        let saved = dir.path().join("copy.zip");
        let not_zip = dir.path().join("copy.txt");

        assert!(parse(&["--license", "CC BY"]).validate().is_err());
        assert!(parse(&["--license", "CC-BY-4.0"]).validate().is_ok());
        assert!(parse(&["--save-archive", saved.to_str().unwrap()]).validate().is_ok());
        assert!(parse(&["--save-archive", not_zip.to_str().unwrap()]).validate().is_err());
        assert!(parse(&["--save-archive", dir.path().to_str().unwrap()]).validate().is_err());
    }
}
