#[cfg(feature = "cli")]
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::TomlConfig;
pub use core::{
    archive::Archiver,
    metadata::MetadataBuilder,
    output::OutputFormat,
    upload::UploadEngine,
    zenodo::{ZenodoClient, ZenodoEnvironment},
};
pub use utils::error::{Result, ZenodoError};
