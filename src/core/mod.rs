pub mod archive;
pub mod metadata;
pub mod output;
pub mod upload;
pub mod zenodo;

pub use crate::domain::model::{Archive, Creator, Deposition, DepositionMetadata, UploadOutcome};
pub use crate::domain::ports::DepositionApi;
pub use crate::utils::error::Result;
