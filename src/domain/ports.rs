use crate::domain::model::{Archive, Deposition, DepositionMetadata};
use crate::utils::error::Result;
use async_trait::async_trait;

/// The three deposition calls the upload flow needs.
#[async_trait]
pub trait DepositionApi: Send + Sync {
    async fn create(&self, metadata: &DepositionMetadata) -> Result<Deposition>;
    /// Takes the archive by value so its bytes move into the request body.
    async fn upload(&self, deposition: &Deposition, archive: Archive) -> Result<serde_json::Value>;
    async fn publish(&self, deposition: &Deposition) -> Result<Deposition>;

    /// Landing page for a deposition whose response carried no `links.html`.
    fn fallback_html_url(&self, deposition_id: u64, published: bool) -> String;
}
