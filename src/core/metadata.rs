use crate::domain::model::{Creator, DepositionMetadata, UploadType};
use crate::utils::error::{Result, ZenodoError};
use chrono::NaiveDate;

pub const DEFAULT_DESCRIPTION: &str = "automatic anonymization and upload to zenodo";
pub const DEFAULT_LICENSE: &str = "CC0-1.0";

/// Placeholder creator used for anonymous submissions.
pub const ANONYMOUS_CREATOR: &str = "Authors, Anonymous";

/// Parses a `"Family, Given"` creator string.
pub fn parse_creator(value: &str) -> Result<Creator> {
    let invalid = |reason: &str| ZenodoError::InvalidCreator {
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let (family, given) = value
        .split_once(',')
        .ok_or_else(|| invalid("expected the format 'Family, Given'"))?;

    let family = family.trim();
    let given = given.trim();
    if family.is_empty() {
        return Err(invalid("family name is empty"));
    }
    if given.is_empty() {
        return Err(invalid("given name is empty"));
    }

    Ok(Creator::new(family, given))
}

#[derive(Debug, Clone, Default)]
pub struct MetadataBuilder {
    title: Option<String>,
    description: Option<String>,
    creators: Vec<String>,
    license: Option<String>,
    upload_type: UploadType,
    keywords: Vec<String>,
    publication_date: Option<NaiveDate>,
    anonymous: bool,
}

impl MetadataBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn creator(mut self, creator: impl Into<String>) -> Self {
        self.creators.push(creator.into());
        self
    }

    pub fn creators<I, S>(mut self, creators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.creators.extend(creators.into_iter().map(Into::into));
        self
    }

    pub fn license(mut self, license: impl Into<String>) -> Self {
        self.license = Some(license.into());
        self
    }

    pub fn upload_type(mut self, upload_type: UploadType) -> Self {
        self.upload_type = upload_type;
        self
    }

    pub fn keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords.extend(keywords.into_iter().map(Into::into));
        self
    }

    pub fn publication_date(mut self, date: NaiveDate) -> Self {
        self.publication_date = Some(date);
        self
    }

    /// Replace whatever creators were given with [`ANONYMOUS_CREATOR`].
    pub fn anonymous(mut self, anonymous: bool) -> Self {
        self.anonymous = anonymous;
        self
    }

    pub fn build(self) -> Result<DepositionMetadata> {
        let title = self
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(ZenodoError::MissingField("title"))?;

        let creators = if self.anonymous {
            if !self.creators.is_empty() {
                tracing::info!(
                    "Anonymous mode: replacing {} creator(s) with '{}'",
                    self.creators.len(),
                    ANONYMOUS_CREATOR
                );
            }
            vec![parse_creator(ANONYMOUS_CREATOR)?]
        } else {
            if self.creators.is_empty() {
                return Err(ZenodoError::MissingField("creators"));
            }
            self.creators
                .iter()
                .map(|c| parse_creator(c))
                .collect::<Result<Vec<_>>>()?
        };

        let description = self
            .description
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());

        let license = self
            .license
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LICENSE.to_string());

        let keywords = self
            .keywords
            .into_iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();

        Ok(DepositionMetadata {
            title,
            upload_type: self.upload_type,
            description,
            creators,
            license,
            publication_date: self
                .publication_date
                .unwrap_or_else(|| chrono::Local::now().date_naive()),
            keywords,
        })
    }
}
