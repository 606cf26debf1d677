use chrono::NaiveDate;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// A deposition creator. Zenodo expects `{"name": "Family, Given"}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Creator {
    pub family: String,
    pub given: String,
}

impl Creator {
    pub fn new(family: impl Into<String>, given: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            given: given.into(),
        }
    }

    pub fn display_name(&self) -> String {
        format!("{}, {}", self.family, self.given)
    }
}

impl Serialize for Creator {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Creator", 1)?;
        state.serialize_field("name", &self.display_name())?;
        state.end()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum UploadType {
    #[default]
    Dataset,
    Software,
    Publication,
    Poster,
    Presentation,
    Image,
    Video,
    Lesson,
    Physicalobject,
    Other,
}

/// The `metadata` object of a Zenodo deposition.
#[derive(Debug, Clone, Serialize)]
pub struct DepositionMetadata {
    pub title: String,
    pub upload_type: UploadType,
    pub description: String,
    pub creators: Vec<Creator>,
    pub license: String,
    pub publication_date: NaiveDate,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
}

/// A zipped directory, held in memory until it is uploaded.
#[derive(Debug, Clone)]
pub struct Archive {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub entries: Vec<String>,
}

impl Archive {
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DepositionLinks {
    pub bucket: Option<String>,
    pub publish: Option<String>,
    pub html: Option<String>,
}

/// A deposition as returned by the create and publish endpoints.
#[derive(Debug, Clone)]
pub struct Deposition {
    pub id: u64,
    pub links: DepositionLinks,
    pub raw: serde_json::Value,
}

#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub deposition_id: u64,
    pub published: bool,
    pub html_url: String,
    pub response: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creator_serializes_as_zenodo_name() {
        let creator = Creator::new("Doe", "Jane");
        let value = serde_json::to_value(&creator).unwrap();
        assert_eq!(value, serde_json::json!({"name": "Doe, Jane"}));
    }

    #[test]
    fn test_metadata_serialization() {
        let metadata = DepositionMetadata {
            title: "Snapshot".to_string(),
            upload_type: UploadType::Dataset,
            description: "desc".to_string(),
            creators: vec![Creator::new("Doe", "Jane"), Creator::new("Smith", "John")],
            license: "CC0-1.0".to_string(),
            publication_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            keywords: vec![],
        };

        let value = serde_json::to_value(&metadata).unwrap();
        assert_eq!(value["upload_type"], "dataset");
        assert_eq!(value["publication_date"], "2024-05-01");
        assert_eq!(value["creators"][0]["name"], "Doe, Jane");
        assert_eq!(value["creators"][1]["name"], "Smith, John");
        assert!(value.get("keywords").is_none());
    }
}
