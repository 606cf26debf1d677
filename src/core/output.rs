use crate::domain::model::UploadOutcome;
use crate::utils::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// The deposition's landing page URL.
    #[default]
    Link,
    /// The full JSON body of the last deposition response.
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Link
        }
    }
}

pub fn render(outcome: &UploadOutcome, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Link => Ok(outcome.html_url.clone()),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&outcome.response)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome() -> UploadOutcome {
        UploadOutcome {
            deposition_id: 12,
            published: true,
            html_url: "https://zenodo.org/records/12".to_string(),
            response: serde_json::json!({"id": 12, "links": {"html": "https://zenodo.org/records/12"}}),
        }
    }

    #[test]
    fn test_render_link() {
        let rendered = render(&outcome(), OutputFormat::from_json_flag(false)).unwrap();
        assert_eq!(rendered, "https://zenodo.org/records/12");
        assert!(url::Url::parse(&rendered).is_ok());
    }

    #[test]
    fn test_render_json_round_trips_response() {
        let rendered = render(&outcome(), OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed, outcome().response);
    }
}
