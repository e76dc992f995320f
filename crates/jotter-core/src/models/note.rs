use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Payload for creating a note.
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NoteDraft {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Title must be between 1 and 100 characters"
    ))]
    pub title: String,
    #[validate(length(min = 1, message = "Content must not be empty"))]
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub image_urls: Vec<String>,
}

/// One row of a paginated note listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteSummary {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub like_count: i64,
    #[serde(default)]
    pub collect_count: i64,
}

/// Full note detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub like_count: i64,
    #[serde(default)]
    pub collect_count: i64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Paginated listing as returned by the list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotePage {
    pub records: Vec<NoteSummary>,
    pub total: i64,
    pub current: i64,
    pub page_size: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn draft(title: &str, content: &str) -> NoteDraft {
        NoteDraft {
            title: title.to_string(),
            content: content.to_string(),
            cover_url: None,
            image_urls: Vec::new(),
        }
    }

    #[test]
    fn valid_draft_passes() {
        assert!(draft("Trip notes", "Day one.").validate().is_ok());
    }

    #[test]
    fn empty_title_rejected() {
        assert!(draft("", "Day one.").validate().is_err());
    }

    #[test]
    fn empty_content_rejected() {
        assert!(draft("Trip notes", "").validate().is_err());
    }

    #[test]
    fn draft_serializes_camel_case_and_skips_empty() {
        let value = serde_json::to_value(draft("T", "C")).unwrap();
        assert_eq!(value["title"], "T");
        assert!(value.get("coverUrl").is_none());
        assert!(value.get("imageUrls").is_none());
    }

    #[test]
    fn page_deserializes() {
        let json = r#"{
            "records": [{"id": 1, "title": "A", "likeCount": 3}],
            "total": 1,
            "current": 1,
            "pageSize": 20
        }"#;
        let page: NotePage = serde_json::from_str(json).unwrap();
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.records[0].like_count, 3);
        assert_eq!(page.page_size, 20);
    }
}
