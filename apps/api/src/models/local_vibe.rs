use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum VibeKind {
    Deal,
    #[default]
    Event,
    Food,
    Career,
}

impl From<String> for VibeKind {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "deal" => VibeKind::Deal,
            "food" => VibeKind::Food,
            "career" => VibeKind::Career,
            _ => VibeKind::Event,
        }
    }
}

/// One recommendation for a city. `title` is the only required key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalVibeItem {
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: VibeKind,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub location_detail: String,
    #[serde(default)]
    pub image_query: String,
}

/// Durable per-location cache of generated recommendations.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LocalVibeRow {
    pub id: Uuid,
    pub city: String,
    pub country: String,
    pub offers: Json<Vec<LocalVibeItem>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_defaults_missing_keys() {
        let item: LocalVibeItem = serde_json::from_value(json!({"title": "Jazz Night"})).unwrap();
        assert_eq!(item.kind, VibeKind::Event);
        assert_eq!(item.description, "");
    }

    #[test]
    fn test_kind_is_case_insensitive() {
        let item: LocalVibeItem =
            serde_json::from_value(json!({"title": "Half-price tacos", "type": "food"})).unwrap();
        assert_eq!(item.kind, VibeKind::Food);
        assert_eq!(serde_json::to_value(item.kind).unwrap(), json!("Food"));
    }

    #[test]
    fn test_item_requires_title() {
        let result = serde_json::from_value::<LocalVibeItem>(json!({"type": "Deal"}));
        assert!(result.is_err());
    }
}
