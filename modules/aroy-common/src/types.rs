use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Model-produced records
// =============================================================================

/// One restaurant entry extracted from the model's output.
///
/// Ids follow the "rest-N" convention the prompt demands; they are unique
/// within a single response and carry no meaning beyond it. Nothing here is
/// ever persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub cuisine: String,
    #[serde(default)]
    pub address: String,
    /// 1.0–5.0, up to one decimal place.
    #[serde(default)]
    pub rating: f32,
    /// "$" through "$$$$".
    #[serde(default)]
    pub price_range: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// One food entry extracted from the model's output. Ids follow "food-N".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Food {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub cuisine: String,
    #[serde(default)]
    pub description: String,
    /// 5–8 main ingredients when the model supplies them.
    #[serde(default)]
    pub ingredients: Option<Vec<String>>,
    #[serde(default)]
    pub image_url: Option<String>,
}

// =============================================================================
// Chat transcript
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// One entry in a client's transcript. Created on submission and on response
/// arrival; the transcript itself lives with the client, never on the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

// =============================================================================
// Request / response boundary
// =============================================================================

/// Search parameters accepted from the UI. At least one field must be set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food_type: Option<String>,
}

/// Response body for one recommendation request. A single-intent call
/// populates restaurants or foods, never both; `error` annotates a failed
/// branch without suppressing the surviving one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecommendResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurants: Option<Vec<Restaurant>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foods: Option<Vec<Food>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restaurant_parses_camel_case_fields() {
        let raw = r#"{
            "id": "rest-1",
            "name": "Som Tam Nua",
            "cuisine": "Thai",
            "address": "392/14 Siam Square Soi 5, Bangkok",
            "rating": 4.5,
            "priceRange": "$$",
            "description": "Famous papaya salad spot.",
            "imageUrl": null
        }"#;
        let r: Restaurant = serde_json::from_str(raw).unwrap();
        assert_eq!(r.id, "rest-1");
        assert_eq!(r.price_range, "$$");
        assert!(r.image_url.is_none());
    }

    #[test]
    fn restaurant_tolerates_missing_optional_fields() {
        let r: Restaurant =
            serde_json::from_str(r#"{"id": "rest-2", "name": "No Name"}"#).unwrap();
        assert_eq!(r.rating, 0.0);
        assert!(r.image_url.is_none());
    }

    #[test]
    fn food_ingredients_are_optional() {
        let f: Food = serde_json::from_str(r#"{"id": "food-1", "name": "Pad Thai"}"#).unwrap();
        assert!(f.ingredients.is_none());
    }

    #[test]
    fn search_params_accepts_food_type_key() {
        let p: SearchParams = serde_json::from_str(r#"{"foodType": "noodles"}"#).unwrap();
        assert_eq!(p.food_type.as_deref(), Some("noodles"));
        assert!(p.location.is_none());
    }

    #[test]
    fn empty_response_serializes_to_empty_object() {
        let body = serde_json::to_string(&RecommendResponse::default()).unwrap();
        assert_eq!(body, "{}");
    }

    #[test]
    fn chat_message_roles_serialize_lowercase() {
        let msg = ChatMessage::user("hello");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "hello");
    }
}
