use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use aroy_common::{AroyError, ChatMessage, RecommendResponse, SearchParams};
use aroy_core::{classify, FoodOutcome, Intent};

use crate::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/", get(|| async { "ok" }))
        .route("/api/recommend", post(api_recommend))
        .route("/api/chat", post(api_chat))
        .with_state(state)
}

// --- Request/response bodies ---

#[derive(Deserialize)]
pub struct ChatRequest {
    content: String,
}

#[derive(Serialize)]
pub struct ChatReply {
    /// The echoed user message and the assistant's reply, ready for a
    /// stateless client to append to its transcript.
    pub messages: Vec<ChatMessage>,
    #[serde(flatten)]
    pub results: RecommendResponse,
}

// --- Handlers ---

pub async fn api_recommend(
    State(state): State<Arc<AppState>>,
    Json(params): Json<SearchParams>,
) -> impl IntoResponse {
    match run_search(&state, &params).await {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(AroyError::Validation(message)) => {
            warn!(message, "Rejected recommendation request");
            (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": message })),
            )
                .into_response()
        }
        Err(e) => {
            warn!(error = %e, "Failed to process recommendation request");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "Failed to process request" })),
            )
                .into_response()
        }
    }
}

pub async fn api_chat(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ChatRequest>,
) -> impl IntoResponse {
    let content = body.content.trim().to_string();
    if content.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "Message content is required" })),
        )
            .into_response();
    }

    let params = match classify(&content) {
        Intent::Location(location) => SearchParams {
            location: Some(location),
            food_type: None,
        },
        Intent::FoodType(food_type) => SearchParams {
            location: None,
            food_type: Some(food_type),
        },
    };

    let results = match run_search(&state, &params).await {
        Ok(results) => results,
        Err(e) => {
            warn!(error = %e, "Failed to process chat request");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "Failed to process request" })),
            )
                .into_response();
        }
    };

    let summary = match (&results.restaurants, &results.foods) {
        (Some(restaurants), _) if !restaurants.is_empty() => format!(
            "Here are {} restaurant recommendations for you.",
            restaurants.len()
        ),
        (_, Some(foods)) if !foods.is_empty() => {
            format!("Here are {} food recommendations for you.", foods.len())
        }
        _ => "Sorry, I couldn't find any recommendations for that. \
              Try a different place or dish."
            .to_string(),
    };

    let reply = ChatReply {
        messages: vec![ChatMessage::user(content), ChatMessage::assistant(summary)],
        results,
    };
    (StatusCode::OK, Json(reply)).into_response()
}

// --- Pipeline ---

/// Run the requested branches. Both branches are independent and run
/// concurrently under their own deadline; a branch that expires is reported
/// in `error` without touching the other branch's result.
async fn run_search(
    state: &AppState,
    params: &SearchParams,
) -> Result<RecommendResponse, AroyError> {
    let location = params
        .location
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let food_type = params
        .food_type
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    if location.is_none() && food_type.is_none() {
        return Err(AroyError::Validation(
            "Missing required parameters: location or foodType".to_string(),
        ));
    }

    let (restaurant_branch, food_branch) = tokio::join!(
        async {
            match location {
                Some(location) => Some(
                    tokio::time::timeout(
                        state.branch_timeout,
                        state.recommender.restaurants(location),
                    )
                    .await,
                ),
                None => None,
            }
        },
        async {
            match food_type {
                Some(food_type) => Some(
                    tokio::time::timeout(state.branch_timeout, state.recommender.foods(food_type))
                        .await,
                ),
                None => None,
            }
        },
    );

    let mut response = RecommendResponse::default();
    let mut errors = Vec::new();

    match restaurant_branch {
        Some(Ok(restaurants)) => response.restaurants = Some(restaurants),
        Some(Err(_)) => {
            warn!("Restaurant branch timed out");
            errors.push("Restaurant recommendations timed out");
        }
        None => {}
    }

    match food_branch {
        Some(Ok(FoodOutcome::Foods(foods))) => response.foods = Some(foods),
        Some(Ok(FoodOutcome::RedirectedRestaurants(restaurants))) => {
            // A redirected food query surfaces through the restaurant field;
            // an explicit location result wins if both were requested.
            if response.restaurants.is_none() {
                response.restaurants = Some(restaurants);
            }
        }
        Some(Err(_)) => {
            warn!("Food branch timed out");
            errors.push("Food recommendations timed out");
        }
        None => {}
    }

    if !errors.is_empty() {
        response.error = Some(errors.join("; "));
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use aroy_core::testing::{FailingModel, MockModel};
    use aroy_core::Recommender;

    fn test_state(model: Arc<MockModel>) -> Arc<AppState> {
        Arc::new(AppState {
            recommender: Recommender::new(model),
            branch_timeout: Duration::from_secs(5),
        })
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn restaurant_array(count: usize) -> String {
        let rows: Vec<Value> = (1..=count)
            .map(|n| {
                json!({
                    "id": format!("rest-{n}"),
                    "name": format!("Restaurant {n}"),
                    "cuisine": "Thai",
                    "address": format!("{n} Sukhumvit Road, Bangkok"),
                    "rating": 4.0,
                    "priceRange": "$$",
                    "description": "Worth a visit.",
                    "imageUrl": null
                })
            })
            .collect();
        serde_json::to_string(&rows).unwrap()
    }

    #[tokio::test]
    async fn missing_params_is_rejected_without_model_call() {
        let model = Arc::new(MockModel::new(Vec::<String>::new()));
        let app = router(test_state(model.clone()));

        let (status, body) = post_json(app, "/api/recommend", json!({})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "Missing required parameters: location or foodType"
        );
        assert!(model.prompts().is_empty());
    }

    #[tokio::test]
    async fn location_request_returns_verified_restaurants() {
        let all_ids: Vec<String> = (1..=15).map(|n| format!("rest-{n}")).collect();
        let model = Arc::new(MockModel::new([
            restaurant_array(15),
            serde_json::to_string(&all_ids).unwrap(),
        ]));
        let app = router(test_state(model));

        let (status, body) =
            post_json(app, "/api/recommend", json!({ "location": "Bangkok" })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["restaurants"].as_array().unwrap().len(), 15);
        assert!(body.get("foods").is_none());
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn food_type_request_returns_foods_only() {
        let model = Arc::new(MockModel::new([json!([
            {"id": "food-1", "name": "Khao Soi", "cuisine": "Northern Thai",
             "description": "Curried noodle soup.",
             "ingredients": ["egg noodles", "coconut milk", "curry paste", "chicken", "lime"]}
        ])
        .to_string()]));
        let app = router(test_state(model));

        let (status, body) =
            post_json(app, "/api/recommend", json!({ "foodType": "noodle soup" })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["foods"].as_array().unwrap().len(), 1);
        assert!(body.get("restaurants").is_none());
    }

    #[tokio::test]
    async fn failed_branches_degrade_to_empty_lists() {
        let state = Arc::new(AppState {
            recommender: Recommender::new(Arc::new(FailingModel)),
            branch_timeout: Duration::from_secs(5),
        });
        let app = router(state);

        let (status, body) = post_json(
            app,
            "/api/recommend",
            json!({ "location": "Bangkok", "foodType": "curry" }),
        )
        .await;

        // Upstream failure inside a branch is not a request failure.
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["restaurants"].as_array().unwrap().len(), 0);
        assert_eq!(body["foods"].as_array().unwrap().len(), 0);
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn chat_classifies_short_query_as_food_type() {
        let model = Arc::new(MockModel::new([json!([
            {"id": "food-1", "name": "ก๋วยเตี๋ยวเรือ (Boat Noodles)", "cuisine": "Thai",
             "description": "Rich pork-blood noodle soup.",
             "ingredients": ["rice noodles", "pork", "blood", "morning glory", "chili"]}
        ])
        .to_string()]));
        let app = router(test_state(model.clone()));

        let (status, body) =
            post_json(app, "/api/chat", json!({ "content": "ก๋วยเตี๋ยว" })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["foods"].as_array().unwrap().len(), 1);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][1]["role"], "assistant");
        // The short Thai query went down the food path.
        assert!(model.prompts()[0].contains("ก๋วยเตี๋ยว food recommendations"));
    }

    #[tokio::test]
    async fn chat_rejects_empty_content() {
        let model = Arc::new(MockModel::new(Vec::<String>::new()));
        let app = router(test_state(model.clone()));

        let (status, body) = post_json(app, "/api/chat", json!({ "content": "   " })).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Message content is required");
        assert!(model.prompts().is_empty());
    }
}
