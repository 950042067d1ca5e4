use std::sync::Arc;
use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;
use tracing::{debug, info, warn};

use ai_client::GenerativeModel;
use aroy_common::{Food, Restaurant};

use crate::extract::extract_json_array;
use crate::prompts::{
    build_food_prompt, build_restaurant_prompt, build_verification_prompt, VerifyCandidate,
};

/// Verification floor: fewer survivors than this means the verification pass
/// is treated as unreliable and the unfiltered list is kept. Tolerates false
/// positives over an over-aggressive or malformed verification.
const MIN_VERIFIED: usize = 5;

// Redirect keywords for food queries that are really restaurant queries
// (ร้าน is the Thai word for shop/restaurant). Deliberately a different list
// from the classifier's location predicate.
static RESTAURANT_HINT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)ร้าน|restaurant|place|eatery|dining|cafe|bistro").unwrap()
});

/// Outcome of a food-type request. A food query that turns out to be a
/// restaurant query comes back through the restaurant branch.
#[derive(Debug)]
pub enum FoodOutcome {
    Foods(Vec<Food>),
    RedirectedRestaurants(Vec<Restaurant>),
}

/// Stateless per-request recommendation pipeline. Holds only the model
/// handle; the handle is constructed by the caller and passed in, so tests
/// can drive the whole pipeline with a scripted model.
#[derive(Clone)]
pub struct Recommender {
    model: Arc<dyn GenerativeModel>,
}

impl Recommender {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self { model }
    }

    /// Restaurant recommendations near a location: prompt → generate →
    /// extract → verify. Failures never propagate; the branch degrades to an
    /// empty list.
    pub async fn restaurants(&self, location: &str) -> Vec<Restaurant> {
        info!(location, "Fetching restaurant recommendations");

        let raw = match self.model.generate(&build_restaurant_prompt(location)).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, location, "Restaurant generation call failed");
                return Vec::new();
            }
        };

        let candidates: Vec<Restaurant> = match extract_json_array(&raw) {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(error = %e, location, "No restaurant array in model output");
                debug!(raw, "Raw restaurant response");
                return Vec::new();
            }
        };
        info!(count = candidates.len(), location, "Extracted restaurant candidates");

        self.verify_locations(candidates, location).await
    }

    /// Food recommendations for a food type. A query carrying restaurant
    /// keywords is stripped of them and delegated to the restaurant path.
    pub async fn foods(&self, food_type: &str) -> FoodOutcome {
        if RESTAURANT_HINT_RE.is_match(food_type) {
            let location = strip_restaurant_keywords(food_type);
            info!(
                food_type,
                location, "Food query mentions restaurants, redirecting to restaurant path"
            );
            return FoodOutcome::RedirectedRestaurants(self.restaurants(&location).await);
        }

        info!(food_type, "Fetching food recommendations");

        let raw = match self.model.generate(&build_food_prompt(food_type)).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, food_type, "Food generation call failed");
                return FoodOutcome::Foods(Vec::new());
            }
        };

        match extract_json_array(&raw) {
            Ok(foods) => FoodOutcome::Foods(foods),
            Err(e) => {
                warn!(error = %e, food_type, "No food array in model output");
                debug!(raw, "Raw food response");
                FoodOutcome::Foods(Vec::new())
            }
        }
    }

    /// Second-pass hallucination filter. Asks the model which candidate ids
    /// it believes are real establishments in `location` and keeps only
    /// those — unless verification fails or approves fewer than
    /// `MIN_VERIFIED`, in which case the unfiltered list is kept. This pass
    /// must never blank the primary result.
    async fn verify_locations(
        &self,
        candidates: Vec<Restaurant>,
        location: &str,
    ) -> Vec<Restaurant> {
        if candidates.is_empty() {
            return candidates;
        }

        let verified_ids = match self.request_verified_ids(&candidates, location).await {
            Ok(ids) => ids,
            Err(e) => {
                warn!(error = %e, location, "Location verification failed, keeping unfiltered list");
                return candidates;
            }
        };

        let verified: Vec<Restaurant> = candidates
            .iter()
            .filter(|r| verified_ids.iter().any(|id| *id == r.id))
            .cloned()
            .collect();
        info!(
            verified = verified.len(),
            total = candidates.len(),
            location,
            "Location verification complete"
        );

        if verified.len() < MIN_VERIFIED {
            info!(location, "Too few verified restaurants, keeping unfiltered list");
            return candidates;
        }

        verified
    }

    async fn request_verified_ids(
        &self,
        candidates: &[Restaurant],
        location: &str,
    ) -> Result<Vec<String>> {
        let listing: Vec<VerifyCandidate> = candidates
            .iter()
            .map(|r| VerifyCandidate {
                id: r.id.clone(),
                name: r.name.clone(),
                address: r.address.clone(),
            })
            .collect();

        let raw = self
            .model
            .generate(&build_verification_prompt(&listing, location))
            .await?;
        extract_json_array::<String>(&raw)
    }
}

/// Remove every restaurant keyword from a redirected food query, leaving the
/// location part.
pub fn strip_restaurant_keywords(food_type: &str) -> String {
    RESTAURANT_HINT_RE.replace_all(food_type, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FailingModel, MockModel};
    use serde_json::json;

    fn restaurant_array(count: usize) -> String {
        let rows: Vec<serde_json::Value> = (1..=count)
            .map(|n| {
                json!({
                    "id": format!("rest-{n}"),
                    "name": format!("Restaurant {n}"),
                    "cuisine": "Thai",
                    "address": format!("{n} Sukhumvit Road, Bangkok"),
                    "rating": 4.2,
                    "priceRange": "$$",
                    "description": "A neighborhood favorite.",
                    "imageUrl": null
                })
            })
            .collect();
        serde_json::to_string(&rows).unwrap()
    }

    fn id_array(ids: &[&str]) -> String {
        serde_json::to_string(&ids).unwrap()
    }

    fn recommender(model: MockModel) -> (Recommender, Arc<MockModel>) {
        let model = Arc::new(model);
        (Recommender::new(model.clone()), model)
    }

    #[tokio::test]
    async fn verification_below_floor_keeps_original_list() {
        let (recommender, _) = recommender(MockModel::new([
            restaurant_array(20),
            id_array(&["rest-1", "rest-2", "rest-3"]),
        ]));

        let result = recommender.restaurants("Bangkok").await;
        assert_eq!(result.len(), 20);
    }

    #[tokio::test]
    async fn verification_above_floor_keeps_exactly_the_approved_subset() {
        let approved = ["rest-2", "rest-4", "rest-6", "rest-8", "rest-10", "rest-12", "rest-14"];
        let (recommender, _) =
            recommender(MockModel::new([restaurant_array(20), id_array(&approved)]));

        let result = recommender.restaurants("Bangkok").await;
        assert_eq!(result.len(), 7);
        for (restaurant, expected_id) in result.iter().zip(approved) {
            assert_eq!(restaurant.id, expected_id);
            // Record content passes through unmodified.
            assert_eq!(restaurant.price_range, "$$");
        }
    }

    #[tokio::test]
    async fn verification_failure_keeps_original_list() {
        let (recommender, _) = recommender(MockModel::new([
            restaurant_array(15),
            "I am not sure about these.".to_string(),
        ]));

        let result = recommender.restaurants("Bangkok").await;
        assert_eq!(result.len(), 15);
    }

    #[tokio::test]
    async fn empty_candidate_list_skips_verification() {
        let (recommender, model) = recommender(MockModel::new(["[]".to_string()]));

        let result = recommender.restaurants("Nowhere").await;
        assert!(result.is_empty());
        // Only the primary call went out.
        assert_eq!(model.prompts().len(), 1);
    }

    #[tokio::test]
    async fn generation_failure_degrades_to_empty() {
        let recommender = Recommender::new(Arc::new(FailingModel));
        assert!(recommender.restaurants("Bangkok").await.is_empty());
    }

    #[tokio::test]
    async fn garbage_output_degrades_to_empty() {
        let (recommender, _) = recommender(MockModel::new(["no json here".to_string()]));
        assert!(recommender.restaurants("Bangkok").await.is_empty());
    }

    #[tokio::test]
    async fn foods_returns_extracted_dishes() {
        let dishes = json!([
            {"id": "food-1", "name": "Pad Thai", "cuisine": "Thai",
             "description": "Stir-fried rice noodles.",
             "ingredients": ["rice noodles", "tamarind", "egg", "peanuts", "bean sprouts"]}
        ])
        .to_string();
        let (recommender, _) = recommender(MockModel::new([dishes]));

        match recommender.foods("noodles").await {
            FoodOutcome::Foods(foods) => {
                assert_eq!(foods.len(), 1);
                assert_eq!(foods[0].id, "food-1");
            }
            other => panic!("expected foods, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn restaurant_keywords_redirect_to_restaurant_path() {
        let (recommender, model) = recommender(MockModel::new([
            restaurant_array(15),
            id_array(&["rest-1", "rest-2", "rest-3", "rest-4", "rest-5"]),
        ]));

        // "ร้านอาหารอิตาเลียน" = Italian restaurant; the keyword must be
        // stripped before the location reaches the prompt.
        match recommender.foods("ร้านอาหารอิตาเลียน").await {
            FoodOutcome::RedirectedRestaurants(restaurants) => {
                assert_eq!(restaurants.len(), 5);
            }
            other => panic!("expected redirect, got {other:?}"),
        }

        let prompts = model.prompts();
        // It went down the restaurant path with the keyword stripped from
        // the location argument.
        assert!(prompts[0].contains("restaurant recommendations near อาหารอิตาเลียน"));
    }

    #[tokio::test]
    async fn english_restaurant_keyword_also_redirects() {
        let (recommender, model) = recommender(MockModel::new(["[]".to_string()]));

        match recommender.foods("italian restaurant milan").await {
            FoodOutcome::RedirectedRestaurants(restaurants) => assert!(restaurants.is_empty()),
            other => panic!("expected redirect, got {other:?}"),
        }
        assert!(model.prompts()[0].contains("italian  milan"));
    }

    #[test]
    fn strip_removes_every_keyword_occurrence() {
        assert_eq!(strip_restaurant_keywords("ร้านก๋วยเตี๋ยว"), "ก๋วยเตี๋ยว");
        assert_eq!(strip_restaurant_keywords("cafe and bistro in Nimman"), "and  in Nimman");
    }
}
