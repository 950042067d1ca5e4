use std::sync::LazyLock;

use regex::Regex;

/// The resolved reading of one free-text query: restaurants near a place,
/// or dishes of a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Location(String),
    FoodType(String),
}

// Evaluation order is a contract: the location predicate is checked before
// the food predicate, and both can match the same input. Changing the order
// or the 3-word tie-break silently changes classification outcomes.
static LOCATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)restaurants?|places?|eat|dining|food near|in\s+[a-z\s]+").unwrap()
});
static FOOD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)food$|foods?|cuisine|dish|meal|recipe|menu|eat").unwrap());
static PLACE_CAPTURE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:in|near|at)\s+([a-z\s,]+)(?:\s|$)").unwrap());

/// Classify a raw query string. Pure; keyword matching is case-insensitive
/// and script-agnostic — Thai-only input falls through both predicates to
/// the word-count tie-break.
pub fn classify(text: &str) -> Intent {
    if LOCATION_RE.is_match(text) {
        // Prefer the trailing "in/near/at <place>" phrase; fall back to the
        // whole input when no such clause exists.
        let location = PLACE_CAPTURE_RE
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_else(|| text.to_string());
        return Intent::Location(location);
    }

    if FOOD_RE.is_match(text) {
        return Intent::FoodType(text.to_string());
    }

    // Tie-break: short queries read as a food type, longer ones as a place.
    if text.split_whitespace().count() <= 3 {
        Intent::FoodType(text.to_string())
    } else {
        Intent::Location(text.to_string())
    }
}
