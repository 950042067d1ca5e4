pub mod classify;
pub mod extract;
pub mod prompts;
pub mod recommend;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use classify::{classify, Intent};
pub use extract::extract_json_array;
pub use recommend::{FoodOutcome, Recommender};
