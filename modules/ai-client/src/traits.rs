use anyhow::Result;
use async_trait::async_trait;

// =============================================================================
// GenerativeModel Trait
// =============================================================================

/// One operation: send a prompt string, get the model's raw text back.
///
/// The provider gives no structural guarantee on the output — every caller
/// that needs structure must impose it on the returned text itself. Keeping
/// the boundary this narrow is what lets the service core run against a
/// scripted double in tests instead of a live API.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}
