use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;

use ai_client::util::strip_code_blocks;

/// Pull a JSON array out of unstructured model output and parse it.
///
/// The provider gives no structural guarantee, so this is best effort by
/// construction: strip any markdown fences, slice from the first `[` to the
/// last `]`, and parse that. Nested prose containing brackets can defeat the
/// slice; a parse failure is reported as an error, never as a partial result.
pub fn extract_json_array<T: DeserializeOwned>(raw: &str) -> Result<Vec<T>> {
    let text = strip_code_blocks(raw);

    let start = match text.find('[') {
        Some(i) => i,
        None => bail!("no JSON array found in model output"),
    };
    let end = match text.rfind(']') {
        Some(i) => i,
        None => bail!("no JSON array found in model output"),
    };
    if end < start {
        bail!("mismatched brackets in model output");
    }

    serde_json::from_str(&text[start..=end]).context("failed to parse JSON array from model output")
}
