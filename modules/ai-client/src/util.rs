/// Strip markdown code fences from a model response.
///
/// Models routinely wrap JSON in ```json fences even when told not to.
pub fn strip_code_blocks(response: &str) -> &str {
    response
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}
