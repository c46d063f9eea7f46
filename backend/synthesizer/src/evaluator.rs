//! Evaluator persona: fixed-structure review that barely looks at the input.

/// How much of the input is echoed back in the report.
const ECHO_LIMIT: usize = 50;

/// First `ECHO_LIMIT` characters of the input, with an ellipsis when truncated.
fn echo_snippet(input: &str) -> String {
    let mut snippet: String = input.chars().take(ECHO_LIMIT).collect();
    if input.chars().count() > ECHO_LIMIT {
        snippet.push_str("...");
    }
    snippet
}

pub fn respond(input: &str) -> String {
    let echo = echo_snippet(input);

    format!(
        "### 📊 Code Evaluation\n\n\
         Analysis of your provided code:\n\n\
         **1. Code Quality**\n\
         - **Input:** `{echo}`\n\
         - **Rating:** 8.5/10\n\
         - The logic is generally sound, but can be tightened.\n\n\
         **2. Performance**\n\
         - No major bottlenecks detected in this specific snippet.\n\
         - **Suggestion:** Ensure efficient memory usage for large datasets.\n\n\
         **3. Maintainability**\n\
         - Good naming conventions.\n\
         - **Recommendation:** Add comments for complex logic blocks.\n\n\
         **Summary:**\n\
         Solid implementation. The suggested improvements are minor but will help in the long run."
    )
}
