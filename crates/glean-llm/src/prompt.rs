//! Analysis prompt construction.

pub const SYSTEM_PROMPT: &str = "You are a professional article analysis assistant. \
     Analyze the article content in depth.";

/// Build the user prompt for `content`. Deterministic for the same input.
#[must_use]
pub fn build_analysis_prompt(content: &str) -> String {
    format!(
        r#"
Analyze the following article in depth and return the result as JSON.

Article content:
{content}

Cover these four aspects:

1. Core viewpoints: summarize the main points and central arguments
2. File structure: describe how the article is organized
3. Author's thinking: trace the author's reasoning and line of argument
4. Related materials and examples: extract the key material, cases and evidence

Return the result in this JSON format:
{{
  "core_viewpoints": "core viewpoints",
  "file_structure": "structure description",
  "author_thoughts": "analysis of the author's thinking",
  "related_materials": "related materials and examples"
}}

Content length: {} characters"#,
        content.chars().count()
    )
}
