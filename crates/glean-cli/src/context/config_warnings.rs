use glean_config::GleanConfig;

const SECTIONS: [&str; 4] = ["LLM", "DATABASE", "ANALYSIS", "LOG"];

/// Emit warnings for settings that silently fell back to defaults.
pub fn warn_unconfigured(config: &GleanConfig, needs_llm: bool) {
    for warning in collect_unconfigured_warnings(config, needs_llm, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &GleanConfig, needs_llm: bool, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut warnings = Vec::new();

    if needs_llm && !config.llm.has_api_key() {
        warnings.push(
            "No LLM API key configured; analyses will fail. Set GLEAN_LLM__API_KEY or OPENAI_API_KEY."
                .to_string(),
        );
    }

    for (key, _) in env {
        let Some(rest) = key.strip_prefix("GLEAN_") else {
            continue;
        };
        if rest == "LOG" || rest.contains("__") {
            continue;
        }
        if let Some(section) = SECTIONS.iter().find(|s| rest.starts_with(&format!("{s}_"))) {
            let field = &rest[section.len() + 1..];
            warnings.push(format!(
                "{key} is ignored. Use double underscores (example: GLEAN_{section}__{field})."
            ));
        }
    }

    warnings
}
