use research_core::{ApiStatus, AppViewModel, LifecycleState, ResearchResult};

const RULE_WIDTH: usize = 50;

/// Render the whole view as terminal lines. Pure; the caller decides when.
pub(crate) fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    match view.lifecycle {
        LifecycleState::Idle => {
            lines.push("Ready. Type a research topic and press Enter (:help for commands).".to_string());
            if let Some(api_line) = api_status_line(&view.api_status) {
                lines.push(api_line);
            }
        }
        LifecycleState::Validating => {}
        LifecycleState::Submitting => {
            let topic = view
                .submitted_query
                .as_deref()
                .unwrap_or_else(|| view.query.trim());
            lines.push(format!("Researching \"{topic}\"..."));
            lines.push("Gathering research data...".to_string());
        }
        LifecycleState::Failed => {
            if let Some(error) = &view.error {
                lines.push(format!("Error: {error}"));
            }
        }
        LifecycleState::Success => {
            if let Some(result) = &view.result {
                render_result(result, &mut lines);
            }
            lines.push("Type a new topic to search again, or :reset to start over.".to_string());
        }
    }

    lines
}

fn render_result(result: &ResearchResult, lines: &mut Vec<String>) {
    let rule = "=".repeat(RULE_WIDTH);
    lines.push(rule.clone());
    lines.push("RESULTS".to_string());
    lines.push(rule);
    lines.push(String::new());

    lines.push(format!("TOPIC: {}", result.topic));
    lines.push(String::new());

    lines.push("SUMMARY:".to_string());
    lines.extend(result.summary.lines().map(ToOwned::to_owned));
    lines.push(String::new());

    lines.push("SOURCES:".to_string());
    if result.sources.is_empty() {
        lines.push("   (none)".to_string());
    }
    for (index, source) in result.sources.iter().enumerate() {
        lines.push(format!("   {}. {}", index + 1, source));
    }
    lines.push(String::new());

    lines.push(format!("TOOLS USED: {}", result.tools_used.join(", ")));
    lines.push(String::new());
}

fn api_status_line(status: &ApiStatus) -> Option<String> {
    match status {
        ApiStatus::Unknown => None,
        ApiStatus::Checking => Some("API: checking...".to_string()),
        ApiStatus::Healthy(message) if message.is_empty() => Some("API: online".to_string()),
        ApiStatus::Healthy(message) => Some(format!("API: online ({message})")),
        ApiStatus::Unreachable(reason) => Some(format!("API: unreachable ({reason})")),
    }
}
