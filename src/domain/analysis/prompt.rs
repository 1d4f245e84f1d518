use super::Issue;

/// Synthesizes the user turn that asks the engine to analyze `issues`.
pub fn analysis_prompt(issues: &[Issue], namespace: &str) -> String {
    let summary = serde_json::to_string_pretty(issues).unwrap_or_else(|_| "[]".to_string());

    format!(
        "Analyze these Kubernetes pod issues and provide recommendations:\n\n\
         Issues found:\n{summary}\n\n\
         Namespace: {namespace}\n\n\
         Please provide:\n\
         1. Root cause analysis for each issue\n\
         2. Recommended actions to resolve\n\
         3. Preventive measures"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analysis::IssueKind;

    #[test]
    fn prompt_lists_issues_and_namespace() {
        let issues = vec![Issue {
            pod: "web-1".to_string(),
            container: Some("app".to_string()),
            kind: IssueKind::HighRestartCount { restart_count: 7 },
        }];

        let prompt = analysis_prompt(&issues, "shop");

        assert!(prompt.starts_with("Analyze these Kubernetes pod issues"));
        assert!(prompt.contains("\"pod\": \"web-1\""));
        assert!(prompt.contains("\"restart_count\": 7"));
        assert!(prompt.contains("Namespace: shop"));
        assert!(prompt.ends_with("3. Preventive measures"));
    }
}
