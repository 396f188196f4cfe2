use serde_json::Value;

/// Skill lists are capped for display.
pub const MAX_DISPLAY_SKILLS: usize = 20;

/// Splits a comma/semicolon separated skill string into trimmed, non-empty entries.
pub fn parse_skills(input: &str) -> Vec<String> {
    input
        .split([',', ';'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .take(MAX_DISPLAY_SKILLS)
        .map(String::from)
        .collect()
}

/// Skill list from an upstream value: either a delimited string or a literal list.
pub fn skills_from_value(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => parse_skills(s),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.trim().to_string(),
                other => other.to_string().trim().to_string(),
            })
            .filter(|s| !s.is_empty())
            .take(MAX_DISPLAY_SKILLS)
            .collect(),
        _ => Vec::new(),
    }
}

/// Case-insensitive containment in either direction, so "React" overlaps "React.js".
fn overlaps(a: &str, b: &str) -> bool {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    a.contains(&b) || b.contains(&a)
}

/// Resume skills that overlap at least one job skill.
pub fn matching_skills(resume: &[String], job: &[String]) -> Vec<String> {
    resume
        .iter()
        .filter(|skill| job.iter().any(|j| overlaps(j, skill)))
        .cloned()
        .collect()
}

/// Job skills that no resume skill overlaps.
pub fn unmatched_skills(job: &[String], resume: &[String]) -> Vec<String> {
    job.iter()
        .filter(|skill| !resume.iter().any(|r| overlaps(r, skill)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn list(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_skills_mixed_delimiters() {
        assert_eq!(parse_skills("Python, SQL;  Go"), list(&["Python", "SQL", "Go"]));
    }

    #[test]
    fn test_parse_skills_drops_blanks() {
        assert_eq!(parse_skills(" ,; Rust ,, ;"), list(&["Rust"]));
        assert!(parse_skills("").is_empty());
    }

    #[test]
    fn test_parse_skills_caps_at_twenty() {
        let input = (1..=30).map(|i| format!("skill{i}")).collect::<Vec<_>>().join(",");
        let skills = parse_skills(&input);
        assert_eq!(skills.len(), MAX_DISPLAY_SKILLS);
        assert_eq!(skills[19], "skill20");
    }

    #[test]
    fn test_skills_from_literal_list() {
        let value = json!([" Docker ", "", "Kubernetes", 3]);
        assert_eq!(skills_from_value(&value), list(&["Docker", "Kubernetes", "3"]));
    }

    #[test]
    fn test_skills_from_other_values_empty() {
        assert!(skills_from_value(&json!(null)).is_empty());
        assert!(skills_from_value(&json!({"a": 1})).is_empty());
    }

    #[test]
    fn test_matching_is_substring_both_ways() {
        let resume = list(&["react", "PostgreSQL", "Excel"]);
        let job = list(&["React.js", "SQL", "Kubernetes"]);
        assert_eq!(matching_skills(&resume, &job), list(&["react", "PostgreSQL"]));
        assert_eq!(unmatched_skills(&job, &resume), list(&["Kubernetes"]));
    }
}
