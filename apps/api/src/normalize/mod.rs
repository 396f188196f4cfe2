//! Response normalizer. Maps any known upstream payload layout onto `CanonicalAnalysis`.
//!
//! Resolution is per field: every canonical field walks its candidate keys (see
//! `table`) and falls back to a literal default. Nothing here returns an error;
//! unparseable or missing values degrade to their defaults.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub mod numeric;
pub mod skills;
pub mod table;

use crate::gateway::UpstreamPayload;

/// Logical group of upstream fields, reachable under several top-level keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Resume,
    PersonalInfo,
    Job,
    Comparison,
    Visualization,
}

impl Namespace {
    /// Top-level payload keys for this namespace, newest backend layout first.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Namespace::Resume => &["resume_data", "resume_text"],
            Namespace::PersonalInfo => &["personal_info"],
            Namespace::Job => &["job_data", "job_description"],
            Namespace::Comparison => &["comparison_result", "compare_response"],
            Namespace::Visualization => &["visualization_data", "analysis"],
        }
    }
}

/// One candidate location for a field value.
#[derive(Debug, Clone, Copy)]
pub struct Source {
    pub namespace: Namespace,
    pub key: &'static str,
}

/// A display field: ordered candidates and the literal used when all are absent.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub sources: &'static [Source],
    pub default: &'static str,
}

/// A numeric field: ordered candidates and the value used when none parses.
#[derive(Debug, Clone, Copy)]
pub struct NumericSpec {
    pub sources: &'static [Source],
    pub default: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeSection {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub linkedin: String,
    pub github: String,
    pub achievements: String,
    pub certificates: String,
    pub education: String,
    pub experience_level: String,
    pub projects: String,
    pub skills: String,
    pub work_experience: String,
    pub year_of_experience: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobSection {
    pub employment_type: String,
    pub experience_level: String,
    pub job_title: String,
    pub qualifications: String,
    pub required_skills: String,
    pub responsibilities: String,
    pub year_of_experience: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSection {
    pub ats_keywords: String,
    pub confidence_scores: String,
    pub interview_qa: String,
    pub match_percentage: String,
    pub missing_skills: String,
    pub suggested_rewrites: String,
}

/// Fields the upstream produces for its charts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisualAnalysis {
    pub candidate_experience: String,
    pub confidence_scores: String,
    pub job_skills: String,
    pub match_percentage: String,
    pub missing_weak_skills: String,
    pub required_experience: String,
    pub resume_sections: String,
    pub resume_skills: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchBand {
    Perfect,
    Excellent,
    Good,
    CanBeAMatch,
    NeedsImprovement,
}

impl MatchBand {
    pub fn from_percentage(score: f64) -> Self {
        match score {
            s if s >= 90.0 => MatchBand::Perfect,
            s if s >= 80.0 => MatchBand::Excellent,
            s if s >= 70.0 => MatchBand::Good,
            s if s >= 60.0 => MatchBand::CanBeAMatch,
            _ => MatchBand::NeedsImprovement,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MatchBand::Perfect => "Perfect Match",
            MatchBand::Excellent => "Excellent Match",
            MatchBand::Good => "Good Match",
            MatchBand::CanBeAMatch => "Can Be A Match",
            MatchBand::NeedsImprovement => "Needs Improvement",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillMatch {
    pub total: usize,
    pub matching: usize,
    pub missing: usize,
}

/// Values computed from the resolved fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    /// 0..=100
    pub match_percentage: f64,
    pub match_band: MatchBand,
    pub candidate_experience_years: f64,
    pub required_experience_years: f64,
    pub resume_skills: Vec<String>,
    pub job_skills: Vec<String>,
    pub matching_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub skill_match: SkillMatch,
    /// Non-empty education / work experience / projects / achievements blocks.
    pub resume_strengths: Vec<String>,
}

/// Schema-stable view of one analysis, whatever layout the upstream used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalAnalysis {
    pub resume: ResumeSection,
    pub job: JobSection,
    pub comparison: ComparisonSection,
    pub analysis: VisualAnalysis,
    pub metrics: DerivedMetrics,
}

/// Looks up field candidates inside a payload.
struct Resolver<'a> {
    payload: &'a UpstreamPayload,
}

impl<'a> Resolver<'a> {
    fn namespaces(&self, namespace: Namespace) -> impl Iterator<Item = &'a Map<String, Value>> {
        let payload = self.payload;
        namespace
            .aliases()
            .iter()
            .filter_map(move |alias| payload.get(alias).and_then(Value::as_object))
    }

    /// First present, non-empty value among `sources`.
    fn value(&self, sources: &[Source]) -> Option<&'a Value> {
        sources.iter().find_map(|source| {
            self.namespaces(source.namespace)
                .find_map(|ns| ns.get(source.key).filter(|v| is_present(v)))
        })
    }

    fn text(&self, spec: &FieldSpec) -> String {
        self.value(spec.sources)
            .map(render)
            .unwrap_or_else(|| spec.default.to_string())
    }

    /// First candidate that parses as a number; later candidates cover parse failures.
    fn number(&self, spec: &NumericSpec) -> f64 {
        spec.sources
            .iter()
            .find_map(|source| {
                self.namespaces(source.namespace)
                    .find_map(|ns| ns.get(source.key).and_then(numeric::number_from_value))
            })
            .unwrap_or(spec.default)
    }

    fn skills(&self, sources: &[Source]) -> Vec<String> {
        self.value(sources)
            .map(skills::skills_from_value)
            .unwrap_or_default()
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Bool(_) | Value::Number(_) => true,
    }
}

/// Display string for an upstream value.
fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(", "),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Builds the canonical analysis for any upstream payload layout.
pub fn normalize(payload: &UpstreamPayload) -> CanonicalAnalysis {
    let r = Resolver { payload };

    let resume = ResumeSection {
        name: r.text(&table::resume::NAME),
        email: r.text(&table::resume::EMAIL),
        phone: r.text(&table::resume::PHONE),
        linkedin: r.text(&table::resume::LINKEDIN),
        github: r.text(&table::resume::GITHUB),
        achievements: r.text(&table::resume::ACHIEVEMENTS),
        certificates: r.text(&table::resume::CERTIFICATES),
        education: r.text(&table::resume::EDUCATION),
        experience_level: r.text(&table::resume::EXPERIENCE_LEVEL),
        projects: r.text(&table::resume::PROJECTS),
        skills: r.text(&table::resume::SKILLS),
        work_experience: r.text(&table::resume::WORK_EXPERIENCE),
        year_of_experience: r.text(&table::resume::YEAR_OF_EXPERIENCE),
    };

    let job = JobSection {
        employment_type: r.text(&table::job::EMPLOYMENT_TYPE),
        experience_level: r.text(&table::job::EXPERIENCE_LEVEL),
        job_title: r.text(&table::job::JOB_TITLE),
        qualifications: r.text(&table::job::QUALIFICATIONS),
        required_skills: r.text(&table::job::REQUIRED_SKILLS),
        responsibilities: r.text(&table::job::RESPONSIBILITIES),
        year_of_experience: r.text(&table::job::YEAR_OF_EXPERIENCE),
    };

    let comparison = ComparisonSection {
        ats_keywords: r.text(&table::comparison::ATS_KEYWORDS),
        confidence_scores: r.text(&table::comparison::CONFIDENCE_SCORES),
        interview_qa: r.text(&table::comparison::INTERVIEW_QA),
        match_percentage: r.text(&table::comparison::MATCH_PERCENTAGE),
        missing_skills: r.text(&table::comparison::MISSING_SKILLS),
        suggested_rewrites: r.text(&table::comparison::SUGGESTED_REWRITES),
    };

    let analysis = VisualAnalysis {
        candidate_experience: r.text(&table::analysis::CANDIDATE_EXPERIENCE),
        confidence_scores: r.text(&table::analysis::CONFIDENCE_SCORES),
        job_skills: r.text(&table::analysis::JOB_SKILLS),
        match_percentage: r.text(&table::analysis::MATCH_PERCENTAGE),
        missing_weak_skills: r.text(&table::analysis::MISSING_WEAK_SKILLS),
        required_experience: r.text(&table::analysis::REQUIRED_EXPERIENCE),
        resume_sections: r.text(&table::analysis::RESUME_SECTIONS),
        resume_skills: r.text(&table::analysis::RESUME_SKILLS),
    };

    let metrics = derive_metrics(&r, &resume, &job);

    CanonicalAnalysis {
        resume,
        job,
        comparison,
        analysis,
        metrics,
    }
}

fn derive_metrics(r: &Resolver<'_>, resume: &ResumeSection, job: &JobSection) -> DerivedMetrics {
    let match_percentage = r.number(&table::metrics::MATCH_PERCENTAGE).clamp(0.0, 100.0);
    let candidate_experience_years = r.number(&table::metrics::CANDIDATE_EXPERIENCE);

    let mut required_experience_years = r.number(&table::metrics::REQUIRED_EXPERIENCE);
    if required_experience_years == 0.0 {
        let text = format!("{} {}", job.qualifications, job.responsibilities);
        if let Some(years) = numeric::years_from_text(&text) {
            required_experience_years = years;
        }
    }

    let resume_skills = r.skills(table::skills::RESUME);
    let job_skills = r.skills(table::skills::JOB);
    let matching_skills = skills::matching_skills(&resume_skills, &job_skills);
    let mut missing_skills = r.skills(table::skills::MISSING);
    if missing_skills.is_empty() {
        missing_skills = skills::unmatched_skills(&job_skills, &resume_skills);
    }

    let skill_match = SkillMatch {
        total: job_skills.len().max(resume_skills.len()),
        matching: matching_skills.len(),
        missing: missing_skills.len(),
    };

    let resume_strengths = [
        &resume.education,
        &resume.work_experience,
        &resume.projects,
        &resume.achievements,
    ]
    .into_iter()
    .filter(|s| !s.trim().is_empty())
    .cloned()
    .collect();

    DerivedMetrics {
        match_percentage,
        match_band: MatchBand::from_percentage(match_percentage),
        candidate_experience_years,
        required_experience_years,
        resume_skills,
        job_skills,
        matching_skills,
        missing_skills,
        skill_match,
        resume_strengths,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> UpstreamPayload {
        UpstreamPayload::from_value(value).unwrap()
    }

    fn newest_layout() -> UpstreamPayload {
        payload(json!({
            "success": true,
            "resume_data": {
                "Name": "Jane Doe",
                "Email": "jane@example.com",
                "Skills": "Rust, SQL; Docker",
                "Education": "BSc Computer Science",
                "Work Experience": "Backend engineer at Acme",
                "Projects": "",
                "Year of Experience": "4"
            },
            "job_data": {
                "Job Title": "Platform Engineer",
                "Required Skills": "Rust, Kubernetes",
                "Qualifications": "5+ years of experience with distributed systems",
                "Responsibilities": "Own the platform"
            },
            "comparison_result": {
                "Match Percentage": "72%",
                "Interview Q&A": "**Q: Why Rust? **A: Safety",
                "Missing Skills": "Kubernetes"
            },
            "visualization_data": {
                "visual Match Percentage": "78",
                "visual Candidate Experience (years)": "4.5",
                "visual Resume Skills": "Rust, SQL, Docker",
                "visual Job Skills": "Rust, Kubernetes",
                "visual Missing / Weak Skills": "Kubernetes",
                "visual Confidence scores": {"skills": 0.8}
            }
        }))
    }

    #[test]
    fn test_newest_layout_resolves_fields() {
        let a = normalize(&newest_layout());
        assert_eq!(a.resume.name, "Jane Doe");
        assert_eq!(a.job.job_title, "Platform Engineer");
        assert_eq!(a.comparison.match_percentage, "72%");
        assert_eq!(a.analysis.match_percentage, "78");
        assert_eq!(a.analysis.confidence_scores, r#"{"skills":0.8}"#);
        assert_eq!(a.metrics.match_percentage, 78.0);
        assert_eq!(a.metrics.match_band, MatchBand::Good);
        assert_eq!(a.metrics.candidate_experience_years, 4.5);
        assert_eq!(a.metrics.required_experience_years, 5.0);
        assert_eq!(a.metrics.matching_skills, vec!["Rust".to_string()]);
        assert_eq!(a.metrics.missing_skills, vec!["Kubernetes".to_string()]);
        assert_eq!(
            a.metrics.skill_match,
            SkillMatch {
                total: 3,
                matching: 1,
                missing: 1
            }
        );
        assert_eq!(a.metrics.resume_strengths.len(), 2);
    }

    #[test]
    fn test_empty_payload_yields_documented_defaults() {
        let a = normalize(&payload(json!({"success": true})));
        assert_eq!(a.resume, ResumeSection::default());
        assert_eq!(a.job, JobSection::default());
        assert_eq!(a.analysis.candidate_experience, "1.67");
        assert_eq!(a.analysis.match_percentage, "60");
        assert_eq!(a.analysis.required_experience, "0.0");
        assert_eq!(a.analysis.confidence_scores, "{}");
        assert_eq!(a.analysis.resume_sections, "{}");
        assert_eq!(a.comparison.match_percentage, "60%");
        assert_eq!(a.comparison.interview_qa, "");
        assert_eq!(a.metrics.match_percentage, 60.0);
        assert_eq!(a.metrics.match_band, MatchBand::CanBeAMatch);
        assert_eq!(a.metrics.candidate_experience_years, 1.67);
        assert_eq!(a.metrics.required_experience_years, 0.0);
        assert!(a.metrics.resume_skills.is_empty());
        assert!(a.metrics.missing_skills.is_empty());
        assert_eq!(a.metrics.skill_match, SkillMatch::default());
    }

    #[test]
    fn test_unparseable_numbers_fall_back() {
        let a = normalize(&payload(json!({
            "visualization_data": {
                "visual Match Percentage": "high",
                "visual Candidate Experience (years)": "several"
            },
            "comparison_result": {"Match Percentage": "n/a"}
        })));
        assert_eq!(a.metrics.match_percentage, 60.0);
        assert_eq!(a.metrics.candidate_experience_years, 1.67);
        // display fields still show what the upstream said
        assert_eq!(a.analysis.match_percentage, "high");
    }

    #[test]
    fn test_parse_failure_tries_next_candidate() {
        let a = normalize(&payload(json!({
            "visualization_data": {"visual Match Percentage": "unknown"},
            "comparison_result": {"Match Percentage": "91%"}
        })));
        assert_eq!(a.metrics.match_percentage, 91.0);
        assert_eq!(a.metrics.match_band, MatchBand::Perfect);
    }

    #[test]
    fn test_match_percentage_clamped() {
        let a = normalize(&payload(json!({
            "visualization_data": {"visual Match Percentage": 140}
        })));
        assert_eq!(a.metrics.match_percentage, 100.0);
    }

    #[test]
    fn test_legacy_and_newest_key_names_agree() {
        let newest = payload(json!({
            "resume_data": {"Name": "Sam", "Skills": "Go, SQL", "Year of Experience": "3"},
            "job_data": {"Job Title": "SRE", "Required Skills": "Go, Terraform"},
            "comparison_result": {"Missing Skills": "Terraform", "Match Percentage": "66%"},
            "visualization_data": {
                "visual Match Percentage": "66",
                "visual Candidate Experience (years)": "3",
                "visual Required Experience (years)": "2",
                "visual Resume Skills": "Go, SQL",
                "visual Job Skills": "Go, Terraform",
                "visual Missing / Weak Skills": "Terraform",
                "visual Resume Sections": "{\"skills\": true}",
                "visual Confidence scores": "{\"overall\": 0.7}"
            }
        }));
        let legacy = payload(json!({
            "resume_text": {"Name": "Sam", "Skills": "Go, SQL", "Year of Experience": "3"},
            "job_description": {"Job Title": "SRE", "Required Skills": "Go, Terraform"},
            "compare_response": {"Missing / Weak Skills": "Terraform", "Match Percentage": "66%"},
            "analysis": {
                "Match Percentage": "66",
                "Candidate Experience (years)": "3",
                "Required Experience (years)": "2",
                "Resume Skills": "Go, SQL",
                "Job Skills": "Go, Terraform",
                "Missing / Weak Skills": "Terraform",
                "Resume Sections": "{\"skills\": true}",
                "Confidence scores": "{\"overall\": 0.7}"
            }
        }));
        assert_eq!(normalize(&newest), normalize(&legacy));
    }

    #[test]
    fn test_required_experience_from_qualifications_text() {
        let a = normalize(&payload(json!({
            "job_data": {
                "Qualifications": "Degree in CS. 5+ years of experience building APIs.",
                "Responsibilities": "Ship features"
            }
        })));
        assert_eq!(a.metrics.required_experience_years, 5.0);
    }

    #[test]
    fn test_required_experience_zero_triggers_text_scan() {
        let a = normalize(&payload(json!({
            "visualization_data": {"visual Required Experience (years)": "0"},
            "job_data": {"Responsibilities": "Mentor juniors; 3 years experience in fintech"}
        })));
        assert_eq!(a.metrics.required_experience_years, 3.0);
    }

    #[test]
    fn test_personal_info_backfills_contact_fields() {
        let a = normalize(&payload(json!({
            "resume_text": {"Name": ""},
            "personal_info": {"name": "Ana Lima", "email": "ana@example.com"}
        })));
        assert_eq!(a.resume.name, "Ana Lima");
        assert_eq!(a.resume.email, "ana@example.com");
    }

    #[test]
    fn test_skill_lists_accept_arrays() {
        let a = normalize(&payload(json!({
            "resume_data": {"Skills": ["Python", " ", "Airflow"]},
            "job_data": {"Required Skills": ["python", "Spark"]}
        })));
        assert_eq!(a.resume.skills, "Python,  , Airflow");
        assert_eq!(a.metrics.resume_skills, vec!["Python", "Airflow"]);
        assert_eq!(a.metrics.matching_skills, vec!["Python"]);
        // no upstream list, so computed from the job side
        assert_eq!(a.metrics.missing_skills, vec!["Spark"]);
    }

    #[test]
    fn test_band_thresholds() {
        assert_eq!(MatchBand::from_percentage(90.0), MatchBand::Perfect);
        assert_eq!(MatchBand::from_percentage(89.9), MatchBand::Excellent);
        assert_eq!(MatchBand::from_percentage(70.0), MatchBand::Good);
        assert_eq!(MatchBand::from_percentage(59.0), MatchBand::NeedsImprovement);
        assert_eq!(MatchBand::CanBeAMatch.label(), "Can Be A Match");
    }
}
