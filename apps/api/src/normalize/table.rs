//! Field resolution tables.
//!
//! Each canonical field lists its candidate upstream keys, newest naming first,
//! and the literal used when none is present. Supporting another backend
//! release means editing these tables, not the resolver.

use super::Namespace::{Comparison as C, Job as J, PersonalInfo as P, Resume as R, Visualization as V};
use super::{FieldSpec, NumericSpec, Source};

const fn src(namespace: super::Namespace, key: &'static str) -> Source {
    Source { namespace, key }
}

pub mod analysis {
    use super::*;

    pub const CANDIDATE_EXPERIENCE: FieldSpec = FieldSpec {
        sources: &[
            src(V, "visual Candidate Experience (years)"),
            src(V, "Candidate Experience (years)"),
        ],
        default: "1.67",
    };
    pub const CONFIDENCE_SCORES: FieldSpec = FieldSpec {
        sources: &[src(V, "visual Confidence scores"), src(V, "Confidence scores")],
        default: "{}",
    };
    pub const JOB_SKILLS: FieldSpec = FieldSpec {
        sources: &[src(V, "visual Job Skills"), src(V, "Job Skills")],
        default: "",
    };
    pub const MATCH_PERCENTAGE: FieldSpec = FieldSpec {
        sources: &[src(V, "visual Match Percentage"), src(V, "Match Percentage")],
        default: "60",
    };
    pub const MISSING_WEAK_SKILLS: FieldSpec = FieldSpec {
        sources: &[
            src(V, "visual Missing / Weak Skills"),
            src(V, "Missing / Weak Skills"),
        ],
        default: "",
    };
    pub const REQUIRED_EXPERIENCE: FieldSpec = FieldSpec {
        sources: &[
            src(V, "visual Required Experience (years)"),
            src(V, "Required Experience (years)"),
            src(J, "Year of Experience"),
        ],
        default: "0.0",
    };
    pub const RESUME_SECTIONS: FieldSpec = FieldSpec {
        sources: &[src(V, "visual Resume Sections"), src(V, "Resume Sections")],
        default: "{}",
    };
    pub const RESUME_SKILLS: FieldSpec = FieldSpec {
        sources: &[src(V, "visual Resume Skills"), src(V, "Resume Skills")],
        default: "",
    };
}

pub mod comparison {
    use super::*;

    pub const ATS_KEYWORDS: FieldSpec = FieldSpec {
        sources: &[src(C, "ATS-optimized keyword list")],
        default: "",
    };
    pub const CONFIDENCE_SCORES: FieldSpec = FieldSpec {
        sources: &[src(C, "Confidence scores")],
        default: "",
    };
    pub const INTERVIEW_QA: FieldSpec = FieldSpec {
        sources: &[src(C, "Interview Q&A")],
        default: "",
    };
    pub const MATCH_PERCENTAGE: FieldSpec = FieldSpec {
        sources: &[src(C, "Match Percentage")],
        default: "60%",
    };
    pub const MISSING_SKILLS: FieldSpec = FieldSpec {
        sources: &[src(C, "Missing Skills"), src(C, "Missing / Weak Skills")],
        default: "",
    };
    pub const SUGGESTED_REWRITES: FieldSpec = FieldSpec {
        sources: &[src(C, "Suggested rewrites")],
        default: "",
    };
}

pub mod job {
    use super::*;

    pub const EMPLOYMENT_TYPE: FieldSpec = FieldSpec {
        sources: &[src(J, "Employment Type")],
        default: "",
    };
    pub const EXPERIENCE_LEVEL: FieldSpec = FieldSpec {
        sources: &[src(J, "Experience Level")],
        default: "",
    };
    pub const JOB_TITLE: FieldSpec = FieldSpec {
        sources: &[src(J, "Job Title")],
        default: "",
    };
    pub const QUALIFICATIONS: FieldSpec = FieldSpec {
        sources: &[src(J, "Qualifications")],
        default: "",
    };
    pub const REQUIRED_SKILLS: FieldSpec = FieldSpec {
        sources: &[src(J, "Required Skills")],
        default: "",
    };
    pub const RESPONSIBILITIES: FieldSpec = FieldSpec {
        sources: &[src(J, "Responsibilities")],
        default: "",
    };
    pub const YEAR_OF_EXPERIENCE: FieldSpec = FieldSpec {
        sources: &[src(J, "Year of Experience")],
        default: "",
    };
}

pub mod resume {
    use super::*;

    pub const NAME: FieldSpec = FieldSpec {
        sources: &[src(R, "Name"), src(P, "name")],
        default: "",
    };
    pub const EMAIL: FieldSpec = FieldSpec {
        sources: &[src(R, "Email"), src(P, "email")],
        default: "",
    };
    pub const PHONE: FieldSpec = FieldSpec {
        sources: &[src(R, "Phone"), src(P, "phone")],
        default: "",
    };
    pub const LINKEDIN: FieldSpec = FieldSpec {
        sources: &[src(R, "LinkedIn"), src(P, "linkedin")],
        default: "",
    };
    pub const GITHUB: FieldSpec = FieldSpec {
        sources: &[src(R, "GitHub"), src(P, "github")],
        default: "",
    };
    pub const ACHIEVEMENTS: FieldSpec = FieldSpec {
        sources: &[src(R, "Achievements")],
        default: "",
    };
    pub const CERTIFICATES: FieldSpec = FieldSpec {
        sources: &[src(R, "Certificates")],
        default: "",
    };
    pub const EDUCATION: FieldSpec = FieldSpec {
        sources: &[src(R, "Education")],
        default: "",
    };
    pub const EXPERIENCE_LEVEL: FieldSpec = FieldSpec {
        sources: &[src(R, "Experience Level")],
        default: "",
    };
    pub const PROJECTS: FieldSpec = FieldSpec {
        sources: &[src(R, "Projects")],
        default: "",
    };
    pub const SKILLS: FieldSpec = FieldSpec {
        sources: &[src(R, "Skills")],
        default: "",
    };
    pub const WORK_EXPERIENCE: FieldSpec = FieldSpec {
        sources: &[src(R, "Work Experience")],
        default: "",
    };
    pub const YEAR_OF_EXPERIENCE: FieldSpec = FieldSpec {
        sources: &[
            src(R, "Year of Experience"),
            src(V, "visual Candidate Experience (years)"),
            src(V, "Candidate Experience (years)"),
        ],
        default: "",
    };
}

/// Skill list sources, consumed as raw values so literal lists stay intact.
pub mod skills {
    use super::*;

    pub const RESUME: &[Source] = &[
        src(V, "visual Resume Skills"),
        src(V, "Resume Skills"),
        src(R, "Skills"),
    ];
    pub const JOB: &[Source] = &[
        src(V, "visual Job Skills"),
        src(V, "Job Skills"),
        src(J, "Required Skills"),
    ];
    pub const MISSING: &[Source] = &[
        src(V, "visual Missing / Weak Skills"),
        src(V, "Missing / Weak Skills"),
        src(C, "Missing Skills"),
        src(C, "Missing / Weak Skills"),
    ];
}

/// Numeric chains behind the derived metrics.
pub mod metrics {
    use super::*;

    pub const MATCH_PERCENTAGE: NumericSpec = NumericSpec {
        sources: &[
            src(V, "visual Match Percentage"),
            src(V, "Match Percentage"),
            src(C, "Match Percentage"),
        ],
        default: 60.0,
    };
    pub const CANDIDATE_EXPERIENCE: NumericSpec = NumericSpec {
        sources: &[
            src(V, "visual Candidate Experience (years)"),
            src(V, "Candidate Experience (years)"),
            src(R, "Year of Experience"),
        ],
        default: 1.67,
    };
    pub const REQUIRED_EXPERIENCE: NumericSpec = NumericSpec {
        sources: &[
            src(V, "visual Required Experience (years)"),
            src(V, "Required Experience (years)"),
            src(J, "Year of Experience"),
        ],
        default: 0.0,
    };
}
