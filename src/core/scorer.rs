use crate::domain::model::SkillSet;
use serde::Serialize;

/// Share of the job's skills that the candidate covers, as a 0-100 value
/// rounded to one decimal. A job with no detected skills scores 0.
///
/// Extra candidate skills neither help nor hurt.
pub fn score(job_skills: &SkillSet, candidate_skills: &SkillSet) -> f64 {
    if job_skills.is_empty() {
        return 0.0;
    }

    let matched = job_skills.intersection(candidate_skills).len();
    percentage_one_decimal(matched, job_skills.len())
}

/// `part / whole * 100` to one decimal, exact ties going to the even digit.
///
/// Works in tenths of a percent on integers so that ties such as 1/16
/// (6.25) are detected exactly and land on 6.2.
fn percentage_one_decimal(part: usize, whole: usize) -> f64 {
    let numerator = part as u64 * 1000;
    let whole = whole as u64;
    let mut tenths = numerator / whole;
    let remainder = numerator % whole;

    if 2 * remainder > whole || (2 * remainder == whole && tenths % 2 == 1) {
        tenths += 1;
    }
    tenths as f64 / 10.0
}

/// Score plus the skills behind it, for display next to a posting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchBreakdown {
    pub score: f64,
    /// job ∩ candidate
    pub matched: SkillSet,
    /// job \ candidate
    pub missing: SkillSet,
}

pub fn breakdown(job_skills: &SkillSet, candidate_skills: &SkillSet) -> MatchBreakdown {
    MatchBreakdown {
        score: score(job_skills, candidate_skills),
        matched: job_skills.intersection(candidate_skills),
        missing: job_skills.difference(candidate_skills),
    }
}
