use crate::core::scorer::{breakdown, MatchBreakdown};
use crate::domain::model::{JobPosting, SkillDemand, SkillSet};
use std::collections::HashMap;

/// Title filter for the role category being browsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RoleFilter {
    #[default]
    All,
    /// `needle` is the lowercased form of `label`, the text as given.
    TitleContains { label: String, needle: String },
}

impl RoleFilter {
    /// `"All"` (any case) or blank means no filtering.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("all") {
            RoleFilter::All
        } else {
            RoleFilter::TitleContains {
                label: value.to_string(),
                needle: value.to_lowercase(),
            }
        }
    }

    pub fn matches(&self, posting: &JobPosting) -> bool {
        match self {
            RoleFilter::All => true,
            RoleFilter::TitleContains { needle, .. } => posting
                .title
                .as_deref()
                .map(|title| title.to_lowercase().contains(needle.as_str()))
                .unwrap_or(false),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            RoleFilter::All => "All",
            RoleFilter::TitleContains { label, .. } => label,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RankedPosting<'a> {
    pub posting: &'a JobPosting,
    pub result: MatchBreakdown,
}

/// Scores every posting that passes `filter`, best match first.
/// Ties keep input order.
pub fn rank_postings<'a>(
    postings: &'a [JobPosting],
    candidate_skills: &SkillSet,
    filter: &RoleFilter,
) -> Vec<RankedPosting<'a>> {
    let mut ranked: Vec<RankedPosting<'a>> = postings
        .iter()
        .filter(|posting| filter.matches(posting))
        .map(|posting| RankedPosting {
            posting,
            result: breakdown(&posting.skills, candidate_skills),
        })
        .collect();

    ranked.sort_by(|a, b| b.result.score.total_cmp(&a.result.score));
    ranked
}

/// How often each skill is asked for across `postings`, most frequent first,
/// then alphabetical.
pub fn top_skills<'a, I>(postings: I, limit: usize) -> Vec<SkillDemand>
where
    I: IntoIterator<Item = &'a JobPosting>,
{
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for posting in postings {
        for skill in posting.skills.iter() {
            *counts.entry(skill).or_default() += 1;
        }
    }

    let mut demand: Vec<SkillDemand> = counts
        .into_iter()
        .map(|(skill, count)| SkillDemand {
            skill: skill.to_string(),
            count,
        })
        .collect();
    demand.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.skill.cmp(&b.skill)));
    demand.truncate(limit);
    demand
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posting(title: &str, skills: &[&str]) -> JobPosting {
        JobPosting {
            title: Some(title.to_string()),
            skills: skills.iter().copied().collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_role_filter_parse() {
        assert_eq!(RoleFilter::parse("All"), RoleFilter::All);
        assert_eq!(RoleFilter::parse("  all "), RoleFilter::All);
        assert_eq!(RoleFilter::parse(""), RoleFilter::All);
        assert_eq!(
            RoleFilter::parse("Data Engineer"),
            RoleFilter::TitleContains {
                label: "Data Engineer".to_string(),
                needle: "data engineer".to_string(),
            }
        );
    }

    #[test]
    fn test_role_filter_label_keeps_given_casing() {
        assert_eq!(RoleFilter::parse(" Data Engineer ").label(), "Data Engineer");
        assert_eq!(RoleFilter::parse("all").label(), "All");
        assert!(RoleFilter::parse("Data Engineer").matches(&posting("Senior data engineer", &[])));
    }

    #[test]
    fn test_role_filter_matches_title_case_insensitively() {
        let filter = RoleFilter::parse("Analyst");
        assert!(filter.matches(&posting("Senior Data ANALYST", &[])));
        assert!(!filter.matches(&posting("Data Scientist", &[])));
        assert!(!filter.matches(&JobPosting::default()));
        assert!(RoleFilter::All.matches(&JobPosting::default()));
    }

    #[test]
    fn test_rank_sorts_by_score_and_keeps_ties_stable() {
        let postings = vec![
            posting("A", &["Python", "Java"]),
            posting("B", &["Python"]),
            posting("C", &["Scala"]),
            posting("D", &["SQL", "Python"]),
        ];
        let candidate: SkillSet = ["Python"].into_iter().collect();

        let ranked = rank_postings(&postings, &candidate, &RoleFilter::All);
        let titles: Vec<&str> = ranked
            .iter()
            .map(|r| r.posting.title.as_deref().unwrap())
            .collect();

        assert_eq!(titles, vec!["B", "A", "D", "C"]);
        assert_eq!(ranked[0].result.score, 100.0);
        assert_eq!(ranked[3].result.missing.display_list(), "Scala");
    }

    #[test]
    fn test_rank_applies_filter() {
        let postings = vec![
            posting("Data Engineer", &["Spark"]),
            posting("Data Scientist", &["Python"]),
        ];
        let ranked = rank_postings(
            &postings,
            &SkillSet::new(),
            &RoleFilter::parse("scientist"),
        );
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].result.score, 0.0);
    }

    #[test]
    fn test_top_skills_counts_and_orders() {
        let postings = vec![
            posting("A", &["Python", "SQL"]),
            posting("B", &["SQL", "AWS"]),
            posting("C", &["SQL", "Python", "Docker"]),
        ];

        let demand = top_skills(&postings, 3);
        assert_eq!(
            demand,
            vec![
                SkillDemand { skill: "SQL".to_string(), count: 3 },
                SkillDemand { skill: "Python".to_string(), count: 2 },
                SkillDemand { skill: "AWS".to_string(), count: 1 },
            ]
        );
        assert!(top_skills(Vec::<JobPosting>::new().iter(), 10).is_empty());
    }
}
