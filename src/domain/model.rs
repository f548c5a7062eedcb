use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Distinct skill terms detected in one document.
///
/// Backed by an ordered set so that display and the stored textual form are
/// stable; matching logic treats it as unordered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillSet(BTreeSet<String>);

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, term: impl Into<String>) -> bool {
        self.0.insert(term.into())
    }

    pub fn contains(&self, term: &str) -> bool {
        self.0.contains(term)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn intersection(&self, other: &SkillSet) -> SkillSet {
        self.0.intersection(&other.0).cloned().collect()
    }

    pub fn difference(&self, other: &SkillSet) -> SkillSet {
        self.0.difference(&other.0).cloned().collect()
    }

    /// Comma separated list for human output, "None" when empty.
    pub fn display_list(&self) -> String {
        if self.is_empty() {
            "None".to_string()
        } else {
            self.iter().collect::<Vec<_>>().join(", ")
        }
    }

    /// Stored form used in the `skills` column: a JSON array in sorted order.
    pub fn encode(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_else(|_| "[]".to_string())
    }

    /// Parses the `skills` column.
    ///
    /// Accepts the JSON array written by [`SkillSet::encode`] and the older
    /// list literal form with single quotes (`['Python', 'SQL']`). Blank text is
    /// an empty set; anything else unparseable is logged and treated as empty.
    pub fn decode(stored: &str) -> SkillSet {
        let trimmed = stored.trim();
        if trimmed.is_empty() {
            return SkillSet::new();
        }

        if let Ok(terms) = serde_json::from_str::<Vec<String>>(trimmed) {
            return terms.into_iter().collect();
        }

        match decode_list_literal(trimmed) {
            Some(set) => set,
            None => {
                tracing::warn!("Unreadable skills value {:?}, using empty set", stored);
                SkillSet::new()
            }
        }
    }
}

fn decode_list_literal(text: &str) -> Option<SkillSet> {
    let inner = text.strip_prefix('[')?.strip_suffix(']')?.trim();
    if inner.is_empty() {
        return Some(SkillSet::new());
    }

    inner
        .split(',')
        .map(|item| {
            let item = item.trim();
            item.strip_prefix('\'')
                .and_then(|s| s.strip_suffix('\''))
                .or_else(|| item.strip_prefix('"').and_then(|s| s.strip_suffix('"')))
                .map(str::to_string)
        })
        .collect::<Option<BTreeSet<String>>>()
        .map(SkillSet)
}

impl FromIterator<String> for SkillSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        SkillSet(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a str> for SkillSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        SkillSet(iter.into_iter().map(str::to_string).collect())
    }
}

impl IntoIterator for SkillSet {
    type Item = String;
    type IntoIter = std::collections::btree_set::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// One row of the scraped postings table.
///
/// Only `description` is inspected by the skill extractor; the rest is carried
/// through to the output untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub source: Option<String>,
    /// Columns not listed above, in input order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<(String, String)>,
    #[serde(default)]
    pub skills: SkillSet,
}

impl JobPosting {
    /// Column names with a dedicated field; everything else lands in `extra`.
    pub const KNOWN_COLUMNS: [&'static str; 6] =
        ["title", "company", "location", "description", "link", "source"];

    /// Builds a posting from one table row. Blank cells become `None`.
    pub fn from_row<'a, I>(cells: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut posting = JobPosting::default();
        for (column, value) in cells {
            posting.set_field(column, value);
        }
        posting
    }

    pub fn set_field(&mut self, column: &str, value: &str) {
        let cell = (!value.trim().is_empty()).then(|| value.to_string());
        match column {
            "title" => self.title = cell,
            "company" => self.company = cell,
            "location" => self.location = cell,
            "description" => self.description = cell,
            "link" => self.link = cell,
            "source" => self.source = cell,
            "skills" => self.skills = SkillSet::decode(value),
            // Derived from `skills`, recomputed on output.
            "skill_count" => {}
            _ => self.extra.push((column.to_string(), value.to_string())),
        }
    }

    /// Cell value for an output column.
    pub fn field(&self, column: &str) -> Option<String> {
        match column {
            "title" => self.title.clone(),
            "company" => self.company.clone(),
            "location" => self.location.clone(),
            "description" => self.description.clone(),
            "link" => self.link.clone(),
            "source" => self.source.clone(),
            "skills" => Some(self.skills.encode()),
            "skill_count" => Some(self.skill_count().to_string()),
            _ => self
                .extra
                .iter()
                .find(|(name, _)| name == column)
                .map(|(_, value)| value.clone()),
        }
    }

    pub fn skill_count(&self) -> usize {
        self.skills.len()
    }

    pub fn has_description(&self) -> bool {
        self.description
            .as_deref()
            .map(|d| !d.trim().is_empty())
            .unwrap_or(false)
    }
}

/// Session-scoped view of the person matching against the corpus.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Candidate {
    pub resume_text: String,
    pub skills: SkillSet,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillDemand {
    pub skill: String,
    pub count: usize,
}

/// Raw postings as read from the scraper's table.
#[derive(Debug, Clone, Default)]
pub struct PostingTable {
    /// Header order of the source table, so load can echo it back.
    pub columns: Vec<String>,
    pub postings: Vec<JobPosting>,
}

/// Output of the transform phase.
#[derive(Debug, Clone, Default)]
pub struct ProcessedBatch {
    pub postings: Vec<JobPosting>,
    pub columns: Vec<String>,
    pub missing_description: usize,
    pub skill_demand: Vec<SkillDemand>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_is_sorted_json() {
        let set: SkillSet = ["SQL", "AWS", "Python"].into_iter().collect();
        assert_eq!(set.encode(), r#"["AWS","Python","SQL"]"#);
    }

    #[test]
    fn test_decode_reverses_encode() {
        let set: SkillSet = ["C++", "Power BI", "Scikit-learn"].into_iter().collect();
        assert_eq!(SkillSet::decode(&set.encode()), set);
    }

    #[test]
    fn test_decode_list_literal() {
        let decoded = SkillSet::decode("['Python', 'SQL', 'C#']");
        let expected: SkillSet = ["Python", "SQL", "C#"].into_iter().collect();
        assert_eq!(decoded, expected);
        assert!(SkillSet::decode("[]").is_empty());
    }

    #[test]
    fn test_decode_garbage_is_empty() {
        assert!(SkillSet::decode("").is_empty());
        assert!(SkillSet::decode("Python; SQL").is_empty());
        assert!(SkillSet::decode("[Python, 'SQL']").is_empty());
    }

    #[test]
    fn test_set_operations() {
        let job: SkillSet = ["Python", "SQL", "AWS"].into_iter().collect();
        let me: SkillSet = ["Python", "Java"].into_iter().collect();

        assert_eq!(job.intersection(&me).display_list(), "Python");
        assert_eq!(job.difference(&me).display_list(), "AWS, SQL");
        assert_eq!(SkillSet::new().display_list(), "None");
    }

    #[test]
    fn test_has_description() {
        let mut posting = JobPosting::default();
        assert!(!posting.has_description());
        posting.description = Some("   ".to_string());
        assert!(!posting.has_description());
        posting.description = Some("Python".to_string());
        assert!(posting.has_description());
    }

    #[test]
    fn test_from_row_and_field() {
        let posting = JobPosting::from_row([
            ("title", "Data Engineer"),
            ("company", "Acme"),
            ("description", ""),
            ("salary", "100k"),
            ("skills", "['Spark']"),
            ("skill_count", "7"),
        ]);

        assert_eq!(posting.title.as_deref(), Some("Data Engineer"));
        assert_eq!(posting.description, None);
        assert_eq!(posting.field("salary").as_deref(), Some("100k"));
        assert_eq!(posting.field("skills").as_deref(), Some(r#"["Spark"]"#));
        assert_eq!(posting.field("skill_count").as_deref(), Some("1"));
        assert_eq!(posting.field("location"), None);
        assert_eq!(posting.field("unknown"), None);
    }
}
