use crate::core::vocabulary::Vocabulary;
use crate::domain::model::SkillSet;
use crate::utils::error::{EtlError, Result};
use regex::{Regex, RegexBuilder};
use std::sync::OnceLock;

/// Compiled program size allowed per term, the `regex` crate's default.
const TERM_SIZE_LIMIT: usize = 10 * (1 << 20);

#[derive(Debug, Clone)]
enum TermMatcher {
    /// `\b<term>\b` over the lowercased text.
    WordBounded(Regex),
    /// Plain substring test, for terms such as `C++` and `C#` where a word
    /// boundary cannot anchor on the trailing punctuation.
    Substring(String),
}

impl TermMatcher {
    fn for_term(term: &str, size_limit: usize) -> Result<Self> {
        let lowered = term.to_lowercase();
        if !starts_and_ends_with_word_char(&lowered) {
            return Ok(TermMatcher::Substring(lowered));
        }

        let pattern = format!(r"\b{}\b", regex::escape(&lowered));
        RegexBuilder::new(&pattern)
            .size_limit(size_limit)
            .build()
            .map(TermMatcher::WordBounded)
            .map_err(|e| EtlError::VocabularyError {
                message: format!("skill term '{}' cannot be compiled: {}", term, e),
            })
    }

    fn is_match(&self, lowered_text: &str) -> bool {
        match self {
            TermMatcher::WordBounded(regex) => regex.is_match(lowered_text),
            TermMatcher::Substring(needle) => lowered_text.contains(needle.as_str()),
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn starts_and_ends_with_word_char(term: &str) -> bool {
    let first = term.chars().next().map(is_word_char).unwrap_or(false);
    let last = term.chars().next_back().map(is_word_char).unwrap_or(false);
    first && last
}

/// Finds vocabulary terms in free text.
///
/// Matchers are compiled once per vocabulary; `extract` holds no state between
/// calls and can be shared across threads.
#[derive(Debug, Clone)]
pub struct SkillExtractor {
    matchers: Vec<(String, TermMatcher)>,
}

impl SkillExtractor {
    /// Fails with [`EtlError::VocabularyError`] when a term cannot be compiled.
    pub fn new(vocabulary: &Vocabulary) -> Result<Self> {
        Self::with_size_limit(vocabulary, TERM_SIZE_LIMIT)
    }

    fn with_size_limit(vocabulary: &Vocabulary, size_limit: usize) -> Result<Self> {
        let matchers = vocabulary
            .terms()
            .map(|term| Ok((term.to_string(), TermMatcher::for_term(term, size_limit)?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { matchers })
    }

    /// Extractor over [`Vocabulary::builtin`].
    ///
    /// Panics if the built-in registry is invalid or a term fails to compile;
    /// binaries call [`SkillExtractor::try_builtin`] at startup first.
    pub fn builtin() -> &'static SkillExtractor {
        match Self::try_builtin() {
            Ok(extractor) => extractor,
            Err(e) => panic!("built-in skill extractor is unusable: {}", e),
        }
    }

    pub fn try_builtin() -> Result<&'static SkillExtractor> {
        static EXTRACTOR: OnceLock<std::result::Result<SkillExtractor, String>> = OnceLock::new();

        EXTRACTOR
            .get_or_init(|| {
                Vocabulary::try_builtin()
                    .and_then(SkillExtractor::new)
                    .map_err(|e| e.to_string())
            })
            .as_ref()
            .map_err(|message| EtlError::VocabularyError {
                message: message.clone(),
            })
    }

    /// Returns the canonical spelling of every term found in `text`.
    ///
    /// `None` (a missing cell upstream) yields an empty set.
    pub fn extract(&self, text: Option<&str>) -> SkillSet {
        let Some(text) = text else {
            return SkillSet::new();
        };

        let lowered = text.to_lowercase();
        self.matchers
            .iter()
            .filter(|(_, matcher)| matcher.is_match(&lowered))
            .map(|(term, _)| term.as_str())
            .collect()
    }

    pub fn term_count(&self) -> usize {
        self.matchers.len()
    }
}

/// [`SkillExtractor::extract`] over the built-in vocabulary.
///
/// Relies on the startup check in [`SkillExtractor::try_builtin`]; called
/// without it, a broken registry panics here.
pub fn extract_skills(text: Option<&str>) -> SkillSet {
    SkillExtractor::builtin().extract(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vocabulary::SkillCategory;

    fn skills(text: &str) -> SkillSet {
        extract_skills(Some(text))
    }

    #[test]
    fn test_short_terms_need_word_boundaries() {
        assert!(!skills("Good").contains("Go"));
        assert!(!skills("Regression").contains("R"));

        let found = skills("We use Go and R daily");
        assert!(found.contains("Go"));
        assert!(found.contains("R"));
    }

    #[test]
    fn test_punctuated_terms_use_substring() {
        let found = skills("Experience with C++ and C#");
        assert!(found.contains("C++"));
        assert!(found.contains("C#"));

        let none = skills("I like ceramics");
        assert!(!none.contains("C++"));
        assert!(!none.contains("C#"));
    }

    #[test]
    fn test_substring_terms_match_inside_words() {
        // No boundary check at all for these two.
        assert!(skills("ObjectiveC++Bridge").contains("C++"));
    }

    #[test]
    fn test_canonical_casing_is_returned() {
        let found = skills("aws, PYTHON and scikit-learn; power bi dashboards");
        let expected: SkillSet = ["AWS", "Python", "Scikit-learn", "Power BI"]
            .into_iter()
            .collect();
        assert_eq!(found, expected);
    }

    #[test]
    fn test_multi_word_terms() {
        let found = skills("Deployed on Google Cloud with Hugging Face models");
        assert!(found.contains("Google Cloud"));
        assert!(found.contains("Hugging Face"));
        assert!(!skills("Google Cloudy").contains("Google Cloud"));
    }

    #[test]
    fn test_git_does_not_match_github() {
        let found = skills("Our code lives on GitHub");
        assert!(found.contains("GitHub"));
        assert!(!found.contains("Git"));
    }

    #[test]
    fn test_missing_and_empty_text() {
        assert!(extract_skills(None).is_empty());
        assert!(skills("").is_empty());
    }

    #[test]
    fn test_case_invariance() {
        let text = "Spark, Kafka and dbt pipelines in Python";
        let base = skills(text);
        assert_eq!(base, skills(&text.to_uppercase()));
        assert_eq!(base, skills(&text.to_lowercase()));
        assert_eq!(base.len(), 4);
    }

    #[test]
    fn test_idempotent() {
        let text = "Tableau, Excel, SQL";
        assert_eq!(skills(text), skills(text));
    }

    #[test]
    fn test_results_are_vocabulary_terms() {
        let vocabulary = Vocabulary::builtin();
        let found = skills("Python R SQL Java Scala Go Rust AWS Docker Linux Bash COBOL Fortran");
        assert!(found.iter().all(|s| vocabulary.terms().any(|t| t == s)));
        assert!(!found.contains("COBOL"));
    }

    #[test]
    fn test_custom_vocabulary() {
        let vocabulary = Vocabulary::from_static(&[("Langs", &["F#", "Zig"])]);
        let extractor = SkillExtractor::new(&vocabulary).unwrap();
        assert_eq!(extractor.term_count(), 2);

        let found = extractor.extract(Some("f# and zig, not zigzag"));
        let expected: SkillSet = ["F#", "Zig"].into_iter().collect();
        assert_eq!(found, expected);
        assert!(extractor.extract(Some("zigzag")).is_empty());
    }

    #[test]
    fn test_uncompilable_term_is_a_vocabulary_error() {
        let vocabulary = Vocabulary::new(vec![SkillCategory {
            name: "Oversized".to_string(),
            terms: vec!["Python".to_string(), "x".repeat(5000)],
        }]);

        let err = SkillExtractor::with_size_limit(&vocabulary, 100).unwrap_err();
        assert!(matches!(err, EtlError::VocabularyError { .. }));
        assert_eq!(err.exit_code(), 3);
        assert!(SkillExtractor::new(&vocabulary).is_ok());
    }

    #[test]
    fn test_builtin_extractor_is_available() {
        let extractor = SkillExtractor::try_builtin().unwrap();
        assert_eq!(extractor.term_count(), Vocabulary::builtin().len());
    }
}
