//! Static registry of recognised skill terms.
//!
//! The registry is source configuration: edit [`BUILTIN_CATEGORIES`] to add or
//! remove terms. It is validated and frozen the first time it is requested.

use crate::utils::error::{EtlError, Result};
use std::collections::HashMap;
use std::sync::OnceLock;

pub const BUILTIN_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Languages",
        &[
            "Python", "R", "SQL", "Java", "Scala", "C++", "C#", "Go", "Rust", "Julia", "SAS",
            "MATLAB", "JavaScript", "TypeScript",
        ],
    ),
    (
        "Cloud",
        &["AWS", "Azure", "GCP", "Google Cloud", "Amazon Web Services"],
    ),
    (
        "Data Engineering",
        &[
            "Spark", "Hadoop", "Kafka", "Airflow", "dbt", "Snowflake", "BigQuery", "Redshift",
            "Databricks", "Hive", "Flink",
        ],
    ),
    (
        "Machine Learning",
        &[
            "TensorFlow", "PyTorch", "Keras", "Scikit-learn", "XGBoost", "LightGBM", "CatBoost",
            "Hugging Face", "LLM", "NLP", "Computer Vision", "MLflow",
        ],
    ),
    (
        "Data Viz & BI",
        &["Tableau", "Power BI", "Looker", "Plotly", "Matplotlib", "Seaborn", "Excel"],
    ),
    (
        "DevOps & Tools",
        &["Docker", "Kubernetes", "Git", "GitHub", "GitLab", "Jenkins", "Linux", "Bash", "Jira"],
    ),
];

fn expect_valid_builtin(checked: Result<&'static Vocabulary>) -> &'static Vocabulary {
    match checked {
        Ok(vocabulary) => vocabulary,
        Err(e) => panic!("built-in skill vocabulary is invalid: {}", e),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillCategory {
    pub name: String,
    pub terms: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Vocabulary {
    categories: Vec<SkillCategory>,
}

impl Vocabulary {
    pub fn new(categories: Vec<SkillCategory>) -> Self {
        Self { categories }
    }

    pub fn from_static(categories: &[(&str, &[&str])]) -> Self {
        Self::new(
            categories
                .iter()
                .map(|(name, terms)| SkillCategory {
                    name: name.to_string(),
                    terms: terms.iter().map(|t| t.to_string()).collect(),
                })
                .collect(),
        )
    }

    /// The compiled-in registry, validated on first use.
    ///
    /// Binaries should call [`Vocabulary::try_builtin`] at startup so that a
    /// broken registry stops the process with a proper error instead.
    pub fn builtin() -> &'static Vocabulary {
        expect_valid_builtin(Self::try_builtin())
    }

    pub fn try_builtin() -> Result<&'static Vocabulary> {
        static BUILTIN: OnceLock<std::result::Result<Vocabulary, String>> = OnceLock::new();

        BUILTIN
            .get_or_init(|| {
                let vocabulary = Vocabulary::from_static(BUILTIN_CATEGORIES);
                vocabulary
                    .validate()
                    .map(|_| vocabulary)
                    .map_err(|e| e.to_string())
            })
            .as_ref()
            .map_err(|message| EtlError::VocabularyError {
                message: message.clone(),
            })
    }

    pub fn categories(&self) -> &[SkillCategory] {
        &self.categories
    }

    /// Every term, category order then term order.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.categories
            .iter()
            .flat_map(|c| c.terms.iter().map(String::as_str))
    }

    pub fn len(&self) -> usize {
        self.categories.iter().map(|c| c.terms.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn category_of(&self, term: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.terms.iter().any(|t| t == term))
            .map(|c| c.name.as_str())
    }

    pub fn validate(&self) -> Result<()> {
        if self.categories.is_empty() {
            return Err(vocabulary_error("no categories defined".to_string()));
        }

        let mut seen: HashMap<String, &str> = HashMap::new();
        for category in &self.categories {
            if category.name.trim().is_empty() {
                return Err(vocabulary_error("category with a blank name".to_string()));
            }
            if category.terms.is_empty() {
                return Err(vocabulary_error(format!(
                    "category '{}' has no terms",
                    category.name
                )));
            }
            for term in &category.terms {
                if term.trim().is_empty() || term.trim() != term {
                    return Err(vocabulary_error(format!(
                        "category '{}' has a blank or padded term {:?}",
                        category.name, term
                    )));
                }
                // Matching is case-insensitive, so these would collide.
                if let Some(previous) = seen.insert(term.to_lowercase(), &category.name) {
                    return Err(vocabulary_error(format!(
                        "term '{}' appears in both '{}' and '{}'",
                        term, previous, category.name
                    )));
                }
            }
        }
        Ok(())
    }
}

fn vocabulary_error(message: String) -> EtlError {
    EtlError::VocabularyError { message }
}
