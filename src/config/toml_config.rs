use crate::core::ranking::RoleFilter;
use crate::core::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: PipelineConfig,
    pub input: InputConfig,
    #[serde(default)]
    pub transform: TransformConfig,
    pub load: LoadConfig,
    pub matching: Option<MatchingConfig>,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: Option<String>,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Postings table written by the scraper.
    pub path: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransformConfig {
    pub workers: Option<usize>,
    pub top_skills: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub output_formats: Vec<String>,
    pub compression: Option<CompressionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    pub top_n: Option<usize>,
    pub role_filter: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_level: Option<String>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as is.
    fn substitute_env_vars(content: &str) -> String {
        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR.get_or_init(|| {
            Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is a valid regex")
        });

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("pipeline.name", &self.pipeline.name)?;
        validation::validate_path("input.path", &self.input.path)?;
        validation::validate_file_extension("input.path", &self.input.path, &["csv"])?;
        validation::validate_path("load.output_path", &self.load.output_path)?;
        validation::validate_output_formats("load.output_formats", &self.load.output_formats)?;

        if let Some(workers) = self.transform.workers {
            validation::validate_range("transform.workers", workers, 1, 64)?;
        }
        if let Some(top_skills) = self.transform.top_skills {
            validation::validate_positive_number("transform.top_skills", top_skills, 1)?;
        }
        if let Some(top_n) = self.matching.as_ref().and_then(|m| m.top_n) {
            validation::validate_positive_number("matching.top_n", top_n, 1)?;
        }

        Ok(())
    }

    pub fn top_n(&self) -> usize {
        self.matching.as_ref().and_then(|m| m.top_n).unwrap_or(5)
    }

    pub fn role_filter(&self) -> RoleFilter {
        self.matching
            .as_ref()
            .and_then(|m| m.role_filter.as_deref())
            .map(RoleFilter::parse)
            .unwrap_or_default()
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn log_level(&self) -> Option<&str> {
        self.monitoring.as_ref().and_then(|m| m.log_level.as_deref())
    }
}

/// What `resume_match` ranks against and how much of it to show.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchSettings {
    pub processed_path: String,
    pub top_n: usize,
    pub role_filter: RoleFilter,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            processed_path: "data/processed".to_string(),
            top_n: 5,
            role_filter: RoleFilter::All,
        }
    }
}

impl MatchSettings {
    /// Reads `[matching]`; postings are looked up where `[load]` writes them.
    pub fn from_config(config: &TomlConfig) -> Self {
        Self {
            processed_path: config.load.output_path.clone(),
            top_n: config.top_n(),
            role_filter: config.role_filter(),
        }
    }

    /// Command-line values win over the file where given.
    pub fn with_overrides(
        mut self,
        processed_path: Option<String>,
        top_n: Option<usize>,
        role: Option<&str>,
    ) -> Self {
        if let Some(processed_path) = processed_path {
            self.processed_path = processed_path;
        }
        if let Some(top_n) = top_n {
            self.top_n = top_n;
        }
        if let Some(role) = role {
            self.role_filter = RoleFilter::parse(role);
        }
        self
    }
}

impl ConfigProvider for TomlConfig {
    fn input_file(&self) -> &str {
        &self.input.path
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.load.output_formats
    }

    fn compress_output(&self) -> bool {
        self.load
            .compression
            .as_ref()
            .map(|c| c.enabled)
            .unwrap_or(false)
    }

    fn top_skills_limit(&self) -> usize {
        self.transform.top_skills.unwrap_or(15)
    }

    fn workers(&self) -> usize {
        self.transform.workers.unwrap_or(4)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC: &str = r#"
[pipeline]
name = "linkedin-data-roles"
version = "1.0.0"

[input]
path = "data/raw/jobs.csv"

[load]
output_path = "data/processed"
output_formats = ["csv", "json"]
"#;

    #[test]
    fn test_parse_basic_toml_config() {
        let config = TomlConfig::from_toml_str(BASIC).unwrap();

        assert_eq!(config.pipeline.name, "linkedin-data-roles");
        assert_eq!(config.input_file(), "data/raw/jobs.csv");
        assert_eq!(config.workers(), 4);
        assert_eq!(config.top_skills_limit(), 15);
        assert_eq!(config.top_n(), 5);
        assert_eq!(config.role_filter(), RoleFilter::All);
        assert!(!config.compress_output());
        assert!(!config.monitoring_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[pipeline]
name = "full"
description = "All sections"
version = "2.0"

[input]
path = "jobs.csv"

[transform]
workers = 8
top_skills = 10

[load]
output_path = "out"
output_formats = ["csv"]

[load.compression]
enabled = true

[matching]
top_n = 3
role_filter = "Data Engineer"

[monitoring]
enabled = true
log_level = "debug"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.workers(), 8);
        assert_eq!(config.top_skills_limit(), 10);
        assert!(config.compress_output());
        assert_eq!(config.top_n(), 3);
        assert_eq!(
            config.role_filter(),
            RoleFilter::TitleContains {
                label: "Data Engineer".to_string(),
                needle: "data engineer".to_string(),
            }
        );
        assert!(config.monitoring_enabled());
        assert_eq!(config.log_level(), Some("debug"));
    }

    #[test]
    fn test_match_settings_from_matching_section() {
        let content = format!(
            "{}\n[matching]\ntop_n = 3\nrole_filter = \"Data Engineer\"\n",
            BASIC
        );
        let config = TomlConfig::from_toml_str(&content).unwrap();

        let settings = MatchSettings::from_config(&config);
        assert_eq!(settings.processed_path, "data/processed");
        assert_eq!(settings.top_n, 3);
        assert_eq!(settings.role_filter.label(), "Data Engineer");

        let overridden = settings.with_overrides(None, Some(10), Some("All"));
        assert_eq!(overridden.processed_path, "data/processed");
        assert_eq!(overridden.top_n, 10);
        assert_eq!(overridden.role_filter, RoleFilter::All);
    }

    #[test]
    fn test_match_settings_defaults_without_config() {
        let settings = MatchSettings::default().with_overrides(
            Some("elsewhere".to_string()),
            None,
            Some("Analyst"),
        );
        assert_eq!(settings.processed_path, "elsewhere");
        assert_eq!(settings.top_n, 5);
        assert_eq!(settings.role_filter.label(), "Analyst");
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("JOBMARKET_TEST_OUTPUT", "/tmp/jobmarket-out");

        let content = BASIC.replace("data/processed", "${JOBMARKET_TEST_OUTPUT}");
        let config = TomlConfig::from_toml_str(&content).unwrap();
        assert_eq!(config.output_path(), "/tmp/jobmarket-out");

        std::env::remove_var("JOBMARKET_TEST_OUTPUT");
    }

    #[test]
    fn test_unknown_env_var_is_kept() {
        let content = BASIC.replace("data/processed", "${JOBMARKET_SURELY_UNSET}");
        let config = TomlConfig::from_toml_str(&content).unwrap();
        assert_eq!(config.output_path(), "${JOBMARKET_SURELY_UNSET}");
    }

    #[test]
    fn test_config_validation() {
        let bad_format = BASIC.replace(r#"["csv", "json"]"#, r#"["xlsx"]"#);
        let config = TomlConfig::from_toml_str(&bad_format).unwrap();
        assert!(config.validate().is_err());

        let bad_input = BASIC.replace("data/raw/jobs.csv", "data/raw/jobs.parquet");
        let config = TomlConfig::from_toml_str(&bad_input).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[pipeline\nname=").unwrap_err();
        assert!(matches!(err, EtlError::ConfigError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(BASIC.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.pipeline.name, "linkedin-data-roles");
    }
}
