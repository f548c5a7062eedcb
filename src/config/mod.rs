pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "jobmarket-etl")]
#[command(about = "Tag scraped job postings with the technical skills they ask for")]
pub struct CliConfig {
    /// Postings table produced by the scraper
    #[arg(long, default_value = "data/raw/jobs.csv")]
    pub input: String,

    #[arg(long, default_value = "data/processed")]
    pub output_path: String,

    /// Output formats (csv, json)
    #[arg(long, value_delimiter = ',', default_value = "csv")]
    pub formats: Vec<String>,

    /// Bundle all outputs into a single ZIP archive
    #[arg(long)]
    pub compress: bool,

    /// How many top skills to record in the summary
    #[arg(long, default_value = "15")]
    pub top_skills: usize,

    #[arg(long, default_value = "4")]
    pub workers: usize,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn input_file(&self) -> &str {
        &self.input
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.formats
    }

    fn compress_output(&self) -> bool {
        self.compress
    }

    fn top_skills_limit(&self) -> usize {
        self.top_skills
    }

    fn workers(&self) -> usize {
        self.workers
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("input", &self.input)?;
        validation::validate_file_extension("input", &self.input, &["csv"])?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_output_formats("formats", &self.formats)?;
        validation::validate_positive_number("top_skills", self.top_skills, 1)?;
        validation::validate_range("workers", self.workers, 1, 64)?;
        Ok(())
    }
}
