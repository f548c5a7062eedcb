pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::cli::LocalStorage;

pub use core::{
    etl::EtlEngine,
    extractor::{extract_skills, SkillExtractor},
    pipeline::SkillPipeline,
    ranking::{rank_postings, top_skills, RankedPosting, RoleFilter},
    resume::{parse_resume, parse_resume_file},
    scorer::{breakdown, score, MatchBreakdown},
    vocabulary::Vocabulary,
};
pub use domain::model::{Candidate, JobPosting, SkillSet};
pub use utils::error::{EtlError, Result};
