pub mod etl;
pub mod extractor;
pub mod pipeline;
pub mod ranking;
pub mod resume;
pub mod scorer;
pub mod vocabulary;

pub use crate::domain::model::{JobPosting, PostingTable, ProcessedBatch, SkillSet};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
