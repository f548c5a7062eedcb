use crate::core::extractor::SkillExtractor;
use crate::core::ranking::top_skills;
use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::model::{JobPosting, PostingTable, ProcessedBatch, SkillDemand};
use crate::utils::error::{EtlError, Result};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use zip::write::{FileOptions, ZipWriter};

pub const PROCESSED_CSV: &str = "jobs_with_skills.csv";
pub const PROCESSED_JSON: &str = "jobs_with_skills.json";
pub const SUMMARY_JSON: &str = "skill_summary.json";
pub const ARCHIVE_ZIP: &str = "jobs_with_skills.zip";

const DESCRIPTION_COLUMN: &str = "description";

/// Tags every scraped posting with the skills found in its description.
pub struct SkillPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    extractor: Arc<SkillExtractor>,
}

impl<S: Storage, C: ConfigProvider> SkillPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self::with_extractor(
            storage,
            config,
            Arc::new(SkillExtractor::builtin().clone()),
        )
    }

    pub fn with_extractor(storage: S, config: C, extractor: Arc<SkillExtractor>) -> Self {
        Self {
            storage,
            config,
            extractor,
        }
    }

    fn output_key(&self, file_name: &str) -> String {
        Path::new(self.config.output_path())
            .join(file_name)
            .to_string_lossy()
            .into_owned()
    }

    fn wants_format(&self, format: &str) -> bool {
        self.config.output_formats().iter().any(|f| f == format)
    }
}

#[derive(Serialize)]
struct SkillSummary<'a> {
    generated_at: String,
    total_postings: usize,
    missing_description: usize,
    top_skills: &'a [SkillDemand],
}

/// Parses a postings table. The `description` column is mandatory; a row that
/// cannot be read is logged and skipped.
pub fn parse_postings_csv(data: &[u8]) -> Result<PostingTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if !columns.iter().any(|c| c == DESCRIPTION_COLUMN) {
        tracing::error!("Column '{}' not found in input data", DESCRIPTION_COLUMN);
        return Err(EtlError::MissingColumn {
            column: DESCRIPTION_COLUMN.to_string(),
        });
    }

    let mut postings = Vec::new();
    for (index, row) in reader.records().enumerate() {
        match row {
            Ok(record) => {
                let cells = columns.iter().map(String::as_str).zip(record.iter());
                postings.push(JobPosting::from_row(cells));
            }
            Err(e) => tracing::warn!("Skipping unreadable row {}: {}", index + 1, e),
        }
    }

    Ok(PostingTable { columns, postings })
}

/// Reads back a table written by [`SkillPipeline`], decoding the `skills` column.
pub async fn load_processed_postings<S: Storage>(storage: &S, path: &str) -> Result<PostingTable> {
    let data = storage.read_file(path).await?;
    let table = parse_postings_csv(&data)?;
    tracing::info!("Loaded {} processed postings from {}", table.postings.len(), path);
    Ok(table)
}

fn render_csv(batch: &ProcessedBatch) -> Result<Vec<u8>> {
    let mut columns: Vec<&str> = if batch.columns.is_empty() {
        JobPosting::KNOWN_COLUMNS.to_vec()
    } else {
        batch
            .columns
            .iter()
            .map(String::as_str)
            .filter(|c| *c != "skills" && *c != "skill_count")
            .collect()
    };
    columns.extend(["skills", "skill_count"]);

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&columns)?;
    for posting in &batch.postings {
        writer.write_record(
            columns
                .iter()
                .map(|column| posting.field(column).unwrap_or_default()),
        )?;
    }

    writer
        .into_inner()
        .map_err(|e| EtlError::ProcessingError {
            message: format!("Failed to flush CSV output: {}", e),
        })
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for SkillPipeline<S, C> {
    async fn extract(&self) -> Result<PostingTable> {
        let input = self.config.input_file();
        tracing::info!("Loading data from {}...", input);

        let data = self.storage.read_file(input).await?;
        let table = parse_postings_csv(&data)?;

        tracing::info!(
            "📊 Read {} postings with columns: {}",
            table.postings.len(),
            table.columns.join(", ")
        );
        Ok(table)
    }

    async fn transform(&self, table: PostingTable) -> Result<ProcessedBatch> {
        tracing::info!("Extracting skills from job descriptions...");

        let PostingTable { columns, postings } = table;
        let total = postings.len();
        let workers = self.config.workers().max(1);
        let chunk_size = total.div_ceil(workers).max(1);

        // Each chunk runs on the blocking pool; results are joined in order.
        let mut handles = Vec::new();
        let mut remaining = postings.into_iter();
        let mut offset = 0;
        loop {
            let chunk: Vec<JobPosting> = remaining.by_ref().take(chunk_size).collect();
            if chunk.is_empty() {
                break;
            }
            let chunk_offset = offset;
            offset += chunk.len();

            let extractor = Arc::clone(&self.extractor);
            handles.push(tokio::task::spawn_blocking(move || {
                tag_postings(&extractor, chunk, chunk_offset)
            }));
        }

        let mut processed = Vec::with_capacity(total);
        let mut missing_description = 0;
        for handle in handles {
            let (chunk, missing) = handle.await.map_err(|e| EtlError::ProcessingError {
                message: format!("Skill extraction task failed: {}", e),
            })?;
            processed.extend(chunk);
            missing_description += missing;
        }

        if missing_description > 0 {
            tracing::warn!(
                "{} of {} postings had no description",
                missing_description,
                total
            );
        }

        let skill_demand = top_skills(&processed, self.config.top_skills_limit());
        tracing::debug!("Top skills: {:?}", skill_demand);

        Ok(ProcessedBatch {
            postings: processed,
            columns,
            missing_description,
            skill_demand,
        })
    }

    async fn load(&self, batch: ProcessedBatch) -> Result<String> {
        let mut files: Vec<(&str, Vec<u8>)> = Vec::new();

        if self.wants_format("csv") {
            files.push((PROCESSED_CSV, render_csv(&batch)?));
        }
        if self.wants_format("json") {
            files.push((
                PROCESSED_JSON,
                serde_json::to_vec_pretty(&batch.postings)?,
            ));
        }

        let summary = SkillSummary {
            generated_at: chrono::Utc::now().to_rfc3339(),
            total_postings: batch.postings.len(),
            missing_description: batch.missing_description,
            top_skills: &batch.skill_demand,
        };
        files.push((SUMMARY_JSON, serde_json::to_vec_pretty(&summary)?));

        if self.config.compress_output() {
            tracing::debug!("Creating ZIP file with {} files", files.len());

            let zip_data = {
                let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
                for (name, data) in &files {
                    zip.start_file::<_, ()>(*name, FileOptions::default())?;
                    zip.write_all(data)?;
                }
                zip.finish()?.into_inner()
            };

            let key = self.output_key(ARCHIVE_ZIP);
            tracing::debug!("Writing ZIP file ({} bytes) to {}", zip_data.len(), key);
            self.storage.write_file(&key, &zip_data).await?;
            return Ok(key);
        }

        let mut primary = None;
        for (name, data) in &files {
            let key = self.output_key(name);
            tracing::debug!("Writing {} ({} bytes)", key, data.len());
            self.storage.write_file(&key, data).await?;
            primary.get_or_insert(key);
        }

        tracing::info!(
            "Processed data saved for {} postings",
            batch.postings.len()
        );
        primary.ok_or_else(|| EtlError::ProcessingError {
            message: "No output was written".to_string(),
        })
    }
}

fn tag_postings(
    extractor: &SkillExtractor,
    mut postings: Vec<JobPosting>,
    offset: usize,
) -> (Vec<JobPosting>, usize) {
    let mut missing = 0;
    for (index, posting) in postings.iter_mut().enumerate() {
        if !posting.has_description() {
            tracing::warn!(
                "Row {} ({}) has no description, leaving skills empty",
                offset + index + 1,
                posting.title.as_deref().unwrap_or("untitled")
            );
            missing += 1;
        }
        posting.skills = extractor.extract(posting.description.as_deref());
    }
    (postings, missing)
}
