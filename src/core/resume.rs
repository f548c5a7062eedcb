use crate::core::extractor::SkillExtractor;
use crate::domain::model::Candidate;
use crate::utils::error::Result;
use lopdf::Document;
use std::path::Path;

/// Extracts the text layer of an in-memory PDF.
///
/// Pages are read in document order and each non-empty page is followed by a
/// newline. Pages without a text layer are skipped. A document that cannot be
/// opened at all yields an empty string and a warning; this never fails.
pub fn parse_resume(bytes: &[u8]) -> String {
    let doc = match Document::load_mem(bytes) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::warn!("Could not open resume PDF ({} bytes): {}", bytes.len(), e);
            return String::new();
        }
    };

    let mut text = String::new();
    for page_num in doc.get_pages().into_keys() {
        match doc.extract_text(&[page_num]) {
            Ok(page_text) if !page_text.is_empty() => {
                text.push_str(&page_text);
                text.push('\n');
            }
            Ok(_) => tracing::debug!("Page {} has no text layer", page_num),
            Err(e) => tracing::debug!("Skipping page {}: {}", page_num, e),
        }
    }

    tracing::debug!("Extracted {} characters from resume", text.len());
    text
}

/// Reads a resume from disk and parses it. Only the read itself can fail.
pub fn parse_resume_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(parse_resume(&bytes))
}

impl Candidate {
    pub fn from_resume(bytes: &[u8], extractor: &SkillExtractor) -> Self {
        let resume_text = parse_resume(bytes);
        let skills = extractor.extract(Some(&resume_text));
        tracing::info!("Extracted {} skills from resume", skills.len());
        Self {
            resume_text,
            skills,
        }
    }

    pub fn from_text(resume_text: impl Into<String>, extractor: &SkillExtractor) -> Self {
        let resume_text = resume_text.into();
        let skills = extractor.extract(Some(&resume_text));
        Self {
            resume_text,
            skills,
        }
    }
}
