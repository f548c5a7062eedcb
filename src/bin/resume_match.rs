use anyhow::Context;
use clap::Parser;
use jobmarket_etl::config::toml_config::{MatchSettings, TomlConfig};
use jobmarket_etl::core::pipeline::{load_processed_postings, PROCESSED_CSV};
use jobmarket_etl::utils::{logger, validation, validation::Validate};
use jobmarket_etl::{rank_postings, top_skills, Candidate, LocalStorage, SkillExtractor, Vocabulary};
use std::path::Path;

#[derive(Parser)]
#[command(name = "resume-match")]
#[command(about = "Rank processed job postings against a resume PDF")]
struct Args {
    /// Resume to match, as a PDF
    #[arg(short, long)]
    resume: String,

    /// TOML run file; its [matching] section and output path supply defaults
    #[arg(short, long)]
    config: Option<String>,

    /// Directory holding the processed postings table [default: data/processed]
    #[arg(long)]
    processed_path: Option<String>,

    /// Only consider postings whose title contains this text ("All" for every posting)
    #[arg(long)]
    role: Option<String>,

    /// Number of postings to show [default: 5]
    #[arg(short = 'n', long)]
    top: Option<usize>,

    /// Number of in-demand skills to show
    #[arg(long, default_value = "15")]
    top_skills: usize,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let settings = match &args.config {
        Some(path) => {
            let config = TomlConfig::from_file(path)
                .with_context(|| format!("Could not load config {}", path))?;
            config.validate()?;
            MatchSettings::from_config(&config)
        }
        None => MatchSettings::default(),
    }
    .with_overrides(args.processed_path.clone(), args.top, args.role.as_deref());

    validation::validate_file_extension("resume", &args.resume, &["pdf"])?;
    validation::validate_positive_number("top", settings.top_n, 1)?;

    let vocabulary = Vocabulary::try_builtin()?;
    let extractor = SkillExtractor::try_builtin()?;

    let storage = LocalStorage::new(".");
    let table_path = Path::new(&settings.processed_path).join(PROCESSED_CSV);
    let table_path = table_path.to_string_lossy();
    let table = load_processed_postings(&storage, &table_path)
        .await
        .with_context(|| {
            format!(
                "Processed data not found at {}. Run jobmarket-etl first",
                table_path
            )
        })?;

    let resume_bytes = tokio::fs::read(&args.resume)
        .await
        .with_context(|| format!("Could not read resume {}", args.resume))?;
    let candidate = Candidate::from_resume(&resume_bytes, extractor);
    drop(resume_bytes);

    println!("📄 Extracted {} skills from your resume", candidate.skills.len());
    println!("   {}", candidate.skills.display_list());
    println!();

    let filter = &settings.role_filter;
    let postings = &table.postings;
    let filtered_count = postings.iter().filter(|p| filter.matches(p)).count();
    println!("Total Jobs Analyzed: {}", filtered_count);

    if candidate.skills.is_empty() {
        println!("No skills found in the resume, skipping match ranking.");
    } else {
        println!();
        println!("🎯 Top Matched Jobs for You");
        let ranked = rank_postings(postings, &candidate.skills, filter);
        for entry in ranked.iter().take(settings.top_n) {
            let posting = entry.posting;
            println!(
                "{}% Match: {} @ {}",
                entry.result.score,
                posting.title.as_deref().unwrap_or("Untitled"),
                posting.company.as_deref().unwrap_or("Unknown company")
            );
            println!(
                "   Location: {}",
                posting.location.as_deref().unwrap_or("-")
            );
            if let Some(link) = &posting.link {
                println!("   Apply: {}", link);
            }
            println!("   ✅ Matched: {}", entry.result.matched.display_list());
            println!("   ❌ Missing: {}", entry.result.missing.display_list());
        }
    }

    println!();
    println!("🔥 Top Skills in Demand ({})", filter.label());
    let demand = top_skills(
        postings.iter().filter(|p| filter.matches(p)),
        args.top_skills,
    );
    if demand.is_empty() {
        println!("No skills extracted from the current data.");
    }
    for item in demand {
        let category = vocabulary.category_of(&item.skill).unwrap_or("Other");
        println!("  {:<22} {:>4}  ({})", item.skill, item.count, category);
    }

    Ok(())
}
