use jobmarket_etl::{parse_resume, parse_resume_file, Candidate, SkillExtractor, SkillSet};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::io::Write;
use tempfile::NamedTempFile;

/// Builds a PDF with one page per entry; `None` is a page with no text.
fn build_pdf(pages: &[Option<&str>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for page in pages {
        let operations = match page {
            Some(text) => vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
            None => vec![],
        };
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => pages.len() as i64,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

#[test]
fn test_single_page_resume() {
    let pdf = build_pdf(&[Some("Senior engineer: Python, SQL and Docker")]);
    let text = parse_resume(&pdf);

    assert!(text.contains("Python, SQL and Docker"));
    assert!(text.ends_with('\n'));
}

#[test]
fn test_pages_are_concatenated_in_order() {
    let pdf = build_pdf(&[
        Some("Page one mentions Kafka"),
        None,
        Some("Page three mentions Airflow"),
    ]);
    let text = parse_resume(&pdf);

    let first = text.find("Kafka").unwrap();
    let third = text.find("Airflow").unwrap();
    assert!(first < third);
}

#[test]
fn test_resume_without_text_layer_is_empty() {
    let pdf = build_pdf(&[None, None]);
    assert_eq!(parse_resume(&pdf).trim(), "");
}

#[test]
fn test_non_pdf_bytes_give_empty_text() {
    assert_eq!(parse_resume(b"PK\x03\x04 this is a zip, not a pdf"), "");
}

#[test]
fn test_candidate_skills_from_pdf() {
    let pdf = build_pdf(&[
        Some("Data engineer with Spark and Scala"),
        Some("Certifications: AWS, Kubernetes"),
    ]);
    let candidate = Candidate::from_resume(&pdf, SkillExtractor::builtin());

    let expected: SkillSet = ["Spark", "Scala", "AWS", "Kubernetes"].into_iter().collect();
    assert_eq!(candidate.skills, expected);
}

#[test]
fn test_parse_resume_file() {
    let pdf = build_pdf(&[Some("Rust and Go")]);
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&pdf).unwrap();

    let text = parse_resume_file(file.path()).unwrap();
    assert!(text.contains("Rust and Go"));
}
