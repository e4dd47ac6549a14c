//! Script front end and report artifact tests.

use std::fs;
use std::io::Write;

use pagewire_core::{script, CommandQueue, GenerationReport};

const SCRIPT: &str = r#"{
    "commands": [
        {"type": "go_to_page", "page": 1},
        {"type": "ident_reference", "reference": "article-9"},
        {"type": "set_y_pos", "value": 20.0, "emit": true},
        {"type": "text_box", "text": "Headline", "width": 120, "height": 14,
         "left": 12.5, "top": {"variable": "yPos"}},
        {"type": "image_box", "asset_id": 42, "path": "/assets/hero.jpg",
         "width": 120, "height": 60, "left": 12.5,
         "top": {"variable": "yPos", "margin": 16}},
        {"type": "message", "message": "generated by test"}
    ]
}"#;

fn generate(json: &str) -> GenerationReport {
    let parsed = script::Script::from_json(json).unwrap();
    let mut queue = CommandQueue::new();
    script::run(&mut queue, &parsed).unwrap();
    GenerationReport::from_queue(&queue).unwrap()
}

#[test]
fn script_file_generates_report() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SCRIPT.as_bytes()).unwrap();

    let content = fs::read_to_string(file.path()).unwrap();
    let report = generate(&content);

    assert!(report.success);
    assert_eq!(report.commands.len(), 5);
    assert_eq!(report.registered_assets.len(), 1);
    assert_eq!(report.registered_assets.get(&42).unwrap().path, "/assets/hero.jpg");

    // The yPos emit step published the cursor before the boxes used it.
    assert_eq!(report.commands[1]["name"], "yPos");
    assert_eq!(report.commands[3]["top"], "=[yPos] + 16");

    // Both boxes share the article reference on page 1.
    assert_eq!(report.commands[2]["tid"], "Q1-article-9");
    assert_eq!(report.commands[3]["tid"], "Q1-article-9");
}

#[test]
fn unchanged_content_keeps_checksum() {
    let first = generate(SCRIPT);
    let second = generate(SCRIPT);

    // run_id and generated_at differ per run; the stream checksum does not.
    assert_ne!(first.run_id, second.run_id);
    assert_eq!(first.checksum, second.checksum);
}

#[test]
fn changed_content_changes_checksum() {
    let changed = SCRIPT.replace("Headline", "Headline v2");
    assert_ne!(generate(SCRIPT).checksum, generate(&changed).checksum);
}
