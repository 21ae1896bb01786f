use std::fs;
use std::io::Write;
use tempfile::TempDir;

use docqa_core::data_processor::{list_data_files, ChunkingConfig, DataProcessor};
use docqa_core::Error;

#[test]
fn process_directory_single_small_file() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    let file_path = dir.join("a.txt");
    let mut f = fs::File::create(&file_path).unwrap();
    writeln!(f, "Short text").unwrap();

    let processor = DataProcessor::default();
    let chunks = processor.process_directory(dir).expect("process");

    assert_eq!(chunks.len(), 1, "one short file becomes one chunk");
    assert_eq!(chunks[0].text, "Short text");
    assert_eq!(chunks[0].doc_id, "a.txt");
    assert_eq!(chunks[0].chunk_id, 0);
}

#[test]
fn thousand_char_markdown_file_gives_two_chunks() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("doc1.md"), "0123456789".repeat(100)).unwrap();

    let processor = DataProcessor::new(ChunkingConfig { chunk_size: 900, overlap: 150 }).unwrap();
    let chunks = processor.process_directory(tmp.path()).expect("process");

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].text.chars().count(), 900);
    assert_eq!(chunks[1].text.chars().count(), 250);
    assert_eq!((chunks[1].doc_id.as_str(), chunks[1].chunk_id), ("doc1.md", 1));
}

#[test]
fn only_top_level_text_files_in_path_order() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("b.MD"), "bravo").unwrap();
    fs::write(dir.join("a.txt"), "alpha").unwrap();
    fs::write(dir.join("notes.pdf"), "ignored").unwrap();
    fs::create_dir(dir.join("nested")).unwrap();
    fs::write(dir.join("nested").join("c.txt"), "ignored").unwrap();

    let names: Vec<String> = list_data_files(dir)
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["a.txt", "b.MD"]);

    let chunks = DataProcessor::default().process_directory(dir).expect("process");
    let doc_ids: Vec<&str> = chunks.iter().map(|c| c.doc_id.as_str()).collect();
    assert_eq!(doc_ids, vec!["a.txt", "b.MD"]);
}

#[test]
fn invalid_utf8_bytes_are_dropped() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("bin.txt"), [b'o', b'k', 0xff, b'!']).unwrap();
    let chunks = DataProcessor::default().process_directory(tmp.path()).expect("process");
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].text, "ok!");
}

#[test]
fn empty_or_missing_directory_has_no_documents() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("readme.rst"), "not a recognized extension").unwrap();
    let err = DataProcessor::default().process_directory(tmp.path()).expect_err("no docs");
    assert!(matches!(err, Error::NoDocumentsFound(_)));

    let err = DataProcessor::default().process_directory(&tmp.path().join("missing")).expect_err("missing dir");
    assert!(matches!(err, Error::NoDocumentsFound(_)));
}
