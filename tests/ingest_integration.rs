//! End-to-end ingest from a JSONL file into a scratch directory

use embed_ingest::source::JsonlSource;
use embed_ingest::{ingest, DocumentId, DocumentStore, MergeMode, StopReason};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_rows(path: &Path, rows: &[(u64, u64, &str)]) {
    let body: String = rows
        .iter()
        .map(|(id, paragraph_id, text)| {
            format!(
                "{}\n",
                serde_json::json!({
                    "id": id,
                    "title": format!("Article {}", id),
                    "paragraph_id": paragraph_id,
                    "text": text,
                    "emb": [0.125, -0.5, *paragraph_id as f32],
                })
            )
        })
        .collect();
    fs::write(path, body).unwrap();
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_paragraphs_merge_into_one_file_per_document() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("rows.jsonl");
    write_rows(
        &input,
        &[
            (0, 0, "Zero starts here."),
            (0, 1, "Zero continues."),
            (1, 0, "One is alone."),
            (0, 2, "Zero ends."),
        ],
    );

    let store = DocumentStore::open(tmp.path().join("dataset")).unwrap();
    let source = JsonlSource::open(&input).unwrap();
    let stats = ingest(source, &store, MergeMode::Accumulate, 100_000, |_| {}).unwrap();

    assert_eq!(stats.processed, 4);
    assert_eq!(stats.created, 2);
    assert_eq!(stats.merged, 2);
    assert_eq!(stats.stop, StopReason::SourceExhausted);

    let zero = read_json(&tmp.path().join("dataset/0.json"));
    let chunks = zero["chunks"].as_object().unwrap();
    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks["1"]["text"], "Zero continues.");
    assert_eq!(chunks["2"]["embedding"][2], 2.0);

    let one = read_json(&tmp.path().join("dataset/1.json"));
    assert_eq!(one["chunks"].as_object().unwrap().len(), 1);
    assert!(one.get("title").is_none(), "only chunks are persisted");
}

#[test]
fn test_replace_mode_keeps_last_paragraph() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("rows.jsonl");
    write_rows(&input, &[(3, 0, "first"), (3, 1, "second"), (3, 2, "third")]);

    let store = DocumentStore::open(tmp.path().join("out")).unwrap();
    let source = JsonlSource::open(&input).unwrap();
    ingest(source, &store, MergeMode::Replace, 100_000, |_| {}).unwrap();

    let doc = store.load(&DocumentId::from(3)).unwrap().unwrap();
    assert_eq!(doc.len(), 1);
    assert_eq!(doc.get(2).unwrap().text, "third");
}

#[test]
fn test_limit_cuts_stream() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("rows.jsonl");
    let rows: Vec<(u64, u64, &str)> = (0..10).map(|i| (i, 0, "para")).collect();
    write_rows(&input, &rows);

    let store = DocumentStore::open(tmp.path().join("out")).unwrap();
    let source = JsonlSource::open(&input).unwrap();
    let stats = ingest(source, &store, MergeMode::Accumulate, 4, |_| {}).unwrap();

    assert_eq!(stats.processed, 4);
    assert_eq!(stats.stop, StopReason::LimitReached);
    assert_eq!(fs::read_dir(store.dir()).unwrap().count(), 4);
    assert!(!store.dir().join("4.json").exists());
}

#[test]
fn test_corrupt_existing_file_is_replaced() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("out");
    fs::create_dir_all(&out).unwrap();
    fs::write(out.join("5.json"), "{\"chunks\": {\"0\": ").unwrap();

    let input = tmp.path().join("rows.jsonl");
    write_rows(&input, &[(5, 7, "recovered")]);

    let store = DocumentStore::open(&out).unwrap();
    let stats = ingest(JsonlSource::open(&input).unwrap(), &store, MergeMode::Accumulate, 10, |_| {})
        .unwrap();
    assert_eq!(stats.replaced, 1);

    let doc = store.load(&DocumentId::from(5)).unwrap().unwrap();
    assert_eq!(doc.len(), 1);
    assert_eq!(doc.get(7).unwrap().text, "recovered");
}

#[test]
fn test_rerun_accumulates_onto_existing_output() {
    let tmp = TempDir::new().unwrap();
    let store = DocumentStore::open(tmp.path().join("out")).unwrap();

    let first = tmp.path().join("first.jsonl");
    write_rows(&first, &[(8, 0, "a")]);
    ingest(JsonlSource::open(&first).unwrap(), &store, MergeMode::Accumulate, 10, |_| {}).unwrap();

    let second = tmp.path().join("second.jsonl");
    write_rows(&second, &[(8, 1, "b")]);
    let stats =
        ingest(JsonlSource::open(&second).unwrap(), &store, MergeMode::Accumulate, 10, |_| {})
            .unwrap();
    assert_eq!(stats.merged, 1);

    let doc = store.load(&DocumentId::from(8)).unwrap().unwrap();
    assert_eq!(doc.len(), 2);
}
