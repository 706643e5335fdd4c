//! Tests for output module

use super::*;
use crate::error::Error;
use crate::flatten::Row;
use serde_json::json;
use tempfile::TempDir;

fn row(id: &str, product: &str) -> Row {
    let mut row = Row::new();
    row.push("sale_id", id);
    row.push("sale_total", json!(12.5));
    row.push("product_name", product);
    row
}

#[tokio::test]
async fn test_vec_sink_appends_in_order() {
    let mut rows: Vec<Row> = vec![row("s0", "Tea")];

    rows.write_rows(&[row("s1", "Coffee"), row("s2", "")])
        .await
        .unwrap();
    rows.finish().await.unwrap();

    let ids: Vec<_> = rows.iter().filter_map(|r| r.get_str("sale_id")).collect();
    assert_eq!(ids, vec!["s0", "s1", "s2"]);
}

#[tokio::test]
async fn test_json_lines_sink_writes_one_object_per_row() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sales.jsonl");

    let mut sink = JsonLinesSink::create(&path).await.unwrap();
    sink.write_rows(&[row("s1", "Coffee")]).await.unwrap();
    sink.write_rows(&[row("s2", "")]).await.unwrap();
    sink.finish().await.unwrap();
    assert_eq!(sink.rows_written(), 2);

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(
        lines,
        vec![
            r#"{"sale_id":"s1","sale_total":12.5,"product_name":"Coffee"}"#,
            r#"{"sale_id":"s2","sale_total":12.5,"product_name":""}"#,
        ]
    );
}

#[tokio::test]
async fn test_json_lines_sink_empty_batch() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.jsonl");

    let mut sink = JsonLinesSink::create(&path).await.unwrap();
    sink.write_rows(&[]).await.unwrap();
    sink.finish().await.unwrap();

    assert_eq!(sink.rows_written(), 0);
    assert!(std::fs::read_to_string(&path).unwrap().is_empty());
}

#[tokio::test]
async fn test_json_lines_sink_create_missing_dir() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing").join("out.jsonl");

    let result = JsonLinesSink::create(&path).await;
    assert!(matches!(result, Err(Error::Output { .. })));
}
