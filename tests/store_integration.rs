//! Response store behavior across processes and tasks

use askbuddy::store::{codec, ResponseStore};
use std::sync::Arc;
use tempfile::TempDir;

#[test]
fn test_hand_written_file_is_readable() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("responses.txt");
    std::fs::write(
        &path,
        "what is rust?|A language.\n\
         not a record\n\
         |no question\n\
         Capital Of France|Paris\n\
         old format|answer with | a pipe\n",
    )
    .unwrap();

    let store = ResponseStore::open(&path).unwrap();
    assert_eq!(store.len(), 3);
    assert_eq!(store.lookup("What is Rust?").as_deref(), Some("A language."));
    assert_eq!(store.lookup("capital of france").as_deref(), Some("Paris"));
    assert_eq!(store.lookup("old format").as_deref(), Some("answer with | a pipe"));
}

#[test]
fn test_rewrite_escapes_every_line() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("responses.txt");
    let store = ResponseStore::open(&path).unwrap();

    store.upsert("a|b", "first line\nsecond line").unwrap();
    store.upsert("path", r"C:\temp").unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    for line in contents.lines() {
        let (question, answer) = codec::decode_record(line).unwrap();
        assert_eq!(store.lookup(&question), Some(answer));
    }
    assert_eq!(contents.lines().count(), 2);

    let reopened = ResponseStore::open(&path).unwrap();
    assert_eq!(reopened.lookup("a|b").as_deref(), Some("first line\nsecond line"));
    assert_eq!(reopened.lookup("path").as_deref(), Some(r"C:\temp"));
}

#[tokio::test]
async fn test_concurrent_writers_from_tasks() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("responses.txt");
    let store = Arc::new(ResponseStore::open(&path).unwrap());

    let mut handles = Vec::new();
    for task in 0..4 {
        let store = Arc::clone(&store);
        handles.push(tokio::task::spawn_blocking(move || {
            for i in 0..5 {
                store
                    .upsert(&format!("task {} question {}", task, i), "answer")
                    .unwrap();
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(store.len(), 20);
    assert_eq!(ResponseStore::open(&path).unwrap().len(), 20);
}
