//! Output Sink Tests
//!
//! Tests for the file, memory and target-selected sinks.

use std::fs;
use std::sync::Arc;
use std::thread;

use relaykv::config::OutputTarget;
use relaykv::sink::{self, format_entry, FileSink, MemorySink, OutputSink};
use relaykv::RelayError;
use tempfile::TempDir;

#[test]
fn test_format_entry() {
    assert_eq!(
        format_entry("big power", "big responsibility"),
        "{Key:big power Value:big responsibility}"
    );
}

#[test]
fn test_file_sink_writes_one_line_per_entry() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("output.txt");

    let sink = FileSink::open(&path).unwrap();
    sink.write_entry("a", "1").unwrap();
    sink.write_entry("b", "2").unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    assert_eq!(contents, "{Key:a Value:1}\n{Key:b Value:2}\n");
    assert_eq!(sink.path(), path.as_path());
}

#[test]
fn test_file_sink_appends_to_existing_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("output.txt");
    fs::write(&path, "previous run\n").unwrap();

    let sink = FileSink::open(&path).unwrap();
    sink.write_entry("k", "v").unwrap();
    drop(sink);

    let contents = fs::read_to_string(&path).unwrap();
    assert_eq!(contents, "previous run\n{Key:k Value:v}\n");
}

#[test]
fn test_file_sink_open_failure() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("no-such-dir").join("output.txt");

    let result = FileSink::open(&path);
    assert!(matches!(result, Err(RelayError::Sink(_))));
}

#[test]
fn test_file_sink_concurrent_lines_stay_whole() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("output.txt");
    let sink = Arc::new(FileSink::open(&path).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let sink = Arc::clone(&sink);
            thread::spawn(move || {
                for i in 0..100 {
                    sink.write_entry(&format!("t{}-{}", t, i), "value").unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    drop(sink);

    let contents = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 800);
    for line in lines {
        assert!(line.starts_with("{Key:t"));
        assert!(line.ends_with(" Value:value}"));
    }
}

#[test]
fn test_memory_sink_records_in_order() {
    let sink = MemorySink::new();
    sink.write_entry("x", "1").unwrap();
    sink.write_entry("y", "2").unwrap();

    assert_eq!(sink.len(), 2);
    assert_eq!(sink.lines(), vec!["{Key:x Value:1}", "{Key:y Value:2}"]);

    let taken = sink.take();
    assert_eq!(taken, vec![("x".to_string(), "1".to_string()), ("y".to_string(), "2".to_string())]);
    assert!(sink.is_empty());
}

#[test]
fn test_open_by_target() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("results.txt");

    let sink = sink::open(&OutputTarget::File(path.clone())).unwrap();
    sink.write_entry("k", "v").unwrap();
    drop(sink);
    assert_eq!(fs::read_to_string(&path).unwrap(), "{Key:k Value:v}\n");

    assert_eq!(OutputTarget::from_arg("-"), OutputTarget::Stdout);
    assert_eq!(
        OutputTarget::from_arg("out.txt"),
        OutputTarget::File("out.txt".into())
    );
    assert!(sink::open(&OutputTarget::Stdout).is_ok());
}
