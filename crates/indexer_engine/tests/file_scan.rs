use std::fs;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use indexer_core::{KeywordCounts, KeywordSet};
use indexer_engine::{
    Engine, EngineSettings, FetchError, Fetcher, QueryError, ValidationError,
};
use url::Url;

/// File-scan tests never touch the network.
struct OfflineFetcher;

#[async_trait::async_trait]
impl Fetcher for OfflineFetcher {
    async fn fetch(&self, _url: &Url) -> Result<String, FetchError> {
        Err(FetchError::Network("offline".into()))
    }
}

fn settings(keywords: &[&str]) -> EngineSettings {
    EngineSettings {
        keywords: KeywordSet::new(keywords.iter().copied()),
        crawl_interval: Duration::from_millis(50),
        ..EngineSettings::default()
    }
}

fn start_engine(keywords: &[&str]) -> Engine {
    indexer_logging::initialize_for_tests();
    Engine::start_with_fetcher(settings(keywords), Arc::new(OfflineFetcher))
}

fn wait_for_result(engine: &Engine, key: &str) -> KeywordCounts {
    let deadline = Instant::now() + Duration::from_secs(10);
    loop {
        match engine.query_result(key) {
            Ok(counts) => return counts,
            Err(QueryError::NotFound(_) | QueryError::NotReady(_))
                if Instant::now() < deadline =>
            {
                thread::sleep(Duration::from_millis(20));
            }
            Err(err) => panic!("result for {key} never arrived: {err}"),
        }
    }
}

#[test]
fn crawler_discovers_nested_corpus_and_counts_keywords() {
    let root = tempfile::tempdir().unwrap();
    let corpus = root.path().join("nested").join("corpus_test");
    fs::create_dir_all(&corpus).unwrap();
    fs::write(corpus.join("one.txt"), "rust is fast, rust is safe\n").unwrap();
    fs::write(corpus.join("two.txt"), "async await async. nothing else\n").unwrap();

    let engine = start_engine(&["rust", "async"]);
    engine.add_directory(root.path()).unwrap();

    let counts = wait_for_result(&engine, "file|corpus_test");
    assert_eq!(counts["rust"], 2);
    assert_eq!(counts["async"], 2);
    engine.stop();
}

#[test]
fn modified_corpus_is_rescanned_on_a_later_cycle() {
    let root = tempfile::tempdir().unwrap();
    let corpus = root.path().join("corpus_edit");
    fs::create_dir_all(&corpus).unwrap();
    let tracked = corpus.join("doc.txt");
    fs::write(&tracked, "rust\n").unwrap();

    let engine = start_engine(&["rust"]);
    engine.add_directory(root.path()).unwrap();

    let initial = wait_for_result(&engine, "file|corpus_edit");
    assert_eq!(initial["rust"], 1);

    // Coarse filesystems round mtimes to the second; make sure the edit is
    // observable before rewriting.
    thread::sleep(Duration::from_millis(1100));
    fs::write(&tracked, "rust rust rust\n").unwrap();

    let deadline = Instant::now() + Duration::from_secs(10);
    loop {
        let counts = wait_for_result(&engine, "file|corpus_edit");
        if counts["rust"] == 3 {
            break;
        }
        assert!(
            Instant::now() < deadline,
            "rescan never picked up the edit, last counts: {counts:?}"
        );
        thread::sleep(Duration::from_millis(50));
    }
    engine.stop();
}

#[test]
fn add_directory_rejects_non_directories_and_duplicates() {
    let root = tempfile::tempdir().unwrap();
    let file = root.path().join("plain.txt");
    fs::write(&file, "not a directory").unwrap();

    let engine = start_engine(&["rust"]);
    assert!(matches!(
        engine.add_directory(&file),
        Err(ValidationError::NotADirectory(_))
    ));
    assert!(matches!(
        engine.add_directory(root.path().join("missing")),
        Err(ValidationError::NotADirectory(_))
    ));

    engine.add_directory(root.path()).unwrap();
    assert!(matches!(
        engine.add_directory(root.path()),
        Err(ValidationError::DuplicateDirectory(_))
    ));
    engine.stop();
}

#[test]
fn result_keys_always_cover_the_full_keyword_set() {
    let root = tempfile::tempdir().unwrap();
    let corpus = root.path().join("corpus_sparse");
    fs::create_dir_all(&corpus).unwrap();
    fs::write(corpus.join("doc.txt"), "only alpha words here alpha\n").unwrap();

    let engine = start_engine(&["alpha", "never-present"]);
    engine.add_directory(root.path()).unwrap();

    let counts = wait_for_result(&engine, "file|corpus_sparse");
    let keys: Vec<_> = counts.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["alpha", "never-present"]);
    assert_eq!(counts["alpha"], 2);
    assert_eq!(counts["never-present"], 0);
    engine.stop();
}
