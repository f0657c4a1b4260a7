//! Batch ingestion behavior: progress, per-file isolation, cancellation.

use std::sync::Arc;

use async_trait::async_trait;

use rulesmith::embedding::MockEmbeddingProvider;
use rulesmith::ingestion::{
    CancellationToken, FileProvider, IngestionProcessor, JobStatus, MemoryStatusRepository,
    StatusRepository,
};
use rulesmith::knowledge::{Chunk, ChunkStore, MemoryChunkStore};
use rulesmith::types::{Result, RulesmithError};
use rulesmith::RagConfig;

/// Serves canned file listings; any path containing "broken" fails to load.
struct CannedFiles {
    files: Vec<String>,
}

impl CannedFiles {
    fn new(paths: &[&str]) -> Self {
        Self {
            files: paths.iter().map(|p| p.to_string()).collect(),
        }
    }
}

#[async_trait]
impl FileProvider for CannedFiles {
    async fn files(&self, _game_name: &str) -> Result<Vec<String>> {
        Ok(self.files.clone())
    }

    async fn file_content(&self, path: &str) -> Result<String> {
        if path.contains("broken") {
            return Err(RulesmithError::Store(format!("unreadable file: {path}")));
        }
        Ok(format!("Rules text stored in {path}."))
    }
}

/// A chunk store whose batch write always fails.
struct BrokenStore;

#[async_trait]
impl ChunkStore for BrokenStore {
    async fn save_chunk(&self, _chunk: Chunk) -> Result<()> {
        Err(RulesmithError::Store("write refused".to_string()))
    }

    async fn save_chunks(&self, _chunks: Vec<Chunk>) -> Result<()> {
        Err(RulesmithError::Store("write refused".to_string()))
    }

    async fn chunks_for_game(&self, _game_name: &str) -> Result<Vec<Chunk>> {
        Ok(Vec::new())
    }
}

fn processor(
    files: CannedFiles,
    store: Arc<dyn ChunkStore>,
    status: Arc<MemoryStatusRepository>,
) -> IngestionProcessor {
    IngestionProcessor::new(
        Arc::new(files),
        Arc::new(MockEmbeddingProvider::new()),
        store,
        status,
        RagConfig::default().with_ingest_concurrency(2),
    )
}

#[tokio::test]
async fn all_supported_files_are_ingested() {
    let store = Arc::new(MemoryChunkStore::new());
    let status = Arc::new(MemoryStatusRepository::new());
    let processor = processor(
        CannedFiles::new(&["rules/a.md", "rules/b.txt", "art/cover.png"]),
        store.clone(),
        status.clone(),
    );

    let result = processor
        .process_game("nemesis", &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.status, JobStatus::Completed);
    assert_eq!(result.processed, 2);
    assert_eq!(result.total, 2);
    assert_eq!(store.len(), 2);

    let job = status.job(&result.job_id).await.unwrap().unwrap();
    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.progress, 2);
}

#[tokio::test]
async fn a_failing_file_is_skipped_not_fatal() {
    let store = Arc::new(MemoryChunkStore::new());
    let status = Arc::new(MemoryStatusRepository::new());
    let processor = processor(
        CannedFiles::new(&["rules/a.md", "rules/broken.md", "rules/c.md"]),
        store.clone(),
        status.clone(),
    );

    let result = processor
        .process_game("nemesis", &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.status, JobStatus::Completed);
    assert_eq!(result.processed, 2);
    assert_eq!(result.total, 3);
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn reingestion_overwrites_by_chunk_id() {
    let store = Arc::new(MemoryChunkStore::new());
    let status = Arc::new(MemoryStatusRepository::new());
    let processor = processor(
        CannedFiles::new(&["rules/a.md"]),
        store.clone(),
        status.clone(),
    );

    let cancel = CancellationToken::new();
    processor.process_game("nemesis", &cancel).await.unwrap();
    processor.process_game("nemesis", &cancel).await.unwrap();

    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn no_supported_files_is_a_distinct_error() {
    let store = Arc::new(MemoryChunkStore::new());
    let status = Arc::new(MemoryStatusRepository::new());
    let processor = processor(
        CannedFiles::new(&["art/cover.png", "manual.pdf"]),
        store,
        status,
    );

    let err = processor
        .process_game("nemesis", &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, RulesmithError::NoSupportedFiles { .. }));
}

#[tokio::test]
async fn cancelled_job_is_marked_failed() {
    let store = Arc::new(MemoryChunkStore::new());
    let status = Arc::new(MemoryStatusRepository::new());
    let processor = processor(
        CannedFiles::new(&["rules/a.md", "rules/b.md"]),
        store.clone(),
        status.clone(),
    );

    let cancel = CancellationToken::new();
    cancel.cancel();
    let err = processor.process_game("nemesis", &cancel).await.unwrap_err();
    assert!(matches!(err, RulesmithError::Ingestion(_)));

    // No partial data was written and the only job is failed.
    assert!(store.is_empty());
    let jobs = status.all_jobs();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].status, JobStatus::Failed);
    assert!(jobs[0].error.as_deref().unwrap_or_default().contains("cancelled"));
}

#[tokio::test]
async fn batch_write_failure_fails_the_job() {
    let status = Arc::new(MemoryStatusRepository::new());
    let processor = processor(
        CannedFiles::new(&["rules/a.md"]),
        Arc::new(BrokenStore),
        status.clone(),
    );

    let result = processor
        .process_game("nemesis", &CancellationToken::new())
        .await;
    assert!(matches!(result, Err(RulesmithError::Store(_))));

    let jobs = status.all_jobs();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].status, JobStatus::Failed);
}
