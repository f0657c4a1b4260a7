//! Embeds a game's rule files and batch-writes them to the chunk store.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::RagConfig;
use crate::embedding::EmbeddingProvider;
use crate::ingestion::cancel::CancellationToken;
use crate::ingestion::status::{JobStatus, StatusRepository};
use crate::knowledge::{Chunk, ChunkStore};
use crate::types::{Result, RulesmithError};

/// Source-file access for a game's knowledge base.
#[async_trait]
pub trait FileProvider: Send + Sync {
    /// Paths of all files available for the game.
    async fn files(&self, game_name: &str) -> Result<Vec<String>>;

    async fn file_content(&self, path: &str) -> Result<String>;
}

/// Summary returned by a completed ingestion job.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub job_id: String,
    pub game_name: String,
    pub status: JobStatus,
    pub message: String,
    pub processed: usize,
    pub total: usize,
}

/// Batch ingestion pipeline.
///
/// Files are embedded through a bounded worker pool; a file that fails to
/// load or embed is logged and skipped so one bad file never sinks the
/// job. The final batch write is the only fatal per-chunk step. A
/// cancelled job stops dispatching files and is marked failed.
pub struct IngestionProcessor {
    files: Arc<dyn FileProvider>,
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn ChunkStore>,
    status: Arc<dyn StatusRepository>,
    config: RagConfig,
}

/// Progress is flushed to the status repository every this many files.
const PROGRESS_FLUSH_INTERVAL: usize = 5;

fn is_supported(path: &str) -> bool {
    path.ends_with(".md") || path.ends_with(".txt")
}

impl IngestionProcessor {
    pub fn new(
        files: Arc<dyn FileProvider>,
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn ChunkStore>,
        status: Arc<dyn StatusRepository>,
        config: RagConfig,
    ) -> Self {
        Self {
            files,
            embedder,
            store,
            status,
            config,
        }
    }

    /// Ingests every supported rule file for a game under a fresh job.
    pub async fn process_game(
        &self,
        game_name: &str,
        cancel: &CancellationToken,
    ) -> Result<ProcessingResult> {
        let files = self.files.files(game_name).await?;
        let supported: Vec<String> = files.into_iter().filter(|f| is_supported(f)).collect();
        if supported.is_empty() {
            return Err(RulesmithError::NoSupportedFiles {
                game: game_name.to_string(),
            });
        }

        let total = supported.len();
        let job_id = self.status.create_job(game_name, total).await?;
        info!(game = game_name, job = %job_id, files = total, "starting knowledge processing");

        let processed = Arc::new(AtomicUsize::new(0));
        let chunks: Vec<Chunk> = stream::iter(supported)
            .map(|file| {
                let processed = Arc::clone(&processed);
                let cancel = cancel.clone();
                let job_id = job_id.clone();
                async move {
                    if cancel.is_cancelled() {
                        return None;
                    }
                    match self.ingest_file(game_name, &file).await {
                        Ok(chunk) => {
                            let done = processed.fetch_add(1, Ordering::SeqCst) + 1;
                            if done % PROGRESS_FLUSH_INTERVAL == 0 || done == total {
                                if let Err(err) = self.status.update_progress(&job_id, done).await {
                                    warn!(job = %job_id, error = %err, "failed to update job progress");
                                }
                            }
                            Some(chunk)
                        }
                        Err(err) => {
                            warn!(file = %file, error = %err, "skipping file");
                            None
                        }
                    }
                }
            })
            .buffer_unordered(self.config.ingest_concurrency.max(1))
            .filter_map(|chunk| async move { chunk })
            .collect()
            .await;

        if cancel.is_cancelled() {
            let message = "ingestion cancelled before completion";
            if let Err(err) = self.status.fail_job(&job_id, game_name, message).await {
                warn!(job = %job_id, error = %err, "failed to mark cancelled job");
            }
            return Err(RulesmithError::Ingestion(message.to_string()));
        }

        let processed_count = processed.load(Ordering::SeqCst);

        if !chunks.is_empty() {
            if let Err(err) = self.store.save_chunks(chunks).await {
                let message = format!("failed to store chunks: {err}");
                if let Err(fail_err) = self.status.fail_job(&job_id, game_name, &message).await {
                    warn!(job = %job_id, error = %fail_err, "failed to mark failed job");
                }
                return Err(err);
            }
        }

        if let Err(err) = self
            .status
            .complete_job(&job_id, game_name, processed_count, total)
            .await
        {
            warn!(job = %job_id, error = %err, "failed to mark job complete");
        }

        info!(
            game = game_name,
            job = %job_id,
            processed = processed_count,
            total,
            "knowledge processing completed"
        );
        Ok(ProcessingResult {
            job_id,
            game_name: game_name.to_string(),
            status: JobStatus::Completed,
            message: "Knowledge processing completed successfully".to_string(),
            processed: processed_count,
            total,
        })
    }

    async fn ingest_file(&self, game_name: &str, file: &str) -> Result<Chunk> {
        debug!(file, "processing file");
        let content = self.files.file_content(file).await?;

        let token_estimate = Chunk::estimate_tokens(&content);
        if token_estimate > self.config.max_chunk_tokens {
            warn!(
                file,
                tokens = token_estimate,
                max = self.config.max_chunk_tokens,
                "chunk exceeds advisory token ceiling"
            );
        }

        let embedding = self.embedder.embed(&content).await?;
        Ok(Chunk::new(game_name, file, content, embedding))
    }
}
