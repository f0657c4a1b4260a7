//! Processing-job bookkeeping.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{Result, RulesmithError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Processing,
    Completed,
    Failed,
}

/// One ingestion job's progress record.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub game_name: String,
    pub status: JobStatus,
    pub progress: usize,
    pub total: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub started_at: i64,
    pub updated_at: i64,
}

/// Tracks ingestion jobs so callers can observe progress and terminal
/// state. Progress updates for unknown jobs are errors; the processor
/// logs and tolerates them rather than failing the job.
#[async_trait]
pub trait StatusRepository: Send + Sync {
    /// Registers a new job in the `Processing` state and returns its id.
    async fn create_job(&self, game_name: &str, total: usize) -> Result<String>;

    async fn update_progress(&self, job_id: &str, progress: usize) -> Result<()>;

    async fn complete_job(
        &self,
        job_id: &str,
        game_name: &str,
        processed: usize,
        total: usize,
    ) -> Result<()>;

    async fn fail_job(&self, job_id: &str, game_name: &str, message: &str) -> Result<()>;

    /// Current snapshot of a job, if it exists.
    async fn job(&self, job_id: &str) -> Result<Option<Job>>;
}

/// Map-backed status repository for tests and local runs.
#[derive(Debug, Default)]
pub struct MemoryStatusRepository {
    jobs: RwLock<FxHashMap<String, Job>>,
}

impl MemoryStatusRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every tracked job, for inspection in tests and tools.
    pub fn all_jobs(&self) -> Vec<Job> {
        self.jobs.read().values().cloned().collect()
    }

    fn update<F>(&self, job_id: &str, apply: F) -> Result<()>
    where
        F: FnOnce(&mut Job),
    {
        let mut guard = self.jobs.write();
        let job = guard
            .get_mut(job_id)
            .ok_or_else(|| RulesmithError::Ingestion(format!("unknown job: {job_id}")))?;
        apply(job);
        job.updated_at = Utc::now().timestamp();
        Ok(())
    }
}

#[async_trait]
impl StatusRepository for MemoryStatusRepository {
    async fn create_job(&self, game_name: &str, total: usize) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().timestamp();
        self.jobs.write().insert(
            id.clone(),
            Job {
                id: id.clone(),
                game_name: game_name.to_string(),
                status: JobStatus::Processing,
                progress: 0,
                total,
                error: None,
                started_at: now,
                updated_at: now,
            },
        );
        Ok(id)
    }

    async fn update_progress(&self, job_id: &str, progress: usize) -> Result<()> {
        self.update(job_id, |job| job.progress = progress)
    }

    async fn complete_job(
        &self,
        job_id: &str,
        _game_name: &str,
        processed: usize,
        total: usize,
    ) -> Result<()> {
        self.update(job_id, |job| {
            job.status = JobStatus::Completed;
            job.progress = processed;
            job.total = total;
        })
    }

    async fn fail_job(&self, job_id: &str, _game_name: &str, message: &str) -> Result<()> {
        self.update(job_id, |job| {
            job.status = JobStatus::Failed;
            job.error = Some(message.to_string());
        })
    }

    async fn job(&self, job_id: &str) -> Result<Option<Job>> {
        Ok(self.jobs.read().get(job_id).cloned())
    }
}
