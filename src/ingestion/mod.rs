//! Batch ingestion of game rule files into the chunk store.

pub mod cancel;
pub mod processor;
pub mod status;

pub use cancel::CancellationToken;
pub use processor::{FileProvider, IngestionProcessor, ProcessingResult};
pub use status::{Job, JobStatus, MemoryStatusRepository, StatusRepository};
