// Background upload queue: jobs are enqueued by the form handler and
// processed by a worker task so slow Drive calls never block a response.

pub mod jobs;
pub mod workers;

pub use jobs::{JobStatus, JobStore, UploadJob};
pub use workers::Worker;

/// Capacity of the in-flight job channel.
pub const QUEUE_DEPTH: usize = 64;
