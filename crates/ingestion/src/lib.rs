//! Knowledge-base ingestion job lifecycle: gate, start, track.
//!
//! The external service owns every job and is the only writer of job state;
//! this crate only observes. The three pieces compose sequentially:
//!
//! 1. [`wait_for_clearance`] blocks (bounded) until no job is active for a
//!    source.
//! 2. [`start_when_clear`] submits a new job once the gate clears.
//! 3. [`track_job`] / [`track_to_completion`] poll the started job until it
//!    reaches a terminal state, surfacing every observed status.

pub mod error;
pub mod gate;
pub mod poll;
pub mod service;
pub mod start;
pub mod status;
pub mod tracker;

pub use error::IngestionError;
pub use gate::{wait_for_clearance, GateDecision};
pub use poll::PollPolicy;
pub use service::{IngestionService, JobId, JobSummary, SourceRef};
pub use start::{start_when_clear, StartOutcome};
pub use status::JobStatus;
pub use tracker::{track_job, track_to_completion, SyncOutcome, TrackReport};
