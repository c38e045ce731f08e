//! Syllabus document intake.
//!
//! Uploads land in a location the knowledge-base ingestion service reads
//! from: S3 when a bucket is configured, a local directory otherwise.

pub mod backend;
pub mod error;
pub mod store;

pub use backend::IntakeBackend;
pub use error::IntakeError;
pub use store::{sanitize_subject, DocumentStore, StoredSyllabus};
