//! Exam-paper generation against a syllabus knowledge base.
//!
//! Prompt construction and model-output parsing live here; the actual
//! retrieval-augmented generation call is behind [`RetrieveAndGenerate`],
//! implemented by the kb crate.

pub mod generator;
pub mod parse;
pub mod prompts;
pub mod retrieve;

pub use generator::{ExamGenerator, PaperPlan};
pub use retrieve::{GenerateError, RetrieveAndGenerate};
