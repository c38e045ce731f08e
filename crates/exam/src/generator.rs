//! High-level exam generation flows: extract units, generate a paper.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::parse::{normalize_sections, parse_units};
use crate::prompts::{exam_prompt, unit_extraction_prompt};
use crate::retrieve::{GenerateError, RetrieveAndGenerate};

/// Question counts for the three parts of a paper. Marks per part are fixed
/// by the exam format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperPlan {
    pub part_a: u32,
    pub part_b: u32,
    pub part_c: u32,
}

impl PaperPlan {
    pub const PART_A_MARKS: u32 = 2;
    pub const PART_B_MARKS: u32 = 6;
    pub const PART_C_MARKS: u32 = 10;

    pub fn total_questions(&self) -> u32 {
        self.part_a + self.part_b + self.part_c
    }

    pub fn total_marks(&self) -> u32 {
        self.part_a * Self::PART_A_MARKS
            + self.part_b * Self::PART_B_MARKS
            + self.part_c * Self::PART_C_MARKS
    }
}

impl Default for PaperPlan {
    fn default() -> Self {
        Self {
            part_a: 10,
            part_b: 5,
            part_c: 2,
        }
    }
}

/// Drives unit extraction and paper generation through a
/// [`RetrieveAndGenerate`] backend.
pub struct ExamGenerator {
    backend: Box<dyn RetrieveAndGenerate>,
}

impl ExamGenerator {
    pub fn new(backend: Box<dyn RetrieveAndGenerate>) -> Self {
        Self { backend }
    }

    /// Ask the knowledge base for the subject's chapter/unit list.
    pub async fn extract_units(&self, subject: &str) -> Result<Vec<String>, GenerateError> {
        info!(subject = %subject, "extracting units from knowledge base");
        let response = self
            .backend
            .generate(&unit_extraction_prompt(subject))
            .await?;
        debug!(len = response.len(), "unit extraction response received");

        let units = parse_units(&response);
        info!(subject = %subject, count = units.len(), "units extracted");
        Ok(units)
    }

    /// Generate a formatted exam paper over the selected units.
    pub async fn generate_paper(
        &self,
        subject: &str,
        units: &[String],
        plan: &PaperPlan,
    ) -> Result<String, GenerateError> {
        info!(
            subject = %subject,
            units = units.len(),
            questions = plan.total_questions(),
            "generating exam paper"
        );
        let response = self
            .backend
            .generate(&exam_prompt(subject, units, plan))
            .await?;

        let paper = normalize_sections(&response);
        if paper.is_empty() {
            return Err(GenerateError::EmptyResponse);
        }
        Ok(paper)
    }
}
