//! Prompt construction for unit extraction and paper generation.

use crate::generator::PaperPlan;

/// Prompt asking the model to return the chapter/unit list of a subject
/// exactly as written in the source material.
pub fn unit_extraction_prompt(subject: &str) -> String {
    format!(
        r#"You are an academic assistant trained to extract information exactly as written from textbooks, scans, or PDFs.

Your task is to extract and return the full list of chapter or unit titles in the exact order, wording, and formatting as shown in {subject}.

Focus only on sections labeled:
- Contents
- Table of Contents
- Brief Contents
- Extended Chapter Material
- Or any clearly numbered list of chapters/units

Ignore sections like:
- Preface
- Appendices
- Lab manuals
- Interview questions
- Index (unless it lists chapters)

Extraction rules:
- Return the chapter or unit titles in the exact order, wording, and formatting as shown in {subject}
- Do NOT rewrite, summarize, interpret, or change the chapter names
- Do NOT add topics that are not explicitly listed
- Do NOT merge or split titles
- Do NOT skip any chapters; return all, even if there are more than 16

Output format:
1. [Exact title from source]
2. [Exact title from source]
...
N. [Exact title from source]

Only return the list of chapters or units, exactly as shown in the textbook {subject}, without any changes, additions, or explanations."#
    )
}

/// Prompt asking the model to synthesize a three-part exam paper from the
/// selected units.
pub fn exam_prompt(subject: &str, units: &[String], plan: &PaperPlan) -> String {
    format!(
        r#"Based on the syllabus/study material for "{subject}", generate a university exam following the Anna University format.

Instructions:
- Strictly include:
  Part A: {a} questions ({a_marks} marks each)
  Part B: {b} questions ({b_marks} marks each)
  Part C: {c} questions ({c_marks} marks each)
- Spread questions across all the selected units and Bloom's Taxonomy levels.
- Do NOT include answers.
- Use LaTeX formatting only where absolutely necessary (e.g., equations, symbols, protocols).
- Each section must start on a new line with the header format:
  Part A ({a_marks} marks each)
  Part B ({b_marks} marks each)
  Part C ({c_marks} marks each)

Use ONLY the following selected chapters/units:
{units}

Return ONLY the formatted exam content as plain text. Do not include explanations, code, markdown, or JSON."#,
        a = plan.part_a,
        b = plan.part_b,
        c = plan.part_c,
        a_marks = PaperPlan::PART_A_MARKS,
        b_marks = PaperPlan::PART_B_MARKS,
        c_marks = PaperPlan::PART_C_MARKS,
        units = units.join(", "),
    )
}
