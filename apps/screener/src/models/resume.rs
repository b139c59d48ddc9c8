use serde::{Deserialize, Serialize};

/// Structured view of one parsed resume.
///
/// Everything except `score` is fixed when the record is parsed; the ranker fills in
/// `score` once the batch has been vectorized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeRecord {
    pub filename: String,
    pub name: Option<String>,
    /// Matched skill keywords, sorted and unique.
    pub skills: Vec<String>,
    /// Normalized token string, not the extracted text.
    pub raw_text: String,
    pub score: Option<f64>,
}

impl ResumeRecord {
    /// Name if the heuristic found one, otherwise the filename.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.filename)
    }
}
