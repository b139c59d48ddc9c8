use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::resume::ResumeRecord;

/// One row of the results table: `File, Name, Skills, Score`.
#[derive(Debug, Clone, Serialize)]
pub struct RankingRow {
    pub file: String,
    pub name: Option<String>,
    /// Comma-joined skills.
    pub skills: String,
    /// Rounded to 3 decimals for display; ordering already happened on full precision.
    pub score: f64,
}

/// A file that could not be parsed. The rest of the batch is still ranked.
#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    pub file: String,
    pub kind: String, // "unsupported_format" | "extraction_failure"
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankingReport {
    pub session_id: Uuid,
    pub ranked_at: DateTime<Utc>,
    /// Number of normalized tokens in the job description.
    pub job_description_terms: usize,
    pub top_candidate: Option<String>,
    pub rows: Vec<RankingRow>,
    pub failures: Vec<FileFailure>,
}

impl RankingReport {
    pub fn new(
        session_id: Uuid,
        job_description: &str,
        ranked: &[ResumeRecord],
        failures: Vec<FileFailure>,
    ) -> Self {
        let rows = ranked
            .iter()
            .map(|r| RankingRow {
                file: r.filename.clone(),
                name: r.name.clone(),
                skills: r.skills.join(", "),
                score: round3(r.score.unwrap_or(0.0)),
            })
            .collect();

        RankingReport {
            session_id,
            ranked_at: Utc::now(),
            job_description_terms: job_description.split_whitespace().count(),
            top_candidate: ranked.first().map(|r| r.display_name().to_string()),
            rows,
            failures,
        }
    }

    /// UTF-8 CSV with a `File,Name,Skills,Score` header row.
    pub fn to_csv(&self) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(["File", "Name", "Skills", "Score"])?;
        for row in &self.rows {
            writer.write_record([
                row.file.as_str(),
                row.name.as_deref().unwrap_or(""),
                row.skills.as_str(),
                format!("{:.3}", row.score).as_str(),
            ])?;
        }
        writer
            .into_inner()
            .map_err(|e| anyhow!("failed to flush CSV: {}", e.error()))
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
