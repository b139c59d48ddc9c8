//! Screening session: one batch of uploads ranked against one job description.
//!
//! Uploads are staged into a per-session `TempDir` that is removed on every exit path.
//! Each file is parsed on its own; a bad file becomes a `FileFailure` instead of
//! aborting the batch.

use std::fs;
use std::path::Path;

use anyhow::Context;
use bytes::Bytes;
use tracing::{info, info_span, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::errors::AppError;
use crate::models::resume::ResumeRecord;
use crate::screening::context::ScreeningContext;
use crate::screening::extractor::{DocumentKind, ExtractError};
use crate::screening::parser::parse_resume;
use crate::screening::ranker::Ranker;
use crate::screening::report::{FileFailure, RankingReport};

/// An uploaded file as received from the form.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub bytes: Bytes,
}

/// Parses, fits and ranks one batch. Blocking: call from `spawn_blocking`.
pub fn run_session(
    context: &ScreeningContext,
    config: &Config,
    job_description: &str,
    uploads: &[Upload],
) -> Result<RankingReport, AppError> {
    if job_description.trim().is_empty() {
        return Err(AppError::EmptyInput(
            "job_description cannot be empty".to_string(),
        ));
    }
    if uploads.is_empty() {
        return Err(AppError::EmptyInput(
            "at least one resume is required".to_string(),
        ));
    }

    let session_id = Uuid::new_v4();
    let span = info_span!("session", %session_id);
    let _guard = span.enter();

    let scratch = scratch_dir(config)?;
    info!("Parsing {} uploads", uploads.len());

    let mut records: Vec<ResumeRecord> = Vec::with_capacity(uploads.len());
    let mut failures: Vec<FileFailure> = Vec::new();
    for (index, upload) in uploads.iter().enumerate() {
        match stage_and_parse(scratch.path(), index, upload, context) {
            Ok(record) => records.push(record),
            Err(e) => {
                let file = safe_file_name(&upload.filename);
                warn!(file = %file, "Skipping resume: {e}");
                failures.push(FileFailure {
                    file: file.to_string(),
                    kind: e.kind().to_string(),
                    message: e.to_string(),
                });
            }
        }
    }

    let job_description = context.normalizer.normalize(job_description);
    let mut corpus: Vec<&str> = records.iter().map(|r| r.raw_text.as_str()).collect();
    corpus.push(&job_description);

    let mut ranker = Ranker::new(config.model_path.clone(), config.max_features);
    if ranker.is_fitted() {
        info!("Refitting persisted model ({} terms)", ranker.vocabulary_len());
    }
    ranker.fit(corpus.as_slice());
    let ranked = ranker.rank(records, &job_description)?;

    info!("Ranked {} resumes ({} failed)", ranked.len(), failures.len());
    Ok(RankingReport::new(session_id, &job_description, &ranked, failures))
}

/// Parses a single upload without ranking it.
pub fn parse_single(
    context: &ScreeningContext,
    config: &Config,
    upload: &Upload,
) -> Result<ResumeRecord, AppError> {
    let scratch = scratch_dir(config)?;
    Ok(stage_and_parse(scratch.path(), 0, upload, context)?)
}

fn scratch_dir(config: &Config) -> anyhow::Result<tempfile::TempDir> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("screener-");
    let dir = match &config.scratch_dir {
        Some(root) => builder.tempdir_in(root),
        None => builder.tempdir(),
    };
    dir.context("failed to create scratch directory")
}

/// Writes the upload to `<root>/<index>/<basename>` and parses it. The index directory
/// keeps duplicate filenames in one batch apart.
fn stage_and_parse(
    root: &Path,
    index: usize,
    upload: &Upload,
    context: &ScreeningContext,
) -> Result<ResumeRecord, ExtractError> {
    let name = safe_file_name(&upload.filename);
    DocumentKind::from_path(Path::new(name))?;

    let dir = root.join(index.to_string());
    fs::create_dir(&dir)?;
    let path = dir.join(name);
    fs::write(&path, &upload.bytes)?;

    parse_resume(&path, context)
}

/// Last path component of a client-supplied filename.
fn safe_file_name(raw: &str) -> &str {
    raw.rsplit(['/', '\\'])
        .next()
        .filter(|n| !n.is_empty() && *n != "." && *n != "..")
        .unwrap_or("upload")
}
