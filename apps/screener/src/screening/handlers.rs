use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::{Multipart, State},
    http::header,
    response::{Html, IntoResponse, Response},
    Json,
};

use crate::errors::AppError;
use crate::models::resume::ResumeRecord;
use crate::screening::form::{render_results, INDEX_HTML};
use crate::screening::report::RankingReport;
use crate::screening::session::{parse_single, run_session, Upload};
use crate::state::AppState;

const CSV_FILENAME: &str = "ranked_candidates.csv";

/// Fields of the ranking form: `job_description` plus any number of `resumes` files.
#[derive(Debug, Default)]
struct RankingForm {
    job_description: String,
    uploads: Vec<Upload>,
}

async fn read_ranking_form(mut multipart: Multipart) -> Result<RankingForm, AppError> {
    let mut form = RankingForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        match field.name() {
            Some("job_description") => {
                form.job_description = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(e.to_string()))?;
            }
            Some("resumes") => {
                // Browsers send an empty part with no filename when nothing was picked.
                let filename = field.file_name().unwrap_or_default().to_string();
                if filename.is_empty() {
                    continue;
                }
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(e.to_string()))?;
                form.uploads.push(Upload { filename, bytes });
            }
            _ => {}
        }
    }
    Ok(form)
}

async fn rank_uploads(state: &AppState, form: RankingForm) -> Result<RankingReport, AppError> {
    let context = Arc::clone(&state.context);
    let config = state.config.clone();
    tokio::task::spawn_blocking(move || {
        run_session(&context, &config, &form.job_description, &form.uploads)
    })
    .await
    .context("screening task failed to complete")?
}

/// GET /
pub async fn handle_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// POST /rankings
pub async fn handle_rank_html(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Html<String>, AppError> {
    let form = read_ranking_form(multipart).await?;
    let report = rank_uploads(&state, form).await?;
    Ok(Html(render_results(&report)))
}

/// POST /api/v1/rankings
pub async fn handle_rank_json(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<RankingReport>, AppError> {
    let form = read_ranking_form(multipart).await?;
    let report = rank_uploads(&state, form).await?;
    Ok(Json(report))
}

/// POST /api/v1/rankings/csv
pub async fn handle_rank_csv(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let form = read_ranking_form(multipart).await?;
    let report = rank_uploads(&state, form).await?;
    let csv = report.to_csv()?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{CSV_FILENAME}\""),
            ),
        ],
        csv,
    )
        .into_response())
}

/// POST /api/v1/resumes/parse
/// Parses one `resume` file without ranking it.
pub async fn handle_parse_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ResumeRecord>, AppError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("resume") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(e.to_string()))?;
        upload = Some(Upload { filename, bytes });
        break;
    }

    let upload = match upload {
        Some(u) if !u.filename.is_empty() => u,
        _ => return Err(AppError::Validation("a `resume` file is required".to_string())),
    };

    let context = Arc::clone(&state.context);
    let config = state.config.clone();
    let record = tokio::task::spawn_blocking(move || parse_single(&context, &config, &upload))
        .await
        .context("parse task failed to complete")??;
    Ok(Json(record))
}
