pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::screening::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.upload_limit_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Browser flow
        .route("/", get(handlers::handle_index))
        .route("/rankings", post(handlers::handle_rank_html))
        // Ranking API
        .route("/api/v1/rankings", post(handlers::handle_rank_json))
        .route("/api/v1/rankings/csv", post(handlers::handle_rank_csv))
        .route(
            "/api/v1/resumes/parse",
            post(handlers::handle_parse_resume),
        )
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;

    const BOUNDARY: &str = "screener-test-boundary";

    fn test_router(scratch: &tempfile::TempDir) -> Router {
        let config = Config {
            scratch_dir: Some(scratch.path().to_path_buf()),
            ..Config::default()
        };
        build_router(AppState::new(config))
    }

    /// Hand-built multipart body: text fields first, then file parts.
    fn multipart_body(text: &[(&str, &str)], files: &[(&str, &str, &str)]) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, value) in text {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        for (name, filename, content) in files {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(content.as_bytes());
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    async fn post_multipart(router: Router, uri: &str, body: Vec<u8>) -> Response {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        router.oneshot(request).await.unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let scratch = tempfile::tempdir().unwrap();
        let response = test_router(&scratch)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["service"], "screener");
    }

    #[tokio::test]
    async fn test_index_serves_form() {
        let scratch = tempfile::tempdir().unwrap();
        let response = test_router(&scratch)
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("name=\"job_description\""));
    }

    #[tokio::test]
    async fn test_rank_json_orders_by_overlap() {
        let scratch = tempfile::tempdir().unwrap();
        let body = multipart_body(
            &[("job_description", "python sql")],
            &[
                ("resumes", "b.txt", "java c++"),
                ("resumes", "a.txt", "python sql"),
            ],
        );
        let response = post_multipart(test_router(&scratch), "/api/v1/rankings", body).await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        let rows = json["rows"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["file"], "a.txt");
        assert_eq!(rows[0]["score"], 1.0);
        assert_eq!(rows[1]["file"], "b.txt");
        assert_eq!(rows[1]["score"], 0.0);
        assert!(json["failures"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rank_json_reports_bad_file_alongside_good_ones() {
        let scratch = tempfile::tempdir().unwrap();
        let body = multipart_body(
            &[("job_description", "python")],
            &[
                ("resumes", "cv.rtf", "{\\rtf1 python}"),
                ("resumes", "cv.txt", "python"),
            ],
        );
        let response = post_multipart(test_router(&scratch), "/api/v1/rankings", body).await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["rows"].as_array().unwrap().len(), 1);
        assert_eq!(json["failures"][0]["file"], "cv.rtf");
        assert_eq!(json["failures"][0]["kind"], "unsupported_format");
    }

    #[tokio::test]
    async fn test_rank_csv_is_attachment() {
        let scratch = tempfile::tempdir().unwrap();
        let body = multipart_body(
            &[("job_description", "python")],
            &[("resumes", "a.txt", "Jane Doe\npython")],
        );
        let response = post_multipart(test_router(&scratch), "/api/v1/rankings/csv", body).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"ranked_candidates.csv\""
        );
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/csv"));

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let csv = String::from_utf8(bytes.to_vec()).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("File,Name,Skills,Score"));
        let row = lines.next().unwrap();
        assert!(row.starts_with("a.txt,Jane Doe,python,0."));
    }

    #[tokio::test]
    async fn test_rank_html_shows_top_candidate() {
        let scratch = tempfile::tempdir().unwrap();
        let body = multipart_body(
            &[("job_description", "python")],
            &[("resumes", "a.txt", "Jane Doe\npython")],
        );
        let response = post_multipart(test_router(&scratch), "/rankings", body).await;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("Top candidate: <strong>Jane Doe</strong>"));
    }

    #[tokio::test]
    async fn test_blank_job_description_is_bad_request() {
        let scratch = tempfile::tempdir().unwrap();
        let body = multipart_body(
            &[("job_description", "  ")],
            &[("resumes", "a.txt", "python")],
        );
        let response = post_multipart(test_router(&scratch), "/api/v1/rankings", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "EMPTY_INPUT");
    }

    #[tokio::test]
    async fn test_no_resumes_is_bad_request() {
        let scratch = tempfile::tempdir().unwrap();
        let body = multipart_body(
            &[("job_description", "python")],
            &[("resumes", "", "")],
        );
        let response = post_multipart(test_router(&scratch), "/api/v1/rankings", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_parse_resume_returns_record() {
        let scratch = tempfile::tempdir().unwrap();
        let body = multipart_body(
            &[],
            &[("resume", "john.txt", "John Smith\nBuilt APIs in Python and Docker")],
        );
        let response = post_multipart(test_router(&scratch), "/api/v1/resumes/parse", body).await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["filename"], "john.txt");
        assert_eq!(json["name"], "John Smith");
        assert_eq!(json["skills"], serde_json::json!(["docker", "python"]));
        assert!(json["score"].is_null());
    }

    #[tokio::test]
    async fn test_parse_unsupported_format_is_415() {
        let scratch = tempfile::tempdir().unwrap();
        let body = multipart_body(&[], &[("resume", "cv.rtf", "{\\rtf1}")]);
        let response = post_multipart(test_router(&scratch), "/api/v1/resumes/parse", body).await;
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "UNSUPPORTED_FORMAT");
    }

    #[tokio::test]
    async fn test_parse_corrupt_pdf_is_422() {
        let scratch = tempfile::tempdir().unwrap();
        let body = multipart_body(&[], &[("resume", "cv.pdf", "not a pdf")]);
        let response = post_multipart(test_router(&scratch), "/api/v1/resumes/parse", body).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_parse_without_file_is_bad_request() {
        let scratch = tempfile::tempdir().unwrap();
        let body = multipart_body(&[("job_description", "python")], &[]);
        let response = post_multipart(test_router(&scratch), "/api/v1/resumes/parse", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
    }
}
