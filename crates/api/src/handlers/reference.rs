//! Handlers for project references: manual entries, file uploads and
//! scraped URLs.

use std::time::Duration;

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use rahnuma_core::error::CoreError;
use rahnuma_core::extract::extract_text;
use rahnuma_core::prd::ReferenceContentType;
use rahnuma_core::types::DbId;
use rahnuma_db::models::reference::{CreateProjectReference, ProjectReference};
use rahnuma_db::repositories::ReferenceRepo;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::prd::ensure_prd_exists;
use crate::ingest::fetch_page;
use crate::middleware::auth::AuthUser;
use crate::response::SuccessResponse;
use crate::state::AppState;

/// Matches the `name` column width.
const MAX_NAME_CHARS: usize = 200;

/// Multipart field carrying uploaded files.
const FILES_FIELD: &str = "files";

fn reference_name(raw: &str) -> String {
    raw.trim().chars().take(MAX_NAME_CHARS).collect()
}

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct SkippedFile {
    pub filename: String,
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub references: Vec<ProjectReference>,
    pub skipped: Vec<SkippedFile>,
}

#[derive(Debug, Deserialize)]
pub struct AddUrlsRequest {
    #[serde(default)]
    pub urls: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct FailedUrl {
    pub url: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct AddUrlsResponse {
    pub references: Vec<ProjectReference>,
    pub failed: Vec<FailedUrl>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/prd/{id}/references
pub async fn create(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(prd_id): Path<DbId>,
    Json(input): Json<CreateProjectReference>,
) -> AppResult<(StatusCode, Json<ProjectReference>)> {
    input.validate()?;
    let content_type: ReferenceContentType = input.content_type.parse()?;
    ensure_prd_exists(&state.pool, prd_id).await?;

    let input = CreateProjectReference {
        content_type: content_type.as_str().to_string(),
        ..input
    };
    let reference = ReferenceRepo::create(&state.pool, prd_id, &input).await?;
    Ok((StatusCode::CREATED, Json(reference)))
}

/// GET /api/v1/prd/{id}/references
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(prd_id): Path<DbId>,
) -> AppResult<Json<Vec<ProjectReference>>> {
    ensure_prd_exists(&state.pool, prd_id).await?;
    let references = ReferenceRepo::list_by_prd(&state.pool, prd_id).await?;
    Ok(Json(references))
}

/// DELETE /api/v1/prd/{id}/references/{reference_id}
pub async fn delete(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path((prd_id, reference_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<SuccessResponse>> {
    ensure_prd_exists(&state.pool, prd_id).await?;
    if !ReferenceRepo::delete(&state.pool, prd_id, reference_id).await? {
        return Err(AppError::Core(CoreError::NotFoundUnder {
            entity: "Reference",
            id: reference_id,
            parent: "PRD",
            parent_id: prd_id,
        }));
    }
    Ok(SuccessResponse::ok())
}

/// Run a text extraction job on the blocking pool, bounded by `timeout`.
///
/// Panics and timeouts come back as errors. A timed-out job keeps its
/// blocking thread until it finishes, but its result is discarded.
async fn run_bounded<F>(job: F, timeout: Duration) -> Result<String, String>
where
    F: FnOnce() -> Result<String, String> + Send + 'static,
{
    match tokio::time::timeout(timeout, tokio::task::spawn_blocking(job)).await {
        Ok(Ok(result)) => result,
        Ok(Err(e)) if e.is_panic() => Err("Extraction failed unexpectedly".into()),
        Ok(Err(e)) => Err(format!("Extraction task failed: {e}")),
        Err(_) => Err(format!(
            "Extraction timed out after {} ms",
            timeout.as_millis()
        )),
    }
}

/// POST /api/v1/prd/{id}/upload-references
///
/// Every `files` part is run through text extraction on the blocking pool
/// with the same timeout as URL fetches. Files that cannot be read in time
/// are reported in `skipped`; the rest are stored together.
pub async fn upload(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(prd_id): Path<DbId>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    ensure_prd_exists(&state.pool, prd_id).await?;

    let timeout = Duration::from_secs(state.config.url_fetch_timeout_secs);
    let mut received = 0usize;
    let mut inputs = Vec::new();
    let mut skipped = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(FILES_FIELD) {
            continue;
        }
        received += 1;

        let filename = field.file_name().unwrap_or("upload").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        let name = filename.clone();
        let extracted = run_bounded(
            move || extract_text(&name, &data).map_err(|e| e.to_string()),
            timeout,
        )
        .await;

        match extracted {
            Ok(content) => inputs.push(CreateProjectReference {
                name: reference_name(&filename),
                content_type: ReferenceContentType::RequirementDoc.as_str().to_string(),
                content,
            }),
            Err(e) => {
                tracing::warn!(prd_id, filename = %filename, error = %e, "Skipping uploaded file");
                skipped.push(SkippedFile {
                    filename,
                    reason: e,
                });
            }
        }
    }

    if received == 0 {
        return Err(AppError::BadRequest("No files were uploaded".into()));
    }

    let references = ReferenceRepo::create_many(&state.pool, prd_id, &inputs).await?;
    tracing::info!(
        prd_id,
        stored = references.len(),
        skipped = skipped.len(),
        "Reference files uploaded"
    );
    Ok(Json(UploadResponse {
        references,
        skipped,
    }))
}

/// POST /api/v1/prd/{id}/add-reference-urls
///
/// Each URL is fetched once; failures are reported per URL in `failed`.
pub async fn add_urls(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(prd_id): Path<DbId>,
    Json(input): Json<AddUrlsRequest>,
) -> AppResult<Json<AddUrlsResponse>> {
    let urls: Vec<&str> = input
        .urls
        .iter()
        .map(|u| u.trim())
        .filter(|u| !u.is_empty())
        .collect();
    if urls.is_empty() {
        return Err(AppError::BadRequest("No URLs were provided".into()));
    }
    ensure_prd_exists(&state.pool, prd_id).await?;

    let timeout = Duration::from_secs(state.config.url_fetch_timeout_secs);
    let mut inputs = Vec::new();
    let mut failed = Vec::new();

    for url in urls {
        match fetch_page(&state.http, url, timeout).await {
            Ok(page) => inputs.push(CreateProjectReference {
                name: reference_name(page.name()),
                content_type: ReferenceContentType::SimilarApp.as_str().to_string(),
                content: page.text,
            }),
            Err(e) => {
                tracing::warn!(prd_id, url, error = %e, "Reference URL fetch failed");
                failed.push(FailedUrl {
                    url: url.to_string(),
                    error: e.to_string(),
                });
            }
        }
    }

    let references = ReferenceRepo::create_many(&state.pool, prd_id, &inputs).await?;
    tracing::info!(
        prd_id,
        stored = references.len(),
        failed = failed.len(),
        "Reference URLs added"
    );
    Ok(Json(AddUrlsResponse { references, failed }))
}
