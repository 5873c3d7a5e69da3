//! Axum route handlers for the Worksheet API.

use axum::{
    extract::State,
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::layout::Paginator;
use crate::render::render_pdf;
use crate::state::AppState;
use crate::worksheet::prompts::build_title;
use crate::worksheet::source::WorksheetRequest;

const MAX_FILENAME_CHARS: usize = 64;
const FALLBACK_FILENAME: &str = "worksheet";

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct WorksheetResponse {
    pub worksheet: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /process
///
/// Generates a worksheet and returns its Markdown text.
pub async fn handle_process(
    State(state): State<AppState>,
    Json(request): Json<WorksheetRequest>,
) -> Result<Json<WorksheetResponse>, AppError> {
    let request = request.validated()?;
    let generation_id = Uuid::new_v4();
    info!(
        %generation_id,
        topic = %request.topic,
        grade_level = request.grade_level,
        "Generating worksheet"
    );

    let worksheet = state.source.generate(&request).await?;

    info!(%generation_id, chars = worksheet.len(), "Worksheet generated");
    Ok(Json(WorksheetResponse { worksheet }))
}

/// POST /process/pdf
///
/// Generates a worksheet, lays it out on fixed-size pages and returns a PDF attachment.
/// Layout and rendering are CPU-bound and run on the blocking pool.
pub async fn handle_process_pdf(
    State(state): State<AppState>,
    Json(request): Json<WorksheetRequest>,
) -> Result<impl IntoResponse, AppError> {
    let request = request.validated()?;
    let generation_id = Uuid::new_v4();
    info!(
        %generation_id,
        topic = %request.topic,
        grade_level = request.grade_level,
        "Generating worksheet PDF"
    );

    let paginator = Paginator::builder()
        .geometry(state.page_geometry.clone())
        .measurer(state.measurer.clone())
        .build()?;

    let text = state.source.generate(&request).await?;
    let title = build_title(&request.topic, request.grade_level);

    let (page_count, line_count, title_overflows, pdf) = tokio::task::spawn_blocking(move || {
        let layout = paginator.paginate(&title, &text);
        let line_count = layout.lines().filter(|l| !l.is_blank()).count();
        let pdf = render_pdf(&layout, paginator.geometry());
        (layout.page_count(), line_count, layout.title_overflows, pdf)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in PDF render: {e}")))?;

    info!(
        %generation_id,
        page_count,
        line_count,
        title_overflows,
        bytes = pdf.len(),
        "Worksheet PDF rendered"
    );

    let disposition = format!(
        "attachment; filename=\"{}.pdf\"",
        attachment_filename(&request.topic)
    );
    Ok((
        [
            (CONTENT_TYPE, "application/pdf".to_string()),
            (CONTENT_DISPOSITION, disposition),
        ],
        Bytes::from(pdf),
    ))
}

/// Header-safe file stem derived from the topic: ASCII letters, digits, `-` and `_`
/// survive; everything else becomes `_`, runs of `_` collapse, and the result is capped
/// before leading and trailing `_` are trimmed.
fn attachment_filename(topic: &str) -> String {
    let mut slug = String::with_capacity(topic.len());
    for c in topic.chars() {
        let c = if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' };
        if c == '_' && slug.ends_with('_') {
            continue;
        }
        slug.push(c);
    }

    let capped: String = slug.chars().take(MAX_FILENAME_CHARS).collect();
    let slug = capped.trim_matches('_');
    if slug.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        slug.to_string()
    }
}
