//! Excel export download and CSV upload

use std::sync::Arc;

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::header;
use axum::response::{Html, IntoResponse, Redirect, Response};

use crate::transfer::{WORKBOOK_FILENAME, WORKBOOK_MIME, export_workbook, import_assignments};
use crate::web::error::AppResult;
use crate::web::pages;
use crate::web::server::AppState;

pub async fn export_excel(State(state): State<Arc<AppState>>) -> AppResult<Response> {
    let buffer = export_workbook(state.store.as_ref()).await?;

    let disposition = format!("attachment; filename=\"{}\"", WORKBOOK_FILENAME);
    Ok((
        [
            (header::CONTENT_TYPE, WORKBOOK_MIME.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        buffer,
    )
        .into_response())
}

pub async fn import_form() -> Html<String> {
    Html(pages::import_page())
}

/// Largest accepted upload, in bytes
pub const IMPORT_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Import the `file` part. Without a file part the upload form is shown
/// again; a file part with no filename (nothing chosen) just redirects.
/// A malformed or oversized upload answers with the rejection's own status.
pub async fn import_csv(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> AppResult<Response> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Ok(upload_rejected(e)),
        };
        if field.name() != Some("file") {
            continue;
        }
        let filename = match field.file_name() {
            Some(name) => name.to_string(),
            None => continue,
        };
        if filename.is_empty() {
            return Ok(Redirect::to("/").into_response());
        }

        let data = match field.bytes().await {
            Ok(data) => data,
            Err(e) => return Ok(upload_rejected(e)),
        };
        log::info!("Importing '{}' ({} bytes)", filename, data.len());
        import_assignments(state.store.as_ref(), &data).await?;
        return Ok(Redirect::to("/").into_response());
    }

    Ok(Html(pages::import_page()).into_response())
}

fn upload_rejected(err: MultipartError) -> Response {
    log::warn!("Rejected CSV upload ({}): {}", err.status(), err.body_text());
    err.into_response()
}
