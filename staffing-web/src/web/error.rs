//! Request failure handling
//!
//! Any error from a handler becomes a generic 500 page; the full error
//! chain goes to the log only.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use super::pages;

/// Error type returned by every handler
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        log::error!("Request failed: {:#}", self.0);
        (StatusCode::INTERNAL_SERVER_ERROR, Html(pages::error_page())).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        AppError(err.into())
    }
}

pub type AppResult<T> = Result<T, AppError>;
