use std::any::Any;

use axum::{
    body::Body,
    http::{Response, StatusCode},
    response::{Html, IntoResponse},
};

use crate::http_server::views;
use crate::services::BookingError;

/// Failure of a page handler. Form submission failures never get here: they
/// are turned into a flash message and a redirect by the handler itself.
#[derive(Debug)]
pub enum HttpError {
    NotFound,
    Internal(color_eyre::Report),
}

impl From<BookingError> for HttpError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::NotFound { .. } => Self::NotFound,
            other => Self::Internal(other.into()),
        }
    }
}

impl From<color_eyre::Report> for HttpError {
    fn from(report: color_eyre::Report) -> Self {
        Self::Internal(report)
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response<Body> {
        match self {
            HttpError::NotFound => not_found_response(),
            HttpError::Internal(err) => {
                tracing::error!("{err:?}");
                server_error_response()
            }
        }
    }
}

pub fn not_found_response() -> Response<Body> {
    (StatusCode::NOT_FOUND, Html(views::not_found())).into_response()
}

pub fn server_error_response() -> Response<Body> {
    (StatusCode::INTERNAL_SERVER_ERROR, Html(views::server_error())).into_response()
}

/// Router fallback for unknown paths.
pub async fn fallback() -> Response<Body> {
    not_found_response()
}

/// Panics inside a handler become the 500 page.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    tracing::error!("Handler panicked: {details}");
    server_error_response()
}

pub type HttpResult<T> = Result<T, HttpError>;
