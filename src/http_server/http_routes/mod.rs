pub mod artists;
pub mod pages;
pub mod shows;
pub mod venues;

use crate::http_server::error::{HttpError, HttpResult};
use crate::services::BookingError;

/// Path ids arrive as text so that `/venues/abc` is a 404 rather than a 400.
fn parse_id(raw: &str) -> HttpResult<i64> {
    raw.parse().map_err(|_| HttpError::NotFound)
}

fn log_failure(action: &str, err: &BookingError) {
    match err {
        BookingError::Database(_) => tracing::error!("{action} failed: {err}"),
        _ => tracing::warn!("{action} rejected: {err}"),
    }
}
