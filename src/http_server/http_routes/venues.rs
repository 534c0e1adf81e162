use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
};
use axum_extra::extract::{CookieJar, Form};

use super::{log_failure, parse_id};
use crate::http_server::{
    error::{HttpError, HttpResult},
    flash::{self, Flash},
    forms::{SearchForm, VenueForm},
    state::AppState,
    views,
};
use crate::services::venue::VenueInput;

pub async fn list(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> HttpResult<(CookieJar, Html<String>)> {
    let areas = state.venues().list_by_area().await?;
    let (jar, flash) = flash::take(jar);
    Ok((jar, Html(views::venues(&areas, flash.as_ref()))))
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SearchForm>,
) -> HttpResult<Html<String>> {
    let results = state.venues().search(&form.search_term).await?;
    Ok(Html(views::venue_search(&form.search_term, &results)))
}

pub async fn detail(
    State(state): State<Arc<AppState>>,
    Path(venue_id): Path<String>,
    jar: CookieJar,
) -> HttpResult<(CookieJar, Html<String>)> {
    let detail = state.venues().detail(parse_id(&venue_id)?).await?;
    let (jar, flash) = flash::take(jar);
    Ok((jar, Html(views::venue_detail(&detail, flash.as_ref()))))
}

pub async fn create_form() -> Html<String> {
    Html(views::venue_form(None, &VenueInput::default()))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<VenueForm>,
) -> (CookieJar, Redirect) {
    let name = form.display_name().to_string();
    let message = match state.venues().create(form.into_input()).await {
        Ok(venue) => Flash::success(format!("Venue {} was successfully listed!", venue.name)),
        Err(err) => {
            log_failure("Venue creation", &err);
            Flash::error(format!(
                "An error occurred. Venue {name} could not be listed."
            ))
        }
    };
    (flash::push(jar, message), Redirect::to("/"))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(venue_id): Path<String>,
    jar: CookieJar,
) -> HttpResult<(CookieJar, Redirect)> {
    let venue_id = parse_id(&venue_id)?;

    let message = match state.venues().delete(venue_id).await {
        Ok(_) => Flash::success(format!("The venue {venue_id} deleted successfully!")),
        Err(err) => {
            log_failure("Venue deletion", &err);
            Flash::error(format!("The venue {venue_id} could not be deleted!"))
        }
    };
    Ok((flash::push(jar, message), Redirect::to("/")))
}

pub async fn edit_form(
    State(state): State<Arc<AppState>>,
    Path(venue_id): Path<String>,
) -> HttpResult<Html<String>> {
    let venue = state.venues().get(parse_id(&venue_id)?).await?;
    Ok(Html(views::venue_form(
        Some(venue.id),
        &VenueInput::from(&venue),
    )))
}

pub async fn edit(
    State(state): State<Arc<AppState>>,
    Path(venue_id): Path<String>,
    jar: CookieJar,
    Form(form): Form<VenueForm>,
) -> HttpResult<(CookieJar, Redirect)> {
    let venue_id = parse_id(&venue_id)?;
    let message = match state.venues().update(venue_id, form.into_input()).await {
        Ok(_) => Flash::success("Venue was successfully updated!"),
        Err(err) if err.is_not_found() => return Err(HttpError::NotFound),
        Err(err) => {
            log_failure("Venue update", &err);
            Flash::error("An error occurred. Venue could not be changed.")
        }
    };
    Ok((
        flash::push(jar, message),
        Redirect::to(&format!("/venues/{venue_id}")),
    ))
}
