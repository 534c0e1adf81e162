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
    forms::{ArtistForm, SearchForm},
    state::AppState,
    views,
};
use crate::services::artist::ArtistInput;

pub async fn list(State(state): State<Arc<AppState>>) -> HttpResult<Html<String>> {
    let artists = state.artists().list().await?;
    Ok(Html(views::artists(&artists)))
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SearchForm>,
) -> HttpResult<Html<String>> {
    let results = state.artists().search(&form.search_term).await?;
    Ok(Html(views::artist_search(&form.search_term, &results)))
}

pub async fn detail(
    State(state): State<Arc<AppState>>,
    Path(artist_id): Path<String>,
    jar: CookieJar,
) -> HttpResult<(CookieJar, Html<String>)> {
    let detail = state.artists().detail(parse_id(&artist_id)?).await?;
    let (jar, flash) = flash::take(jar);
    Ok((jar, Html(views::artist_detail(&detail, flash.as_ref()))))
}

pub async fn create_form() -> Html<String> {
    Html(views::artist_form(None, &ArtistInput::default()))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<ArtistForm>,
) -> (CookieJar, Redirect) {
    let name = form.display_name().to_string();
    let message = match state.artists().create(form.into_input()).await {
        Ok(artist) => Flash::success(format!("Artist {} was successfully listed!", artist.name)),
        Err(err) => {
            log_failure("Artist creation", &err);
            Flash::error(format!(
                "An error occurred. Artist {name} could not be listed."
            ))
        }
    };
    (flash::push(jar, message), Redirect::to("/"))
}

pub async fn edit_form(
    State(state): State<Arc<AppState>>,
    Path(artist_id): Path<String>,
) -> HttpResult<Html<String>> {
    let artist = state.artists().get(parse_id(&artist_id)?).await?;
    Ok(Html(views::artist_form(
        Some(artist.id),
        &ArtistInput::from(&artist),
    )))
}

pub async fn edit(
    State(state): State<Arc<AppState>>,
    Path(artist_id): Path<String>,
    jar: CookieJar,
    Form(form): Form<ArtistForm>,
) -> HttpResult<(CookieJar, Redirect)> {
    let artist_id = parse_id(&artist_id)?;
    let message = match state.artists().update(artist_id, form.into_input()).await {
        Ok(_) => Flash::success("Artist was successfully updated!"),
        Err(err) if err.is_not_found() => return Err(HttpError::NotFound),
        Err(err) => {
            log_failure("Artist update", &err);
            Flash::error("An error occurred. Artist could not be changed.")
        }
    };
    Ok((
        flash::push(jar, message),
        Redirect::to(&format!("/artists/{artist_id}")),
    ))
}
