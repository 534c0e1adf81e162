use std::sync::Arc;

use axum::{
    extract::State,
    response::{Html, Redirect},
};
use axum_extra::extract::{CookieJar, Form};

use super::log_failure;
use crate::http_server::{
    error::HttpResult,
    flash::{self, Flash},
    forms::ShowForm,
    state::AppState,
    views,
};

pub async fn list(State(state): State<Arc<AppState>>) -> HttpResult<Html<String>> {
    let shows = state.shows().list().await?;
    Ok(Html(views::shows(&shows)))
}

pub async fn create_form() -> Html<String> {
    Html(views::show_form())
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<ShowForm>,
) -> (CookieJar, Redirect) {
    let outcome = match form.into_input() {
        Ok(input) => state.shows().create(input).await,
        Err(err) => Err(err),
    };

    let message = match outcome {
        Ok(_) => Flash::success("Show was successfully listed!"),
        Err(err) => {
            log_failure("Show creation", &err);
            Flash::error("An error occurred. Show could not be listed.")
        }
    };
    (flash::push(jar, message), Redirect::to("/"))
}
