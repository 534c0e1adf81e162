use axum::response::Html;
use axum_extra::extract::CookieJar;

use crate::http_server::{flash, views};

pub async fn home(jar: CookieJar) -> (CookieJar, Html<String>) {
    let (jar, flash) = flash::take(jar);
    (jar, Html(views::home(flash.as_ref())))
}
