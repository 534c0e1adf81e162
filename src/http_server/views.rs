//! HTML pages. Deliberately plain: one layout, a few tables and forms.

use std::fmt::Write;

use crate::entities;
use crate::http_server::flash::Flash;
use crate::services::artist::{ArtistDetail, ArtistInput};
use crate::services::show::ShowListing;
use crate::services::venue::{Area, VenueDetail, VenueInput};
use crate::services::{SearchResults, ShowSummary};

const STYLE: &str = r#"
body { font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; margin: 0; color: #222; }
nav { background: #1a1a1a; padding: 12px 20px; }
nav a { color: #e0e0e0; margin-right: 16px; text-decoration: none; }
main { padding: 20px; max-width: 960px; }
.flash { padding: 10px 14px; margin-bottom: 16px; border-radius: 4px; }
.flash.success { background: #e3f6e5; border: 1px solid #7cc488; }
.flash.error { background: #fbe4e4; border: 1px solid #d98080; }
label { display: block; margin-top: 10px; }
.genre { display: inline-block; background: #eee; border-radius: 10px; padding: 2px 8px; margin-right: 4px; }
"#;

/// Escape text for use in HTML content and double-quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn layout(title: &str, flash: Option<&Flash>, body: &str) -> String {
    let flash = flash
        .map(|flash| {
            format!(
                r#"<div class="flash {}">{}</div>"#,
                flash.css_class(),
                escape(&flash.message)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title} | Showbook</title>
<style>{STYLE}</style>
</head>
<body>
<nav>
<a href="/">Showbook</a>
<a href="/venues">Venues</a>
<a href="/artists">Artists</a>
<a href="/shows">Shows</a>
<a href="/venues/create">Post a venue</a>
<a href="/artists/create">Post an artist</a>
<a href="/shows/create">Post a show</a>
</nav>
<main>
{flash}
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
    )
}

fn search_box(action: &str, placeholder: &str, term: &str) -> String {
    format!(
        r#"<form method="post" action="{action}">
<input type="search" name="search_term" placeholder="{placeholder}" value="{}">
<button type="submit">Search</button>
</form>"#,
        escape(term)
    )
}

fn genre_tags(genres: &[String]) -> String {
    genres
        .iter()
        .map(|genre| format!(r#"<span class="genre">{}</span>"#, escape(genre)))
        .collect()
}

fn upcoming_label(count: u64) -> String {
    match count {
        1 => "1 upcoming show".to_string(),
        n => format!("{n} upcoming shows"),
    }
}

pub fn home(flash: Option<&Flash>) -> String {
    layout(
        "Home",
        flash,
        r#"<h1>Showbook</h1>
<p>Find venues and artists, and book shows.</p>
<ul>
<li><a href="/venues">Browse venues</a></li>
<li><a href="/artists">Browse artists</a></li>
<li><a href="/shows">Upcoming and past shows</a></li>
</ul>"#,
    )
}

pub fn venues(areas: &[Area], flash: Option<&Flash>) -> String {
    let mut body = String::from("<h1>Venues</h1>");
    body.push_str(&search_box("/venues/search", "Find a venue", ""));
    for area in areas {
        let _ = write!(
            body,
            "<h2>{}, {}</h2><ul>",
            escape(&area.city),
            escape(&area.state)
        );
        for venue in &area.venues {
            let _ = write!(
                body,
                r#"<li><a href="/venues/{}">{}</a> <small>{}</small></li>"#,
                venue.id,
                escape(&venue.name),
                upcoming_label(venue.num_upcoming_shows)
            );
        }
        body.push_str("</ul>");
    }
    layout("Venues", flash, &body)
}

fn search_results(kind: &str, path: &str, term: &str, results: &SearchResults) -> String {
    let mut body = format!("<h1>Search {kind}</h1>");
    body.push_str(&search_box(&format!("/{path}/search"), "Search", term));
    let _ = write!(
        body,
        "<p>Number of search results for \"{}\": {}</p><ul>",
        escape(term),
        results.count
    );
    for entry in &results.data {
        let _ = write!(
            body,
            r#"<li><a href="/{path}/{}">{}</a> <small>{}</small></li>"#,
            entry.id,
            escape(&entry.name),
            upcoming_label(entry.num_upcoming_shows)
        );
    }
    body.push_str("</ul>");
    body
}

pub fn venue_search(term: &str, results: &SearchResults) -> String {
    layout(
        "Venue search",
        None,
        &search_results("venues", "venues", term, results),
    )
}

pub fn artist_search(term: &str, results: &SearchResults) -> String {
    layout(
        "Artist search",
        None,
        &search_results("artists", "artists", term, results),
    )
}

fn show_section(heading: &str, path: &str, shows: &[ShowSummary]) -> String {
    let mut section = format!("<h2>{} {heading}</h2><ul>", shows.len());
    for show in shows {
        let _ = write!(
            section,
            r#"<li><img src="{}" alt="" width="48"> <a href="/{path}/{}">{}</a> {}</li>"#,
            escape(&show.image_link),
            show.id,
            escape(&show.name),
            escape(&show.start_time)
        );
    }
    section.push_str("</ul>");
    section
}

struct Profile<'a> {
    name: &'a str,
    genres: Vec<String>,
    location: String,
    phone: &'a str,
    website: &'a str,
    facebook_link: &'a str,
    image_link: &'a str,
    seeking: Option<(&'a str, &'a str)>,
}

fn profile(profile: Profile<'_>) -> String {
    let mut body = format!(
        "<h1>{}</h1><p>{}</p><p>{}</p><p>{}</p>",
        escape(profile.name),
        genre_tags(&profile.genres),
        escape(&profile.location),
        escape(profile.phone)
    );
    let _ = write!(
        body,
        r#"<p><a href="{website}">{website}</a> · <a href="{facebook}">{facebook}</a></p>"#,
        website = escape(profile.website),
        facebook = escape(profile.facebook_link)
    );
    match profile.seeking {
        Some((label, description)) => {
            let _ = write!(
                body,
                "<p><strong>{label}</strong> {}</p>",
                escape(description)
            );
        }
        None => body.push_str("<p>Not currently seeking.</p>"),
    }
    if !profile.image_link.is_empty() {
        let _ = write!(
            body,
            r#"<img src="{}" alt="{}" width="320">"#,
            escape(profile.image_link),
            escape(profile.name)
        );
    }
    body
}

/// The delete response is a redirect carrying the flash cookie. Following it
/// from `fetch` would consume the flash before the page loads.
fn delete_script(venue_id: i64) -> String {
    escape(&format!(
        "fetch('/venues/{venue_id}', {{ method: 'DELETE', redirect: 'manual' }})\
         .then(() => window.location = '/')"
    ))
}

pub fn venue_detail(detail: &VenueDetail, flash: Option<&Flash>) -> String {
    let venue = &detail.venue;
    let mut body = profile(Profile {
        name: &venue.name,
        genres: venue.genre_list(),
        location: format!("{}, {}, {}", venue.address, venue.city, venue.state),
        phone: &venue.phone,
        website: &venue.website,
        facebook_link: &venue.facebook_link,
        image_link: &venue.image_link,
        seeking: venue
            .seeking_talent
            .then_some(("Seeking talent.", venue.seeking_description.as_str())),
    });
    let _ = write!(
        body,
        r#"<p><a href="/venues/{id}/edit">Edit</a>
<button onclick="{}">Delete</button></p>"#,
        delete_script(venue.id),
        id = venue.id
    );
    body.push_str(&show_section("upcoming shows", "artists", &detail.upcoming_shows));
    body.push_str(&show_section("past shows", "artists", &detail.past_shows));
    layout(&venue.name, flash, &body)
}

pub fn artists(artists: &[entities::artist::Model]) -> String {
    let mut body = String::from("<h1>Artists</h1>");
    body.push_str(&search_box("/artists/search", "Find an artist", ""));
    body.push_str("<ul>");
    for artist in artists {
        let _ = write!(
            body,
            r#"<li><a href="/artists/{}">{}</a></li>"#,
            artist.id,
            escape(&artist.name)
        );
    }
    body.push_str("</ul>");
    layout("Artists", None, &body)
}

pub fn artist_detail(detail: &ArtistDetail, flash: Option<&Flash>) -> String {
    let artist = &detail.artist;
    let mut body = profile(Profile {
        name: &artist.name,
        genres: artist.genre_list(),
        location: format!("{}, {}", artist.city, artist.state),
        phone: &artist.phone,
        website: &artist.website,
        facebook_link: &artist.facebook_link,
        image_link: &artist.image_link,
        seeking: artist
            .seeking_venue
            .then_some(("Seeking performance venues.", artist.seeking_description.as_str())),
    });
    let _ = write!(
        body,
        r#"<p><a href="/artists/{}/edit">Edit</a></p>"#,
        artist.id
    );
    body.push_str(&show_section("upcoming shows", "venues", &detail.upcoming_shows));
    body.push_str(&show_section("past shows", "venues", &detail.past_shows));
    layout(&artist.name, flash, &body)
}

fn text_input(name: &str, label: &str, value: &str) -> String {
    format!(
        r#"<label>{label} <input type="text" name="{name}" value="{}"></label>"#,
        escape(value)
    )
}

fn checkbox(name: &str, label: &str, checked: bool) -> String {
    format!(
        r#"<label><input type="checkbox" name="{name}" value="y"{}> {label}</label>"#,
        if checked { " checked" } else { "" }
    )
}

fn genre_inputs(genres: &[String]) -> String {
    // Existing genres plus two blank slots
    genres
        .iter()
        .map(String::as_str)
        .chain(["", ""])
        .map(|genre| {
            format!(
                r#"<input type="text" name="genres" value="{}">"#,
                escape(genre)
            )
        })
        .collect()
}

/// Create form when `venue_id` is `None`, edit form otherwise.
pub fn venue_form(venue_id: Option<i64>, input: &VenueInput) -> String {
    let (title, action) = match venue_id {
        Some(id) => ("Edit venue".to_string(), format!("/venues/{id}/edit")),
        None => ("List a new venue".to_string(), "/venues/create".to_string()),
    };
    let body = format!(
        r#"<h1>{title}</h1>
<form method="post" action="{action}">
{}{}{}{}{}
<label>Genres {}</label>
{}{}{}
{}
{}
<button type="submit">Save venue</button>
</form>"#,
        text_input("name", "Name", &input.name),
        text_input("city", "City", &input.city),
        text_input("state", "State", &input.state),
        text_input("address", "Address", &input.address),
        text_input("phone", "Phone", &input.phone),
        genre_inputs(&input.genres),
        text_input("image_link", "Image link", &input.image_link),
        text_input("facebook_link", "Facebook link", &input.facebook_link),
        text_input("website", "Website", &input.website),
        checkbox("seeking_talent", "Seeking talent", input.seeking_talent),
        text_input(
            "seeking_description",
            "Seeking description",
            &input.seeking_description
        ),
    );
    layout(&title, None, &body)
}

/// Create form when `artist_id` is `None`, edit form otherwise.
pub fn artist_form(artist_id: Option<i64>, input: &ArtistInput) -> String {
    let (title, action) = match artist_id {
        Some(id) => ("Edit artist".to_string(), format!("/artists/{id}/edit")),
        None => ("List a new artist".to_string(), "/artists/create".to_string()),
    };
    let body = format!(
        r#"<h1>{title}</h1>
<form method="post" action="{action}">
{}{}{}{}
<label>Genres {}</label>
{}{}{}
{}
{}
<button type="submit">Save artist</button>
</form>"#,
        text_input("name", "Name", &input.name),
        text_input("city", "City", &input.city),
        text_input("state", "State", &input.state),
        text_input("phone", "Phone", &input.phone),
        genre_inputs(&input.genres),
        text_input("image_link", "Image link", &input.image_link),
        text_input("facebook_link", "Facebook link", &input.facebook_link),
        text_input("website", "Website", &input.website),
        checkbox("seeking_venue", "Seeking venue", input.seeking_venue),
        text_input(
            "seeking_description",
            "Seeking description",
            &input.seeking_description
        ),
    );
    layout(&title, None, &body)
}

pub fn shows(shows: &[ShowListing]) -> String {
    let mut body = String::from("<h1>Shows</h1><ul>");
    for show in shows {
        let _ = write!(
            body,
            r#"<li><img src="{}" alt="" width="48"> <a href="/artists/{}">{}</a> at <a href="/venues/{}">{}</a> {}</li>"#,
            escape(&show.artist_image_link),
            show.artist_id,
            escape(&show.artist_name),
            show.venue_id,
            escape(&show.venue_name),
            escape(&show.start_time)
        );
    }
    body.push_str("</ul>");
    layout("Shows", None, &body)
}

pub fn show_form() -> String {
    let body = format!(
        r#"<h1>List a new show</h1>
<form method="post" action="/shows/create">
{}{}
<label>Start time <input type="datetime-local" name="start_time"></label>
<button type="submit">Create show</button>
</form>"#,
        text_input("artist_id", "Artist ID", ""),
        text_input("venue_id", "Venue ID", ""),
    );
    layout("New show", None, &body)
}

pub fn not_found() -> String {
    layout(
        "Not found",
        None,
        r#"<h1>404</h1><p>Nothing here. <a href="/">Back home</a></p>"#,
    )
}

pub fn server_error() -> String {
    layout(
        "Server error",
        None,
        r#"<h1>500</h1><p>Something went wrong. <a href="/">Back home</a></p>"#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::DirectoryEntry;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn test_venues_page_escapes_names() {
        let areas = vec![Area {
            city: "San Francisco".into(),
            state: "CA".into(),
            venues: vec![DirectoryEntry {
                id: 1,
                name: "<script>Hop</script>".into(),
                num_upcoming_shows: 1,
            }],
        }];

        let page = venues(&areas, None);

        assert!(page.contains("San Francisco, CA"));
        assert!(page.contains("&lt;script&gt;Hop&lt;/script&gt;"));
        assert!(page.contains("1 upcoming show<"));
    }

    #[test]
    fn test_flash_is_rendered() {
        let page = home(Some(&Flash::error("Venue could not be listed.")));
        assert!(page.contains(r#"<div class="flash error">Venue could not be listed.</div>"#));
    }

    #[test]
    fn test_delete_script_does_not_follow_redirect() {
        let script = delete_script(4);
        assert!(script.contains("fetch(&#39;/venues/4&#39;"));
        assert!(script.contains("method: &#39;DELETE&#39;, redirect: &#39;manual&#39;"));
    }

    #[test]
    fn test_edit_form_prefills_values() {
        let input = VenueInput {
            name: "The Musical Hop".into(),
            genres: vec!["Jazz".into()],
            seeking_talent: true,
            ..Default::default()
        };

        let page = venue_form(Some(3), &input);

        assert!(page.contains(r#"action="/venues/3/edit""#));
        assert!(page.contains(r#"name="name" value="The Musical Hop""#));
        assert!(page.contains(r#"name="genres" value="Jazz""#));
        assert!(page.contains(r#"name="seeking_talent" value="y" checked"#));
    }
}
