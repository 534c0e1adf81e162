pub mod artist;
pub mod error;
pub mod show;
pub mod venue;

use chrono::{DateTime, Utc};

pub use error::{BookingError, BookingResult};

/// A venue or artist with the number of its upcoming shows.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryEntry {
    pub id: i64,
    pub name: String,
    pub num_upcoming_shows: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResults {
    pub count: usize,
    pub data: Vec<DirectoryEntry>,
}

impl SearchResults {
    fn new(data: Vec<DirectoryEntry>) -> Self {
        Self {
            count: data.len(),
            data,
        }
    }
}

/// A show as seen from one side: the counterpart (artist for a venue page,
/// venue for an artist page) and the start time.
#[derive(Debug, Clone, PartialEq)]
pub struct ShowSummary {
    pub id: i64,
    pub name: String,
    pub image_link: String,
    pub start_time: String,
}

/// Split shows into (past, upcoming) relative to `now`, keeping their order.
fn split_shows<T>(
    shows: Vec<(crate::entities::show::Model, T)>,
    now: DateTime<Utc>,
    summarize: impl Fn(&T) -> (i64, String, String),
) -> (Vec<ShowSummary>, Vec<ShowSummary>) {
    let mut past = Vec::new();
    let mut upcoming = Vec::new();
    for (show, counterpart) in shows {
        let (id, name, image_link) = summarize(&counterpart);
        let summary = ShowSummary {
            id,
            name,
            image_link,
            start_time: show::format_start_time(show.start_time),
        };
        if show.is_upcoming(now) {
            upcoming.push(summary);
        } else {
            past.push(summary);
        }
    }
    (past, upcoming)
}

/// Case-insensitive literal substring match. Case folding is Unicode aware,
/// so "éclair" finds "Café Éclair". An empty term matches everything.
fn matches_search(name: &str, search_term: &str) -> bool {
    search_term.is_empty() || name.to_lowercase().contains(&search_term.to_lowercase())
}

/// Validation error naming the field when the value is blank.
fn require_text(field: &'static str, value: &str) -> BookingResult<()> {
    if value.trim().is_empty() {
        return Err(BookingError::missing(field));
    }
    Ok(())
}

fn require_genres(genres: &[String]) -> BookingResult<()> {
    if genres.iter().all(|genre| genre.trim().is_empty()) {
        return Err(BookingError::Validation {
            field: "genres",
            reason: "at least one genre is required".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_search_folds_unicode_case() {
        assert!(matches_search("Café Éclair", "éclair"));
        assert!(matches_search("Café Éclair", "CAFÉ"));
        assert!(matches_search("The Musical Hop", "usical h"));
        assert!(matches_search("The Musical Hop", ""));
        assert!(!matches_search("The Musical Hop", "Park"));
    }

    #[test]
    fn test_matches_search_treats_wildcards_literally() {
        assert!(!matches_search("The Musical Hop", "%"));
        assert!(!matches_search("The Musical Hop", "_"));
        assert!(matches_search("100% Jazz", "0%"));
        assert!(matches_search("snake_case club", "e_c"));
    }
}
