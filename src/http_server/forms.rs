//! Raw form submissions. Browsers send blank text inputs as `field=`, which
//! the form extractor would read as `None` for an `Option`, so text fields
//! default to an empty string and blankness is judged by the services.

use serde::Deserialize;

use crate::services::artist::ArtistInput;
use crate::services::show::{NewShow, parse_start_time};
use crate::services::venue::VenueInput;
use crate::services::{BookingError, BookingResult};

#[derive(Debug, Default, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub search_term: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct VenueForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: String,
    pub genres: Vec<String>,
    pub facebook_link: String,
    pub image_link: String,
    pub website: String,
    /// Checkbox: present means true
    pub seeking_talent: Option<String>,
    pub seeking_description: String,
}

impl VenueForm {
    /// Name as submitted, for flash messages.
    pub fn display_name(&self) -> &str {
        self.name.trim()
    }

    pub fn into_input(self) -> VenueInput {
        VenueInput {
            name: self.name.trim().to_string(),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            address: self.address.trim().to_string(),
            phone: self.phone.trim().to_string(),
            genres: clean_genres(self.genres),
            facebook_link: self.facebook_link.trim().to_string(),
            image_link: self.image_link.trim().to_string(),
            website: self.website.trim().to_string(),
            seeking_talent: self.seeking_talent.is_some(),
            seeking_description: self.seeking_description.trim().to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ArtistForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub genres: Vec<String>,
    pub image_link: String,
    pub facebook_link: String,
    pub website: String,
    /// Checkbox: present means true
    pub seeking_venue: Option<String>,
    pub seeking_description: String,
}

impl ArtistForm {
    pub fn display_name(&self) -> &str {
        self.name.trim()
    }

    pub fn into_input(self) -> ArtistInput {
        ArtistInput {
            name: self.name.trim().to_string(),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            phone: self.phone.trim().to_string(),
            genres: clean_genres(self.genres),
            image_link: self.image_link.trim().to_string(),
            facebook_link: self.facebook_link.trim().to_string(),
            website: self.website.trim().to_string(),
            seeking_venue: self.seeking_venue.is_some(),
            seeking_description: self.seeking_description.trim().to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ShowForm {
    pub venue_id: Option<String>,
    pub artist_id: Option<String>,
    pub start_time: Option<String>,
}

impl ShowForm {
    pub fn into_input(self) -> BookingResult<NewShow> {
        Ok(NewShow {
            venue_id: required_id("venue_id", self.venue_id)?,
            artist_id: required_id("artist_id", self.artist_id)?,
            start_time: parse_start_time(&required("start_time", self.start_time)?)?,
        })
    }
}

fn required(field: &'static str, value: Option<String>) -> BookingResult<String> {
    value
        .map(|value| value.trim().to_string())
        .ok_or_else(|| BookingError::missing(field))
}

fn required_id(field: &'static str, value: Option<String>) -> BookingResult<i64> {
    let value = required(field, value)?;
    value.parse().map_err(|_| BookingError::Validation {
        field,
        reason: format!("`{value}` is not an id"),
    })
}

fn clean_genres(genres: Vec<String>) -> Vec<String> {
    genres
        .into_iter()
        .map(|genre| genre.trim().to_string())
        .filter(|genre| !genre.is_empty())
        .collect()
}
