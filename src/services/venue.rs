use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::database::Database;
use crate::entities;
use crate::services::show::ShowService;
use crate::services::{
    BookingError, BookingResult, DirectoryEntry, SearchResults, ShowSummary, matches_search,
    require_genres, require_text, split_shows,
};

/// Every editable venue field. Used for both create and edit submissions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VenueInput {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: String,
    pub genres: Vec<String>,
    pub facebook_link: String,
    pub image_link: String,
    pub website: String,
    pub seeking_talent: bool,
    pub seeking_description: String,
}

impl VenueInput {
    pub fn validate(&self) -> BookingResult<()> {
        require_text("name", &self.name)?;
        require_text("city", &self.city)?;
        require_text("state", &self.state)?;
        require_text("address", &self.address)?;
        require_genres(&self.genres)
    }

    fn apply(self, venue: &mut entities::venue::ActiveModel) {
        venue.name = Set(self.name);
        venue.city = Set(self.city);
        venue.state = Set(self.state);
        venue.address = Set(self.address);
        venue.phone = Set(self.phone);
        venue.genres = Set(entities::encode_genres(&self.genres));
        venue.facebook_link = Set(self.facebook_link);
        venue.image_link = Set(self.image_link);
        venue.website = Set(self.website);
        venue.seeking_talent = Set(self.seeking_talent);
        venue.seeking_description = Set(self.seeking_description);
    }
}

impl From<&entities::venue::Model> for VenueInput {
    fn from(venue: &entities::venue::Model) -> Self {
        Self {
            name: venue.name.clone(),
            city: venue.city.clone(),
            state: venue.state.clone(),
            address: venue.address.clone(),
            phone: venue.phone.clone(),
            genres: venue.genre_list(),
            facebook_link: venue.facebook_link.clone(),
            image_link: venue.image_link.clone(),
            website: venue.website.clone(),
            seeking_talent: venue.seeking_talent,
            seeking_description: venue.seeking_description.clone(),
        }
    }
}

/// Venues sharing one literal (city, state) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Area {
    pub city: String,
    pub state: String,
    pub venues: Vec<DirectoryEntry>,
}

#[derive(Debug, Clone)]
pub struct VenueDetail {
    pub venue: entities::venue::Model,
    pub past_shows: Vec<ShowSummary>,
    pub upcoming_shows: Vec<ShowSummary>,
}

pub struct VenueService {
    db: Arc<Database>,
}

impl VenueService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Group every venue by (city, state). Areas come in order of their first
    /// venue; venues inside an area are in id order.
    pub async fn list_by_area(&self) -> BookingResult<Vec<Area>> {
        let venues = entities::venue::Entity::find()
            .order_by_asc(entities::venue::Column::Id)
            .all(&self.db.conn)
            .await?;
        let upcoming = ShowService::new(self.db.clone())
            .upcoming_counts_by_venue(Utc::now())
            .await?;

        let mut areas: Vec<Area> = Vec::new();
        let mut area_index: HashMap<(String, String), usize> = HashMap::new();

        for venue in venues {
            let entry = DirectoryEntry {
                id: venue.id,
                num_upcoming_shows: upcoming.get(&venue.id).copied().unwrap_or(0),
                name: venue.name,
            };
            let index = *area_index
                .entry((venue.city.clone(), venue.state.clone()))
                .or_insert_with(|| {
                    areas.push(Area {
                        city: venue.city,
                        state: venue.state,
                        venues: Vec::new(),
                    });
                    areas.len() - 1
                });
            areas[index].venues.push(entry);
        }

        Ok(areas)
    }

    pub async fn search(&self, search_term: &str) -> BookingResult<SearchResults> {
        let venues = entities::venue::Entity::find()
            .order_by_asc(entities::venue::Column::Id)
            .all(&self.db.conn)
            .await?;
        let upcoming = ShowService::new(self.db.clone())
            .upcoming_counts_by_venue(Utc::now())
            .await?;

        Ok(SearchResults::new(
            venues
                .into_iter()
                .filter(|venue| matches_search(&venue.name, search_term))
                .map(|venue| DirectoryEntry {
                    num_upcoming_shows: upcoming.get(&venue.id).copied().unwrap_or(0),
                    id: venue.id,
                    name: venue.name,
                })
                .collect(),
        ))
    }

    pub async fn get(&self, venue_id: i64) -> BookingResult<entities::venue::Model> {
        entities::venue::Entity::find_by_id(venue_id)
            .one(&self.db.conn)
            .await?
            .ok_or_else(|| BookingError::not_found("venue", venue_id))
    }

    /// The venue with its shows split into past and upcoming.
    pub async fn detail(&self, venue_id: i64) -> BookingResult<VenueDetail> {
        let venue = self.get(venue_id).await?;
        let shows = ShowService::new(self.db.clone())
            .for_venue(venue_id)
            .await?;

        let (past_shows, upcoming_shows) = split_shows(shows, Utc::now(), |artist| {
            (artist.id, artist.name.clone(), artist.image_link.clone())
        });

        Ok(VenueDetail {
            venue,
            past_shows,
            upcoming_shows,
        })
    }

    pub async fn create(&self, input: VenueInput) -> BookingResult<entities::venue::Model> {
        input.validate()?;
        tracing::debug!("Creating venue: '{}'", input.name);

        let model = self
            .db
            .conn
            .transaction::<_, entities::venue::Model, BookingError>(|txn| {
                Box::pin(async move {
                    let mut venue = entities::venue::ActiveModel {
                        ..Default::default()
                    };
                    input.apply(&mut venue);
                    Ok(venue.insert(txn).await?)
                })
            })
            .await?;

        tracing::info!("Venue created: '{}' (ID: {})", model.name, model.id);
        Ok(model)
    }

    /// Overwrite every field of an existing venue. The id never changes. An
    /// unknown id is `NotFound` whatever the input.
    pub async fn update(
        &self,
        venue_id: i64,
        input: VenueInput,
    ) -> BookingResult<entities::venue::Model> {
        let model = self
            .db
            .conn
            .transaction::<_, entities::venue::Model, BookingError>(|txn| {
                Box::pin(async move {
                    let venue = entities::venue::Entity::find_by_id(venue_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| BookingError::not_found("venue", venue_id))?;
                    input.validate()?;

                    let mut active_venue: entities::venue::ActiveModel = venue.into();
                    input.apply(&mut active_venue);
                    Ok(active_venue.update(txn).await?)
                })
            })
            .await?;

        tracing::info!("Venue updated: '{}' (ID: {})", model.name, model.id);
        Ok(model)
    }

    /// Delete a venue together with its shows. Returns how many shows went
    /// with it. Unknown ids are reported as `NotFound`.
    pub async fn delete(&self, venue_id: i64) -> BookingResult<u64> {
        let removed_shows = self
            .db
            .conn
            .transaction::<_, u64, BookingError>(|txn| {
                Box::pin(async move {
                    entities::venue::Entity::find_by_id(venue_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| BookingError::not_found("venue", venue_id))?;

                    let shows = entities::show::Entity::delete_many()
                        .filter(entities::show::Column::VenueId.eq(venue_id))
                        .exec(txn)
                        .await?;
                    entities::venue::Entity::delete_by_id(venue_id)
                        .exec(txn)
                        .await?;

                    Ok(shows.rows_affected)
                })
            })
            .await?;

        tracing::info!(
            "Venue deleted (ID: {}), {} show(s) removed with it",
            venue_id,
            removed_shows
        );
        Ok(removed_shows)
    }
}
