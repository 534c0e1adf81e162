use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set, TransactionTrait};

use crate::database::Database;
use crate::entities;
use crate::services::show::ShowService;
use crate::services::{
    BookingError, BookingResult, DirectoryEntry, SearchResults, ShowSummary, matches_search,
    require_genres, require_text, split_shows,
};

/// Every editable artist field. Artists have no address and advertise
/// `seeking_venue` rather than `seeking_talent`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArtistInput {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub genres: Vec<String>,
    pub image_link: String,
    pub facebook_link: String,
    pub website: String,
    pub seeking_venue: bool,
    pub seeking_description: String,
}

impl ArtistInput {
    pub fn validate(&self) -> BookingResult<()> {
        require_text("name", &self.name)?;
        require_text("city", &self.city)?;
        require_text("state", &self.state)?;
        require_genres(&self.genres)
    }

    fn apply(self, artist: &mut entities::artist::ActiveModel) {
        artist.name = Set(self.name);
        artist.city = Set(self.city);
        artist.state = Set(self.state);
        artist.phone = Set(self.phone);
        artist.genres = Set(entities::encode_genres(&self.genres));
        artist.image_link = Set(self.image_link);
        artist.facebook_link = Set(self.facebook_link);
        artist.website = Set(self.website);
        artist.seeking_venue = Set(self.seeking_venue);
        artist.seeking_description = Set(self.seeking_description);
    }
}

impl From<&entities::artist::Model> for ArtistInput {
    fn from(artist: &entities::artist::Model) -> Self {
        Self {
            name: artist.name.clone(),
            city: artist.city.clone(),
            state: artist.state.clone(),
            phone: artist.phone.clone(),
            genres: artist.genre_list(),
            image_link: artist.image_link.clone(),
            facebook_link: artist.facebook_link.clone(),
            website: artist.website.clone(),
            seeking_venue: artist.seeking_venue,
            seeking_description: artist.seeking_description.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ArtistDetail {
    pub artist: entities::artist::Model,
    pub past_shows: Vec<ShowSummary>,
    pub upcoming_shows: Vec<ShowSummary>,
}

pub struct ArtistService {
    db: Arc<Database>,
}

impl ArtistService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Every artist, in id order.
    pub async fn list(&self) -> BookingResult<Vec<entities::artist::Model>> {
        Ok(entities::artist::Entity::find()
            .order_by_asc(entities::artist::Column::Id)
            .all(&self.db.conn)
            .await?)
    }

    pub async fn search(&self, search_term: &str) -> BookingResult<SearchResults> {
        let artists = entities::artist::Entity::find()
            .order_by_asc(entities::artist::Column::Id)
            .all(&self.db.conn)
            .await?;
        let upcoming = ShowService::new(self.db.clone())
            .upcoming_counts_by_artist(Utc::now())
            .await?;

        Ok(SearchResults::new(
            artists
                .into_iter()
                .filter(|artist| matches_search(&artist.name, search_term))
                .map(|artist| DirectoryEntry {
                    num_upcoming_shows: upcoming.get(&artist.id).copied().unwrap_or(0),
                    id: artist.id,
                    name: artist.name,
                })
                .collect(),
        ))
    }

    pub async fn get(&self, artist_id: i64) -> BookingResult<entities::artist::Model> {
        entities::artist::Entity::find_by_id(artist_id)
            .one(&self.db.conn)
            .await?
            .ok_or_else(|| BookingError::not_found("artist", artist_id))
    }

    /// The artist with its shows split into past and upcoming.
    pub async fn detail(&self, artist_id: i64) -> BookingResult<ArtistDetail> {
        let artist = self.get(artist_id).await?;
        let shows = ShowService::new(self.db.clone())
            .for_artist(artist_id)
            .await?;

        let (past_shows, upcoming_shows) = split_shows(shows, Utc::now(), |venue| {
            (venue.id, venue.name.clone(), venue.image_link.clone())
        });

        Ok(ArtistDetail {
            artist,
            past_shows,
            upcoming_shows,
        })
    }

    pub async fn create(&self, input: ArtistInput) -> BookingResult<entities::artist::Model> {
        input.validate()?;
        tracing::debug!("Creating artist: '{}'", input.name);

        let model = self
            .db
            .conn
            .transaction::<_, entities::artist::Model, BookingError>(|txn| {
                Box::pin(async move {
                    let mut artist = entities::artist::ActiveModel {
                        ..Default::default()
                    };
                    input.apply(&mut artist);
                    Ok(artist.insert(txn).await?)
                })
            })
            .await?;

        tracing::info!("Artist created: '{}' (ID: {})", model.name, model.id);
        Ok(model)
    }

    /// Overwrite every field of an existing artist. The id never changes. An
    /// unknown id is `NotFound` whatever the input.
    pub async fn update(
        &self,
        artist_id: i64,
        input: ArtistInput,
    ) -> BookingResult<entities::artist::Model> {
        let model = self
            .db
            .conn
            .transaction::<_, entities::artist::Model, BookingError>(|txn| {
                Box::pin(async move {
                    let artist = entities::artist::Entity::find_by_id(artist_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| BookingError::not_found("artist", artist_id))?;
                    input.validate()?;

                    let mut active_artist: entities::artist::ActiveModel = artist.into();
                    input.apply(&mut active_artist);
                    Ok(active_artist.update(txn).await?)
                })
            })
            .await?;

        tracing::info!("Artist updated: '{}' (ID: {})", model.name, model.id);
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{insert_artist, insert_show, insert_venue, test_db};
    use chrono::Duration;

    fn guns_n_petals() -> ArtistInput {
        ArtistInput {
            name: "Guns N Petals".into(),
            city: "San Francisco".into(),
            state: "CA".into(),
            phone: "326-123-5000".into(),
            genres: vec!["Rock n Roll".into()],
            image_link: "https://images.example.com/petals.jpg".into(),
            facebook_link: "https://www.facebook.com/GunsNPetals".into(),
            website: "https://www.gunsnpetalsband.com".into(),
            seeking_venue: true,
            seeking_description: "Looking for shows to perform at in the Bay Area".into(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_round_trip() {
        let db = test_db().await;
        let service = ArtistService::new(db);

        let created = service.create(guns_n_petals()).await.unwrap();
        let fetched = service.get(created.id).await.unwrap();

        assert_eq!(ArtistInput::from(&fetched), guns_n_petals());
        assert!(fetched.seeking_venue);
    }

    #[tokio::test]
    async fn test_create_without_seeking_venue() {
        let db = test_db().await;
        let service = ArtistService::new(db);
        let input = ArtistInput {
            seeking_venue: false,
            ..guns_n_petals()
        };

        let created = service.create(input).await.unwrap();

        assert!(!created.seeking_venue);
    }

    #[tokio::test]
    async fn test_create_requires_a_genre() {
        let db = test_db().await;
        let input = ArtistInput {
            genres: vec![" ".into()],
            ..guns_n_petals()
        };

        let err = ArtistService::new(db).create(input).await.unwrap_err();

        assert!(matches!(err, BookingError::Validation { field: "genres", .. }));
    }

    #[tokio::test]
    async fn test_list_in_id_order() {
        let db = test_db().await;
        let first = insert_artist(&db, "Guns N Petals").await;
        let second = insert_artist(&db, "Matt Quevedo").await;

        let artists = ArtistService::new(db).list().await.unwrap();

        assert_eq!(
            artists.iter().map(|a| a.id).collect::<Vec<_>>(),
            vec![first.id, second.id]
        );
    }

    #[tokio::test]
    async fn test_search_counts_upcoming_shows() {
        let db = test_db().await;
        let venue = insert_venue(&db, "The Musical Hop", "San Francisco", "CA").await;
        let petals = insert_artist(&db, "Guns N Petals").await;
        insert_artist(&db, "Matt Quevedo").await;
        let sax = insert_artist(&db, "The Wild Sax Band").await;
        let now = Utc::now();
        insert_show(&db, venue.id, sax.id, now + Duration::days(2)).await;
        insert_show(&db, venue.id, sax.id, now - Duration::days(2)).await;

        let service = ArtistService::new(db);
        let results = service.search("A").await.unwrap();
        assert_eq!(results.count, 3);

        let results = service.search("band").await.unwrap();
        assert_eq!(results.count, 1);
        assert_eq!(results.data[0].id, sax.id);
        assert_eq!(results.data[0].num_upcoming_shows, 1);

        let results = service.search("petals").await.unwrap();
        assert_eq!(results.data[0].id, petals.id);
        assert_eq!(results.data[0].num_upcoming_shows, 0);
    }

    #[tokio::test]
    async fn test_detail_lists_venues() {
        let db = test_db().await;
        let venue = insert_venue(&db, "Park Square", "San Francisco", "CA").await;
        let artist = insert_artist(&db, "Matt Quevedo").await;
        insert_show(&db, venue.id, artist.id, Utc::now() - Duration::days(1)).await;

        let detail = ArtistService::new(db).detail(artist.id).await.unwrap();

        assert!(detail.upcoming_shows.is_empty());
        assert_eq!(detail.past_shows.len(), 1);
        assert_eq!(detail.past_shows[0].id, venue.id);
        assert_eq!(detail.past_shows[0].image_link, venue.image_link);
    }

    #[tokio::test]
    async fn test_update_keeps_id() {
        let db = test_db().await;
        let service = ArtistService::new(db);
        let created = service.create(guns_n_petals()).await.unwrap();

        let edited = ArtistInput {
            city: "Oakland".into(),
            seeking_venue: false,
            ..guns_n_petals()
        };
        let updated = service.update(created.id, edited.clone()).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(ArtistInput::from(&updated), edited);
    }

    #[tokio::test]
    async fn test_update_missing_artist_ignores_input() {
        let db = test_db().await;
        let blank = ArtistInput {
            genres: Vec::new(),
            ..guns_n_petals()
        };
        let err = ArtistService::new(db).update(11, blank).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_search_matches_literal_text_in_any_case() {
        let db = test_db().await;
        let bjork = insert_artist(&db, "Björk Guðmundsdóttir").await;
        insert_artist(&db, "Guns N Petals").await;

        let service = ArtistService::new(db);
        let results = service.search("BJÖRK").await.unwrap();
        assert_eq!(results.count, 1);
        assert_eq!(results.data[0].id, bjork.id);

        assert_eq!(service.search("%").await.unwrap().count, 0);
    }

    #[tokio::test]
    async fn test_detail_missing_artist() {
        let db = test_db().await;
        let err = ArtistService::new(db).detail(3).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
