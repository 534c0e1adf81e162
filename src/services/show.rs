use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};

use crate::database::Database;
use crate::entities;
use crate::services::error::{BookingError, BookingResult};

pub const START_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const NAIVE_START_TIME_FORMATS: [&str; 4] = [
    START_TIME_FORMAT,
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

#[derive(Debug, Clone)]
pub struct NewShow {
    pub venue_id: i64,
    pub artist_id: i64,
    pub start_time: DateTime<Utc>,
}

/// One row of the show listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ShowListing {
    pub venue_id: i64,
    pub venue_name: String,
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: String,
    pub start_time: String,
}

pub struct ShowService {
    db: Arc<Database>,
}

impl ShowService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Every show with its venue and artist, earliest first.
    pub async fn list(&self) -> BookingResult<Vec<ShowListing>> {
        let shows = entities::show::Entity::find()
            .order_by_asc(entities::show::Column::StartTime)
            .order_by_asc(entities::show::Column::Id)
            .all(&self.db.conn)
            .await?;

        let venues = self
            .venues_by_id(shows.iter().map(|show| show.venue_id).collect())
            .await?;
        let artists = self
            .artists_by_id(shows.iter().map(|show| show.artist_id).collect())
            .await?;

        shows
            .into_iter()
            .map(|show| {
                let venue = venues
                    .get(&show.venue_id)
                    .ok_or_else(|| BookingError::not_found("venue", show.venue_id))?;
                let artist = artists
                    .get(&show.artist_id)
                    .ok_or_else(|| BookingError::not_found("artist", show.artist_id))?;
                Ok(ShowListing {
                    venue_id: venue.id,
                    venue_name: venue.name.clone(),
                    artist_id: artist.id,
                    artist_name: artist.name.clone(),
                    artist_image_link: artist.image_link.clone(),
                    start_time: format_start_time(show.start_time),
                })
            })
            .collect()
    }

    /// Schedule a show. Unknown venue or artist ids are rejected by the
    /// foreign keys and nothing is persisted.
    pub async fn create(&self, input: NewShow) -> BookingResult<entities::show::Model> {
        tracing::debug!(
            "Creating show: venue {} artist {} at {}",
            input.venue_id,
            input.artist_id,
            input.start_time
        );

        let model = self
            .db
            .conn
            .transaction::<_, entities::show::Model, BookingError>(|txn| {
                Box::pin(async move {
                    let show = entities::show::ActiveModel {
                        venue_id: Set(input.venue_id),
                        artist_id: Set(input.artist_id),
                        start_time: Set(input.start_time),
                        ..Default::default()
                    };
                    Ok(show.insert(txn).await?)
                })
            })
            .await?;

        tracing::info!("Show created (ID: {})", model.id);
        Ok(model)
    }

    /// Shows of one venue, earliest first, each with its artist.
    pub async fn for_venue(
        &self,
        venue_id: i64,
    ) -> BookingResult<Vec<(entities::show::Model, entities::artist::Model)>> {
        let shows = entities::show::Entity::find()
            .filter(entities::show::Column::VenueId.eq(venue_id))
            .order_by_asc(entities::show::Column::StartTime)
            .all(&self.db.conn)
            .await?;

        let artists = self
            .artists_by_id(shows.iter().map(|show| show.artist_id).collect())
            .await?;

        shows
            .into_iter()
            .map(|show| {
                let artist = artists
                    .get(&show.artist_id)
                    .cloned()
                    .ok_or_else(|| BookingError::not_found("artist", show.artist_id))?;
                Ok((show, artist))
            })
            .collect()
    }

    /// Shows of one artist, earliest first, each with its venue.
    pub async fn for_artist(
        &self,
        artist_id: i64,
    ) -> BookingResult<Vec<(entities::show::Model, entities::venue::Model)>> {
        let shows = entities::show::Entity::find()
            .filter(entities::show::Column::ArtistId.eq(artist_id))
            .order_by_asc(entities::show::Column::StartTime)
            .all(&self.db.conn)
            .await?;

        let venues = self
            .venues_by_id(shows.iter().map(|show| show.venue_id).collect())
            .await?;

        shows
            .into_iter()
            .map(|show| {
                let venue = venues
                    .get(&show.venue_id)
                    .cloned()
                    .ok_or_else(|| BookingError::not_found("venue", show.venue_id))?;
                Ok((show, venue))
            })
            .collect()
    }

    /// Upcoming show count per venue id. Venues without upcoming shows are absent.
    pub async fn upcoming_counts_by_venue(
        &self,
        now: DateTime<Utc>,
    ) -> BookingResult<HashMap<i64, u64>> {
        self.upcoming_counts(entities::show::Column::VenueId, now)
            .await
    }

    /// Upcoming show count per artist id. Artists without upcoming shows are absent.
    pub async fn upcoming_counts_by_artist(
        &self,
        now: DateTime<Utc>,
    ) -> BookingResult<HashMap<i64, u64>> {
        self.upcoming_counts(entities::show::Column::ArtistId, now)
            .await
    }

    async fn upcoming_counts(
        &self,
        owner: entities::show::Column,
        now: DateTime<Utc>,
    ) -> BookingResult<HashMap<i64, u64>> {
        let rows: Vec<(i64, i64)> = entities::show::Entity::find()
            .select_only()
            .column(owner)
            .column_as(entities::show::Column::Id.count(), "upcoming")
            .filter(entities::show::Column::StartTime.gt(now))
            .group_by(owner)
            .into_tuple()
            .all(&self.db.conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(id, count)| (id, count.max(0) as u64))
            .collect())
    }

    async fn venues_by_id(
        &self,
        ids: Vec<i64>,
    ) -> BookingResult<HashMap<i64, entities::venue::Model>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let venues = entities::venue::Entity::find()
            .filter(entities::venue::Column::Id.is_in(ids))
            .all(&self.db.conn)
            .await?;
        Ok(venues.into_iter().map(|venue| (venue.id, venue)).collect())
    }

    async fn artists_by_id(
        &self,
        ids: Vec<i64>,
    ) -> BookingResult<HashMap<i64, entities::artist::Model>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let artists = entities::artist::Entity::find()
            .filter(entities::artist::Column::Id.is_in(ids))
            .all(&self.db.conn)
            .await?;
        Ok(artists.into_iter().map(|artist| (artist.id, artist)).collect())
    }
}

pub fn format_start_time(start_time: DateTime<Utc>) -> String {
    start_time.format(START_TIME_FORMAT).to_string()
}

/// Parse a submitted start time. Accepts RFC 3339 and the common
/// `YYYY-MM-DD HH:MM[:SS]` shapes (with a space or `T`); times without an
/// offset are taken as UTC.
pub fn parse_start_time(raw: &str) -> BookingResult<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(BookingError::missing("start_time"));
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }

    NAIVE_START_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| BookingError::Validation {
            field: "start_time",
            reason: format!("`{raw}` is not a date and time"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{insert_artist, insert_show, insert_venue, test_db};
    use chrono::{Duration, TimeZone};
    use sea_orm::PaginatorTrait;

    #[tokio::test]
    async fn test_list_joins_venue_and_artist() {
        let db = test_db().await;
        let venue = insert_venue(&db, "The Musical Hop", "San Francisco", "CA").await;
        let artist = insert_artist(&db, "Guns N Petals").await;
        let start = Utc.with_ymd_and_hms(2019, 5, 21, 21, 30, 0).unwrap();
        insert_show(&db, venue.id, artist.id, start).await;

        let service = ShowService::new(db);
        let shows = service.list().await.unwrap();

        assert_eq!(
            shows,
            vec![ShowListing {
                venue_id: venue.id,
                venue_name: "The Musical Hop".into(),
                artist_id: artist.id,
                artist_name: "Guns N Petals".into(),
                artist_image_link: artist.image_link.clone(),
                start_time: "2019-05-21 21:30:00".into(),
            }]
        );
    }

    #[tokio::test]
    async fn test_list_orders_by_start_time() {
        let db = test_db().await;
        let venue = insert_venue(&db, "Park Square", "San Francisco", "CA").await;
        let artist = insert_artist(&db, "Matt Quevedo").await;
        let later = Utc.with_ymd_and_hms(2035, 4, 1, 20, 0, 0).unwrap();
        let earlier = Utc.with_ymd_and_hms(2035, 1, 1, 20, 0, 0).unwrap();
        insert_show(&db, venue.id, artist.id, later).await;
        insert_show(&db, venue.id, artist.id, earlier).await;

        let shows = ShowService::new(db).list().await.unwrap();

        assert_eq!(shows.len(), 2);
        assert_eq!(shows[0].start_time, "2035-01-01 20:00:00");
        assert_eq!(shows[1].start_time, "2035-04-01 20:00:00");
    }

    #[tokio::test]
    async fn test_create_show() {
        let db = test_db().await;
        let venue = insert_venue(&db, "The Dueling Pianos Bar", "New York", "NY").await;
        let artist = insert_artist(&db, "The Wild Sax Band").await;
        let start = Utc.with_ymd_and_hms(2035, 4, 15, 20, 0, 0).unwrap();

        let service = ShowService::new(db.clone());
        let show = service
            .create(NewShow {
                venue_id: venue.id,
                artist_id: artist.id,
                start_time: start,
            })
            .await
            .unwrap();

        assert_eq!(show.venue_id, venue.id);
        assert_eq!(show.artist_id, artist.id);
        assert_eq!(show.start_time, start);
    }

    #[tokio::test]
    async fn test_create_show_unknown_venue_persists_nothing() {
        let db = test_db().await;
        let artist = insert_artist(&db, "The Wild Sax Band").await;

        let service = ShowService::new(db.clone());
        let result = service
            .create(NewShow {
                venue_id: 9999,
                artist_id: artist.id,
                start_time: Utc::now() + Duration::days(3),
            })
            .await;

        assert!(result.is_err());
        assert!(!result.unwrap_err().is_not_found());
        let count = entities::show::Entity::find().count(&db.conn).await.unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_upcoming_counts_exclude_past_shows() {
        let db = test_db().await;
        let hop = insert_venue(&db, "The Musical Hop", "San Francisco", "CA").await;
        let park = insert_venue(&db, "Park Square", "San Francisco", "CA").await;
        let quiet = insert_venue(&db, "Quiet Room", "San Francisco", "CA").await;
        let artist = insert_artist(&db, "Guns N Petals").await;
        let now = Utc::now();
        insert_show(&db, hop.id, artist.id, now + Duration::days(1)).await;
        insert_show(&db, hop.id, artist.id, now + Duration::days(2)).await;
        insert_show(&db, hop.id, artist.id, now - Duration::days(1)).await;
        insert_show(&db, park.id, artist.id, now - Duration::days(30)).await;

        let service = ShowService::new(db);
        let by_venue = service.upcoming_counts_by_venue(now).await.unwrap();
        let by_artist = service.upcoming_counts_by_artist(now).await.unwrap();

        assert_eq!(by_venue.get(&hop.id), Some(&2));
        assert_eq!(by_venue.get(&park.id), None);
        assert_eq!(by_venue.get(&quiet.id), None);
        assert_eq!(by_artist.get(&artist.id), Some(&2));
    }

    #[tokio::test]
    async fn test_for_venue_and_for_artist() {
        let db = test_db().await;
        let venue = insert_venue(&db, "The Musical Hop", "San Francisco", "CA").await;
        let other = insert_venue(&db, "Park Square", "San Francisco", "CA").await;
        let artist = insert_artist(&db, "Guns N Petals").await;
        let now = Utc::now();
        insert_show(&db, venue.id, artist.id, now + Duration::days(1)).await;
        insert_show(&db, other.id, artist.id, now + Duration::days(2)).await;

        let service = ShowService::new(db);
        let venue_shows = service.for_venue(venue.id).await.unwrap();
        let artist_shows = service.for_artist(artist.id).await.unwrap();

        assert_eq!(venue_shows.len(), 1);
        assert_eq!(venue_shows[0].1.id, artist.id);
        assert_eq!(artist_shows.len(), 2);
        assert_eq!(artist_shows[0].1.id, venue.id);
        assert_eq!(artist_shows[1].1.id, other.id);
    }

    #[test]
    fn test_parse_start_time_formats() {
        let expected = Utc.with_ymd_and_hms(2035, 4, 15, 20, 0, 0).unwrap();
        assert_eq!(parse_start_time("2035-04-15 20:00:00").unwrap(), expected);
        assert_eq!(parse_start_time("2035-04-15T20:00").unwrap(), expected);
        assert_eq!(parse_start_time("2035-04-15T22:00:00+02:00").unwrap(), expected);
    }

    #[test]
    fn test_parse_start_time_rejects_garbage() {
        assert!(matches!(
            parse_start_time("next tuesday"),
            Err(BookingError::Validation { field: "start_time", .. })
        ));
        assert!(matches!(
            parse_start_time("  "),
            Err(BookingError::Validation { field: "start_time", .. })
        ));
    }
}
