use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ConnectOptions, Set};

use crate::database::Database;
use crate::entities;

/// Fresh in-memory database with the migrations applied.
pub async fn test_db() -> Arc<Database> {
    // A single pooled connection keeps every query on the same in-memory database.
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);

    Arc::new(Database::connect(opt).await.unwrap())
}

pub async fn insert_venue(db: &Database, name: &str, city: &str, state: &str) -> entities::venue::Model {
    let venue = entities::venue::ActiveModel {
        name: Set(name.into()),
        city: Set(city.into()),
        state: Set(state.into()),
        address: Set("1015 Folsom Street".into()),
        phone: Set("123-123-1234".into()),
        genres: Set(entities::encode_genres(&["Jazz".to_string()])),
        facebook_link: Set("https://www.facebook.com/venue".into()),
        image_link: Set("https://images.example.com/venue.jpg".into()),
        website: Set("https://venue.example.com".into()),
        seeking_talent: Set(false),
        seeking_description: Set(String::new()),
        ..Default::default()
    };
    venue.insert(&db.conn).await.unwrap()
}

pub async fn insert_artist(db: &Database, name: &str) -> entities::artist::Model {
    let artist = entities::artist::ActiveModel {
        name: Set(name.into()),
        city: Set("San Francisco".into()),
        state: Set("CA".into()),
        phone: Set("326-123-5000".into()),
        genres: Set(entities::encode_genres(&["Rock n Roll".to_string()])),
        image_link: Set("https://images.example.com/artist.jpg".into()),
        facebook_link: Set("https://www.facebook.com/artist".into()),
        website: Set("https://artist.example.com".into()),
        seeking_venue: Set(false),
        seeking_description: Set(String::new()),
        ..Default::default()
    };
    artist.insert(&db.conn).await.unwrap()
}

pub async fn insert_show(
    db: &Database,
    venue_id: i64,
    artist_id: i64,
    start_time: DateTime<Utc>,
) -> entities::show::Model {
    let show = entities::show::ActiveModel {
        venue_id: Set(venue_id),
        artist_id: Set(artist_id),
        start_time: Set(start_time),
        ..Default::default()
    };
    show.insert(&db.conn).await.unwrap()
}
