//! Music-catalog models: categories, playlists, and ordered songs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Top-level catalog grouping (e.g. "Rock", "Kids").
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub owner_id: Uuid,
    pub family_id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategory {
    #[validate(length(min = 1, max = 128, message = "name must be 1-128 characters"))]
    pub name: String,
    #[validate(length(max = 1024, message = "description is too long"))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategory {
    #[validate(length(min = 1, max = 128, message = "name must be 1-128 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 1024, message = "description is too long"))]
    pub description: Option<String>,
}

/// Playlist inside a category; owns an ordered collection of songs.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: i64,
    pub category_id: i64,
    pub owner_id: Uuid,
    pub family_id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlaylist {
    #[validate(length(min = 1, max = 128, message = "name must be 1-128 characters"))]
    pub name: String,
    #[validate(length(max = 1024, message = "description is too long"))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlaylist {
    #[validate(length(min = 1, max = 128, message = "name must be 1-128 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 1024, message = "description is too long"))]
    pub description: Option<String>,
}

/// A song inside a playlist. `order_key` is the dense 1-based position among
/// its siblings; it is rewritten only by the reorder engine.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: i64,
    pub playlist_id: i64,
    pub title: String,
    pub artist: Option<String>,
    pub duration_secs: Option<i32>,
    pub order_key: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSong {
    #[validate(length(min = 1, max = 256, message = "title must be 1-256 characters"))]
    pub title: String,
    #[validate(length(max = 256, message = "artist name is too long"))]
    pub artist: Option<String>,
    #[validate(range(min = 1, message = "duration must be positive"))]
    pub duration_secs: Option<i32>,
}

/// Song update; a `position` triggers a reorder of the whole playlist.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSong {
    #[validate(length(min = 1, max = 256, message = "title must be 1-256 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 256, message = "artist name is too long"))]
    pub artist: Option<String>,
    #[validate(range(min = 1, message = "duration must be positive"))]
    pub duration_secs: Option<i32>,
    #[validate(range(min = 1, message = "position must be at least 1"))]
    pub position: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn category_serializes_camel_case() {
        let category = Category {
            id: 5,
            owner_id: Uuid::nil(),
            family_id: None,
            name: "Rock".to_string(),
            description: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&category).unwrap();
        assert_eq!(json["ownerId"], Uuid::nil().to_string());
        assert!(json.get("owner_id").is_none());
    }

    #[test]
    fn create_song_requires_title() {
        let song = CreateSong {
            title: String::new(),
            artist: None,
            duration_secs: None,
        };
        assert!(song.validate().is_err());
    }

    #[test]
    fn update_song_position_must_be_positive() {
        let update = UpdateSong {
            position: Some(0),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }
}
