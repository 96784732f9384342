//! Wire records as the API serializes them, plus conversions into domain
//! types. Field names follow the server's snake_case JSON.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::{Photo, PhotoSize, Profile};

#[derive(Debug, Clone, Deserialize)]
pub struct PhotoRecord {
    pub id: String,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub description: Option<String>,
    pub urls: PhotoUrls,
    pub liked_by_user: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhotoUrls {
    pub thumb: String,
    pub full: String,
}

impl From<PhotoRecord> for Photo {
    fn from(record: PhotoRecord) -> Self {
        Self {
            id: record.id,
            size: PhotoSize::new(record.width, record.height),
            created_at: record.created_at,
            description: record.description,
            thumb_url: record.urls.thumb,
            full_url: record.urls.full,
            is_liked: record.liked_by_user,
        }
    }
}

/// Response body of a like/unlike call. The embedded record carries the
/// server-confirmed like state.
#[derive(Debug, Clone, Deserialize)]
pub struct LikeResponse {
    pub photo: PhotoRecord,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileRecord {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

impl From<ProfileRecord> for Profile {
    fn from(record: ProfileRecord) -> Self {
        Self::new(
            record.username,
            record.first_name,
            record.last_name,
            record.bio,
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserRecord {
    pub profile_image: ProfileImageRecord,
}

/// The large variant is the one the profile screen renders.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileImageRecord {
    pub large: String,
}
