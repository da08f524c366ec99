use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A gallery photo. Photos have no visibility rules and are never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: i64,
    pub url: String,
    pub caption: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewPhoto {
    pub url: String,
    pub caption: String,
}
