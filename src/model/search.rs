//! Stored searches.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::location::Location;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchKind {
    /// "Places of type around me".
    Around,
    /// Free text autocomplete.
    Autocomplete,
}

/// A search as persisted by the recent-searches repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SearchRecord {
    Around {
        id: i64,
        key: String,
        lat: f64,
        lng: f64,
        last_searched_at: DateTime<Utc>,
    },
    Autocomplete {
        id: i64,
        query: String,
        priority_lat: Option<f64>,
        priority_lon: Option<f64>,
        last_searched_at: DateTime<Utc>,
    },
}

impl SearchRecord {
    pub fn id(&self) -> i64 {
        match self {
            Self::Around { id, .. } | Self::Autocomplete { id, .. } => *id,
        }
    }

    pub fn kind(&self) -> SearchKind {
        match self {
            Self::Around { .. } => SearchKind::Around,
            Self::Autocomplete { .. } => SearchKind::Autocomplete,
        }
    }

    pub fn last_searched_at(&self) -> DateTime<Utc> {
        match self {
            Self::Around {
                last_searched_at, ..
            }
            | Self::Autocomplete {
                last_searched_at, ..
            } => *last_searched_at,
        }
    }
}

/// Row in the recent searches list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentSearch {
    pub id: i64,
    pub label: String,
    pub kind: SearchKind,
    pub location: Option<Location>,
    pub last_searched_at: DateTime<Utc>,
}

impl From<SearchRecord> for RecentSearch {
    fn from(record: SearchRecord) -> Self {
        match record {
            SearchRecord::Around {
                id,
                key,
                lat,
                lng,
                last_searched_at,
            } => RecentSearch {
                id,
                label: key,
                kind: SearchKind::Around,
                location: Some(Location::new(lat, lng)),
                last_searched_at,
            },
            SearchRecord::Autocomplete {
                id,
                query,
                priority_lat,
                priority_lon,
                last_searched_at,
            } => RecentSearch {
                id,
                label: query,
                kind: SearchKind::Autocomplete,
                location: match (priority_lat, priority_lon) {
                    (Some(lat), Some(lon)) => Some(Location::new(lat, lon)),
                    _ => None,
                },
                last_searched_at,
            },
        }
    }
}
