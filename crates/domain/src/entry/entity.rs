use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One logged use of a piece of equipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkEntry {
    pub id: String,
    pub city_id: String,
    pub zone_id: String,
    pub ward_id: String,
    pub location_id: String,
    pub work_date: NaiveDate,
    pub supervisor_id: String,
    pub engineer_id: Option<String>,
    /// Start hour-meter reading
    pub shmr: f64,
    /// Closing hour-meter reading
    pub chmr: f64,
    pub hours: f64,
    pub landmark: Option<String>,
    pub remarks: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Photo,
    Video,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Photo => "photo",
            MediaType::Video => "video",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "photo" => Some(MediaType::Photo),
            "video" => Some(MediaType::Video),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkEntryMedia {
    pub id: String,
    pub work_entry_id: String,
    pub media_type: MediaType,
    pub url: String,
    pub display_order: i32,
}
