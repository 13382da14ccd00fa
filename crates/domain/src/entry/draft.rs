use super::{MediaType, WorkEntry, WorkEntryMedia};
use crate::error::{DomainError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Hours worked between two hour-meter readings.
pub fn hours(shmr: f64, chmr: f64) -> f64 {
    chmr - shmr
}

/// Work entry as submitted by the entry form.
///
/// Any `hours` the client computed is ignored; it is always re-derived from
/// the readings. `photos` and `videos` are public URLs of already uploaded
/// objects, in the order they were attached.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkEntryDraft {
    #[serde(default)]
    pub city_id: String,
    #[serde(default)]
    pub zone_id: String,
    #[serde(default)]
    pub ward_id: String,
    #[serde(default)]
    pub location_id: String,
    pub work_date: Option<NaiveDate>,
    #[serde(default)]
    pub supervisor_id: String,
    #[serde(default)]
    pub engineer_id: Option<String>,
    #[serde(default)]
    pub shmr: f64,
    #[serde(default)]
    pub chmr: f64,
    #[serde(default)]
    pub landmark: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub videos: Vec<String>,
}

impl WorkEntryDraft {
    pub fn validate(&self) -> Result<ValidatedEntry> {
        let required = [
            &self.city_id,
            &self.zone_id,
            &self.ward_id,
            &self.location_id,
            &self.supervisor_id,
        ];
        if required.iter().any(|v| v.trim().is_empty()) {
            return Err(DomainError::Validation(
                "Please fill in all required fields.".to_string(),
            ));
        }
        let Some(work_date) = self.work_date else {
            return Err(DomainError::Validation(
                "Please fill in all required fields.".to_string(),
            ));
        };

        if !self.shmr.is_finite() || !self.chmr.is_finite() {
            return Err(DomainError::Validation(
                "SHMR and CHMR must be valid numbers.".to_string(),
            ));
        }
        if self.shmr <= 0.0 || self.chmr <= 0.0 {
            return Err(DomainError::Validation(
                "SHMR and CHMR must be greater than 0.".to_string(),
            ));
        }

        let hours = hours(self.shmr, self.chmr);
        if hours <= 0.0 {
            return Err(DomainError::Validation(
                "CHMR (Closing Hour Meter Reading) must be greater than SHMR (Start Hour Meter Reading)."
                    .to_string(),
            ));
        }

        if self
            .photos
            .iter()
            .chain(self.videos.iter())
            .any(|u| u.trim().is_empty())
        {
            return Err(DomainError::Validation(
                "Media URL cannot be empty".to_string(),
            ));
        }

        Ok(ValidatedEntry {
            draft: self.clone(),
            work_date,
            hours,
        })
    }
}

fn blank_to_none(value: &Option<String>) -> Option<String> {
    value
        .as_ref()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// A draft that passed [`WorkEntryDraft::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedEntry {
    draft: WorkEntryDraft,
    work_date: NaiveDate,
    hours: f64,
}

impl ValidatedEntry {
    pub fn hours(&self) -> f64 {
        self.hours
    }

    pub fn city_id(&self) -> &str {
        &self.draft.city_id
    }

    pub fn zone_id(&self) -> &str {
        &self.draft.zone_id
    }

    pub fn ward_id(&self) -> &str {
        &self.draft.ward_id
    }

    pub fn location_id(&self) -> &str {
        &self.draft.location_id
    }

    pub fn supervisor_id(&self) -> &str {
        &self.draft.supervisor_id
    }

    pub fn engineer_id(&self) -> Option<String> {
        blank_to_none(&self.draft.engineer_id)
    }

    pub fn media_count(&self) -> usize {
        self.draft.photos.len() + self.draft.videos.len()
    }

    pub fn to_entry(&self, id: String, created_by: String, now: DateTime<Utc>) -> WorkEntry {
        WorkEntry {
            id,
            city_id: self.draft.city_id.clone(),
            zone_id: self.draft.zone_id.clone(),
            ward_id: self.draft.ward_id.clone(),
            location_id: self.draft.location_id.clone(),
            work_date: self.work_date,
            supervisor_id: self.draft.supervisor_id.clone(),
            engineer_id: self.engineer_id(),
            shmr: self.draft.shmr,
            chmr: self.draft.chmr,
            hours: self.hours,
            landmark: blank_to_none(&self.draft.landmark),
            remarks: blank_to_none(&self.draft.remarks),
            created_by,
            created_at: now,
        }
    }

    /// Media rows for `entry_id`: photos first, then videos, numbered from 0.
    ///
    /// `next_id` is called once per row.
    pub fn media_rows(
        &self,
        entry_id: &str,
        mut next_id: impl FnMut() -> String,
    ) -> Vec<WorkEntryMedia> {
        let photos = self.draft.photos.iter().map(|u| (MediaType::Photo, u));
        let videos = self.draft.videos.iter().map(|u| (MediaType::Video, u));

        photos
            .chain(videos)
            .enumerate()
            .map(|(order, (media_type, url))| WorkEntryMedia {
                id: next_id(),
                work_entry_id: entry_id.to_string(),
                media_type,
                url: url.clone(),
                display_order: order as i32,
            })
            .collect()
    }
}
