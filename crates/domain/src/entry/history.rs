use super::WorkEntry;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Narrowing applied on top of the caller's entry scope.
///
/// Every field is optional; an unset field matches everything. Date bounds
/// are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryFilter {
    pub city_id: Option<String>,
    pub zone_id: Option<String>,
    pub ward_id: Option<String>,
    pub location_id: Option<String>,
    #[serde(default, deserialize_with = "blank_date")]
    pub date_from: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_date")]
    pub date_to: Option<NaiveDate>,
}

/// `YYYY-MM-DD`, with an empty value read as unset.
fn blank_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<NaiveDate>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

fn id_matches(wanted: &Option<String>, actual: &str) -> bool {
    match wanted.as_deref() {
        None | Some("") => true,
        Some(id) => id == actual,
    }
}

impl HistoryFilter {
    pub fn matches(&self, entry: &WorkEntry) -> bool {
        id_matches(&self.city_id, &entry.city_id)
            && id_matches(&self.zone_id, &entry.zone_id)
            && id_matches(&self.ward_id, &entry.ward_id)
            && id_matches(&self.location_id, &entry.location_id)
            && self.date_from.is_none_or(|from| entry.work_date >= from)
            && self.date_to.is_none_or(|to| entry.work_date <= to)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySummary {
    pub entries: usize,
    pub total_hours: f64,
    pub average_hours: f64,
}

impl HistorySummary {
    pub fn of(entries: &[WorkEntry]) -> Self {
        let total_hours: f64 = entries.iter().map(|e| e.hours).sum();
        let average_hours = if entries.is_empty() {
            0.0
        } else {
            total_hours / entries.len() as f64
        };
        Self {
            entries: entries.len(),
            total_hours,
            average_hours,
        }
    }
}
