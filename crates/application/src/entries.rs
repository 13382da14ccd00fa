use crate::reference::load_hierarchy;
use chrono::Utc;
use domain::DomainError;
use domain::access::{EntryScope, can_delete_entries, can_submit_entries, entry_scope};
use domain::entry::{
    HistoryFilter, HistorySummary, WorkEntry, WorkEntryDraft, WorkEntryMedia, WorkEntryRepository,
};
use domain::error::Result;
use domain::hierarchy::{HierarchyOptions, HierarchySelection};
use domain::reference::ReferenceRepository;
use domain::user::{Identity, Role, UserRepository};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOutcome {
    pub entry: WorkEntry,
    pub media: Vec<WorkEntryMedia>,
    pub media_saved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryHistory {
    pub entries: Vec<WorkEntry>,
    pub summary: HistorySummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryDetail {
    pub entry: WorkEntry,
    pub media: Vec<WorkEntryMedia>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupervisorOption {
    pub id: String,
    pub name: String,
    pub city_id: Option<String>,
}

/// Everything the entry form needs to render its dropdowns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormOptions {
    pub selection: HierarchySelection,
    pub options: HierarchyOptions,
    pub supervisors: Vec<SupervisorOption>,
    /// True when the city dropdown is fixed to the caller's city.
    pub city_locked: bool,
}

/// Work entry submission, history and removal.
#[derive(Clone)]
pub struct EntryService {
    entries: Arc<dyn WorkEntryRepository>,
    reference: Arc<dyn ReferenceRepository>,
    users: Arc<dyn UserRepository>,
}

impl EntryService {
    pub fn new(
        entries: Arc<dyn WorkEntryRepository>,
        reference: Arc<dyn ReferenceRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            entries,
            reference,
            users,
        }
    }

    /// Validate and store a new entry, then its media.
    ///
    /// Media rows are written only after the parent row exists. A media
    /// failure leaves the parent in place and is reported as a warning.
    pub async fn submit(
        &self,
        caller: &Identity,
        draft: &WorkEntryDraft,
    ) -> Result<SubmitOutcome> {
        if !can_submit_entries(caller.role) {
            return Err(DomainError::Forbidden(
                "Forbidden: Not allowed to create work entries".to_string(),
            ));
        }

        let valid = draft.validate()?;

        if caller.role == Role::Supervisor && caller.city_id.as_deref() != Some(valid.city_id()) {
            return Err(DomainError::Forbidden(
                "Forbidden: Supervisors can only log entries for their own city".to_string(),
            ));
        }

        let hierarchy = load_hierarchy(self.reference.as_ref()).await?;
        hierarchy.validate_path(
            valid.city_id(),
            valid.zone_id(),
            valid.ward_id(),
            valid.location_id(),
        )?;

        let supervisor = self
            .users
            .find_by_id(valid.supervisor_id())
            .await?
            .filter(|u| u.role == Role::Supervisor)
            .ok_or_else(|| DomainError::NotFound("Supervisor not found".to_string()))?;
        if supervisor.city_id.as_deref() != Some(valid.city_id()) {
            return Err(DomainError::Validation(
                "Selected supervisor does not belong to the selected city".to_string(),
            ));
        }

        let entry = valid.to_entry(Uuid::new_v4().to_string(), caller.id.clone(), Utc::now());
        self.entries.insert(&entry).await?;
        info!(
            entry_id = %entry.id,
            city_id = %entry.city_id,
            hours = entry.hours,
            by = %caller.id,
            "Work entry saved"
        );

        let media = valid.media_rows(&entry.id, || Uuid::new_v4().to_string());
        if media.is_empty() {
            return Ok(SubmitOutcome {
                entry,
                media,
                media_saved: true,
                warning: None,
            });
        }

        match self.entries.insert_media(&media).await {
            Ok(()) => Ok(SubmitOutcome {
                entry,
                media,
                media_saved: true,
                warning: None,
            }),
            Err(e) => {
                error!(entry_id = %entry.id, "Failed to save media rows: {}", e);
                Ok(SubmitOutcome {
                    entry,
                    media: Vec::new(),
                    media_saved: false,
                    warning: Some(
                        "Work entry saved, but some media failed to upload. Please try re-adding media."
                            .to_string(),
                    ),
                })
            }
        }
    }

    /// Entries visible to `caller`, narrowed by `filter`, newest first.
    pub async fn history(
        &self,
        caller: &Identity,
        filter: &HistoryFilter,
    ) -> Result<EntryHistory> {
        let rows = match entry_scope(caller) {
            EntryScope::Nothing => {
                warn!(user_id = %caller.id, "Caller has no city; returning empty history");
                Vec::new()
            }
            EntryScope::City(city) => self.entries.list(Some(city)).await?,
            EntryScope::All => {
                let city = filter.city_id.clone().filter(|c| !c.is_empty());
                self.entries.list(city).await?
            }
        };

        let scope = entry_scope(caller);
        let entries: Vec<WorkEntry> = rows
            .into_iter()
            .filter(|e| scope.permits(&e.city_id) && filter.matches(e))
            .collect();
        let summary = HistorySummary::of(&entries);

        Ok(EntryHistory { entries, summary })
    }

    pub async fn detail(&self, caller: &Identity, id: &str) -> Result<EntryDetail> {
        let entry = self
            .entries
            .find_by_id(id)
            .await?
            .filter(|e| entry_scope(caller).permits(&e.city_id))
            .ok_or_else(|| DomainError::NotFound("Work entry not found".to_string()))?;
        let media = self.entries.media_for(&entry.id).await?;
        Ok(EntryDetail { entry, media })
    }

    pub async fn delete(&self, caller: &Identity, id: &str) -> Result<()> {
        if !can_delete_entries(caller.role) {
            return Err(DomainError::Forbidden(
                "Only administrators can delete entries.".to_string(),
            ));
        }
        if !self.entries.delete(id).await? {
            return Err(DomainError::NotFound("Work entry not found".to_string()));
        }
        info!(entry_id = %id, by = %caller.id, "Work entry deleted");
        Ok(())
    }

    /// Dropdown contents for the entry form at `requested` selection.
    pub async fn form_options(
        &self,
        caller: &Identity,
        requested: &HierarchySelection,
    ) -> Result<FormOptions> {
        let hierarchy = load_hierarchy(self.reference.as_ref()).await?;

        let city_locked = caller.role == Role::Supervisor && caller.city_id.is_some();
        let requested = if city_locked {
            let mut locked = HierarchySelection::initial_for(caller);
            if let Some(zone) = requested.zone_id() {
                locked.select_zone(zone);
            }
            if let Some(ward) = requested.ward_id() {
                locked.select_ward(ward);
            }
            if let Some(location) = requested.location_id() {
                locked.select_location(location);
            }
            locked
        } else {
            requested.clone()
        };

        let selection = hierarchy.normalize(&requested);
        let mut options = hierarchy.options(&selection);
        if city_locked {
            options
                .cities
                .retain(|c| Some(c.id.as_str()) == caller.city_id.as_deref());
        }

        let supervisors = match selection.city_id() {
            Some(city) => self
                .users
                .list_by_role(Role::Supervisor, Some(city.to_string()))
                .await?
                .into_iter()
                .map(|u| SupervisorOption {
                    id: u.id,
                    name: u.full_name,
                    city_id: u.city_id,
                })
                .collect(),
            None => Vec::new(),
        };

        Ok(FormOptions {
            selection,
            options,
            supervisors,
            city_locked,
        })
    }
}
