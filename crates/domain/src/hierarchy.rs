//! Cascading City → Zone → Ward → Location selection.
//!
//! A [`HierarchySelection`] holds at most one selected id per level. Changing
//! any level clears every level beneath it. [`LocationHierarchy::options`]
//! re-derives the visible choices for a selection from scratch: children are
//! shown only when their parent foreign key equals the selected parent id.

use crate::error::{DomainError, Result};
use crate::reference::{City, Location, Ward, Zone};
use crate::user::{Identity, Role};
use serde::{Deserialize, Serialize};

/// Selected ids at each level. Empty strings count as "nothing selected".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchySelection {
    city_id: Option<String>,
    zone_id: Option<String>,
    ward_id: Option<String>,
    location_id: Option<String>,
}

fn non_empty(id: impl Into<String>) -> Option<String> {
    let id = id.into();
    if id.trim().is_empty() { None } else { Some(id) }
}

impl HierarchySelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starting selection for a form opened by `identity`.
    ///
    /// Supervisors are locked to their own city; everyone else starts empty.
    pub fn initial_for(identity: &Identity) -> Self {
        let mut selection = Self::default();
        if identity.role == Role::Supervisor {
            if let Some(city) = &identity.city_id {
                selection.select_city(city.clone());
            }
        }
        selection
    }

    /// Build a selection by applying each level in order, top down.
    pub fn from_ids(
        city_id: Option<String>,
        zone_id: Option<String>,
        ward_id: Option<String>,
        location_id: Option<String>,
    ) -> Self {
        let mut selection = Self::default();
        if let Some(id) = city_id {
            selection.select_city(id);
        }
        if let Some(id) = zone_id {
            selection.select_zone(id);
        }
        if let Some(id) = ward_id {
            selection.select_ward(id);
        }
        if let Some(id) = location_id {
            selection.select_location(id);
        }
        selection
    }

    pub fn select_city(&mut self, id: impl Into<String>) {
        self.city_id = non_empty(id);
        self.zone_id = None;
        self.ward_id = None;
        self.location_id = None;
    }

    pub fn select_zone(&mut self, id: impl Into<String>) {
        self.zone_id = non_empty(id);
        self.ward_id = None;
        self.location_id = None;
    }

    pub fn select_ward(&mut self, id: impl Into<String>) {
        self.ward_id = non_empty(id);
        self.location_id = None;
    }

    pub fn select_location(&mut self, id: impl Into<String>) {
        self.location_id = non_empty(id);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn city_id(&self) -> Option<&str> {
        self.city_id.as_deref()
    }

    pub fn zone_id(&self) -> Option<&str> {
        self.zone_id.as_deref()
    }

    pub fn ward_id(&self) -> Option<&str> {
        self.ward_id.as_deref()
    }

    pub fn location_id(&self) -> Option<&str> {
        self.location_id.as_deref()
    }
}

/// Choices visible at each level for one selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyOptions {
    pub cities: Vec<City>,
    pub zones: Vec<Zone>,
    pub wards: Vec<Ward>,
    pub locations: Vec<Location>,
}

/// Full reference tree, each level sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationHierarchy {
    pub cities: Vec<City>,
    pub zones: Vec<Zone>,
    pub wards: Vec<Ward>,
    pub locations: Vec<Location>,
}

impl LocationHierarchy {
    pub fn new(
        mut cities: Vec<City>,
        mut zones: Vec<Zone>,
        mut wards: Vec<Ward>,
        mut locations: Vec<Location>,
    ) -> Self {
        cities.sort_by(|a, b| a.name.cmp(&b.name));
        zones.sort_by(|a, b| a.name.cmp(&b.name));
        wards.sort_by(|a, b| a.name.cmp(&b.name));
        locations.sort_by(|a, b| a.name.cmp(&b.name));
        Self {
            cities,
            zones,
            wards,
            locations,
        }
    }

    pub fn zones_of<'a>(&'a self, city_id: &'a str) -> impl Iterator<Item = &'a Zone> + 'a {
        self.zones.iter().filter(move |z| z.city_id == city_id)
    }

    pub fn wards_of<'a>(&'a self, zone_id: &'a str) -> impl Iterator<Item = &'a Ward> + 'a {
        self.wards.iter().filter(move |w| w.zone_id == zone_id)
    }

    pub fn locations_of<'a>(
        &'a self,
        ward_id: &'a str,
    ) -> impl Iterator<Item = &'a Location> + 'a {
        self.locations.iter().filter(move |l| l.ward_id == ward_id)
    }

    /// Visible options for `selection`. A level is empty when its parent is unselected.
    pub fn options(&self, selection: &HierarchySelection) -> HierarchyOptions {
        HierarchyOptions {
            cities: self.cities.clone(),
            zones: selection
                .city_id()
                .map(|id| self.zones_of(id).cloned().collect())
                .unwrap_or_default(),
            wards: selection
                .zone_id()
                .map(|id| self.wards_of(id).cloned().collect())
                .unwrap_or_default(),
            locations: selection
                .ward_id()
                .map(|id| self.locations_of(id).cloned().collect())
                .unwrap_or_default(),
        }
    }

    /// Drop any selected level that does not belong to its selected parent,
    /// together with everything beneath it.
    pub fn normalize(&self, selection: &HierarchySelection) -> HierarchySelection {
        let mut out = HierarchySelection::new();

        let Some(city) = selection
            .city_id()
            .filter(|id| self.cities.iter().any(|c| c.id == *id))
        else {
            return out;
        };
        out.select_city(city);

        let Some(zone) = selection
            .zone_id()
            .filter(|id| self.zones_of(city).any(|z| z.id == *id))
        else {
            return out;
        };
        out.select_zone(zone);

        let Some(ward) = selection
            .ward_id()
            .filter(|id| self.wards_of(zone).any(|w| w.id == *id))
        else {
            return out;
        };
        out.select_ward(ward);

        if let Some(location) = selection
            .location_id()
            .filter(|id| self.locations_of(ward).any(|l| l.id == *id))
        {
            out.select_location(location);
        }
        out
    }

    /// Check that each id exists and belongs to the id above it.
    pub fn validate_path(
        &self,
        city_id: &str,
        zone_id: &str,
        ward_id: &str,
        location_id: &str,
    ) -> Result<()> {
        if !self.cities.iter().any(|c| c.id == city_id) {
            return Err(DomainError::NotFound(format!("City not found: {city_id}")));
        }
        match self.zones.iter().find(|z| z.id == zone_id) {
            None => return Err(DomainError::NotFound(format!("Zone not found: {zone_id}"))),
            Some(z) if z.city_id != city_id => {
                return Err(DomainError::Validation(format!(
                    "Zone {} does not belong to the selected city",
                    z.name
                )));
            }
            Some(_) => {}
        }
        match self.wards.iter().find(|w| w.id == ward_id) {
            None => return Err(DomainError::NotFound(format!("Ward not found: {ward_id}"))),
            Some(w) if w.zone_id != zone_id => {
                return Err(DomainError::Validation(format!(
                    "Ward {} does not belong to the selected zone",
                    w.name
                )));
            }
            Some(_) => {}
        }
        match self.locations.iter().find(|l| l.id == location_id) {
            None => Err(DomainError::NotFound(format!(
                "Location not found: {location_id}"
            ))),
            Some(l) if l.ward_id != ward_id => Err(DomainError::Validation(format!(
                "Location {} does not belong to the selected ward",
                l.name
            ))),
            Some(_) => Ok(()),
        }
    }

    /// The subtree rooted at one city.
    pub fn scoped_to_city(&self, city_id: &str) -> LocationHierarchy {
        let cities: Vec<City> = self
            .cities
            .iter()
            .filter(|c| c.id == city_id)
            .cloned()
            .collect();
        let zones: Vec<Zone> = self.zones_of(city_id).cloned().collect();
        let wards: Vec<Ward> = self
            .wards
            .iter()
            .filter(|w| zones.iter().any(|z| z.id == w.zone_id))
            .cloned()
            .collect();
        let locations: Vec<Location> = self
            .locations
            .iter()
            .filter(|l| wards.iter().any(|w| w.id == l.ward_id))
            .cloned()
            .collect();
        LocationHierarchy {
            cities,
            zones,
            wards,
            locations,
        }
    }

    pub fn city_name(&self, id: &str) -> Option<&str> {
        self.cities
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.as_str())
    }
}
