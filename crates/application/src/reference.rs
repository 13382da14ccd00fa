use domain::DomainError;
use domain::access::{EntryScope, can_manage_reference, entry_scope};
use domain::error::Result;
use domain::hierarchy::LocationHierarchy;
use domain::reference::{
    City, Location, ReferenceKind, ReferenceName, ReferenceRepository, Ward, Zone,
};
use domain::user::{Identity, Role};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Load the full reference tree.
pub async fn load_hierarchy(repo: &dyn ReferenceRepository) -> Result<LocationHierarchy> {
    let (cities, zones, wards, locations) = tokio::try_join!(
        repo.list_cities(),
        repo.list_zones(),
        repo.list_wards(),
        repo.list_locations(),
    )?;
    Ok(LocationHierarchy::new(cities, zones, wards, locations))
}

/// Maintenance of cities, zones, wards and locations.
///
/// Admins edit everything. Supervisors edit zones, wards and locations
/// inside their own city and cannot touch cities.
#[derive(Clone)]
pub struct ReferenceService {
    repo: Arc<dyn ReferenceRepository>,
}

impl ReferenceService {
    pub fn new(repo: Arc<dyn ReferenceRepository>) -> Self {
        Self { repo }
    }

    pub async fn hierarchy(&self) -> Result<LocationHierarchy> {
        load_hierarchy(self.repo.as_ref()).await
    }

    /// Reference tree as shown to `caller`: everything for admins, the
    /// caller's city subtree otherwise.
    pub async fn visible_to(&self, caller: &Identity) -> Result<LocationHierarchy> {
        Ok(match entry_scope(caller) {
            EntryScope::All => self.hierarchy().await?,
            EntryScope::City(city) => self.hierarchy().await?.scoped_to_city(&city),
            EntryScope::Nothing => LocationHierarchy::default(),
        })
    }

    pub async fn add_city(&self, caller: &Identity, name: &str) -> Result<City> {
        self.ensure_can_edit(caller, ReferenceKind::City, None)?;
        let city = City {
            id: Uuid::new_v4().to_string(),
            name: ReferenceName::new(name)?.into_inner(),
        };
        self.repo.insert_city(&city).await?;
        info!(id = %city.id, name = %city.name, by = %caller.id, "City added");
        Ok(city)
    }

    pub async fn add_zone(&self, caller: &Identity, name: &str, city_id: &str) -> Result<Zone> {
        let name = ReferenceName::new(name)?;
        let city = self
            .repo
            .find_city(city_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("City not found: {city_id}")))?;
        self.ensure_can_edit(caller, ReferenceKind::Zone, Some(&city.id))?;

        let zone = Zone {
            id: Uuid::new_v4().to_string(),
            name: name.into_inner(),
            city_id: city.id,
        };
        self.repo.insert_zone(&zone).await?;
        info!(id = %zone.id, name = %zone.name, by = %caller.id, "Zone added");
        Ok(zone)
    }

    pub async fn add_ward(&self, caller: &Identity, name: &str, zone_id: &str) -> Result<Ward> {
        let name = ReferenceName::new(name)?;
        let zone = self
            .repo
            .find_zone(zone_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Zone not found: {zone_id}")))?;
        self.ensure_can_edit(caller, ReferenceKind::Ward, Some(&zone.city_id))?;

        let ward = Ward {
            id: Uuid::new_v4().to_string(),
            name: name.into_inner(),
            zone_id: zone.id,
        };
        self.repo.insert_ward(&ward).await?;
        info!(id = %ward.id, name = %ward.name, by = %caller.id, "Ward added");
        Ok(ward)
    }

    pub async fn add_location(
        &self,
        caller: &Identity,
        name: &str,
        ward_id: &str,
    ) -> Result<Location> {
        let name = ReferenceName::new(name)?;
        let ward = self
            .repo
            .find_ward(ward_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Ward not found: {ward_id}")))?;
        let city_id = self
            .repo
            .find_zone(&ward.zone_id)
            .await?
            .map(|z| z.city_id);
        self.ensure_can_edit(caller, ReferenceKind::Location, city_id.as_deref())?;

        let location = Location {
            id: Uuid::new_v4().to_string(),
            name: name.into_inner(),
            ward_id: ward.id,
        };
        self.repo.insert_location(&location).await?;
        info!(id = %location.id, name = %location.name, by = %caller.id, "Location added");
        Ok(location)
    }

    /// Delete a record and everything beneath it.
    pub async fn delete(&self, caller: &Identity, kind: ReferenceKind, id: &str) -> Result<()> {
        let hierarchy = self.hierarchy().await?;
        let city_id = owning_city(&hierarchy, kind, id)
            .ok_or_else(|| DomainError::NotFound(format!("{} not found", kind.label())))?;
        self.ensure_can_edit(caller, kind, Some(&city_id))?;

        if !self.repo.delete(kind, id).await? {
            return Err(DomainError::NotFound(format!("{} not found", kind.label())));
        }
        info!(%kind, %id, by = %caller.id, "Reference record deleted");
        Ok(())
    }

    fn ensure_can_edit(
        &self,
        caller: &Identity,
        kind: ReferenceKind,
        city_id: Option<&str>,
    ) -> Result<()> {
        if !can_manage_reference(caller.role) {
            return Err(DomainError::Forbidden(
                "Forbidden: Not allowed to manage locations".to_string(),
            ));
        }
        if caller.role == Role::Supervisor {
            if kind == ReferenceKind::City {
                return Err(DomainError::Forbidden(
                    "Forbidden: Only administrators can manage cities".to_string(),
                ));
            }
            if city_id.is_none() || caller.city_id.as_deref() != city_id {
                return Err(DomainError::Forbidden(
                    "Forbidden: Supervisors can only manage their own city".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// City that a record of `kind` ultimately belongs to.
fn owning_city(hierarchy: &LocationHierarchy, kind: ReferenceKind, id: &str) -> Option<String> {
    let zone_city = |zone_id: &str| {
        hierarchy
            .zones
            .iter()
            .find(|z| z.id == zone_id)
            .map(|z| z.city_id.clone())
    };
    let ward_zone = |ward_id: &str| {
        hierarchy
            .wards
            .iter()
            .find(|w| w.id == ward_id)
            .map(|w| w.zone_id.clone())
    };

    match kind {
        ReferenceKind::City => hierarchy
            .cities
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.id.clone()),
        ReferenceKind::Zone => zone_city(id),
        ReferenceKind::Ward => ward_zone(id).and_then(|z| zone_city(&z)),
        ReferenceKind::Location => hierarchy
            .locations
            .iter()
            .find(|l| l.id == id)
            .and_then(|l| ward_zone(&l.ward_id))
            .and_then(|z| zone_city(&z)),
    }
}
