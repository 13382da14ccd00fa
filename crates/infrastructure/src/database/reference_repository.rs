use super::db_error;
use super::entities::{cities, locations, wards, zones};
use async_trait::async_trait;
use chrono::Utc;
use domain::DomainError;
use domain::reference::{City, Location, ReferenceKind, ReferenceRepository, Ward, Zone};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

pub struct SeaOrmReferenceRepository {
    db: DatabaseConnection,
}

impl SeaOrmReferenceRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn zone_ids_of(
        txn: &DatabaseTransaction,
        city_ids: Vec<String>,
    ) -> Result<Vec<String>, DomainError> {
        zones::Entity::find()
            .select_only()
            .column(zones::Column::Id)
            .filter(zones::Column::CityId.is_in(city_ids))
            .into_tuple()
            .all(txn)
            .await
            .map_err(db_error)
    }

    async fn ward_ids_of(
        txn: &DatabaseTransaction,
        zone_ids: Vec<String>,
    ) -> Result<Vec<String>, DomainError> {
        wards::Entity::find()
            .select_only()
            .column(wards::Column::Id)
            .filter(wards::Column::ZoneId.is_in(zone_ids))
            .into_tuple()
            .all(txn)
            .await
            .map_err(db_error)
    }
}

#[async_trait]
impl ReferenceRepository for SeaOrmReferenceRepository {
    async fn list_cities(&self) -> Result<Vec<City>, DomainError> {
        let models = cities::Entity::find()
            .order_by_asc(cities::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_error)?;
        Ok(models
            .into_iter()
            .map(|m| City {
                id: m.id,
                name: m.name,
            })
            .collect())
    }

    async fn list_zones(&self) -> Result<Vec<Zone>, DomainError> {
        let models = zones::Entity::find()
            .order_by_asc(zones::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_error)?;
        Ok(models.into_iter().map(zone_from_model).collect())
    }

    async fn list_wards(&self) -> Result<Vec<Ward>, DomainError> {
        let models = wards::Entity::find()
            .order_by_asc(wards::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_error)?;
        Ok(models.into_iter().map(ward_from_model).collect())
    }

    async fn list_locations(&self) -> Result<Vec<Location>, DomainError> {
        let models = locations::Entity::find()
            .order_by_asc(locations::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_error)?;
        Ok(models.into_iter().map(location_from_model).collect())
    }

    async fn find_city(&self, id: &str) -> Result<Option<City>, DomainError> {
        let model = cities::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_error)?;
        Ok(model.map(|m| City {
            id: m.id,
            name: m.name,
        }))
    }

    async fn find_zone(&self, id: &str) -> Result<Option<Zone>, DomainError> {
        let model = zones::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_error)?;
        Ok(model.map(zone_from_model))
    }

    async fn find_ward(&self, id: &str) -> Result<Option<Ward>, DomainError> {
        let model = wards::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_error)?;
        Ok(model.map(ward_from_model))
    }

    async fn find_location(&self, id: &str) -> Result<Option<Location>, DomainError> {
        let model = locations::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_error)?;
        Ok(model.map(location_from_model))
    }

    async fn insert_city(&self, city: &City) -> Result<(), DomainError> {
        let active_model = cities::ActiveModel {
            id: Set(city.id.clone()),
            name: Set(city.name.clone()),
            created_at: Set(super::to_offset(Utc::now())),
        };
        cities::Entity::insert(active_model)
            .exec_without_returning(&self.db)
            .await
            .map_err(db_error)?;
        Ok(())
    }

    async fn insert_zone(&self, zone: &Zone) -> Result<(), DomainError> {
        let active_model = zones::ActiveModel {
            id: Set(zone.id.clone()),
            name: Set(zone.name.clone()),
            city_id: Set(zone.city_id.clone()),
            created_at: Set(super::to_offset(Utc::now())),
        };
        zones::Entity::insert(active_model)
            .exec_without_returning(&self.db)
            .await
            .map_err(db_error)?;
        Ok(())
    }

    async fn insert_ward(&self, ward: &Ward) -> Result<(), DomainError> {
        let active_model = wards::ActiveModel {
            id: Set(ward.id.clone()),
            name: Set(ward.name.clone()),
            zone_id: Set(ward.zone_id.clone()),
            created_at: Set(super::to_offset(Utc::now())),
        };
        wards::Entity::insert(active_model)
            .exec_without_returning(&self.db)
            .await
            .map_err(db_error)?;
        Ok(())
    }

    async fn insert_location(&self, location: &Location) -> Result<(), DomainError> {
        let active_model = locations::ActiveModel {
            id: Set(location.id.clone()),
            name: Set(location.name.clone()),
            ward_id: Set(location.ward_id.clone()),
            created_at: Set(super::to_offset(Utc::now())),
        };
        locations::Entity::insert(active_model)
            .exec_without_returning(&self.db)
            .await
            .map_err(db_error)?;
        Ok(())
    }

    // SQLite does not enforce foreign keys by default, so descendants are
    // removed explicitly, children first.
    async fn delete(&self, kind: ReferenceKind, id: &str) -> Result<bool, DomainError> {
        let txn = self.db.begin().await.map_err(db_error)?;
        let target = vec![id.to_string()];

        let (mut city_ids, mut zone_ids, mut ward_ids, mut location_ids) =
            (Vec::new(), Vec::new(), Vec::new(), Vec::new());
        match kind {
            ReferenceKind::City => {
                zone_ids = Self::zone_ids_of(&txn, target.clone()).await?;
                ward_ids = Self::ward_ids_of(&txn, zone_ids.clone()).await?;
                city_ids = target;
            }
            ReferenceKind::Zone => {
                ward_ids = Self::ward_ids_of(&txn, target.clone()).await?;
                zone_ids = target;
            }
            ReferenceKind::Ward => ward_ids = target,
            ReferenceKind::Location => location_ids = target,
        }

        let locations_removed = locations::Entity::delete_many()
            .filter(
                locations::Column::WardId
                    .is_in(ward_ids.clone())
                    .or(locations::Column::Id.is_in(location_ids)),
            )
            .exec(&txn)
            .await
            .map_err(db_error)?
            .rows_affected;
        let wards_removed = wards::Entity::delete_many()
            .filter(wards::Column::Id.is_in(ward_ids))
            .exec(&txn)
            .await
            .map_err(db_error)?
            .rows_affected;
        let zones_removed = zones::Entity::delete_many()
            .filter(zones::Column::Id.is_in(zone_ids))
            .exec(&txn)
            .await
            .map_err(db_error)?
            .rows_affected;
        let cities_removed = cities::Entity::delete_many()
            .filter(cities::Column::Id.is_in(city_ids))
            .exec(&txn)
            .await
            .map_err(db_error)?
            .rows_affected;

        txn.commit().await.map_err(db_error)?;

        let removed = match kind {
            ReferenceKind::City => cities_removed,
            ReferenceKind::Zone => zones_removed,
            ReferenceKind::Ward => wards_removed,
            ReferenceKind::Location => locations_removed,
        };
        Ok(removed > 0)
    }
}

fn zone_from_model(m: zones::Model) -> Zone {
    Zone {
        id: m.id,
        name: m.name,
        city_id: m.city_id,
    }
}

fn ward_from_model(m: wards::Model) -> Ward {
    Ward {
        id: m.id,
        name: m.name,
        zone_id: m.zone_id,
    }
}

fn location_from_model(m: locations::Model) -> Location {
    Location {
        id: m.id,
        name: m.name,
        ward_id: m.ward_id,
    }
}
