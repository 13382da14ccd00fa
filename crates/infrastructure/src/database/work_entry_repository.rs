use super::entities::{work_entries, work_entry_media};
use super::{db_error, to_offset};
use async_trait::async_trait;
use chrono::Utc;
use domain::DomainError;
use domain::entry::{MediaType, WorkEntry, WorkEntryMedia, WorkEntryRepository};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

pub struct SeaOrmWorkEntryRepository {
    db: DatabaseConnection,
}

impl SeaOrmWorkEntryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_entry(m: work_entries::Model) -> WorkEntry {
        WorkEntry {
            id: m.id,
            city_id: m.city_id,
            zone_id: m.zone_id,
            ward_id: m.ward_id,
            location_id: m.location_id,
            work_date: m.work_date,
            supervisor_id: m.supervisor_id,
            engineer_id: m.engineer_id,
            shmr: m.shmr,
            chmr: m.chmr,
            hours: m.hours,
            landmark: m.landmark,
            remarks: m.remarks,
            created_by: m.created_by,
            created_at: m.created_at.with_timezone(&Utc),
        }
    }

    fn model_to_media(m: work_entry_media::Model) -> Result<WorkEntryMedia, DomainError> {
        let media_type = MediaType::parse(&m.media_type).ok_or_else(|| {
            DomainError::Storage(format!("Unknown media type '{}' on {}", m.media_type, m.id))
        })?;
        Ok(WorkEntryMedia {
            id: m.id,
            work_entry_id: m.work_entry_id,
            media_type,
            url: m.url,
            display_order: m.display_order,
        })
    }
}

#[async_trait]
impl WorkEntryRepository for SeaOrmWorkEntryRepository {
    async fn insert(&self, entry: &WorkEntry) -> Result<(), DomainError> {
        let active_model = work_entries::ActiveModel {
            id: Set(entry.id.clone()),
            city_id: Set(entry.city_id.clone()),
            zone_id: Set(entry.zone_id.clone()),
            ward_id: Set(entry.ward_id.clone()),
            location_id: Set(entry.location_id.clone()),
            work_date: Set(entry.work_date),
            supervisor_id: Set(entry.supervisor_id.clone()),
            engineer_id: Set(entry.engineer_id.clone()),
            shmr: Set(entry.shmr),
            chmr: Set(entry.chmr),
            hours: Set(entry.hours),
            landmark: Set(entry.landmark.clone()),
            remarks: Set(entry.remarks.clone()),
            created_by: Set(entry.created_by.clone()),
            created_at: Set(to_offset(entry.created_at)),
        };

        work_entries::Entity::insert(active_model)
            .exec_without_returning(&self.db)
            .await
            .map_err(db_error)?;
        Ok(())
    }

    async fn insert_media(&self, media: &[WorkEntryMedia]) -> Result<(), DomainError> {
        if media.is_empty() {
            return Ok(());
        }

        let parent_ids: Vec<String> = media.iter().map(|m| m.work_entry_id.clone()).collect();
        let parents = work_entries::Entity::find()
            .filter(work_entries::Column::Id.is_in(parent_ids.clone()))
            .all(&self.db)
            .await
            .map_err(db_error)?;
        if let Some(orphan) = parent_ids
            .iter()
            .find(|id| !parents.iter().any(|p| &p.id == *id))
        {
            return Err(DomainError::NotFound(format!("Work entry not found: {}", orphan)));
        }

        let rows = media.iter().map(|m| work_entry_media::ActiveModel {
            id: Set(m.id.clone()),
            work_entry_id: Set(m.work_entry_id.clone()),
            media_type: Set(m.media_type.as_str().to_string()),
            url: Set(m.url.clone()),
            display_order: Set(m.display_order),
        });

        work_entry_media::Entity::insert_many(rows)
            .exec_without_returning(&self.db)
            .await
            .map_err(db_error)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<WorkEntry>, DomainError> {
        let model = work_entries::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_error)?;
        Ok(model.map(Self::model_to_entry))
    }

    async fn list(&self, city_id: Option<String>) -> Result<Vec<WorkEntry>, DomainError> {
        let mut query = work_entries::Entity::find();
        if let Some(city_id) = city_id {
            query = query.filter(work_entries::Column::CityId.eq(city_id));
        }
        let models = query
            .order_by_desc(work_entries::Column::WorkDate)
            .order_by_desc(work_entries::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_error)?;
        Ok(models.into_iter().map(Self::model_to_entry).collect())
    }

    async fn media_for(&self, entry_id: &str) -> Result<Vec<WorkEntryMedia>, DomainError> {
        let models = work_entry_media::Entity::find()
            .filter(work_entry_media::Column::WorkEntryId.eq(entry_id))
            .order_by_asc(work_entry_media::Column::DisplayOrder)
            .all(&self.db)
            .await
            .map_err(db_error)?;
        models.into_iter().map(Self::model_to_media).collect()
    }

    async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        let txn = self.db.begin().await.map_err(db_error)?;

        work_entry_media::Entity::delete_many()
            .filter(work_entry_media::Column::WorkEntryId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_error)?;
        let result = work_entries::Entity::delete_by_id(id.to_string())
            .exec(&txn)
            .await
            .map_err(db_error)?;

        txn.commit().await.map_err(db_error)?;
        Ok(result.rows_affected > 0)
    }
}
