use super::entities::users;
use super::{db_error, to_offset};
use async_trait::async_trait;
use chrono::Utc;
use domain::DomainError;
use domain::user::{Role, UserProfile, UserRepository};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    SqlErr,
};

/// Profiles are stored with lowercased emails, which keeps lookups
/// case-insensitive on both SQLite and PostgreSQL.
pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_profile(model: users::Model) -> Result<UserProfile, DomainError> {
        let role: Role = model.role.parse().map_err(|_| {
            DomainError::Storage(format!(
                "Unknown role '{}' stored for user {}",
                model.role, model.id
            ))
        })?;

        Ok(UserProfile {
            id: model.id,
            email: model.email,
            full_name: model.full_name,
            role,
            city_id: model.city_id,
            temp_password: model.temp_password,
            created_at: model.created_at.with_timezone(&Utc),
        })
    }

    fn to_profiles(models: Vec<users::Model>) -> Result<Vec<UserProfile>, DomainError> {
        models.into_iter().map(Self::model_to_profile).collect()
    }
}

fn insert_error(e: DbErr) -> DomainError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            DomainError::Conflict("Email already exists".to_string())
        }
        _ => db_error(e),
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<UserProfile>, DomainError> {
        let model = users::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_error)?;
        model.map(Self::model_to_profile).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserProfile>, DomainError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email.trim().to_lowercase()))
            .one(&self.db)
            .await
            .map_err(db_error)?;
        model.map(Self::model_to_profile).transpose()
    }

    async fn list(&self) -> Result<Vec<UserProfile>, DomainError> {
        let models = users::Entity::find()
            .order_by_desc(users::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_error)?;
        Self::to_profiles(models)
    }

    async fn list_by_role(
        &self,
        role: Role,
        city_id: Option<String>,
    ) -> Result<Vec<UserProfile>, DomainError> {
        let mut query = users::Entity::find().filter(users::Column::Role.eq(role.as_str()));
        if let Some(city_id) = city_id {
            query = query.filter(users::Column::CityId.eq(city_id));
        }
        let models = query
            .order_by_asc(users::Column::FullName)
            .all(&self.db)
            .await
            .map_err(db_error)?;
        Self::to_profiles(models)
    }

    async fn insert(&self, profile: &UserProfile) -> Result<(), DomainError> {
        let active_model = users::ActiveModel {
            id: Set(profile.id.clone()),
            email: Set(profile.email.trim().to_lowercase()),
            full_name: Set(profile.full_name.clone()),
            role: Set(profile.role.as_str().to_string()),
            city_id: Set(profile.city_id.clone()),
            temp_password: Set(profile.temp_password.clone()),
            created_at: Set(to_offset(profile.created_at)),
        };

        users::Entity::insert(active_model)
            .exec_without_returning(&self.db)
            .await
            .map_err(insert_error)?;
        Ok(())
    }

    async fn set_temp_password(&self, id: &str, password: &str) -> Result<(), DomainError> {
        let result = users::Entity::update_many()
            .col_expr(users::Column::TempPassword, Expr::value(password))
            .filter(users::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_error)?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound("User not found".to_string()));
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        let result = users::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await
            .map_err(db_error)?;
        Ok(result.rows_affected > 0)
    }

    async fn emails_with_prefix(
        &self,
        prefix: &str,
        domain: &str,
    ) -> Result<Vec<String>, DomainError> {
        users::Entity::find()
            .select_only()
            .column(users::Column::Email)
            .filter(users::Column::Email.starts_with(prefix.to_lowercase()))
            .filter(users::Column::Email.ends_with(format!("@{}", domain.to_lowercase())))
            .into_tuple::<String>()
            .all(&self.db)
            .await
            .map_err(db_error)
    }
}
