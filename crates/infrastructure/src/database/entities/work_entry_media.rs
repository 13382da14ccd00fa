use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "work_entry_media")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub work_entry_id: String,
    pub media_type: String,
    #[sea_orm(column_type = "Text")]
    pub url: String,
    pub display_order: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::work_entries::Entity",
        from = "Column::WorkEntryId",
        to = "super::work_entries::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    WorkEntry,
}

impl Related<super::work_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkEntry.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
