use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    #[sea_orm(string_value = "incubating")]
    Incubating,
    #[sea_orm(string_value = "hatched")]
    Hatched,
    #[sea_orm(string_value = "failed")]
    Failed,
    #[sea_orm(string_value = "archived")]
    Archived,
}

/// A group of eggs of one species placed on a tray
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "batches")]
#[schema(as = Batch)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tray_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub species_id: String,
    pub eggs_qty: i32,
    pub start_at: NaiveDate,
    pub expected_hatch_at: NaiveDate,
    pub status: BatchStatus,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::trays::models::Entity",
        from = "Column::TrayId",
        to = "crate::trays::models::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Trays,
    #[sea_orm(
        belongs_to = "crate::species::models::Entity",
        from = "Column::SpeciesId",
        to = "crate::species::models::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Species,
}

impl Related<crate::trays::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trays.def()
    }
}

impl Related<crate::species::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Species.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct BatchCreate {
    pub tray_id: Uuid,
    pub species_id: String,
    pub eggs_qty: i32,
    pub start_at: NaiveDate,
    pub expected_hatch_at: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Body of `POST /api/trays/{id}/batches`; the tray comes from the path
#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct BatchCreateBody {
    pub species_id: String,
    pub eggs_qty: i32,
    pub start_at: NaiveDate,
    pub expected_hatch_at: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
}

impl BatchCreateBody {
    pub fn for_tray(self, tray_id: Uuid) -> BatchCreate {
        BatchCreate {
            tray_id,
            species_id: self.species_id,
            eggs_qty: self.eggs_qty,
            start_at: self.start_at,
            expected_hatch_at: self.expected_hatch_at,
            notes: self.notes,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, ToSchema)]
pub struct BatchStatusUpdate {
    pub status: BatchStatus,
}
