use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A numbered shelf of an incubator. `floor` is unique per incubator.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "trays")]
#[schema(as = Tray)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub incubator_id: Uuid,
    pub capacity: i32,
    pub floor: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::incubators::models::Entity",
        from = "Column::IncubatorId",
        to = "crate::incubators::models::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Incubators,
    #[sea_orm(has_many = "crate::batches::models::Entity")]
    Batches,
}

impl Related<crate::incubators::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Incubators.def()
    }
}

impl Related<crate::batches::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Batches.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct TrayCreate {
    pub incubator_id: Uuid,
    pub capacity: i32,
    pub floor: i32,
}

/// Body of `POST /api/incubators/{id}/trays`; the incubator comes from the path
#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct TrayCreateBody {
    pub capacity: i32,
    pub floor: i32,
}

impl TrayCreateBody {
    pub fn for_incubator(self, incubator_id: Uuid) -> TrayCreate {
        TrayCreate {
            incubator_id,
            capacity: self.capacity,
            floor: self.floor,
        }
    }
}

/// Partial update: absent fields keep their stored value
#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct TrayUpdate {
    #[serde(default)]
    pub capacity: Option<i32>,
    #[serde(default)]
    pub floor: Option<i32>,
}
