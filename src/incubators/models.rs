use crate::trays::models as trays;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "incubators")]
#[schema(as = Incubator)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    #[sea_orm(column_name = "model", column_type = "Text", nullable)]
    #[serde(rename = "model")]
    pub model_name: Option<String>,
    pub trays_amt: Option<i32>,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "crate::trays::models::Entity")]
    Trays,
}

impl Related<trays::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trays.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Body of `POST /api/incubators`. The owner is the authenticated caller.
#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct IncubatorCreate {
    #[serde(default)]
    pub model: Option<String>,
    /// Number of trays created together with the incubator, at least 1
    pub trays_amt: i32,
    pub capacity_per_tray: i32,
    /// Defaults to 0
    #[serde(default)]
    pub position: Option<i32>,
    /// First floor number, 0 or 1 (default 1)
    #[serde(default)]
    pub floor_base: Option<i32>,
}

/// Partial update. `model: null` clears the model, an absent field keeps it.
#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct IncubatorUpdate {
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub model: Option<Option<String>>,
    #[serde(default)]
    pub position: Option<i32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct IncubatorWithTrays {
    #[serde(flatten)]
    pub incubator: Model,
    pub trays: Vec<trays::Model>,
}
