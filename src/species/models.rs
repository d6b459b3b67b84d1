use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Incubation requirements for one species, keyed by a short text id such as `chicken`
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "species")]
#[schema(as = Species)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub id: String,
    #[sea_orm(column_type = "Text")]
    pub name: String,
    pub incubation_days: i32,
    #[sea_orm(column_type = "Decimal(Some((6, 2)))")]
    pub temp_min: Decimal,
    #[sea_orm(column_type = "Decimal(Some((6, 2)))")]
    pub temp_max: Decimal,
    #[sea_orm(column_type = "Decimal(Some((6, 2)))")]
    pub humidity_min: Decimal,
    #[sea_orm(column_type = "Decimal(Some((6, 2)))")]
    pub humidity_max: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "crate::batches::models::Entity")]
    Batches,
}

impl Related<crate::batches::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Batches.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Body of `PUT /api/species/{id}`; the id comes from the path
#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct SpeciesUpsert {
    pub name: String,
    pub incubation_days: i32,
    pub temp_min: Decimal,
    pub temp_max: Decimal,
    pub humidity_min: Decimal,
    pub humidity_max: Decimal,
}

impl SpeciesUpsert {
    pub fn into_model(self, id: String) -> Model {
        Model {
            id,
            name: self.name,
            incubation_days: self.incubation_days,
            temp_min: self.temp_min,
            temp_max: self.temp_max,
            humidity_min: self.humidity_min,
            humidity_max: self.humidity_max,
        }
    }
}
