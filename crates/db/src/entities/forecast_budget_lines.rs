//! `SeaORM` Entity for forecast_budget_lines table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "forecast_budget_lines")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub label: String,
    pub nature: String,
    pub budget_type_id: Option<Uuid>,
    pub domain_id: Option<Uuid>,
    pub year: i32,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub budget: Decimal,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::forecast_expenses::Entity")]
    ForecastExpenses,
}

impl Related<super::forecast_expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ForecastExpenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
