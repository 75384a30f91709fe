//! `SeaORM` Entity for forecast_expenses table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "forecast_expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub forecast_line_id: Uuid,
    pub label: String,
    pub description: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub amount: Decimal,
    pub year: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::forecast_budget_lines::Entity",
        from = "Column::ForecastLineId",
        to = "super::forecast_budget_lines::Column::Id",
        on_delete = "Cascade"
    )]
    ForecastBudgetLines,
}

impl Related<super::forecast_budget_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ForecastBudgetLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
