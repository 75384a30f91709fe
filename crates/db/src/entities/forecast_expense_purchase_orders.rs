//! `SeaORM` Entity for forecast_expense_purchase_orders link table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "forecast_expense_purchase_orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub expense_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub purchase_order_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::forecast_expenses::Entity",
        from = "Column::ExpenseId",
        to = "super::forecast_expenses::Column::Id",
        on_delete = "Cascade"
    )]
    ForecastExpenses,
}

impl Related<super::forecast_expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ForecastExpenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
