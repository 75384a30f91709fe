//! `SeaORM` Entity for yearly_budgets table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "yearly_budgets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub budget_line_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub year: i32,
    pub tenant_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub amount: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::budget_lines::Entity",
        from = "Column::BudgetLineId",
        to = "super::budget_lines::Column::Id",
        on_delete = "Cascade"
    )]
    BudgetLines,
}

impl Related<super::budget_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BudgetLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
