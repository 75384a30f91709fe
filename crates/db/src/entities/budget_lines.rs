//! `SeaORM` Entity for budget_lines table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "budget_lines")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub label: String,
    pub nature: String,
    pub budget_type_id: Option<Uuid>,
    pub domain_id: Option<Uuid>,
    pub accounting_code: Option<String>,
    pub pole_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::yearly_budgets::Entity")]
    YearlyBudgets,
    #[sea_orm(has_many = "super::pole_allocations::Entity")]
    PoleAllocations,
}

impl Related<super::yearly_budgets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::YearlyBudgets.def()
    }
}

impl Related<super::pole_allocations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PoleAllocations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
