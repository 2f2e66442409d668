use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A customer order placed with one vendor on one calendar date.
///
/// Every order carries at least one order line; the store does not enforce
/// this invariant, the report layer treats a date whose orders have no lines
/// as having no data.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,

    /// Calendar date the order was placed (no time component).
    pub created_at: Date,

    pub vendor_id: i32,
    pub customer_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order_line::Entity")]
    OrderLine,
}

impl Related<super::order_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderLine.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
