use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A vendor's commission rate on one calendar date.
///
/// Commission owed for an order is the rate whose (vendor_id, date) matches
/// the order's (vendor_id, created_at) exactly, times the order's line
/// totals. There is no "most recent rate as of" fallback; an order whose
/// vendor has no row dated on the order date earns no commission row at all.
/// The match is a compound-key lookup resolved in the query layer, not a
/// foreign-key relation.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vendor_commissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub vendor_id: i32,
    pub date: Date,
    pub rate: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
