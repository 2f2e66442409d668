use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Catalog product. Reference data only: populated by the importer and
/// referenced from order lines, never read by the report aggregator.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub description: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order_line::Entity")]
    OrderLine,
    #[sea_orm(has_many = "super::product_promotion::Entity")]
    ProductPromotion,
}

impl Related<super::order_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderLine.def()
    }
}

impl Related<super::product_promotion::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductPromotion.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
