use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One product entry within an order, with its pricing/discount/VAT
/// breakdown.
///
/// The four monetary amounts are stored at import time and trusted as ground
/// truth; `total_amount` is the discounted amount plus VAT. The report layer
/// never recomputes them from price, rate, and quantity.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "order_lines")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub order_id: i32,
    pub product_id: i32,
    pub product_description: String,
    pub product_price: f64,
    pub product_vat_rate: f64,

    /// Discount applied to this line, 0 <= rate < 1.
    pub discount_rate: f64,

    pub quantity: i32,
    pub full_price_amount: f64,
    pub discounted_amount: f64,
    pub vat_amount: f64,
    pub total_amount: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OrderId",
        to = "super::order::Column::Id"
    )]
    Order,
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
