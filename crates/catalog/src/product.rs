use serde::{Deserialize, Serialize};

use mostrador_core::{Entity, ProductId, SupplierId, UnitId};

/// Persisted kind of a catalog product.
///
/// Mirrors the classification a product was created under; recipe editors
/// only offer `Ingredient` products as components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    Ingredient,
    Beverage,
    FinalGood,
}

/// Slim product view the authoring forms read: enough to look up stock,
/// supplier and unit without carrying the full product record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    pub kind: ProductKind,
    pub stock: f64,
    pub supplier_id: Option<SupplierId>,
    pub unit_id: Option<UnitId>,
    pub cost: f64,
}

impl ProductSummary {
    /// Whether this product can appear as a recipe component.
    pub fn is_ingredient(&self) -> bool {
        self.kind == ProductKind::Ingredient
    }
}

impl Entity for ProductSummary {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Reorder urgency of a product given its stock and minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    Low,
    Medium,
    Normal,
}

/// Classify stock against the minimum: at or below the minimum is low,
/// within 1.5x the minimum is medium, anything above is normal.
pub fn stock_status(stock: f64, min_stock: f64) -> StockStatus {
    if stock <= min_stock {
        StockStatus::Low
    } else if stock <= min_stock * 1.5 {
        StockStatus::Medium
    } else {
        StockStatus::Normal
    }
}
