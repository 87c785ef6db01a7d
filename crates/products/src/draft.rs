use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use mostrador_core::{CategoryId, ProductId, UnitId, ValueObject};

/// Parse a numeric field exactly as the form holds it: raw text.
///
/// Returns `None` for blank or non-numeric input; callers decide the
/// fallback. Infinite values are rejected so downstream ratios stay finite.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// One committed recipe component: an ingredient and the quantity one base
/// batch consumes, kept as entered and parsed at computation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeLine {
    pub ingredient: ProductId,
    pub quantity: String,
}

impl ValueObject for RecipeLine {}

/// The single-line recipe editor: what the user is typing before committing
/// it to the recipe list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeLineEditor {
    pub ingredient: Option<ProductId>,
    pub quantity: String,
}

impl RecipeLineEditor {
    /// A line can be committed once both halves are filled in.
    pub fn is_complete(&self) -> bool {
        self.ingredient.is_some() && !self.quantity.trim().is_empty()
    }
}

/// Mutable record being authored in the product-creation form.
///
/// Numeric fields hold the raw text the user typed; parsing happens at
/// validation/computation time, never per keystroke. Classification-dependent
/// fields (`unit_id`, `stock`, `min_stock`, `recipe`) are reset by the form
/// whenever the category changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    // Identity.
    pub code: String,
    pub name: String,
    pub notes: String,
    pub category_id: CategoryId,
    pub active: bool,

    // Classification-dependent.
    pub unit_id: Option<UnitId>,
    pub stock: String,
    pub min_stock: String,
    pub recipe: Vec<RecipeLine>,
    pub line_editor: RecipeLineEditor,

    // Classification-independent.
    pub price: String,
    pub cost: String,
    pub production_cost: String,
    pub tax: String,
    pub base_discount: String,
    pub pack_size: String,
    pub safety_stock: String,
    pub reorder_level: String,
    pub standard_cost: String,
    pub average_cost: String,
    pub wastage_percent: String,
    pub yield_factor: String,
    pub sale_unit: String,
    pub supplier: String,
    pub batch_code: String,
    pub image_url: String,
    pub expiry_date: Option<NaiveDate>,
    pub auto_deduct: bool,
}

impl ProductDraft {
    /// Fresh draft with the defaults the authoring surface opens with.
    pub fn new() -> Self {
        Self {
            code: String::new(),
            name: String::new(),
            notes: String::new(),
            category_id: CategoryId::UNSET,
            active: true,
            unit_id: None,
            stock: String::new(),
            min_stock: String::new(),
            recipe: Vec::new(),
            line_editor: RecipeLineEditor::default(),
            price: String::new(),
            cost: String::new(),
            production_cost: String::new(),
            tax: String::new(),
            base_discount: String::new(),
            pack_size: "1".to_string(),
            safety_stock: String::new(),
            reorder_level: String::new(),
            standard_cost: String::new(),
            average_cost: String::new(),
            wastage_percent: "0".to_string(),
            yield_factor: "1".to_string(),
            sale_unit: String::new(),
            supplier: String::new(),
            batch_code: String::new(),
            image_url: String::new(),
            expiry_date: None,
            auto_deduct: true,
        }
    }
}

impl Default for ProductDraft {
    fn default() -> Self {
        Self::new()
    }
}
