use serde::{Deserialize, Serialize};

use mostrador_core::{CategoryId, Entity};

/// Catalog category as loaded from the backing store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub display_name: String,
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Semantic class of a category, driving which form fields apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryClass {
    /// Raw input tracked by weight and consumed by recipes.
    Ingredient,
    /// Bottled/canned goods sold as-is.
    Beverage,
    /// Anything produced from a recipe and sold by the unit.
    FinalGood,
}

/// Display-name aliases folded to their canonical form before matching.
///
/// Catalogs synced from differently-localized stores can carry English
/// names for the same categories.
const CATEGORY_ALIASES: &[(&str, &str)] = &[
    ("drinks", "bebidas"),
    ("beverages", "bebidas"),
    ("ingredients", "ingredientes"),
    ("ingredient", "ingredientes"),
    ("other prepared foods", "otros alimentos preparados"),
    ("other foods", "otros alimentos preparados"),
];

/// Fold a raw category display name to its canonical, lowercased form.
pub fn normalize_category_name(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    for (alias, canonical) in CATEGORY_ALIASES {
        if lowered == *alias {
            return (*canonical).to_string();
        }
    }
    lowered
}

/// Classify a category by its display name.
///
/// Total: every input maps to one of the three classes, with `FinalGood` as
/// the default when no keyword matches. Matching is case-insensitive and
/// substring-based, so "Ingredientes secos" and "Insumos" both classify as
/// `Ingredient`.
pub fn classify(category_name: &str) -> CategoryClass {
    let normalized = normalize_category_name(category_name);
    if normalized.contains("ingred") || normalized.contains("insum") {
        CategoryClass::Ingredient
    } else if normalized.contains("bebida") {
        CategoryClass::Beverage
    } else {
        CategoryClass::FinalGood
    }
}
