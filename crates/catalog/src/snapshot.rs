use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mostrador_core::{CategoryId, ProductId};

use crate::category::{classify, Category, CategoryClass};
use crate::product::ProductSummary;
use crate::unit::UnitCatalog;

/// Read-only catalog bundle injected into one authoring session.
///
/// Built by the API collaborator when a form opens and never mutated
/// afterwards; staleness windows and cache invalidation are that
/// collaborator's problem, not the form's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    categories: Vec<Category>,
    units: UnitCatalog,
    products: Vec<ProductSummary>,
    fetched_at: DateTime<Utc>,
}

impl CatalogSnapshot {
    pub fn new(
        categories: Vec<Category>,
        units: UnitCatalog,
        products: Vec<ProductSummary>,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        Self {
            categories,
            units,
            products,
            fetched_at,
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn units(&self) -> &UnitCatalog {
        &self.units
    }

    pub fn products(&self) -> &[ProductSummary] {
        &self.products
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn product(&self, id: ProductId) -> Option<&ProductSummary> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Products usable as recipe components.
    pub fn ingredient_options(&self) -> impl Iterator<Item = &ProductSummary> {
        self.products.iter().filter(|p| p.is_ingredient())
    }

    /// Stock level per ingredient product, for feasibility math.
    pub fn ingredient_stocks(&self) -> HashMap<ProductId, f64> {
        self.ingredient_options()
            .map(|p| (p.id, p.stock))
            .collect()
    }

    /// Classify the category behind `id`.
    ///
    /// Returns `None` while no category is chosen (`id` 0). An id the
    /// snapshot does not know classifies by the empty name, i.e. as
    /// `FinalGood`, keeping classification total for any chosen id.
    pub fn classify_category(&self, id: CategoryId) -> Option<CategoryClass> {
        if !id.is_set() {
            return None;
        }
        let name = self.category(id).map(|c| c.display_name.as_str()).unwrap_or("");
        Some(classify(name))
    }
}
