//! Submission payload for a new product.
//!
//! The wire shape depends on the resolved classification: ingredients carry
//! their chosen mass unit and safety stock, beverages a forced-zero minimum,
//! final goods a zero opening stock plus the recipe. Absent optionals are
//! omitted from the serialized form.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use mostrador_catalog::ProductKind;
use mostrador_core::{CategoryId, ProductId, UnitId};

use crate::draft::{parse_number, ProductDraft};
use crate::form::{FormState, ProductForm};
use crate::pricing;

/// One submitted recipe component, quantities parsed at build time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeLinePayload {
    pub ingredient: ProductId,
    pub required_quantity: f64,
}

/// Normalized product-creation payload handed to the API collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProductPayload {
    pub code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub category: CategoryId,
    pub kind: ProductKind,
    pub active: bool,
    pub price: f64,
    pub cost: f64,
    pub tax: f64,
    pub base_discount: f64,
    pub pack_size: f64,
    pub wastage_percent: f64,
    pub yield_factor: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<UnitId>,
    pub stock: f64,
    pub min_stock: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety_stock: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<RecipeLinePayload>>,
}

impl NewProductPayload {
    /// Assemble the payload from a validated form.
    pub(crate) fn from_form(form: &ProductForm) -> Self {
        let draft = form.draft();
        let state = form.state();
        let units = form.catalog().units();

        let (kind, unit, stock, min_stock, safety_stock, ingredients) = match state {
            FormState::Ingredient => {
                let min = parse_number(&draft.min_stock).unwrap_or(0.0);
                (
                    ProductKind::Ingredient,
                    draft.unit_id,
                    parse_number(&draft.stock).unwrap_or(0.0),
                    min,
                    Some(min),
                    None,
                )
            }
            FormState::Beverage => (
                ProductKind::Beverage,
                units.count_unit(),
                parse_number(&draft.stock).unwrap_or(0.0),
                // Beverages are reordered by eye, not by threshold.
                0.0,
                None,
                None,
            ),
            // Unclassified drafts never validate, so treat the remainder as
            // the recipe-based final good it must be.
            _ => (
                ProductKind::FinalGood,
                units.count_unit(),
                0.0,
                parse_number(&draft.min_stock).unwrap_or(0.0),
                None,
                Some(recipe_payload(draft)),
            ),
        };

        Self {
            code: draft.code.trim().to_string(),
            name: draft.name.trim().to_string(),
            description: build_description(draft, state),
            category: draft.category_id,
            kind,
            active: draft.active,
            price: pricing::effective_price(draft, state),
            cost: pricing::effective_cost(draft, state),
            tax: parse_number(&draft.tax).unwrap_or(0.0),
            base_discount: parse_number(&draft.base_discount).unwrap_or(0.0),
            pack_size: parse_number(&draft.pack_size).filter(|v| *v >= 1.0).unwrap_or(1.0),
            wastage_percent: parse_number(&draft.wastage_percent).unwrap_or(0.0),
            yield_factor: parse_number(&draft.yield_factor)
                .filter(|v| *v > 0.0)
                .unwrap_or(1.0),
            unit,
            stock,
            min_stock,
            safety_stock,
            supplier: non_empty(&draft.supplier),
            image_url: non_empty(&draft.image_url),
            expiry_date: draft.expiry_date,
            ingredients,
        }
    }
}

fn recipe_payload(draft: &ProductDraft) -> Vec<RecipeLinePayload> {
    draft
        .recipe
        .iter()
        .map(|line| RecipeLinePayload {
            ingredient: line.ingredient,
            required_quantity: parse_number(&line.quantity).unwrap_or(0.0),
        })
        .collect()
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Compose the submitted description from the notes plus the detail fields
/// relevant to the classification, joined with `" | "`.
pub fn build_description(draft: &ProductDraft, state: FormState) -> String {
    let mut parts: Vec<String> = Vec::new();
    if let Some(notes) = non_empty(&draft.notes) {
        parts.push(notes);
    }
    match state {
        FormState::Ingredient => {
            if let Some(batch) = non_empty(&draft.batch_code) {
                parts.push(format!("Batch: {batch}"));
            }
            parts.push(format!(
                "Auto-deduct in production: {}",
                if draft.auto_deduct { "yes" } else { "no" }
            ));
        }
        FormState::Unclassified => {}
        _ => {
            if let Some(sale_unit) = non_empty(&draft.sale_unit) {
                parts.push(format!("Sale unit: {sale_unit}"));
            }
        }
    }
    parts.join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::tests::{snapshot, BEVERAGES, EMPANADAS, FLOUR, INGREDIENTS, KG, EACH};
    use crate::form::ProductForm;

    fn open_with(category: mostrador_core::CategoryId) -> ProductForm {
        let mut form = ProductForm::open(snapshot());
        form.select_category(category);
        form.settle();
        form.draft_mut().code = "SKU-001".to_string();
        form.draft_mut().name = "Producto".to_string();
        form
    }

    #[test]
    fn ingredient_payload_carries_unit_and_safety_stock() {
        let mut form = open_with(INGREDIENTS);
        form.draft_mut().stock = "20".to_string();
        form.draft_mut().min_stock = "5".to_string();
        form.draft_mut().cost = "1.5".to_string();
        form.draft_mut().supplier = "Molinos Sur".to_string();

        let payload = form.build_payload().unwrap();
        assert_eq!(payload.kind, mostrador_catalog::ProductKind::Ingredient);
        assert_eq!(payload.unit, Some(KG));
        assert_eq!(payload.stock, 20.0);
        assert_eq!(payload.min_stock, 5.0);
        assert_eq!(payload.safety_stock, Some(5.0));
        assert_eq!(payload.supplier.as_deref(), Some("Molinos Sur"));
        // Ingredients are priced at cost.
        assert_eq!(payload.price, 1.5);
        assert_eq!(payload.ingredients, None);
    }

    #[test]
    fn beverage_payload_forces_zero_minimum_stock() {
        let mut form = open_with(BEVERAGES);
        form.draft_mut().stock = "24".to_string();
        form.draft_mut().min_stock = "7".to_string();

        let payload = form.build_payload().unwrap();
        assert_eq!(payload.kind, mostrador_catalog::ProductKind::Beverage);
        assert_eq!(payload.unit, Some(EACH));
        assert_eq!(payload.stock, 24.0);
        assert_eq!(payload.min_stock, 0.0);
        assert_eq!(payload.safety_stock, None);
    }

    #[test]
    fn final_good_payload_starts_at_zero_stock_with_its_recipe() {
        let mut form = open_with(EMPANADAS);
        form.draft_mut().min_stock = "10".to_string();
        form.draft_mut().stock = "99".to_string();
        form.stage_ingredient(Some(FLOUR));
        form.stage_quantity("0.25");
        form.commit_staged_line();

        let payload = form.build_payload().unwrap();
        assert_eq!(payload.kind, mostrador_catalog::ProductKind::FinalGood);
        assert_eq!(payload.stock, 0.0);
        assert_eq!(payload.min_stock, 10.0);
        let lines = payload.ingredients.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].ingredient, FLOUR);
        assert_eq!(lines[0].required_quantity, 0.25);
    }

    #[test]
    fn absent_optionals_are_omitted_from_the_wire_form() {
        let mut form = open_with(BEVERAGES);
        form.draft_mut().stock = "24".to_string();

        let value = serde_json::to_value(form.build_payload().unwrap()).unwrap();
        let map = value.as_object().unwrap();
        assert!(!map.contains_key("supplier"));
        assert!(!map.contains_key("image_url"));
        assert!(!map.contains_key("expiry_date"));
        assert!(!map.contains_key("ingredients"));
        assert!(!map.contains_key("safety_stock"));
        assert_eq!(map["kind"], "beverage");
        assert_eq!(map["min_stock"], 0.0);
    }

    #[test]
    fn description_composes_notes_and_class_details() {
        let mut draft = ProductDraft::new();
        draft.notes = "Keep refrigerated".to_string();
        draft.batch_code = "L-42".to_string();
        assert_eq!(
            build_description(&draft, FormState::Ingredient),
            "Keep refrigerated | Batch: L-42 | Auto-deduct in production: yes"
        );

        draft.auto_deduct = false;
        draft.notes = String::new();
        assert_eq!(
            build_description(&draft, FormState::Ingredient),
            "Batch: L-42 | Auto-deduct in production: no"
        );

        let mut beverage = ProductDraft::new();
        beverage.sale_unit = "Botella".to_string();
        assert_eq!(
            build_description(&beverage, FormState::Beverage),
            "Sale unit: Botella"
        );
        assert_eq!(build_description(&ProductDraft::new(), FormState::Unclassified), "");
    }

    #[test]
    fn rejection_produces_no_payload() {
        let form = ProductForm::open(snapshot());
        assert!(form.build_payload().is_err());
    }
}
