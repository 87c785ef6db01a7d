//! The product form: classification-driven field visibility and resets.

use serde::{Deserialize, Serialize};

use mostrador_catalog::{CatalogSnapshot, CategoryClass};
use mostrador_core::{CategoryId, DomainError, DomainResult, FormSessionId, ProductId};

use crate::draft::{parse_number, ProductDraft, RecipeLine, RecipeLineEditor};
use crate::feasibility::producible_units;
use crate::payload::NewProductPayload;
use crate::pricing;

/// Classification state the form is in, derived from the chosen category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormState {
    /// No category chosen yet (category id 0); submission is rejected.
    Unclassified,
    Ingredient,
    Beverage,
    FinalGood,
}

impl FormState {
    fn from_class(class: Option<CategoryClass>) -> Self {
        match class {
            None => FormState::Unclassified,
            Some(CategoryClass::Ingredient) => FormState::Ingredient,
            Some(CategoryClass::Beverage) => FormState::Beverage,
            Some(CategoryClass::FinalGood) => FormState::FinalGood,
        }
    }
}

/// Form fields the UI can mark as required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Code,
    Name,
    Category,
    Unit,
    Stock,
    MinStock,
}

/// Numeric draft fields checked by the blanket no-negatives rule.
const NON_NEGATIVE_FIELDS: [fn(&ProductDraft) -> &str; 9] = [
    |d| &d.price,
    |d| &d.cost,
    |d| &d.stock,
    |d| &d.min_stock,
    |d| &d.safety_stock,
    |d| &d.reorder_level,
    |d| &d.wastage_percent,
    |d| &d.standard_cost,
    |d| &d.average_cost,
];

/// One open product-creation form.
///
/// Owns the draft and the session's catalog snapshot. The UI layer forwards
/// input events to the mutators here; everything derived (classification,
/// feasibility, requiredness, validation) is answered synchronously.
#[derive(Debug, Clone)]
pub struct ProductForm {
    session: FormSessionId,
    catalog: CatalogSnapshot,
    draft: ProductDraft,
    settled_state: FormState,
    reset_pending: bool,
    feasibility: Option<u64>,
}

impl ProductForm {
    /// Open a fresh form over the session's catalog snapshot.
    pub fn open(catalog: CatalogSnapshot) -> Self {
        let form = Self {
            session: FormSessionId::new(),
            catalog,
            draft: ProductDraft::new(),
            settled_state: FormState::Unclassified,
            reset_pending: false,
            feasibility: None,
        };
        tracing::debug!(session = %form.session, "product form opened");
        form
    }

    pub fn session(&self) -> FormSessionId {
        self.session
    }

    pub fn catalog(&self) -> &CatalogSnapshot {
        &self.catalog
    }

    pub fn draft(&self) -> &ProductDraft {
        &self.draft
    }

    /// Mutable access for fields without derived state (price, notes, ...).
    ///
    /// Recipe, wastage and yield edits should go through the dedicated
    /// mutators so the feasibility result stays current; hosts that write
    /// them here must call [`refresh_feasibility`](Self::refresh_feasibility).
    pub fn draft_mut(&mut self) -> &mut ProductDraft {
        &mut self.draft
    }

    /// Current classification, derived live from the chosen category.
    pub fn state(&self) -> FormState {
        FormState::from_class(self.catalog.classify_category(self.draft.category_id))
    }

    /// Latest computed feasibility; `None` means "unknown", not zero.
    pub fn feasibility(&self) -> Option<u64> {
        self.feasibility
    }

    /// Fields the current classification requires before submission.
    pub fn required_fields(&self) -> Vec<Field> {
        let mut fields = vec![Field::Code, Field::Name, Field::Category];
        match self.state() {
            FormState::Ingredient => {
                fields.push(Field::Unit);
                fields.push(Field::Stock);
            }
            FormState::Beverage => fields.push(Field::Stock),
            FormState::FinalGood => fields.push(Field::MinStock),
            FormState::Unclassified => {}
        }
        fields
    }

    /// Record a category selection.
    ///
    /// The classification (and everything derived from it) changes
    /// immediately; the destructive reset of classification-dependent fields
    /// is deferred until [`settle`](Self::settle) so a host can sequence its
    /// own teardown first. Selections made in quick succession coalesce into
    /// a single reset for the last one.
    pub fn select_category(&mut self, id: CategoryId) {
        if id == self.draft.category_id {
            return;
        }
        self.draft.category_id = id;
        self.reset_pending = true;
        tracing::debug!(session = %self.session, category = %id, "category selected");
    }

    /// Apply the pending classification reset, if any.
    ///
    /// Runs at most one reset per burst of category changes and is a no-op
    /// otherwise; returns whether a reset was applied. Hosts without a
    /// teardown-ordering constraint call this immediately after
    /// [`select_category`](Self::select_category).
    pub fn settle(&mut self) -> bool {
        if !self.reset_pending {
            return false;
        }
        self.reset_pending = false;
        self.apply_reset();
        true
    }

    fn apply_reset(&mut self) {
        let new_state = self.state();

        self.draft.recipe.clear();
        self.draft.line_editor = RecipeLineEditor::default();
        self.feasibility = None;

        match new_state {
            FormState::Ingredient => {
                let keep = self
                    .draft
                    .unit_id
                    .is_some_and(|u| self.catalog.units().is_mass_unit(u));
                if !keep {
                    if let Some(mass) = self.catalog.units().default_mass_unit() {
                        self.draft.unit_id = Some(mass);
                    }
                }
            }
            _ => {
                if let Some(count) = self.catalog.units().count_unit() {
                    self.draft.unit_id = Some(count);
                }
            }
        }

        // Stock is only meaningful while it is physically counted; a
        // recipe-based final good starts at zero and is produced on demand.
        if matches!(
            self.settled_state,
            FormState::Ingredient | FormState::Beverage
        ) {
            self.draft.stock.clear();
        }
        if new_state != FormState::FinalGood {
            self.draft.min_stock.clear();
        }

        tracing::debug!(
            session = %self.session,
            from = ?self.settled_state,
            to = ?new_state,
            "classification reset applied"
        );
        self.settled_state = new_state;
    }

    /// Enforce the unit rule for the current classification.
    ///
    /// Ingredients must carry a mass unit (kilograms when the current unit is
    /// not one); everything else carries the count unit. Idempotent: a second
    /// application changes nothing.
    pub fn enforce_unit_policy(&mut self) {
        match self.state() {
            FormState::Ingredient => {
                let is_mass = self
                    .draft
                    .unit_id
                    .is_some_and(|u| self.catalog.units().is_mass_unit(u));
                if !is_mass {
                    if let Some(mass) = self.catalog.units().default_mass_unit() {
                        self.draft.unit_id = Some(mass);
                    }
                }
            }
            _ => {
                let count = self.catalog.units().count_unit();
                if self.draft.unit_id != count {
                    self.draft.unit_id = count;
                }
            }
        }
    }

    /// Stage the ingredient half of the pending recipe line.
    pub fn stage_ingredient(&mut self, ingredient: Option<ProductId>) {
        self.draft.line_editor.ingredient = ingredient;
    }

    /// Stage the quantity half of the pending recipe line.
    pub fn stage_quantity(&mut self, raw: impl Into<String>) {
        self.draft.line_editor.quantity = raw.into();
    }

    /// Commit the pending line to the recipe, if complete.
    ///
    /// Returns whether a line was added; the editor is cleared on success and
    /// feasibility is recomputed.
    pub fn commit_staged_line(&mut self) -> bool {
        if !self.draft.line_editor.is_complete() {
            return false;
        }
        let editor = core::mem::take(&mut self.draft.line_editor);
        self.draft.recipe.push(RecipeLine {
            ingredient: editor.ingredient.unwrap_or(ProductId::new(0)),
            quantity: editor.quantity,
        });
        self.refresh_feasibility();
        true
    }

    /// Remove a committed recipe line and recompute feasibility.
    pub fn remove_recipe_line(&mut self, index: usize) {
        if index < self.draft.recipe.len() {
            self.draft.recipe.remove(index);
            self.refresh_feasibility();
        }
    }

    pub fn set_wastage_percent(&mut self, raw: impl Into<String>) {
        self.draft.wastage_percent = raw.into();
        self.refresh_feasibility();
    }

    pub fn set_yield_factor(&mut self, raw: impl Into<String>) {
        self.draft.yield_factor = raw.into();
        self.refresh_feasibility();
    }

    /// Recompute the feasibility bound from the recipe and current stock.
    pub fn refresh_feasibility(&mut self) {
        let stocks = self.catalog.ingredient_stocks();
        self.feasibility = producible_units(
            &self.draft.recipe,
            &stocks,
            &self.draft.wastage_percent,
            &self.draft.yield_factor,
        );
    }

    /// Estimated margin in percent, when meaningful for the current class.
    pub fn margin_percent(&self) -> Option<f64> {
        pricing::margin_percent(&self.draft, self.state())
    }

    /// Non-blocking advisory: the entered price yields a thin margin.
    pub fn is_low_margin(&self) -> bool {
        pricing::is_low_margin(&self.draft, self.state())
    }

    /// Validation gate run before submission. Never mutates the draft.
    pub fn validate(&self) -> DomainResult<()> {
        let state = self.state();
        if state == FormState::Unclassified {
            return Err(DomainError::validation("a category must be chosen"));
        }
        if self.draft.code.trim().is_empty() {
            return Err(DomainError::validation("code is required"));
        }
        if self.draft.name.trim().is_empty() {
            return Err(DomainError::validation("name is required"));
        }

        // One blanket rule for every counted or priced field: no negatives.
        for field in NON_NEGATIVE_FIELDS {
            if parse_number(field(&self.draft)).is_some_and(|v| v < 0.0) {
                return Err(DomainError::validation("negative numbers are not allowed"));
            }
        }
        if parse_number(&self.draft.pack_size).is_some_and(|v| v < 1.0) {
            return Err(DomainError::validation("pack size must be at least 1"));
        }

        match state {
            FormState::Ingredient => {
                if self.draft.unit_id.is_none() {
                    return Err(DomainError::validation("a base unit must be chosen"));
                }
                if parse_number(&self.draft.stock).is_none() {
                    return Err(DomainError::validation("current stock is required"));
                }
            }
            FormState::Beverage => {
                if parse_number(&self.draft.stock).is_none() {
                    return Err(DomainError::validation("current stock is required"));
                }
            }
            FormState::FinalGood => {
                if parse_number(&self.draft.min_stock).is_none() {
                    return Err(DomainError::validation("minimum stock is required"));
                }
            }
            FormState::Unclassified => unreachable!("rejected above"),
        }
        Ok(())
    }

    /// Validate, then assemble the submission payload.
    ///
    /// Rejections never leave a partial payload behind.
    pub fn build_payload(&self) -> DomainResult<NewProductPayload> {
        self.validate()?;
        let payload = NewProductPayload::from_form(self);
        tracing::debug!(session = %self.session, kind = ?payload.kind, "product payload built");
        Ok(payload)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use mostrador_catalog::{Category, ProductKind, ProductSummary, Unit, UnitCatalog};
    use mostrador_core::{SupplierId, UnitId};

    pub(crate) const INGREDIENTS: CategoryId = CategoryId::new(1);
    pub(crate) const BEVERAGES: CategoryId = CategoryId::new(2);
    pub(crate) const EMPANADAS: CategoryId = CategoryId::new(3);

    pub(crate) const KG: UnitId = UnitId::new(1);
    pub(crate) const LB: UnitId = UnitId::new(3);
    pub(crate) const LITER: UnitId = UnitId::new(4);
    pub(crate) const EACH: UnitId = UnitId::new(5);

    pub(crate) const FLOUR: ProductId = ProductId::new(10);
    pub(crate) const SUGAR: ProductId = ProductId::new(11);

    fn category(id: CategoryId, name: &str) -> Category {
        Category {
            id,
            display_name: name.to_string(),
        }
    }

    fn unit(id: UnitId, name: &str, abbr: &str) -> Unit {
        Unit {
            id,
            name: name.to_string(),
            abbreviation: abbr.to_string(),
        }
    }

    fn ingredient(id: ProductId, name: &str, stock: f64) -> ProductSummary {
        ProductSummary {
            id,
            name: name.to_string(),
            kind: ProductKind::Ingredient,
            stock,
            supplier_id: Some(SupplierId::new(7)),
            unit_id: Some(KG),
            cost: 1.5,
        }
    }

    pub(crate) fn snapshot() -> CatalogSnapshot {
        CatalogSnapshot::new(
            vec![
                category(INGREDIENTS, "Ingredientes"),
                category(BEVERAGES, "Bebidas"),
                category(EMPANADAS, "Empanadas"),
            ],
            UnitCatalog::new(vec![
                unit(KG, "Kilogramo", "kg"),
                unit(UnitId::new(2), "Gramo", "g"),
                unit(LB, "Libra", "lb"),
                unit(LITER, "Litro", "l"),
                unit(EACH, "Unidad", "u"),
            ]),
            vec![
                ingredient(FLOUR, "Harina", 100.0),
                ingredient(SUGAR, "Azúcar", 3.0),
            ],
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        )
    }

    fn settled_form(category: CategoryId) -> ProductForm {
        let mut form = ProductForm::open(snapshot());
        form.select_category(category);
        form.settle();
        form
    }

    #[test]
    fn opens_unclassified_with_nothing_required_beyond_identity() {
        let form = ProductForm::open(snapshot());
        assert_eq!(form.state(), FormState::Unclassified);
        assert_eq!(
            form.required_fields(),
            vec![Field::Code, Field::Name, Field::Category]
        );
    }

    #[test]
    fn classification_follows_the_selected_category_immediately() {
        let mut form = ProductForm::open(snapshot());
        form.select_category(INGREDIENTS);
        assert_eq!(form.state(), FormState::Ingredient);
        form.select_category(BEVERAGES);
        assert_eq!(form.state(), FormState::Beverage);
        form.select_category(EMPANADAS);
        assert_eq!(form.state(), FormState::FinalGood);
    }

    #[test]
    fn reset_applies_exactly_once_per_category_change() {
        let mut form = settled_form(EMPANADAS);
        form.stage_ingredient(Some(FLOUR));
        form.stage_quantity("10");
        assert!(form.commit_staged_line());
        assert_eq!(form.feasibility(), Some(10));

        form.select_category(BEVERAGES);
        // Not yet settled: the recipe survives until the host settles.
        assert_eq!(form.draft().recipe.len(), 1);

        assert!(form.settle());
        assert!(form.draft().recipe.is_empty());
        assert_eq!(form.feasibility(), None);

        // A second settle with no new change is a no-op.
        assert!(!form.settle());
    }

    #[test]
    fn rapid_category_changes_coalesce_into_one_reset() {
        let mut form = settled_form(EMPANADAS);
        form.stage_ingredient(Some(FLOUR));
        form.stage_quantity("10");
        form.commit_staged_line();

        form.select_category(BEVERAGES);
        form.select_category(INGREDIENTS);
        assert!(form.settle());
        assert!(!form.settle());
        assert!(form.draft().recipe.is_empty());
        assert_eq!(form.state(), FormState::Ingredient);
        assert_eq!(form.draft().unit_id, Some(KG));
    }

    #[test]
    fn reselecting_the_same_category_does_not_schedule_a_reset() {
        let mut form = settled_form(BEVERAGES);
        form.select_category(BEVERAGES);
        assert!(!form.settle());
    }

    #[test]
    fn ingredient_transition_defaults_the_unit_to_kilograms() {
        let form = settled_form(INGREDIENTS);
        assert_eq!(form.draft().unit_id, Some(KG));
    }

    #[test]
    fn ingredient_transition_keeps_an_existing_mass_unit() {
        let mut form = ProductForm::open(snapshot());
        form.draft_mut().unit_id = Some(LB);
        form.select_category(INGREDIENTS);
        form.settle();
        assert_eq!(form.draft().unit_id, Some(LB));
    }

    #[test]
    fn ingredient_transition_replaces_a_volume_unit() {
        let mut form = ProductForm::open(snapshot());
        form.draft_mut().unit_id = Some(LITER);
        form.select_category(INGREDIENTS);
        form.settle();
        assert_eq!(form.draft().unit_id, Some(KG));
    }

    #[test]
    fn non_ingredient_transitions_force_the_count_unit() {
        let beverage = settled_form(BEVERAGES);
        assert_eq!(beverage.draft().unit_id, Some(EACH));
        let final_good = settled_form(EMPANADAS);
        assert_eq!(final_good.draft().unit_id, Some(EACH));
    }

    #[test]
    fn unit_policy_is_idempotent() {
        let mut form = settled_form(INGREDIENTS);
        form.draft_mut().unit_id = Some(LITER);
        form.enforce_unit_policy();
        let after_once = form.draft().unit_id;
        form.enforce_unit_policy();
        assert_eq!(form.draft().unit_id, after_once);
        assert_eq!(after_once, Some(KG));

        form.select_category(BEVERAGES);
        form.settle();
        form.draft_mut().unit_id = Some(KG);
        form.enforce_unit_policy();
        let after_once = form.draft().unit_id;
        form.enforce_unit_policy();
        assert_eq!(form.draft().unit_id, after_once);
        assert_eq!(after_once, Some(EACH));
    }

    #[test]
    fn leaving_a_stocked_class_clears_current_stock() {
        let mut form = settled_form(INGREDIENTS);
        form.draft_mut().stock = "25".to_string();
        form.select_category(EMPANADAS);
        form.settle();
        assert!(form.draft().stock.is_empty());
    }

    #[test]
    fn entering_a_non_final_good_class_clears_minimum_stock() {
        let mut form = settled_form(EMPANADAS);
        form.draft_mut().min_stock = "5".to_string();
        form.select_category(BEVERAGES);
        form.settle();
        assert!(form.draft().min_stock.is_empty());
    }

    #[test]
    fn feasibility_tracks_recipe_wastage_and_yield() {
        let mut form = settled_form(EMPANADAS);
        form.stage_ingredient(Some(FLOUR));
        form.stage_quantity("10");
        form.commit_staged_line();
        assert_eq!(form.feasibility(), Some(10));

        form.set_wastage_percent("50");
        assert_eq!(form.feasibility(), Some(6));

        form.set_wastage_percent("0");
        form.set_yield_factor("2");
        assert_eq!(form.feasibility(), Some(20));

        form.stage_ingredient(Some(SUGAR));
        form.stage_quantity("1");
        form.commit_staged_line();
        assert_eq!(form.feasibility(), Some(6));

        form.remove_recipe_line(1);
        assert_eq!(form.feasibility(), Some(20));
    }

    #[test]
    fn empty_recipe_reports_unknown_not_zero() {
        let mut form = settled_form(EMPANADAS);
        form.refresh_feasibility();
        assert_eq!(form.feasibility(), None);
    }

    #[test]
    fn incomplete_staged_lines_are_not_committed() {
        let mut form = settled_form(EMPANADAS);
        form.stage_ingredient(Some(FLOUR));
        assert!(!form.commit_staged_line());
        form.stage_ingredient(None);
        form.stage_quantity("10");
        assert!(!form.commit_staged_line());
        assert!(form.draft().recipe.is_empty());
    }

    #[test]
    fn unclassified_submission_is_rejected() {
        let form = ProductForm::open(snapshot());
        let err = form.validate().unwrap_err();
        match err {
            DomainError::Validation(msg) => assert!(msg.contains("category")),
            _ => panic!("expected Validation"),
        }
    }

    fn filled_ingredient_form() -> ProductForm {
        let mut form = settled_form(INGREDIENTS);
        form.draft_mut().code = "ING-001".to_string();
        form.draft_mut().name = "Harina 000".to_string();
        form.draft_mut().stock = "20".to_string();
        form.draft_mut().cost = "1.5".to_string();
        form
    }

    #[test]
    fn ingredient_gate_requires_unit_and_stock() {
        let mut form = filled_ingredient_form();
        assert!(form.validate().is_ok());

        form.draft_mut().stock = String::new();
        let err = form.validate().unwrap_err();
        match err {
            DomainError::Validation(msg) => assert!(msg.contains("stock")),
            _ => panic!("expected Validation"),
        }

        form.draft_mut().stock = "20".to_string();
        form.draft_mut().unit_id = None;
        let err = form.validate().unwrap_err();
        match err {
            DomainError::Validation(msg) => assert!(msg.contains("unit")),
            _ => panic!("expected Validation"),
        }
    }

    #[test]
    fn negative_stock_hits_the_blanket_negative_rule() {
        let mut form = filled_ingredient_form();
        form.draft_mut().stock = "-1".to_string();
        let err = form.validate().unwrap_err();
        assert_eq!(
            err,
            DomainError::validation("negative numbers are not allowed")
        );
    }

    #[test]
    fn any_negative_numeric_field_rejects_with_the_same_reason() {
        let writes: [fn(&mut ProductDraft); 7] = [
            |d| d.price = "-1".to_string(),
            |d| d.cost = "-0.5".to_string(),
            |d| d.safety_stock = "-2".to_string(),
            |d| d.reorder_level = "-3".to_string(),
            |d| d.wastage_percent = "-10".to_string(),
            |d| d.standard_cost = "-1".to_string(),
            |d| d.average_cost = "-1".to_string(),
        ];
        for write in writes {
            let mut form = filled_ingredient_form();
            write(form.draft_mut());
            assert_eq!(
                form.validate().unwrap_err(),
                DomainError::validation("negative numbers are not allowed")
            );
        }
    }

    #[test]
    fn pack_size_below_one_is_rejected() {
        let mut form = filled_ingredient_form();
        form.draft_mut().pack_size = "0.5".to_string();
        let err = form.validate().unwrap_err();
        match err {
            DomainError::Validation(msg) => assert!(msg.contains("pack size")),
            _ => panic!("expected Validation"),
        }
    }

    #[test]
    fn beverage_gate_requires_current_stock() {
        let mut form = settled_form(BEVERAGES);
        form.draft_mut().code = "BEB-001".to_string();
        form.draft_mut().name = "Gaseosa".to_string();
        assert!(form.validate().is_err());
        form.draft_mut().stock = "0".to_string();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn final_good_gate_requires_minimum_stock() {
        let mut form = settled_form(EMPANADAS);
        form.draft_mut().code = "EMP-001".to_string();
        form.draft_mut().name = "Empanada de carne".to_string();
        assert!(form.validate().is_err());
        form.draft_mut().min_stock = "0".to_string();
        assert!(form.validate().is_ok());
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: the unit rule is idempotent for any starting unit.
            #[test]
            fn unit_policy_idempotent_from_any_unit(
                raw_unit in proptest::option::of(1u64..8),
                category in prop_oneof![Just(INGREDIENTS), Just(BEVERAGES), Just(EMPANADAS)],
            ) {
                let mut form = ProductForm::open(snapshot());
                form.select_category(category);
                form.settle();
                form.draft_mut().unit_id = raw_unit.map(UnitId::new);
                form.enforce_unit_policy();
                let once = form.draft().unit_id;
                form.enforce_unit_policy();
                prop_assert_eq!(form.draft().unit_id, once);
            }

            /// Property: validation never mutates the draft.
            #[test]
            fn validation_is_read_only(stock in ".{0,8}") {
                let mut form = settled_form(INGREDIENTS);
                form.draft_mut().stock = stock;
                let before = form.draft().clone();
                let _ = form.validate();
                prop_assert_eq!(form.draft(), &before);
            }
        }
    }
}
