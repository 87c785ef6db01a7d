//! Pricing derivations over the draft: effective cost/price and margin.

use crate::draft::{parse_number, ProductDraft};
use crate::form::FormState;

/// Margin below this (in percent) triggers the non-blocking advisory.
pub const LOW_MARGIN_THRESHOLD_PERCENT: f64 = 15.0;

/// The cost figure relevant to the current classification.
///
/// Final goods are costed by their production-cost entry; everything else by
/// the plain cost field. Blank or non-numeric input counts as zero.
pub fn effective_cost(draft: &ProductDraft, state: FormState) -> f64 {
    let raw = match state {
        FormState::FinalGood => &draft.production_cost,
        _ => &draft.cost,
    };
    parse_number(raw).unwrap_or(0.0)
}

/// The price figure relevant to the current classification.
///
/// Ingredients are not sold, so their effective price is their effective
/// cost; other classes use the entered sale price.
pub fn effective_price(draft: &ProductDraft, state: FormState) -> f64 {
    if state == FormState::Ingredient {
        effective_cost(draft, state)
    } else {
        parse_number(&draft.price).unwrap_or(0.0)
    }
}

/// Estimated margin in percent, or `None` when it is not meaningful:
/// for ingredients, or while either figure is non-positive.
pub fn margin_percent(draft: &ProductDraft, state: FormState) -> Option<f64> {
    if state == FormState::Ingredient {
        return None;
    }
    let cost = effective_cost(draft, state);
    let price = effective_price(draft, state);
    if cost <= 0.0 || price <= 0.0 {
        return None;
    }
    Some((price - cost) / cost * 100.0)
}

/// Whether the entered price yields a margin under the advisory threshold.
///
/// An unknown cost is treated as comfortable rather than alarming, so the
/// advisory only fires once a positive cost is present.
pub fn is_low_margin(draft: &ProductDraft, state: FormState) -> bool {
    if state == FormState::Ingredient {
        return false;
    }
    let cost = effective_cost(draft, state);
    if cost <= 0.0 {
        return false;
    }
    let price = effective_price(draft, state);
    (price - cost) / cost * 100.0 < LOW_MARGIN_THRESHOLD_PERCENT
}
