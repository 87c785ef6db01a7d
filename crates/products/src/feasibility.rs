//! Recipe feasibility: how many finished units the current stock supports.

use std::collections::HashMap;

use mostrador_core::ProductId;

use crate::draft::{parse_number, RecipeLine};

/// Compute the maximum number of finished units producible right now.
///
/// Each line consumes `quantity * (1 + wastage)` of its ingredient per base
/// batch; the scarcest ingredient caps the batch count and `yield_factor`
/// converts batches to finished units. Returns `None` when no line imposes a
/// finite cap — the empty recipe included — because "no meaningful bound" is
/// a valid answer, distinct from zero.
///
/// A line whose ingredient is unknown, or whose effective requirement is not
/// strictly positive, imposes no cap. Whether a blank quantity should instead
/// mean "infeasible" is an open product question; current behavior is "no
/// cap".
///
/// `wastage_percent` falls back to 0 and `yield_factor` to 1 when blank,
/// non-numeric or (for the yield) non-positive.
pub fn producible_units(
    lines: &[RecipeLine],
    stock_by_ingredient: &HashMap<ProductId, f64>,
    wastage_percent: &str,
    yield_factor: &str,
) -> Option<u64> {
    let wastage_rate = parse_number(wastage_percent).unwrap_or(0.0) / 100.0;
    let yield_factor = parse_number(yield_factor)
        .filter(|v| *v > 0.0)
        .unwrap_or(1.0);

    let scarcest = lines
        .iter()
        .filter_map(|line| {
            let stock = stock_by_ingredient.get(&line.ingredient)?;
            let required = parse_number(&line.quantity).unwrap_or(0.0) * (1.0 + wastage_rate);
            if required <= 0.0 {
                return None;
            }
            Some(stock / required)
        })
        .fold(None, |min: Option<f64>, ratio| {
            Some(min.map_or(ratio, |m| m.min(ratio)))
        })?;

    Some((scarcest * yield_factor).floor().max(0.0) as u64)
}
