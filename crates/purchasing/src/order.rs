use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use mostrador_catalog::CatalogSnapshot;
use mostrador_core::{DomainError, DomainResult, FormSessionId, ProductId, SupplierId, ValueObject};

/// One editable purchase-order line.
///
/// Quantities and prices arrive from numeric inputs that default to zero,
/// so a freshly added line is visibly invalid until filled in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseLine {
    pub product_id: Option<ProductId>,
    pub quantity: f64,
    pub unit_price: f64,
    pub unit: String,
}

impl PurchaseLine {
    /// A blank line, as added by the "add product" action.
    pub fn empty() -> Self {
        Self {
            product_id: None,
            quantity: 0.0,
            unit_price: 0.0,
            unit: String::new(),
        }
    }

    pub fn subtotal(&self) -> f64 {
        self.quantity * self.unit_price
    }
}

impl ValueObject for PurchaseLine {}

/// Whether the order's lines agree on a single supplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupplierConsensus {
    /// No line has a resolvable supplier yet.
    Unresolved,
    /// Every resolvable line points at this one supplier.
    Unanimous(SupplierId),
    /// At least two distinct suppliers across the lines.
    Conflicting,
}

impl ValueObject for SupplierConsensus {}

/// Resolve the supplier the order's lines agree on.
///
/// Lines whose product is absent, unknown to the catalog, or supplier-less
/// are skipped; the remaining supplier ids are deduplicated. Zero distinct
/// ids is `Unresolved`, exactly one is `Unanimous`, more is `Conflicting`.
pub fn resolve_supplier(lines: &[PurchaseLine], catalog: &CatalogSnapshot) -> SupplierConsensus {
    let mut distinct: Option<SupplierId> = None;
    for line in lines {
        let Some(product_id) = line.product_id else {
            continue;
        };
        let Some(supplier) = catalog.product(product_id).and_then(|p| p.supplier_id) else {
            continue;
        };
        match distinct {
            None => distinct = Some(supplier),
            Some(seen) if seen == supplier => {}
            Some(_) => return SupplierConsensus::Conflicting,
        }
    }
    match distinct {
        None => SupplierConsensus::Unresolved,
        Some(id) => SupplierConsensus::Unanimous(id),
    }
}

/// One submitted purchase-order line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseLinePayload {
    pub product: ProductId,
    pub quantity: f64,
    pub unit: String,
    pub unit_price: f64,
    pub subtotal: f64,
}

/// Normalized purchase-order payload handed to the API collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrderPayload {
    pub supplier: SupplierId,
    pub date: NaiveDate,
    pub lines: Vec<PurchaseLinePayload>,
    pub total: f64,
}

/// One open purchase-order form.
///
/// Owns its lines and the session's catalog snapshot; the total and the
/// supplier consensus are recomputed on demand from current state.
#[derive(Debug, Clone)]
pub struct PurchaseOrderForm {
    session: FormSessionId,
    catalog: CatalogSnapshot,
    date: NaiveDate,
    lines: Vec<PurchaseLine>,
}

impl PurchaseOrderForm {
    /// Open a fresh form with one blank line, dated by the caller.
    pub fn open(catalog: CatalogSnapshot, date: NaiveDate) -> Self {
        let form = Self {
            session: FormSessionId::new(),
            catalog,
            date,
            lines: vec![PurchaseLine::empty()],
        };
        tracing::debug!(session = %form.session, "purchase order form opened");
        form
    }

    pub fn session(&self) -> FormSessionId {
        self.session
    }

    pub fn catalog(&self) -> &CatalogSnapshot {
        &self.catalog
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = date;
    }

    pub fn lines(&self) -> &[PurchaseLine] {
        &self.lines
    }

    pub fn line_mut(&mut self, index: usize) -> Option<&mut PurchaseLine> {
        self.lines.get_mut(index)
    }

    pub fn add_line(&mut self) {
        self.lines.push(PurchaseLine::empty());
    }

    /// Remove a line; the last remaining line stays put.
    pub fn remove_line(&mut self, index: usize) -> bool {
        if self.lines.len() > 1 && index < self.lines.len() {
            self.lines.remove(index);
            true
        } else {
            false
        }
    }

    /// Order total, recomputed from the lines on every call.
    pub fn total(&self) -> f64 {
        self.lines.iter().map(PurchaseLine::subtotal).sum()
    }

    /// Current supplier consensus across the lines.
    pub fn consensus(&self) -> SupplierConsensus {
        resolve_supplier(&self.lines, &self.catalog)
    }

    /// Submission gate. Never mutates the form.
    pub fn validate(&self) -> DomainResult<()> {
        match self.consensus() {
            SupplierConsensus::Unanimous(_) => {}
            SupplierConsensus::Unresolved => {
                return Err(DomainError::validation(
                    "no supplier could be resolved from the lines",
                ));
            }
            SupplierConsensus::Conflicting => {
                return Err(DomainError::validation(
                    "lines reference more than one supplier",
                ));
            }
        }
        if self.lines.is_empty() {
            return Err(DomainError::validation("add at least one line"));
        }
        let has_invalid = self
            .lines
            .iter()
            .any(|l| l.product_id.is_none() || l.quantity <= 0.0 || l.unit_price <= 0.0);
        if has_invalid {
            return Err(DomainError::validation(
                "every line needs a product, a positive quantity and a positive unit price",
            ));
        }
        if self.total() <= 0.0 {
            return Err(DomainError::validation("total must be positive"));
        }
        Ok(())
    }

    /// Validate, then assemble the submission payload.
    ///
    /// Rejections never leave a partial payload behind.
    pub fn build_payload(&self) -> DomainResult<PurchaseOrderPayload> {
        self.validate()?;
        let supplier = match self.consensus() {
            SupplierConsensus::Unanimous(id) => id,
            _ => return Err(DomainError::invariant("validated order lost its supplier")),
        };
        let mut lines = Vec::with_capacity(self.lines.len());
        for line in &self.lines {
            let product = line
                .product_id
                .ok_or_else(|| DomainError::invariant("validated line lost its product"))?;
            lines.push(PurchaseLinePayload {
                product,
                quantity: line.quantity,
                unit: self.line_unit(line, product),
                unit_price: line.unit_price,
                subtotal: line.subtotal(),
            });
        }
        let payload = PurchaseOrderPayload {
            supplier,
            date: self.date,
            lines,
            total: self.total(),
        };
        tracing::debug!(
            session = %self.session,
            supplier = %payload.supplier,
            total = payload.total,
            "purchase order payload built"
        );
        Ok(payload)
    }

    /// The unit label to submit: what the user typed, falling back to the
    /// product's catalog unit abbreviation.
    fn line_unit(&self, line: &PurchaseLine, product: ProductId) -> String {
        if !line.unit.trim().is_empty() {
            return line.unit.trim().to_string();
        }
        self.catalog
            .product(product)
            .and_then(|p| p.unit_id)
            .and_then(|u| self.catalog.units().abbreviation_of(u))
            .unwrap_or_default()
            .to_string()
    }
}
