//! Purchase-order authoring form engine.
//!
//! This crate contains the derived-state rules behind the purchase-order
//! form: per-line supplier resolution, the submission gate and the
//! normalized payload. Deterministic domain logic only; the UI layer owns
//! rendering and the API collaborator owns the actual submission.

pub mod order;

pub use order::{
    resolve_supplier, PurchaseLine, PurchaseLinePayload, PurchaseOrderForm, PurchaseOrderPayload,
    SupplierConsensus,
};
