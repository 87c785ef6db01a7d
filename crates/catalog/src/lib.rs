//! Catalog read model for authoring sessions.
//!
//! This crate holds the read-only data an authoring form is handed when it
//! opens (categories, units, product summaries) and the small pure helpers
//! derived from it: category classification, unit resolution, stock status.
//! Nothing here performs IO; the snapshot is built by an external collaborator
//! and injected per session.

pub mod category;
pub mod product;
pub mod snapshot;
pub mod unit;

pub use category::{classify, normalize_category_name, Category, CategoryClass};
pub use product::{stock_status, ProductKind, ProductSummary, StockStatus};
pub use snapshot::CatalogSnapshot;
pub use unit::{Unit, UnitCatalog, COUNT_UNIT, MASS_UNITS};
