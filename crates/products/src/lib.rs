//! Product authoring form engine.
//!
//! This crate contains the derived-state rules behind the product-creation
//! form: category-driven field visibility, unit normalization, recipe
//! feasibility and the submission payload. Everything is deterministic
//! domain logic (no IO, no HTTP, no storage); the UI layer owns rendering
//! and event delivery and calls in on every relevant input change.

pub mod draft;
pub mod feasibility;
pub mod form;
pub mod payload;
pub mod pricing;

pub use draft::{parse_number, ProductDraft, RecipeLine, RecipeLineEditor};
pub use feasibility::producible_units;
pub use form::{Field, FormState, ProductForm};
pub use payload::{NewProductPayload, RecipeLinePayload};
