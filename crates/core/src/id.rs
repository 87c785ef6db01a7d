//! Strongly-typed identifiers used across the domain.
//!
//! Catalog identifiers mirror the numeric ids handed out by the backing
//! store; the authoring-session id is generated locally.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Identifier of a product category.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(u64);

/// Identifier of a measurement unit.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(u64);

/// Identifier of a catalog product.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u64);

/// Identifier of a supplier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SupplierId(u64);

macro_rules! impl_numeric_id {
    ($t:ty, $name:literal) => {
        impl $t {
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            pub const fn as_u64(&self) -> u64 {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<u64> for $t {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl From<$t> for u64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let raw = u64::from_str(s)
                    .map_err(|e| DomainError::invalid_id(format!("{}: {}", $name, e)))?;
                Ok(Self(raw))
            }
        }
    };
}

impl_numeric_id!(CategoryId, "CategoryId");
impl_numeric_id!(UnitId, "UnitId");
impl_numeric_id!(ProductId, "ProductId");
impl_numeric_id!(SupplierId, "SupplierId");

impl CategoryId {
    /// The sentinel "no category chosen yet" id a fresh draft starts with.
    pub const UNSET: CategoryId = CategoryId(0);

    /// Whether a real category has been chosen.
    pub fn is_set(&self) -> bool {
        self.0 != 0
    }
}

/// Identifier of one authoring session (one open form).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormSessionId(Uuid);

impl FormSessionId {
    /// Create a new session identifier.
    ///
    /// Uses UUIDv7 (time-ordered). Prefer passing ids explicitly in tests
    /// for determinism.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for FormSessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for FormSessionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for FormSessionId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid = Uuid::from_str(s)
            .map_err(|e| DomainError::invalid_id(format!("FormSessionId: {}", e)))?;
        Ok(Self(uuid))
    }
}
