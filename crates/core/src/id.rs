//! Strongly-typed identifiers used across the domain.
//!
//! All identities are UUIDv7 (time-ordered, collision-resistant), generated
//! by the service rather than derived from wall-clock concatenation.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

macro_rules! impl_uuid_newtype {
    ($t:ident, $name:literal, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $t(Uuid);

        impl $t {
            /// Create a new identifier.
            ///
            /// Uses UUIDv7 (time-ordered). Prefer passing IDs explicitly in
            /// tests for determinism.
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

        impl Default for $t {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<Uuid> for $t {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$t> for Uuid {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let uuid = Uuid::from_str(s)
                    .map_err(|e| Error::validation(format!("{}: {}", $name, e)))?;
                Ok(Self(uuid))
            }
        }
    };
}

impl_uuid_newtype!(ProductId, "ProductId", "Identifier of a product.");
impl_uuid_newtype!(CategoryId, "CategoryId", "Identifier of a category.");
impl_uuid_newtype!(SupplierId, "SupplierId", "Identifier of a supplier.");
impl_uuid_newtype!(WarehouseId, "WarehouseId", "Identifier of a warehouse.");
impl_uuid_newtype!(MovementId, "MovementId", "Identifier of a stock movement.");
impl_uuid_newtype!(RequestId, "RequestId", "Identifier of a purchase request.");
