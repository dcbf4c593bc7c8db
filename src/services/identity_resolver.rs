//! Decides which source is authoritative for a dish identifier.

use std::sync::Arc;

use super::local_catalog::LocalCatalog;
use crate::types::dish::LocalDish;

/// Outcome of resolving an identifier.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Satisfied by the bundled dataset; the remote source is never consulted.
    Local(LocalDish),
    /// Not bundled; the caller must fetch it remotely.
    Remote(RemoteFetchRequest),
}

/// Instruction to fetch a dish from the remote catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFetchRequest {
    pub id: String,
}

/// Resolves identifiers, with the local dataset taking absolute precedence.
pub struct IdentityResolver {
    catalog: Arc<LocalCatalog>,
}

impl IdentityResolver {
    pub fn new(catalog: Arc<LocalCatalog>) -> Self {
        Self { catalog }
    }

    pub fn resolve(&self, id: &str) -> Resolution {
        match self.catalog.get_dish_by_id(id) {
            Some(dish) => Resolution::Local(dish.clone()),
            None => Resolution::Remote(RemoteFetchRequest { id: id.to_string() }),
        }
    }
}
