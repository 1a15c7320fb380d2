use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{ErrorSeverity, GameError};
use crate::state::SkillId;

use super::SkillEffectDescriptor;

/// Errors raised by catalog construction and lookup.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("no effect descriptor registered for skill '{0}'")]
    NotFound(SkillId),

    #[error("duplicate effect descriptor for skill '{0}'")]
    Duplicate(SkillId),
}

impl GameError for CatalogError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            // A skill without visuals is a data bug, not a combat outcome.
            CatalogError::NotFound(_) => ErrorSeverity::Internal,
            CatalogError::Duplicate(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            CatalogError::NotFound(_) => "CATALOG_NOT_FOUND",
            CatalogError::Duplicate(_) => "CATALOG_DUPLICATE",
        }
    }
}

/// Read-only table from skill id to its visual descriptor.
///
/// Entries are handed out as `Arc`s so in-flight cast requests can hold
/// their descriptor without borrowing the catalog.
#[derive(Clone, Debug, Default)]
pub struct EffectCatalog {
    entries: HashMap<SkillId, Arc<SkillEffectDescriptor>>,
}

impl EffectCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog, rejecting duplicate skill ids.
    pub fn from_descriptors(
        descriptors: impl IntoIterator<Item = SkillEffectDescriptor>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        for descriptor in descriptors {
            catalog.insert(descriptor)?;
        }
        Ok(catalog)
    }

    pub fn insert(&mut self, descriptor: SkillEffectDescriptor) -> Result<(), CatalogError> {
        if self.entries.contains_key(&descriptor.id) {
            return Err(CatalogError::Duplicate(descriptor.id));
        }
        self.entries
            .insert(descriptor.id.clone(), Arc::new(descriptor));
        Ok(())
    }

    pub fn lookup(&self, id: &SkillId) -> Result<Arc<SkillEffectDescriptor>, CatalogError> {
        self.entries
            .get(id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(id.clone()))
    }

    pub fn contains(&self, id: &SkillId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &SkillId> + '_ {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
