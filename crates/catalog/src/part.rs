use serde::{Deserialize, Serialize};

use bulkparts_core::{CategoryId, DomainError, Entity, PartId};

/// A created part, as reported back by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub id: PartId,
    pub name: String,
    pub description: String,
    pub category_id: CategoryId,
    pub ipn: String,
    /// Canonical URL of the part in the host UI, when the store knows how to
    /// build one.
    pub canonical_url: Option<String>,
}

impl Entity for Part {
    type Id = PartId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Values for a part that is about to be created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPart {
    pub name: String,
    pub description: String,
    pub category_id: CategoryId,
    pub ipn: String,
}

impl NewPart {
    /// Build a new part, rejecting blank names.
    ///
    /// Name, description and IPN are stored trimmed.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        category_id: CategoryId,
        ipn: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("part name cannot be empty"));
        }

        Ok(Self {
            name,
            description: description.into().trim().to_string(),
            category_id,
            ipn: ipn.into().trim().to_string(),
        })
    }

    /// Materialize the part once the store has assigned an identifier.
    pub fn into_part(self, id: PartId, canonical_url: Option<String>) -> Part {
        Part {
            id,
            name: self.name,
            description: self.description,
            category_id: self.category_id,
            ipn: self.ipn,
            canonical_url,
        }
    }
}
