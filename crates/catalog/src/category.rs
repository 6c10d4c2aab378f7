use serde::{Deserialize, Serialize};

use bulkparts_core::{CategoryId, Entity, TreeNode};

/// Part category (read-only from this service's point of view).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: String,
    pub parent_id: Option<CategoryId>,
    pub pathstring: String,
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl TreeNode for Category {
    fn name(&self) -> &str {
        &self.name
    }

    fn parent(&self) -> Option<&Self::Id> {
        self.parent_id.as_ref()
    }

    fn pathstring(&self) -> &str {
        &self.pathstring
    }
}
