use serde::{Deserialize, Serialize};

use bulkparts_core::{Entity, LocationId, TreeNode};

/// Stock location (read-only from this service's point of view).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    pub description: String,
    pub parent_id: Option<LocationId>,
    pub pathstring: String,
}

impl Location {
    /// Text shown for this location in pickers: the full path, falling back
    /// to the bare name when the host has not computed a path.
    pub fn display_path(&self) -> &str {
        if self.pathstring.is_empty() {
            &self.name
        } else {
            &self.pathstring
        }
    }
}

impl Entity for Location {
    type Id = LocationId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl TreeNode for Location {
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
