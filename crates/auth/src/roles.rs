use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role name carried in a token's `roles` claim.
///
/// Any string is accepted; only the well-known roles below grant
/// permissions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    /// Full access, including plugin settings.
    pub const ADMIN: Role = Role(Cow::Borrowed("admin"));
    /// May browse the catalog and create parts with initial stock.
    pub const PARTS_MANAGER: Role = Role(Cow::Borrowed("parts_manager"));
    /// Read-only access to categories and locations.
    pub const VIEWER: Role = Role(Cow::Borrowed("viewer"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_admin(&self) -> bool {
        *self == Self::ADMIN
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
