use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Permission identifier.
///
/// Permissions follow the host's `app.codename` convention (e.g.
/// `"part.add_part"`). The wildcard permission `"*"` is granted by policy
/// layers to mean "allow all".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub const WILDCARD: Permission = Permission(Cow::Borrowed("*"));

    pub const VIEW_CATEGORIES: Permission = Permission(Cow::Borrowed("part.view_partcategory"));
    pub const ADD_PART: Permission = Permission(Cow::Borrowed("part.add_part"));
    pub const VIEW_LOCATIONS: Permission = Permission(Cow::Borrowed("stock.view_stocklocation"));
    pub const CHANGE_SETTINGS: Permission = Permission(Cow::Borrowed("plugin.change_pluginsetting"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        self.as_str() == "*"
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
