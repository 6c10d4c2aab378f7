use bulkparts_auth::{Permission, Principal, PrincipalId, Role};

/// Principal context for a request (authenticated identity, roles and the
/// permissions those roles grant).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    principal_id: PrincipalId,
    username: Option<String>,
    roles: Vec<Role>,
    permissions: Vec<Permission>,
}

impl PrincipalContext {
    pub fn new(
        principal_id: PrincipalId,
        username: Option<String>,
        roles: Vec<Role>,
        permissions: Vec<Permission>,
    ) -> Self {
        Self {
            principal_id,
            username,
            roles,
            permissions,
        }
    }

    pub fn principal_id(&self) -> PrincipalId {
        self.principal_id
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn permissions(&self) -> &[Permission] {
        &self.permissions
    }

    pub fn to_principal(&self) -> Principal {
        Principal {
            principal_id: self.principal_id,
            username: self.username.clone(),
            roles: self.roles.clone(),
            permissions: self.permissions.clone(),
        }
    }
}
