use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::constants::ROLE_ADMIN;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    /// Stable subject identifier from the identity provider
    pub id: String,
    /// Verified email, when the token carries one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub roles: Vec<String>,
}

impl AuthenticatedUser {
    /// Check if user has a specific role
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Check if user is an admin
    pub fn is_admin(&self) -> bool {
        self.has_role(ROLE_ADMIN)
    }

    /// Check if user may edit the given resource (owner or admin)
    pub fn can_edit(&self, owner_id: &str) -> bool {
        self.is_admin() || self.id == owner_id
    }
}

#[cfg(test)]
mod tests {
    use crate::shared::test_helpers::{create_admin_user, create_member_user};

    #[test]
    fn admin_can_edit_anything() {
        let user = create_admin_user();
        assert!(user.is_admin());
        assert!(user.can_edit("someone-else"));
    }

    #[test]
    fn member_can_only_edit_own_resources() {
        let user = create_member_user("u-2");
        assert!(!user.is_admin());
        assert!(user.can_edit("u-2"));
        assert!(!user.can_edit("u-1"));
    }
}
