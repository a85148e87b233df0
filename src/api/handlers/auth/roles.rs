//! Role-derived permission lists attached to API responses.

pub(crate) const ROLE_SUPER_ADMIN: &str = "SUPER_ADMIN";
pub(crate) const ROLE_TENANT_ADMIN: &str = "TENANT_ADMIN";

/// Permissions granted to a role.
///
/// Unknown roles fall back to the read-mostly member set, never to an
/// elevated one.
#[must_use]
pub fn permissions_for(role: &str) -> Vec<&'static str> {
    match role {
        ROLE_SUPER_ADMIN => vec![
            "view_dashboard",
            "view_users",
            "view_projects",
            "view_billing",
            "view_settings",
            "create_users",
            "edit_users",
            "delete_users",
            "create_projects",
            "edit_projects",
            "delete_projects",
        ],
        ROLE_TENANT_ADMIN => vec![
            "view_dashboard",
            "view_users",
            "view_projects",
            "view_billing",
            "view_settings",
            "create_users",
            "edit_users",
            "create_projects",
            "edit_projects",
        ],
        _ => vec!["view_dashboard", "view_projects"],
    }
}
