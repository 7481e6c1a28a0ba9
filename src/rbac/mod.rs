//! Role-based access control.
//!
//! Permission resolution is a pure function over static data: a fixed
//! role→permission table plus the user's explicit grants. There is no
//! dynamic dispatch and no per-request state; inactive users are denied
//! everything regardless of role or grants.

use crate::auth::{
    errors::{AuthError, AuthResult},
    models::User,
};
use serde::{Deserialize, Serialize};

/// User roles, ordered roughly by privilege
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Administrator,
    Recruiter,
    HiringManager,
    Interviewer,
    Viewer,
}

/// Platform permissions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ViewCandidates,
    EditCandidates,
    DeleteCandidates,
    ViewReports,
    GenerateReports,
    ManageIntegrations,
    ManageUsers,
    ViewAnalytics,
    ExportData,
}

impl Permission {
    /// Every permission the platform defines
    pub const ALL: [Permission; 9] = [
        Permission::ViewCandidates,
        Permission::EditCandidates,
        Permission::DeleteCandidates,
        Permission::ViewReports,
        Permission::GenerateReports,
        Permission::ManageIntegrations,
        Permission::ManageUsers,
        Permission::ViewAnalytics,
        Permission::ExportData,
    ];
}

const RECRUITER_PERMISSIONS: &[Permission] = &[
    Permission::ViewCandidates,
    Permission::EditCandidates,
    Permission::ViewReports,
    Permission::GenerateReports,
    Permission::ViewAnalytics,
];

const HIRING_MANAGER_PERMISSIONS: &[Permission] = &[
    Permission::ViewCandidates,
    Permission::ViewReports,
    Permission::ViewAnalytics,
];

const INTERVIEWER_PERMISSIONS: &[Permission] =
    &[Permission::ViewCandidates, Permission::ViewReports];

const VIEWER_PERMISSIONS: &[Permission] = &[Permission::ViewCandidates];

/// Default permission set for a role.
///
/// Total over [`UserRole`]; Administrator maps to the full set.
pub const fn role_permissions(role: UserRole) -> &'static [Permission] {
    match role {
        UserRole::Administrator => &Permission::ALL,
        UserRole::Recruiter => RECRUITER_PERMISSIONS,
        UserRole::HiringManager => HIRING_MANAGER_PERMISSIONS,
        UserRole::Interviewer => INTERVIEWER_PERMISSIONS,
        UserRole::Viewer => VIEWER_PERMISSIONS,
    }
}

/// Whether `user` holds `permission`, by explicit grant or role default.
///
/// Inactive users hold nothing.
pub fn authorize(user: &User, permission: Permission) -> bool {
    if !user.is_active {
        return false;
    }
    user.permissions.contains(&permission) || role_permissions(user.role).contains(&permission)
}

/// Authorize or fail with [`AuthError::Forbidden`]
pub fn require(user: &User, permission: Permission) -> AuthResult<()> {
    if authorize(user, permission) {
        Ok(())
    } else {
        log::warn!(
            "Denied {:?} for {} (role {:?})",
            permission,
            user.email,
            user.role
        );
        Err(AuthError::Forbidden)
    }
}
