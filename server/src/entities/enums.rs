//! Enums - Enumerated types used by the entities

use serde::{Deserialize, Serialize};
use std::fmt;

// ********************* ROLES & CAPABILITIES **********************//

/// Account tier. Declaration order is the tier order:
/// `User < Vip < Legend < Moderator < Admin`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, sqlx::Type)]
#[sqlx(rename_all = "UPPERCASE")]
pub enum UserRole {
    User,
    Vip,
    Legend,
    Moderator,
    Admin,
}

/// Privileged operations reachable from the admin panel
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    AccessPanel,
    ViewAuditLog,
    ChangeRoles,
    BanUsers,
    DeleteListings,
    ManageVip,
}

const MODERATOR_CAPABILITIES: &[Capability] = &[
    Capability::AccessPanel,
    Capability::BanUsers,
    Capability::DeleteListings,
    Capability::ManageVip,
];

const ADMIN_CAPABILITIES: &[Capability] = &[
    Capability::AccessPanel,
    Capability::ViewAuditLog,
    Capability::ChangeRoles,
    Capability::BanUsers,
    Capability::DeleteListings,
    Capability::ManageVip,
];

impl UserRole {
    pub fn capabilities(&self) -> &'static [Capability] {
        match self {
            UserRole::Admin => ADMIN_CAPABILITIES,
            UserRole::Moderator => MODERATOR_CAPABILITIES,
            UserRole::User | UserRole::Vip | UserRole::Legend => &[],
        }
    }

    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    /// Admins cannot be targeted by any admin-panel action
    pub fn is_protected(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UserRole::User => "user",
            UserRole::Vip => "vip",
            UserRole::Legend => "legend",
            UserRole::Moderator => "moderator",
            UserRole::Admin => "admin",
        };
        f.write_str(label)
    }
}

// ********************* AUDIT LOG **********************//

/// Action label recorded in the audit log
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum AdminAction {
    BanUser,
    UnbanUser,
    ChangeRole,
    DeleteAdvertisement,
    SetVip,
    UnsetVip,
}
