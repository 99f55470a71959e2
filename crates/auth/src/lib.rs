//! `nexus-auth`: role-capability authorization gate.
//!
//! This crate is intentionally decoupled from storage and presentation: every check is a
//! pure function of `(role, permission)`.

pub mod authorize;
pub mod permissions;
pub mod roles;
pub mod user;

pub use authorize::{AuthzError, Decision, authorize, capability_table, check_capability, role_permissions};
pub use permissions::Permission;
pub use roles::Role;
pub use user::User;
