//! # sitehub-entity
//!
//! Domain entity models for SiteHub: users, organizations, memberships,
//! and sessions. Pure data types with their invariant helpers; no
//! persistence logic lives here.

pub mod member;
pub mod organization;
pub mod session;
pub mod user;

pub use member::{MemberRole, OrganizationMember, PermissionSet};
pub use organization::Organization;
pub use session::Session;
pub use user::User;
