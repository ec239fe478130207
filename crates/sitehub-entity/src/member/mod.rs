//! Organization membership entity.

pub mod model;
pub mod permissions;
pub mod role;

pub use model::{NewMember, OrganizationMember};
pub use permissions::PermissionSet;
pub use role::MemberRole;
