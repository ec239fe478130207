//! Organization (tenant) entity.

pub mod model;
pub mod slug;

pub use model::{NewOrganization, Organization};
pub use slug::{is_valid_slug, slugify};
