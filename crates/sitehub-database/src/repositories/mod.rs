//! Repository implementations for all SiteHub entities.

pub mod member;
pub mod organization;
pub mod registration;
pub mod session;
pub mod user;

pub use member::MemberRepository;
pub use organization::OrganizationRepository;
pub use registration::{Registration, RegistrationRepository};
pub use session::SessionRepository;
pub use user::UserRepository;
