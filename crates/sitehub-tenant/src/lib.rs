//! # sitehub-tenant
//!
//! The admission layer for SiteHub: resolves which organization a
//! hostname belongs to, evaluates role and permission requirements
//! against session claims, and exposes [`RequestGate::admit`] as the
//! single entry point HTTP integrations call per request.
//!
//! ## Modules
//!
//! - `resolver` — hostname → organization resolution
//! - `evaluator` — pure role/permission/organization checks
//! - `requirement` — what an operation demands of a session
//! - `context` — the per-request tenant context
//! - `gate` — the admission pipeline tying the above together
//! - `store` — the read seam over organization persistence

pub mod context;
pub mod evaluator;
pub mod gate;
pub mod requirement;
pub mod resolver;
pub mod store;

pub use context::TenantContext;
pub use evaluator::AccessEvaluator;
pub use gate::RequestGate;
pub use requirement::Requirement;
pub use resolver::{TenantResolution, TenantResolver};
pub use store::{PostgresTenantStore, TenantStore};
