//! # sitehub-core
//!
//! Core crate for SiteHub. Contains configuration schemas, the unified
//! error system, and the request-path rejection taxonomy.
//!
//! This crate has **no** internal dependencies on other SiteHub crates.

pub mod config;
pub mod error;
pub mod logging;
pub mod result;

pub use error::{AppError, Rejection};
pub use result::AppResult;
