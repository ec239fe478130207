//! # sitehub-database
//!
//! PostgreSQL connection management and concrete repository
//! implementations for all SiteHub entities, including the atomic
//! registration transaction.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
