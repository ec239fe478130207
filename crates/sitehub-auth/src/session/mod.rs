//! Session lifecycle: issuance, verification, revocation, and sweeping.

pub mod manager;
pub mod memory;
pub mod store;
pub mod sweeper;

pub use manager::{SessionManager, VerifiedSession};
pub use memory::MemorySessionStore;
pub use store::{PostgresSessionStore, SessionStore};
pub use sweeper::SessionSweeper;
