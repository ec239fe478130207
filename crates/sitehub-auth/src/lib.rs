//! # sitehub-auth
//!
//! Session issuance, validation, and revocation for SiteHub, plus the
//! registration and login flows that feed it.
//!
//! ## Modules
//!
//! - `jwt` — signed token creation and validation
//! - `password` — Argon2id password hashing
//! - `session` — session lifecycle (create, verify, delete, sweep)
//! - `account` — registration and login flows

pub mod account;
pub mod jwt;
pub mod password;
pub mod session;

pub use account::{AccountService, AccountStore, LoginRequest, NewAccount, RegisteredAccount};
pub use jwt::{Claims, TokenDecoder, TokenEncoder};
pub use password::PasswordHasher;
pub use session::{SessionManager, SessionStore, SessionSweeper, VerifiedSession};
