//! Account flows: registration and credential login.

pub mod service;
pub mod store;

pub use service::{AccountService, LoginRequest, NewAccount, RegisteredAccount};
pub use store::{AccountStore, PostgresAccountStore};
