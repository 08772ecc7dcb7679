//! Credential storage.

mod model;
mod repository;

pub use model::MarketplaceCredentialDB;
pub use repository::CredentialRepository;
