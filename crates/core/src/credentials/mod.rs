//! Credentials module - per-(user, marketplace) OAuth credential store.

mod credentials_model;
mod credentials_service;
mod credentials_traits;

pub use credentials_model::{MarketplaceCredential, NewCredential};
pub use credentials_service::CredentialService;
pub use credentials_traits::{CredentialRepositoryTrait, CredentialServiceTrait};
