//! Cross-listing module - fan-out publication and inventory sync.

mod crosslist_model;
mod inventory;
mod orchestrator;

#[cfg(test)]
pub(crate) mod test_support;

pub use crosslist_model::MarketplaceOutcome;
pub use inventory::InventorySyncService;
pub use orchestrator::CrossListService;
