pub mod accounts;
pub mod approval;
pub mod catalog;
pub mod ledger;
pub mod reviews;

pub use accounts::AccountService;
pub use approval::ApprovalService;
pub use catalog::CatalogService;
pub use ledger::InventoryLedger;
pub use reviews::ReviewService;
