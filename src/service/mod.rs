pub mod context;
pub mod error;
pub mod wallets;

pub use context::RequestContext;
pub use error::LedgerError;
pub use wallets::WalletLedgerService;
