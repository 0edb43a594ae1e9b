//! Wallet Ledger - 钱包余额账本服务
//!
//! 余额变更在存储层行锁内完成，任何时刻余额不为负

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod repository;
pub mod service;

// 重新导出常用类型
pub use app_state::AppState;
pub use error::{AppError, AppErrorCode};

pub mod prelude {
    pub use crate::{
        app_state::AppState,
        domain::{OperationKind, TransactionRequest, Wallet, WalletId},
        error::{AppError, AppErrorCode},
        repository::{InMemoryWalletRepository, PgWalletRepository, WalletRepository},
        service::{LedgerError, RequestContext, WalletLedgerService},
    };
}
