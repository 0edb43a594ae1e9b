//! 测试辅助模块
//! 提供测试工具和辅助函数
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use wallet_ledger::{
    api,
    app_state::AppState,
    config::Config,
    domain::{MinorUnits, OperationKind, TransactionRequest, WalletId},
    infrastructure::db::PgPool,
    repository::{InMemoryWalletRepository, WalletRepository},
    service::{RequestContext, WalletLedgerService},
};

/// 测试数据库URL
pub fn test_database_url() -> String {
    std::env::var("TEST_DATABASE_URL")
        .unwrap_or_else(|_| "postgres://postgres@localhost:5432/wallet_ledger_test".into())
}

/// 创建测试数据库连接池并执行迁移
pub async fn create_test_pool() -> PgPool {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(16)
        .connect(&test_database_url())
        .await
        .expect("Failed to create test database pool");
    wallet_ledger::infrastructure::db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

pub fn ctx() -> RequestContext {
    RequestContext::new("test")
}

/// 基于内存存储的账本服务
pub fn memory_service() -> (Arc<InMemoryWalletRepository>, WalletLedgerService) {
    let repo = Arc::new(InMemoryWalletRepository::new());
    let service = WalletLedgerService::new(repo.clone() as Arc<dyn WalletRepository>);
    (repo, service)
}

/// 基于内存存储的完整 HTTP 应用
pub fn memory_app() -> Router {
    let config = Arc::new(Config::from_env().expect("Failed to load config"));
    let state = AppState::with_repository(Arc::new(InMemoryWalletRepository::new()), None, config);
    api::routes(Arc::new(state))
}

pub fn deposit(wallet_id: WalletId, amount: MinorUnits) -> TransactionRequest {
    TransactionRequest::new(wallet_id, OperationKind::Deposit, amount)
}

pub fn withdraw(wallet_id: WalletId, amount: MinorUnits) -> TransactionRequest {
    TransactionRequest::new(wallet_id, OperationKind::Withdraw, amount)
}

/// 创建钱包并充值到指定余额
pub async fn funded_wallet(service: &WalletLedgerService, balance: MinorUnits) -> WalletId {
    let wallet_id = service.create(&ctx()).await.expect("create wallet");
    if balance > 0 {
        service
            .apply(&ctx(), &deposit(wallet_id, balance))
            .await
            .expect("fund wallet");
    }
    wallet_id
}
