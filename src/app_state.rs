use std::sync::Arc;

use crate::{
    config::{Config, StoreBackend},
    infrastructure::db::{self, PgPool},
    repository::{InMemoryWalletRepository, PgWalletRepository, WalletRepository},
    service::WalletLedgerService,
};

/// 应用状态
/// 包含所有共享资源
#[derive(Clone)]
pub struct AppState {
    pub wallets: Arc<WalletLedgerService>,
    /// Postgres 后端的连接池；内存后端为 None
    pub pool: Option<PgPool>,
    pub config: Arc<Config>,
}

impl AppState {
    /// 按配置选择存储后端并创建应用状态
    pub async fn new(config: Arc<Config>) -> anyhow::Result<Self> {
        match config.ledger.store {
            StoreBackend::Postgres => {
                let pool = db::init_pool(&config.database).await?;
                tracing::info!("✅ Database connected");

                if std::env::var("SKIP_MIGRATIONS").is_err() {
                    db::run_migrations(&pool).await?;
                    tracing::info!("✅ Database migrations completed");
                } else {
                    tracing::info!("⏭️ Database migrations skipped (SKIP_MIGRATIONS=1)");
                }

                let repo = PgWalletRepository::new(pool.clone())
                    .with_create_max_attempts(config.ledger.create_max_attempts);
                Ok(Self::with_repository(Arc::new(repo), Some(pool), config))
            }
            StoreBackend::Memory => {
                tracing::warn!("⚠️ Using in-memory wallet store, balances are lost on exit");
                Ok(Self::with_repository(
                    Arc::new(InMemoryWalletRepository::new()),
                    None,
                    config,
                ))
            }
        }
    }

    pub fn with_repository(
        repo: Arc<dyn WalletRepository>,
        pool: Option<PgPool>,
        config: Arc<Config>,
    ) -> Self {
        let wallets = WalletLedgerService::new(repo).with_op_timeout(config.ledger.op_timeout());
        Self {
            wallets: Arc::new(wallets),
            pool,
            config,
        }
    }

    /// 停机时释放共享资源
    pub async fn shutdown(&self) {
        if let Some(pool) = &self.pool {
            db::close_pool(pool).await;
        }
    }
}
