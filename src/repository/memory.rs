//! 进程内钱包存储
//!
//! 与 PostgreSQL 实现语义一致：每个钱包一把 Mutex 充当行锁，
//! 读-改-写在持锁期间完成。用于测试、基准测试以及 `LEDGER_STORE=memory` 本地运行。

use std::{
    collections::{hash_map::Entry, HashMap},
    sync::Arc,
};

use anyhow::anyhow;
use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use super::{apply_delta, RepoError, RepoResult, WalletRepository, DEFAULT_CREATE_MAX_ATTEMPTS};
use crate::domain::{MinorUnits, WalletId};

type Row = Arc<Mutex<MinorUnits>>;

#[derive(Default)]
pub struct InMemoryWalletRepository {
    wallets: RwLock<HashMap<WalletId, Row>>,
}

impl InMemoryWalletRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已创建钱包数量
    pub async fn len(&self) -> usize {
        self.wallets.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.wallets.read().await.is_empty()
    }

    async fn row(&self, wallet_id: WalletId) -> RepoResult<Row> {
        self.wallets
            .read()
            .await
            .get(&wallet_id)
            .cloned()
            .ok_or(RepoError::NotFound(wallet_id))
    }
}

#[async_trait]
impl WalletRepository for InMemoryWalletRepository {
    async fn create(&self) -> RepoResult<WalletId> {
        let mut wallets = self.wallets.write().await;
        for _ in 0..DEFAULT_CREATE_MAX_ATTEMPTS {
            if let Entry::Vacant(slot) = wallets.entry(Uuid::new_v4()) {
                let wallet_id = *slot.key();
                slot.insert(Arc::new(Mutex::new(0)));
                return Ok(wallet_id);
            }
        }
        Err(RepoError::Store(anyhow!(
            "could not allocate a unique wallet id after {} attempts",
            DEFAULT_CREATE_MAX_ATTEMPTS
        )))
    }

    async fn get_balance(&self, wallet_id: WalletId) -> RepoResult<MinorUnits> {
        let row = self.row(wallet_id).await?;
        let balance = *row.lock().await;
        Ok(balance)
    }

    async fn adjust_balance(
        &self,
        wallet_id: WalletId,
        delta: MinorUnits,
    ) -> RepoResult<MinorUnits> {
        let row = self.row(wallet_id).await?;
        let mut balance = row.lock().await;
        let next = apply_delta(wallet_id, *balance, delta)?;
        *balance = next;
        Ok(next)
    }

    async fn ping(&self) -> RepoResult<()> {
        Ok(())
    }
}
