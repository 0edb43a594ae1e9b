// 钱包数据访问 Repository（PostgreSQL 实现）

use anyhow::anyhow;
use async_trait::async_trait;
use uuid::Uuid;

use super::{apply_delta, RepoError, RepoResult, WalletRepository, DEFAULT_CREATE_MAX_ATTEMPTS};
use crate::{
    domain::{MinorUnits, WalletId},
    infrastructure::db::PgPool,
};

/// PostgreSQL unique_violation
const PG_UNIQUE_VIOLATION: &str = "23505";

pub struct PgWalletRepository {
    pool: PgPool,
    create_max_attempts: u32,
}

impl PgWalletRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            create_max_attempts: DEFAULT_CREATE_MAX_ATTEMPTS,
        }
    }

    pub fn with_create_max_attempts(mut self, attempts: u32) -> Self {
        self.create_max_attempts = attempts.max(1);
        self
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        if let Some(code) = db_err.code() {
            return code == PG_UNIQUE_VIOLATION;
        }
    }
    false
}

#[async_trait]
impl WalletRepository for PgWalletRepository {
    async fn create(&self) -> RepoResult<WalletId> {
        for attempt in 1..=self.create_max_attempts {
            let wallet_id = Uuid::new_v4();

            let result = sqlx::query("INSERT INTO wallets (id, balance) VALUES ($1, 0)")
                .bind(wallet_id)
                .execute(&self.pool)
                .await;

            match result {
                Ok(_) => return Ok(wallet_id),
                // ID冲突：重新生成ID后重试
                Err(e) if is_unique_violation(&e) => {
                    tracing::warn!(
                        wallet_id = %wallet_id,
                        attempt,
                        "Wallet id collision, regenerating"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(RepoError::Store(anyhow!(
            "could not allocate a unique wallet id after {} attempts",
            self.create_max_attempts
        )))
    }

    async fn get_balance(&self, wallet_id: WalletId) -> RepoResult<MinorUnits> {
        sqlx::query_scalar::<_, i64>("SELECT balance FROM wallets WHERE id = $1")
            .bind(wallet_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepoError::NotFound(wallet_id))
    }

    async fn adjust_balance(
        &self,
        wallet_id: WalletId,
        delta: MinorUnits,
    ) -> RepoResult<MinorUnits> {
        // 未提交的事务在 drop 时自动回滚（包括调用方取消/超时的情况）
        let mut tx = self.pool.begin().await?;

        // 行级排他锁：持有到 commit/rollback，同一钱包的读-改-写被串行化
        let current = sqlx::query_scalar::<_, i64>(
            "SELECT balance FROM wallets WHERE id = $1 FOR UPDATE",
        )
        .bind(wallet_id)
        .fetch_optional(&mut *tx)
        .await?;

        let next = match current {
            Some(current) => apply_delta(wallet_id, current, delta),
            None => Err(RepoError::NotFound(wallet_id)),
        };
        let next = match next {
            Ok(next) => next,
            Err(e) => {
                // 业务拒绝：不做任何修改；回滚失败不应掩盖业务结果
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::warn!(wallet_id = %wallet_id, error = %rollback_err, "Rollback failed");
                }
                return Err(e);
            }
        };

        sqlx::query("UPDATE wallets SET balance = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2")
            .bind(next)
            .bind(wallet_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(
            wallet_id = %wallet_id,
            delta,
            balance = next,
            "Wallet balance adjusted"
        );
        Ok(next)
    }

    async fn ping(&self) -> RepoResult<()> {
        crate::infrastructure::db::health_check(&self.pool).await?;
        Ok(())
    }
}
