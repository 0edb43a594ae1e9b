//! 钱包数据访问层
//!
//! Repository 负责把领域操作（创建、查询余额、原子调整余额）翻译为存储事务，
//! 并负责行锁纪律：同一钱包上的并发调整绝不丢失更新、绝不出现负余额。

use async_trait::async_trait;

use crate::domain::{MinorUnits, WalletId};

pub mod memory;
pub mod wallet_repository;

pub use memory::InMemoryWalletRepository;
pub use wallet_repository::PgWalletRepository;

/// 创建钱包时ID冲突的默认最大重试次数
pub const DEFAULT_CREATE_MAX_ATTEMPTS: u32 = 3;

/// Repository 错误
///
/// `NotFound` / `InsufficientFunds` 是预期的业务结果，`Store` 才是基础设施故障
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("wallet {0} not found")]
    NotFound(WalletId),

    #[error("insufficient funds in wallet {wallet_id}: balance {balance}, delta {delta}")]
    InsufficientFunds {
        wallet_id: WalletId,
        balance: MinorUnits,
        delta: MinorUnits,
    },

    #[error("balance overflow in wallet {wallet_id}: balance {balance}, delta {delta}")]
    Overflow {
        wallet_id: WalletId,
        balance: MinorUnits,
        delta: MinorUnits,
    },

    #[error("store error: {0:#}")]
    Store(anyhow::Error),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        Self::Store(anyhow::Error::new(err))
    }
}

pub type RepoResult<T> = Result<T, RepoError>;

// ============ Repository Trait ============

#[async_trait]
pub trait WalletRepository: Send + Sync {
    /// 创建余额为 0 的新钱包，返回新分配的ID
    async fn create(&self) -> RepoResult<WalletId>;

    /// 查询当前余额
    async fn get_balance(&self, wallet_id: WalletId) -> RepoResult<MinorUnits>;

    /// 在单个存储事务内原子调整余额，返回调整后的余额
    ///
    /// `delta` 为正表示充值，为负表示提现；结果为负时返回 `InsufficientFunds` 且不做任何修改
    async fn adjust_balance(&self, wallet_id: WalletId, delta: MinorUnits)
        -> RepoResult<MinorUnits>;

    /// 存储健康检查
    async fn ping(&self) -> RepoResult<()>;
}

/// 计算调整后的余额（加锁读取之后、写入之前调用）
pub(crate) fn apply_delta(
    wallet_id: WalletId,
    balance: MinorUnits,
    delta: MinorUnits,
) -> RepoResult<MinorUnits> {
    let next = balance.checked_add(delta).ok_or(RepoError::Overflow {
        wallet_id,
        balance,
        delta,
    })?;
    if next < 0 {
        return Err(RepoError::InsufficientFunds {
            wallet_id,
            balance,
            delta,
        });
    }
    Ok(next)
}
