//! 钱包账本服务
//!
//! 无状态：余额只存在于存储中，进程内不缓存任何余额

use std::{future::Future, sync::Arc, time::Duration};

use anyhow::anyhow;

use crate::{
    domain::{OperationKind, TransactionRequest, Wallet, WalletId},
    repository::{RepoError, RepoResult, WalletRepository},
    service::{context::RequestContext, error::LedgerError},
};

/// 单次存储操作的默认超时
pub const DEFAULT_OP_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct WalletLedgerService {
    repo: Arc<dyn WalletRepository>,
    op_timeout: Duration,
}

impl WalletLedgerService {
    pub fn new(repo: Arc<dyn WalletRepository>) -> Self {
        Self {
            repo,
            op_timeout: DEFAULT_OP_TIMEOUT,
        }
    }

    pub fn with_op_timeout(mut self, op_timeout: Duration) -> Self {
        self.op_timeout = op_timeout;
        self
    }

    /// 在截止时间内执行存储操作；超时视为存储故障（future 被丢弃，事务回滚）
    async fn within_deadline<T, F>(&self, ctx: &RequestContext, op: F) -> RepoResult<T>
    where
        F: Future<Output = RepoResult<T>>,
    {
        let deadline = ctx.effective_deadline(self.op_timeout);
        match tokio::time::timeout_at(deadline, op).await {
            Ok(result) => result,
            Err(_) => Err(RepoError::Store(anyhow!("store operation deadline exceeded"))),
        }
    }

    /// 创建钱包
    pub async fn create(&self, ctx: &RequestContext) -> Result<WalletId, LedgerError> {
        match self.within_deadline(ctx, self.repo.create()).await {
            Ok(wallet_id) => {
                tracing::info!(trace_id = %ctx.trace_id, wallet_id = %wallet_id, "Wallet created");
                Ok(wallet_id)
            }
            Err(e) => {
                tracing::error!(trace_id = %ctx.trace_id, error = %e, "Wallet creation failed");
                Err(LedgerError::CreationFailed)
            }
        }
    }

    /// 查询钱包余额
    pub async fn get_balance(
        &self,
        ctx: &RequestContext,
        wallet_id: WalletId,
    ) -> Result<Wallet, LedgerError> {
        match self
            .within_deadline(ctx, self.repo.get_balance(wallet_id))
            .await
        {
            Ok(balance) => Ok(Wallet::new(wallet_id, balance)),
            Err(RepoError::NotFound(id)) => Err(LedgerError::NotFound(id)),
            Err(e) => {
                tracing::error!(
                    trace_id = %ctx.trace_id,
                    wallet_id = %wallet_id,
                    error = %e,
                    "Wallet balance lookup failed"
                );
                Err(LedgerError::LookupFailed)
            }
        }
    }

    /// 执行充值/提现
    ///
    /// 金额与操作类型在触达存储之前校验；同一请求重复提交会被重复执行（无幂等键）
    pub async fn apply(
        &self,
        ctx: &RequestContext,
        req: &TransactionRequest,
    ) -> Result<Wallet, LedgerError> {
        if req.amount <= 0 {
            return Err(LedgerError::InvalidAmount(req.amount));
        }
        let kind = OperationKind::parse(&req.operation_type)
            .ok_or_else(|| LedgerError::UnsupportedOperation(req.operation_type.clone()))?;
        let delta = kind.signed_delta(req.amount);

        match self
            .within_deadline(ctx, self.repo.adjust_balance(req.wallet_id, delta))
            .await
        {
            Ok(balance) => {
                tracing::info!(
                    trace_id = %ctx.trace_id,
                    wallet_id = %req.wallet_id,
                    operation = %kind,
                    amount = req.amount,
                    balance,
                    "Wallet transaction applied"
                );
                Ok(Wallet::new(req.wallet_id, balance))
            }
            Err(RepoError::NotFound(id)) => Err(LedgerError::NotFound(id)),
            Err(RepoError::InsufficientFunds { wallet_id, .. }) => {
                tracing::info!(
                    trace_id = %ctx.trace_id,
                    wallet_id = %wallet_id,
                    amount = req.amount,
                    "Withdrawal rejected: insufficient funds"
                );
                Err(LedgerError::InsufficientFunds(wallet_id))
            }
            Err(RepoError::Overflow { wallet_id, .. }) => {
                tracing::info!(
                    trace_id = %ctx.trace_id,
                    wallet_id = %wallet_id,
                    amount = req.amount,
                    "Deposit rejected: balance limit exceeded"
                );
                Err(LedgerError::BalanceLimitExceeded(wallet_id))
            }
            Err(e) => {
                tracing::error!(
                    trace_id = %ctx.trace_id,
                    wallet_id = %req.wallet_id,
                    operation = %kind,
                    error = %e,
                    "Wallet transaction failed"
                );
                Err(LedgerError::TransactionFailed)
            }
        }
    }

    /// 存储是否可用
    pub async fn is_healthy(&self) -> bool {
        let ctx = RequestContext::background();
        match self.within_deadline(&ctx, self.repo.ping()).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Store health check failed");
                false
            }
        }
    }
}
