//! 账本服务错误
//!
//! 业务错误原样传递给调用方；基础设施错误在包装处记录完整原因，
//! 对外只暴露通用失败信息

use crate::domain::{MinorUnits, WalletId};

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("wallet not found")]
    NotFound(WalletId),

    #[error("insufficient funds")]
    InsufficientFunds(WalletId),

    #[error("balance limit exceeded")]
    BalanceLimitExceeded(WalletId),

    #[error("amount must be greater than zero, got {0}")]
    InvalidAmount(MinorUnits),

    #[error("unsupported operation type: {0}")]
    UnsupportedOperation(String),

    #[error("service create wallet error")]
    CreationFailed,

    #[error("wallet service lookup error")]
    LookupFailed,

    #[error("wallet service transaction error")]
    TransactionFailed,
}

impl LedgerError {
    /// 是否为调用方可据此分支处理的业务错误（而非基础设施故障）
    pub fn is_domain(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_)
                | Self::InsufficientFunds(_)
                | Self::BalanceLimitExceeded(_)
                | Self::InvalidAmount(_)
                | Self::UnsupportedOperation(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    #[test]
    fn test_is_domain() {
        assert!(LedgerError::NotFound(Uuid::nil()).is_domain());
        assert!(LedgerError::InsufficientFunds(Uuid::nil()).is_domain());
        assert!(LedgerError::BalanceLimitExceeded(Uuid::nil()).is_domain());
        assert!(LedgerError::InvalidAmount(0).is_domain());
        assert!(LedgerError::UnsupportedOperation("TRANSFER".into()).is_domain());
        assert!(!LedgerError::CreationFailed.is_domain());
        assert!(!LedgerError::LookupFailed.is_domain());
        assert!(!LedgerError::TransactionFailed.is_domain());
    }

    #[test]
    fn test_infrastructure_messages_are_opaque() {
        assert_eq!(
            LedgerError::CreationFailed.to_string(),
            "service create wallet error"
        );
        assert_eq!(
            LedgerError::TransactionFailed.to_string(),
            "wallet service transaction error"
        );
    }
}
