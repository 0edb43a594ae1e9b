//! 钱包操作类型与交易请求

use std::fmt;

use serde::{Deserialize, Serialize};

use super::wallet::{MinorUnits, WalletId};

/// 余额变更操作类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperationKind {
    /// 充值：余额增加
    Deposit,
    /// 提现：余额减少
    Withdraw,
}

impl OperationKind {
    /// 严格解析（大写，与请求协议一致）
    ///
    /// 未知类型返回 None，由服务层转换为 UnsupportedOperation，绝不静默成功
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "DEPOSIT" => Some(Self::Deposit),
            "WITHDRAW" => Some(Self::Withdraw),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deposit => "DEPOSIT",
            Self::Withdraw => "WITHDRAW",
        }
    }

    /// 带符号的余额变化量
    pub fn signed_delta(&self, amount: MinorUnits) -> MinorUnits {
        match self {
            Self::Deposit => amount,
            Self::Withdraw => -amount,
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 交易请求（请求边界产出的值对象，不持久化）
///
/// `operation_type` 保留原始字符串，由服务层做最终校验
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    pub wallet_id: WalletId,
    pub operation_type: String,
    pub amount: MinorUnits,
}

impl TransactionRequest {
    pub fn new(wallet_id: WalletId, kind: OperationKind, amount: MinorUnits) -> Self {
        Self {
            wallet_id,
            operation_type: kind.as_str().to_string(),
            amount,
        }
    }
}
