//! Domain 模块
//!
//! 钱包账本的领域模型：钱包快照、金额单位、操作类型

pub mod operation;
pub mod wallet;

// 重新导出常用类型
pub use operation::{OperationKind, TransactionRequest};
pub use wallet::{from_minor_units, to_minor_units, MinorUnits, Wallet, WalletId, MINOR_UNIT_SCALE};
