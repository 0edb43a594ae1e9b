//! 钱包领域模型
//!
//! 余额一律以最小货币单位（分）的整数表示，避免浮点累加误差

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

/// 钱包ID：创建时随机生成（UUID v4，128位），不可变、不复用
pub type WalletId = Uuid;

/// 最小货币单位计数
pub type MinorUnits = i64;

/// 最小货币单位的小数位数（1 元 = 100 分）
pub const MINOR_UNIT_SCALE: u32 = 2;

/// 钱包快照（服务层返回给调用方的值对象）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Wallet {
    pub id: WalletId,
    pub balance: MinorUnits,
}

impl Wallet {
    pub fn new(id: WalletId, balance: MinorUnits) -> Self {
        Self { id, balance }
    }

    /// 余额的十进制表示（主单位，固定两位小数）
    pub fn balance_decimal(&self) -> Decimal {
        from_minor_units(self.balance)
    }
}

/// 将主单位金额精确转换为最小单位
///
/// 小数位超过 `MINOR_UNIT_SCALE` 或超出 i64 范围时返回 None（不做舍入）
pub fn to_minor_units(amount: Decimal) -> Option<MinorUnits> {
    let normalized = amount.normalize();
    if normalized.scale() > MINOR_UNIT_SCALE {
        return None;
    }
    let scaled = normalized.checked_mul(Decimal::from(10_i64.pow(MINOR_UNIT_SCALE)))?;
    i64::try_from(scaled).ok()
}

/// 最小单位 → 主单位（固定两位小数）
pub fn from_minor_units(units: MinorUnits) -> Decimal {
    Decimal::new(units, MINOR_UNIT_SCALE)
}
