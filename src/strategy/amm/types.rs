//! AMM计算相关类型定义

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::types::{Result, SwapError};

/// 手续费分子 (0.3% 手续费 => 997/1000)
pub const FEE_NUMERATOR: u64 = 997;
/// 手续费分母
pub const FEE_DENOMINATOR: u64 = 1000;

/// 每 1% 对应的定点单位数 (保留六位小数)
pub const SLIPPAGE_SCALE: u64 = 1_000_000;
/// 100% 对应的定点值
pub const FULL_SLIPPAGE: u64 = 100 * SLIPPAGE_SCALE;

/// 滑点容忍度，范围 [0, 100]%
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SlippageTolerance {
    micro_percent: u64,
}

impl SlippageTolerance {
    pub fn zero() -> Self {
        Self { micro_percent: 0 }
    }

    /// 从百分比构建，如 `2.5` 表示 2.5%
    pub fn from_percent(percent: f64) -> Result<Self> {
        if !percent.is_finite() || percent < 0.0 || percent > 100.0 {
            return Err(SwapError::InvalidParameter(format!(
                "slippage must be between 0 and 100 percent, got {}",
                percent
            )));
        }

        let micro_percent = (percent * SLIPPAGE_SCALE as f64).round() as u64;
        Self::from_micro_percent(micro_percent)
    }

    pub fn from_micro_percent(micro_percent: u64) -> Result<Self> {
        if micro_percent > FULL_SLIPPAGE {
            return Err(SwapError::InvalidParameter(format!(
                "slippage must not exceed 100 percent, got {} micro-percent",
                micro_percent
            )));
        }
        Ok(Self { micro_percent })
    }

    pub fn micro_percent(&self) -> u64 {
        self.micro_percent
    }

    pub fn as_percent(&self) -> f64 {
        self.micro_percent as f64 / SLIPPAGE_SCALE as f64
    }
}

impl fmt::Display for SlippageTolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percent())
    }
}

/// 滑点下限的取整规则
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlippageRounding {
    /// 对滑点扣减量向下取整: `out - floor(out * s / 100)`
    #[default]
    FloorSlippage,
    /// 对结果向下取整: `floor(out * (100 - s) / 100)`
    FloorResult,
}

impl FromStr for SlippageRounding {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "slippage" | "floor_slippage" => Ok(SlippageRounding::FloorSlippage),
            "result" | "floor_result" => Ok(SlippageRounding::FloorResult),
            other => Err(format!("unknown slippage rounding mode: {}", other)),
        }
    }
}

impl fmt::Display for SlippageRounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlippageRounding::FloorSlippage => write!(f, "slippage"),
            SlippageRounding::FloorResult => write!(f, "result"),
        }
    }
}
