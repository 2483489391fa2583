//! 恒定乘积池 (Uniswap V1 交易所) 的报价与兑换网关
//!
//! - `strategy::amm`: 报价引擎，纯整数运算
//! - `core::executor`: 兑换流水线 (读储备 -> 报价 -> 构建交易 -> 签名 -> 广播)
//! - `chain`: 链上读写协作者
//! - `server`: HTTP 接口

pub mod chain;
pub mod core;
pub mod server;
pub mod strategy;
pub mod utils;
