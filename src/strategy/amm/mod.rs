//! AMM计算模块
//!
//! 恒定乘积池的报价与滑点保护计算，纯函数，无副作用

pub mod types;
pub mod uniswap_v1;

pub use types::*;
pub use uniswap_v1::*;
