//! 执行器模块
//!
//! 负责单笔兑换的完整流水线：读储备 -> 报价 -> 构建交易 -> 签名 -> 广播

pub mod locks;
pub mod swap;
pub mod types;

pub use locks::*;
pub use swap::*;
pub use types::*;
