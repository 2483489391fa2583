//! 链上协作者
//!
//! 读取池子状态、签名并广播交易。兑换流水线只依赖这里的trait

pub mod client;
pub mod contract;
pub mod traits;

pub use client::*;
pub use contract::*;
pub use traits::*;
