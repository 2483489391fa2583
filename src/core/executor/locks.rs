//! 按发送地址串行化兑换

use ethers::types::Address;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// 每个发送地址一把异步锁
///
/// 持锁期间完成 nonce 读取到广播，同一地址的并发请求依次读取 nonce
#[derive(Debug, Default)]
pub struct SenderLocks {
    locks: Mutex<HashMap<Address, Arc<AsyncMutex<()>>>>,
}

impl SenderLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取某地址的锁，返回的guard释放前其它同地址请求等待
    pub async fn acquire(&self, sender: Address) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            // 只有map自己持有的条目已无人使用
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks.entry(sender).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// 当前跟踪的地址数
    pub fn tracked(&self) -> usize {
        self.locks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}
