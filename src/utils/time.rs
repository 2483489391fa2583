//! 时间工具

use chrono::Utc;
use ethers::types::U256;

/// 获取当前UTC时间戳（秒）
pub fn current_timestamp() -> u64 {
    Utc::now().timestamp() as u64
}

/// 兑换截止时间：当前时间 + 窗口秒数
pub fn swap_deadline(window_secs: u64) -> U256 {
    U256::from(current_timestamp().saturating_add(window_secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration as StdDuration;

    #[test]
    fn test_current_timestamp() {
        let ts1 = current_timestamp();
        thread::sleep(StdDuration::from_millis(100));
        let ts2 = current_timestamp();

        assert!(ts2 >= ts1);
        assert!(ts2 - ts1 <= 1);
    }

    #[test]
    fn test_swap_deadline_window() {
        let before = current_timestamp();
        let deadline = swap_deadline(60).as_u64();
        let after = current_timestamp();

        assert!(deadline >= before + 60);
        assert!(deadline <= after + 60);
    }
}
