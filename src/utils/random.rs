//! 装饰性随机数

use rand::Rng;

pub const DECORATIVE_MIN: f64 = 0.343;
pub const DECORATIVE_MAX: f64 = 0.5334;

/// `[0.343, 0.5334]` 内的均匀随机数，保留四位小数
pub fn decorative_value() -> f64 {
    let value = rand::thread_rng().gen_range(DECORATIVE_MIN..=DECORATIVE_MAX);
    (value * 10_000.0).round() / 10_000.0
}
