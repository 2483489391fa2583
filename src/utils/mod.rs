//! 通用工具模块

pub mod random;
pub mod time;
pub mod validation;

pub use random::*;
pub use time::*;
pub use validation::*;
