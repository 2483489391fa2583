//! Uniswap V1 交易所定价
//!
//! 与链上合约逐位一致的整数运算：向下取整，无四舍五入

use ethers::types::U256;

use super::types::{SlippageRounding, SlippageTolerance, FEE_DENOMINATOR, FEE_NUMERATOR, FULL_SLIPPAGE};
use crate::core::types::{PoolReserves, Result, SwapError, SwapQuote};

fn overflow(what: &str) -> SwapError {
    SwapError::InvalidParameter(format!("amount too large: {} overflows 256 bits", what))
}

/// 计算给定输入数量的输出数量
///
/// 公式: amount_out = (amount_in * 997 * reserve_out) / (reserve_in * 1000 + amount_in * 997)
pub fn get_output_amount(amount_in: U256, reserve_in: U256, reserve_out: U256) -> Result<U256> {
    PoolReserves::new(reserve_in, reserve_out).ensure_liquid()?;

    if amount_in.is_zero() {
        return Ok(U256::zero());
    }

    let amount_in_with_fee = amount_in
        .checked_mul(U256::from(FEE_NUMERATOR))
        .ok_or_else(|| overflow("amount_in * fee"))?;

    let numerator = amount_in_with_fee
        .checked_mul(reserve_out)
        .ok_or_else(|| overflow("numerator"))?;

    let denominator = reserve_in
        .checked_mul(U256::from(FEE_DENOMINATOR))
        .ok_or_else(|| overflow("reserve_in * 1000"))?
        .checked_add(amount_in_with_fee)
        .ok_or_else(|| overflow("denominator"))?;

    Ok(numerator / denominator)
}

/// 计算滑点后的最小接收量
pub fn calculate_min_amount_out(
    amount_out: U256,
    slippage: SlippageTolerance,
    rounding: SlippageRounding,
) -> Result<U256> {
    let full = U256::from(FULL_SLIPPAGE);
    let micro = U256::from(slippage.micro_percent());

    match rounding {
        SlippageRounding::FloorSlippage => {
            let slippage_amount = amount_out
                .checked_mul(micro)
                .ok_or_else(|| overflow("amount_out * slippage"))?
                / full;
            Ok(amount_out - slippage_amount)
        }
        SlippageRounding::FloorResult => {
            let kept = amount_out
                .checked_mul(full - micro)
                .ok_or_else(|| overflow("amount_out * (100 - slippage)"))?;
            Ok(kept / full)
        }
    }
}

/// 报价：输出数量与滑点下限
pub fn quote(
    amount_in: U256,
    reserves: &PoolReserves,
    slippage: SlippageTolerance,
    rounding: SlippageRounding,
) -> Result<SwapQuote> {
    let amount_out = get_output_amount(amount_in, reserves.reserve_in, reserves.reserve_out)?;
    let min_amount_out = calculate_min_amount_out(amount_out, slippage, rounding)?;

    Ok(SwapQuote {
        amount_out,
        min_amount_out,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ErrorKind;

    fn u(v: u64) -> U256 {
        U256::from(v)
    }

    fn pct(p: f64) -> SlippageTolerance {
        SlippageTolerance::from_percent(p).unwrap()
    }

    #[test]
    fn test_get_output_amount_reference_pool() {
        // floor(498500000000 / 1000997000)
        let out = get_output_amount(u(1_000), u(1_000_000), u(500_000)).unwrap();
        assert_eq!(out, u(498));
    }

    #[test]
    fn test_zero_input_yields_zero() {
        assert_eq!(get_output_amount(U256::zero(), u(1_000_000), u(500_000)).unwrap(), U256::zero());
        assert_eq!(get_output_amount(U256::zero(), u(1), u(1)).unwrap(), U256::zero());
    }

    #[test]
    fn test_degenerate_reserves() {
        for (r_in, r_out) in [(0, 500_000), (1_000_000, 0), (0, 0)] {
            let err = get_output_amount(u(1_000), u(r_in), u(r_out)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidPoolState);
        }
        // 零输入也不能掩盖池子状态异常
        let err = get_output_amount(U256::zero(), U256::zero(), u(10)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPoolState);
    }

    #[test]
    fn test_output_monotonic_and_bounded() {
        let reserve_in = u(1_000_000);
        let reserve_out = u(500_000);
        let mut previous = U256::zero();

        for exp in 0..30u32 {
            let amount_in = U256::from(3u64).pow(U256::from(exp));
            let out = get_output_amount(amount_in, reserve_in, reserve_out).unwrap();
            assert!(out >= previous, "not monotonic at 3^{}", exp);
            assert!(out < reserve_out, "pool drained at 3^{}", exp);
            previous = out;
        }
    }

    #[test]
    fn test_huge_input_never_drains_pool() {
        let out = get_output_amount(U256::from(u128::MAX), u(1), u(1_000_000)).unwrap();
        assert!(out < u(1_000_000));
    }

    #[test]
    fn test_overflow_is_invalid_parameter() {
        let err = get_output_amount(U256::MAX, u(1_000_000), u(500_000)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    }

    #[test]
    fn test_pure_function() {
        let a = get_output_amount(u(123_456), u(9_999_999), u(7_777_777)).unwrap();
        let b = get_output_amount(u(123_456), u(9_999_999), u(7_777_777)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_min_amount_out_floor_slippage() {
        // 498 - floor(9.96)
        let min = calculate_min_amount_out(u(498), pct(2.0), SlippageRounding::FloorSlippage).unwrap();
        assert_eq!(min, u(489));
    }

    #[test]
    fn test_min_amount_out_floor_result() {
        // floor(488.04)
        let min = calculate_min_amount_out(u(498), pct(2.0), SlippageRounding::FloorResult).unwrap();
        assert_eq!(min, u(488));
    }

    #[test]
    fn test_min_amount_out_bounds() {
        for rounding in [SlippageRounding::FloorSlippage, SlippageRounding::FloorResult] {
            assert_eq!(calculate_min_amount_out(u(498), pct(0.0), rounding).unwrap(), u(498));
            assert_eq!(calculate_min_amount_out(u(498), pct(100.0), rounding).unwrap(), U256::zero());
            assert_eq!(calculate_min_amount_out(U256::zero(), pct(5.0), rounding).unwrap(), U256::zero());
        }
    }

    #[test]
    fn test_min_amount_out_non_increasing_in_slippage() {
        let amount_out = u(987_654_321);
        for rounding in [SlippageRounding::FloorSlippage, SlippageRounding::FloorResult] {
            let mut previous = amount_out;
            for step in 0..=200u64 {
                let slippage = SlippageTolerance::from_micro_percent(step * 500_000).unwrap();
                let min = calculate_min_amount_out(amount_out, slippage, rounding).unwrap();
                assert!(min <= previous);
                assert!(min <= amount_out);
                previous = min;
            }
        }
    }

    #[test]
    fn test_quote_reference_scenario() {
        let reserves = PoolReserves::new(u(1_000_000), u(500_000));
        let quote = quote(u(1_000), &reserves, pct(2.0), SlippageRounding::FloorSlippage).unwrap();
        assert_eq!(quote.amount_out, u(498));
        assert_eq!(quote.min_amount_out, u(489));
    }
}
