//! 交易所合约绑定

use ethers::abi::AbiEncode;
use ethers::prelude::abigen;
use ethers::types::{Bytes, U256};

abigen!(
    UniswapV1Exchange,
    r#"[
        function getReserves() external view returns (uint112 reserve0, uint112 reserve1, uint32 blockTimestampLast)
        function ethToTokenSwapOutput(uint256 min_tokens, uint256 deadline) external payable
    ]"#
);

/// 编码 `ethToTokenSwapOutput(min_tokens, deadline)` 调用数据
pub fn encode_swap_payload(min_amount_out: U256, deadline: U256) -> Bytes {
    EthToTokenSwapOutputCall {
        min_tokens: min_amount_out,
        deadline,
    }
    .encode()
    .into()
}
