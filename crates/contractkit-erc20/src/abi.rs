//! Solidity interfaces used by the ERC20 capability classes.

use alloy_sol_types::sol;

sol! {
    interface IERC20 {
        event Transfer(address indexed from, address indexed to, uint256 value);
        event Approval(address indexed owner, address indexed spender, uint256 value);

        function name() external view returns (string memory);
        function symbol() external view returns (string memory);
        function decimals() external view returns (uint8);
        function totalSupply() external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function transfer(address to, uint256 amount) external returns (bool);
        function approve(address spender, uint256 amount) external returns (bool);
        function transferFrom(address from, address to, uint256 amount) external returns (bool);
    }

    interface IMintableERC20 {
        event TokensMinted(address indexed mintedTo, uint256 quantityMinted);

        function mintTo(address to, uint256 amount) external;
    }

    interface IBurnableERC20 {
        function burn(uint256 amount) external;
        function burnFrom(address account, uint256 amount) external;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_sol_types::SolCall;
    use contractkit::features::erc20;

    #[test]
    fn test_bindings_match_fingerprints() {
        for signature in [
            IERC20::balanceOfCall::SIGNATURE,
            IERC20::totalSupplyCall::SIGNATURE,
            IERC20::transferCall::SIGNATURE,
            IERC20::allowanceCall::SIGNATURE,
            IERC20::approveCall::SIGNATURE,
            IERC20::transferFromCall::SIGNATURE,
            IERC20::decimalsCall::SIGNATURE,
        ] {
            assert!(erc20::BASE.functions.contains(&signature), "{signature}");
        }
        assert!(erc20::MINTABLE
            .functions
            .contains(&IMintableERC20::mintToCall::SIGNATURE));
        assert!(erc20::BURNABLE
            .functions
            .contains(&IBurnableERC20::burnFromCall::SIGNATURE));
    }
}
