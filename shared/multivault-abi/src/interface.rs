//! Solidity ABI interface for the EthMultiVault functions this tooling touches.

use alloy_sol_types::sol;

sol! {
    /// Reduced EthMultiVault surface (transparent upgradeable proxy).
    interface IEthMultiVault {
        function count() external view returns (uint256);
        function getAtomCost() external view returns (uint256);

        function createAtom(bytes atomUri) external payable returns (uint256);
        function deployAtomWallet(uint256 atomId) external returns (address);

        // Timelocked admin surface.
        function scheduleOperation(bytes32 operationId, bytes data) external;
        function setExitFee(uint256 id, uint256 exitFee) external;
        function pause() external;
        function unpause() external;
    }
}
