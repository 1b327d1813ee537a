//! Command line configuration for the contractkit CLI

use std::path::PathBuf;

use alloy_primitives::Address;
use clap::{Args, Parser, Subcommand};
use contractkit_common::DEFAULT_IPFS_GATEWAY;

/// Inspect and read ERC token contracts
///
/// # Examples
///
/// ```bash
/// # Which extensions does this ABI implement?
/// contractkit detect --abi ./artifacts/Drop.json
///
/// # First page of an NFT collection
/// contractkit nft --rpc-url https://polygon-rpc.com --address 0x... --abi ./Drop.json all
///
/// # Addresses of the deployed infrastructure on Polygon
/// contractkit addresses --chain-id 137
/// ```
#[derive(Parser, Debug)]
#[command(name = "contractkit")]
#[command(about = "Inspect and read ERC token contracts", long_about = None)]
pub struct Config {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Report the extensions an ABI implements
    Detect {
        /// ABI JSON file (a bare ABI array or a compiler artifact)
        #[arg(long)]
        abi: PathBuf,
    },

    /// Read an ERC721 contract
    Nft {
        #[command(flatten)]
        contract: ContractArgs,

        /// IPFS gateway used to download token metadata
        #[arg(long, env = "CONTRACTKIT_IPFS_GATEWAY", default_value = DEFAULT_IPFS_GATEWAY)]
        ipfs_gateway: String,

        #[command(subcommand)]
        query: NftQuery,
    },

    /// Read an ERC20 contract
    Token {
        #[command(flatten)]
        contract: ContractArgs,

        #[command(subcommand)]
        query: TokenQuery,
    },

    /// Dump the per-network address book
    ///
    /// The local network (chain 31337) reads `factoryAddress` and
    /// `registryAddress` from the environment.
    Addresses {
        /// Only print this chain
        #[arg(long)]
        chain_id: Option<u64>,
    },

    /// Validate an SDK options document and print it with defaults applied
    ValidateOptions {
        /// Options JSON file
        path: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct ContractArgs {
    /// JSON-RPC endpoint
    ///
    /// Falls back to `readonlySettings.rpcUrl` of the options document.
    #[arg(long, env = "CONTRACTKIT_RPC_URL")]
    pub rpc_url: Option<String>,

    /// SDK options document (gas settings, read-only RPC)
    #[arg(long, env = "CONTRACTKIT_OPTIONS")]
    pub options: Option<PathBuf>,

    /// Contract address
    #[arg(long)]
    pub address: Address,

    /// ABI JSON file of the contract
    #[arg(long)]
    pub abi: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum NftQuery {
    /// Metadata and owner of one token
    Get {
        token_id: u64,
    },
    /// A window of tokens (default: the first 100)
    All {
        #[arg(long, default_value = "0")]
        start: u64,
        #[arg(long, default_value = "100")]
        count: u64,
    },
    /// Number of tokens minted so far
    TotalCount,
    /// Token count owned by a wallet
    BalanceOf {
        owner: Address,
    },
}

#[derive(Subcommand, Debug)]
pub enum TokenQuery {
    /// Name, symbol and decimals
    Get,
    /// Balance of a wallet
    BalanceOf {
        owner: Address,
    },
    /// Total supply
    TotalSupply,
}

