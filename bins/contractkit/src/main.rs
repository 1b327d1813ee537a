//! contractkit - command line access to ERC token contracts
//!
//! # Usage
//!
//! ```bash
//! # Extensions declared by an ABI
//! contractkit detect --abi ./Drop.json
//!
//! # Token 3 of a collection, with its owner
//! contractkit nft --rpc-url https://polygon-rpc.com --address 0x... --abi ./Drop.json get 3
//!
//! # Balance of a wallet in an ERC20 token
//! contractkit token --rpc-url https://polygon-rpc.com --address 0x... --abi ./Token.json balance-of 0x...
//!
//! # Check an options document before shipping it
//! contractkit validate-options ./sdk-options.json
//! ```

mod config;

use std::path::Path;
use std::sync::Arc;

use alloy_primitives::U256;
use anyhow::{Context, Result};
use clap::Parser;
use config::{Command, Config, ContractArgs, NftQuery, TokenQuery};
use contractkit::{
    detect_features, features, AddressBook, ChainId, ContractInterface, ContractWrapper,
    ProviderTransport, QueryAllParams, SdkOptions,
};
use contractkit_common::{IpfsStorage, DEFAULT_IPFS_API};
use contractkit_erc20::Erc20;
use contractkit_erc721::Erc721;
use serde::Serialize;

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::parse();
    match config.command {
        Command::Detect { abi } => detect(&abi),
        Command::Nft {
            contract,
            ipfs_gateway,
            query,
        } => nft(&contract, &ipfs_gateway, query).await,
        Command::Token { contract, query } => token(&contract, query).await,
        Command::Addresses { chain_id } => addresses(chain_id),
        Command::ValidateOptions { path } => validate_options(&path),
    }
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn load_interface(path: &Path) -> Result<ContractInterface> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read ABI {}", path.display()))?;
    ContractInterface::from_abi_json(&json)
        .with_context(|| format!("Invalid ABI in {}", path.display()))
}

/// Build a read-only contract handle from the CLI arguments.
fn connect(args: &ContractArgs) -> Result<ContractWrapper> {
    let options = match &args.options {
        Some(path) => SdkOptions::from_file(path)
            .with_context(|| format!("Invalid options document {}", path.display()))?,
        None => SdkOptions::default(),
    };

    let rpc_url = args
        .rpc_url
        .clone()
        .or_else(|| {
            options
                .readonly_settings
                .as_ref()
                .map(|settings| settings.rpc_url.clone())
        })
        .context("No RPC URL: pass --rpc-url or set readonlySettings.rpcUrl")?;

    let transport = ProviderTransport::read_only(&rpc_url, options.gas_settings)
        .with_context(|| format!("Failed to connect to {rpc_url}"))?;
    let interface = load_interface(&args.abi)?;

    tracing::info!(
        target: "contractkit_cli",
        address = %args.address,
        functions = interface.len(),
        "Loaded contract"
    );
    Ok(ContractWrapper::new(
        args.address,
        interface,
        Arc::new(transport),
    ))
}

fn detect(abi: &Path) -> Result<()> {
    let interface = load_interface(abi)?;
    let detected = detect_features(&interface, features::ALL);
    tracing::info!(
        target: "contractkit_cli",
        functions = interface.len(),
        features = detected.len(),
        "Detected features"
    );
    print_json(&serde_json::json!({
        "functions": interface.len(),
        "features": detected,
    }))
}

async fn nft(args: &ContractArgs, ipfs_gateway: &str, query: NftQuery) -> Result<()> {
    let storage =
        IpfsStorage::new(DEFAULT_IPFS_API, ipfs_gateway).context("Invalid IPFS gateway")?;
    let nft = Erc721::new(connect(args)?, Arc::new(storage));

    match query {
        NftQuery::Get { token_id } => {
            let token = nft
                .get(U256::from(token_id))
                .await
                .with_context(|| format!("Failed to read token {token_id}"))?;
            print_json(&token)
        }
        NftQuery::All { start, count } => {
            let tokens = nft
                .get_all(Some(QueryAllParams::new(start, count)))
                .await
                .context("Failed to read tokens")?;
            print_json(&tokens)
        }
        NftQuery::TotalCount => {
            let total = nft.total_count().await.context("Failed to read token count")?;
            print_json(&serde_json::json!({ "totalCount": total.to_string() }))
        }
        NftQuery::BalanceOf { owner } => {
            let balance = nft
                .balance_of(owner)
                .await
                .with_context(|| format!("Failed to read balance of {owner}"))?;
            print_json(&serde_json::json!({ "owner": owner, "balance": balance.to_string() }))
        }
    }
}

async fn token(args: &ContractArgs, query: TokenQuery) -> Result<()> {
    let token = Erc20::new(connect(args)?);

    match query {
        TokenQuery::Get => print_json(&token.get().await.context("Failed to read currency")?),
        TokenQuery::BalanceOf { owner } => print_json(
            &token
                .balance_of(owner)
                .await
                .with_context(|| format!("Failed to read balance of {owner}"))?,
        ),
        TokenQuery::TotalSupply => print_json(
            &token
                .total_supply()
                .await
                .context("Failed to read total supply")?,
        ),
    }
}

fn addresses(chain_id: Option<u64>) -> Result<()> {
    let book = AddressBook::from_env().context("Invalid address override in environment")?;

    let chain_ids = match chain_id {
        Some(id) => vec![id],
        None => book.chain_ids(),
    };

    let mut chains = serde_json::Map::new();
    for id in chain_ids {
        let addresses = book.addresses(id)?;
        let name = ChainId::try_from(id).map_or_else(|_| id.to_string(), |chain| format!("{chain:?}"));
        let mut entry = serde_json::to_value(addresses)?;
        entry["chainId"] = serde_json::json!(id);
        chains.insert(name, entry);
    }

    print_json(&serde_json::json!({
        "contractPublisher": book.contract_publisher(),
        "chains": chains,
    }))
}

fn validate_options(path: &Path) -> Result<()> {
    let options = SdkOptions::from_file(path)
        .with_context(|| format!("Invalid options document {}", path.display()))?;
    tracing::info!(target: "contractkit_cli", path = %path.display(), "Options are valid");
    print_json(&options)
}
