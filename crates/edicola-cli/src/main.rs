//! Edicola CLI - storefront client for the magazine contract
//!
//! Connects a configured signer to the storefront contract, resolves its
//! role, and exposes the catalog, purchase, subscription, administrative,
//! and treasury operations.
//!
//! # Quick start
//!
//! ```bash
//! export EDICOLA_RPC_URL=http://localhost:8545
//! export EDICOLA_CONTRACT_ADDRESS=0x...
//! export EDICOLA_STORE_URL=https://store-magazine.example.app
//! export EDICOLA_SIGNER=0x...
//!
//! edicola status
//! edicola catalog
//! edicola buy 0x...
//! edicola search --month 12 --year 2024 --mine
//! ```

use clap::{Parser, Subcommand};
use edicola_types::Address;

mod app;
mod commands;
mod display;

use app::{App, Config};

/// Edicola - blockchain magazine storefront client
#[derive(Parser)]
#[command(name = "edicola")]
#[command(version)]
#[command(about = "Browse, buy, and manage on-chain magazine issues", long_about = None)]
struct Cli {
    /// Wallet-backed JSON-RPC endpoint
    #[arg(long, global = true, env = "EDICOLA_RPC_URL", default_value = "http://localhost:8545")]
    rpc_url: String,

    /// Deployed storefront contract address
    #[arg(long, global = true, env = "EDICOLA_CONTRACT_ADDRESS")]
    contract: String,

    /// Content store base URL
    #[arg(long, global = true, env = "EDICOLA_STORE_URL")]
    store_url: String,

    /// Content gateway base URL for resolving pointers
    #[arg(long, global = true, env = "EDICOLA_GATEWAY_URL", default_value = "https://ipfs.io/ipfs")]
    gateway_url: String,

    /// First catalog index to read, bounding reads as the catalog grows
    #[arg(long, global = true, env = "EDICOLA_CATALOG_OFFSET", default_value = "0")]
    catalog_offset: u64,

    /// Signer address held by the wallet-backed endpoint
    #[arg(long, global = true, env = "EDICOLA_SIGNER")]
    signer: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show session, role, and contract status
    Status,

    /// Show the catalog for the current role
    Catalog,

    /// Search released issues by month and/or ownership
    Search {
        /// Month to filter by (1-12), with --year
        #[arg(long)]
        month: Option<u32>,
        /// Year to filter by, with --month
        #[arg(long)]
        year: Option<i32>,
        /// Restrict to issues the signer owns
        #[arg(long)]
        mine: bool,
    },

    /// Buy a single issue at the current price
    Buy {
        /// Magazine address
        magazine: String,
    },

    /// Start an annual subscription
    Subscribe,

    /// Revoke the active subscription
    Revoke,

    /// Donate to the contract treasury (amount in wei)
    Donate { amount: u128 },

    /// Create a new magazine (administrator)
    New {
        /// Magazine title
        title: String,
    },

    /// Release a magazine and publish its content (administrator)
    Release {
        /// Magazine address
        magazine: String,
    },

    /// Grant the administrator role (owner)
    AddAdmin {
        /// Address to promote
        address: String,
    },

    /// Withdraw from the treasury (owner, amount in wei)
    Withdraw { amount: u128 },

    /// Split the treasury among the collaborator set (owner)
    SplitProfit,

    /// Stream reconciled contract events
    Watch,
}

impl Commands {
    /// Action label used when reporting a failure
    fn action(&self) -> &'static str {
        match self {
            Commands::Status => "reading contract data",
            Commands::Catalog => "loading the catalog",
            Commands::Search { .. } => "searching magazines",
            Commands::Buy { .. } => "buying the issue",
            Commands::Subscribe => "subscribing",
            Commands::Revoke => "revoking the subscription",
            Commands::Donate { .. } => "donating",
            Commands::New { .. } => "creating the magazine",
            Commands::Release { .. } => "releasing the magazine",
            Commands::AddAdmin { .. } => "adding the administrator",
            Commands::Withdraw { .. } => "withdrawing",
            Commands::SplitProfit => "splitting profit",
            Commands::Watch => "watching events",
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "edicola=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = Config {
        rpc_url: cli.rpc_url.clone(),
        contract_address: Address::parse(&cli.contract)?,
        store_url: cli.store_url.clone(),
        gateway_url: cli.gateway_url.clone(),
        catalog_offset: cli.catalog_offset,
        signer: cli.signer.as_deref().map(Address::parse).transpose()?,
    };

    let mut app = App::connect(config).await?;
    let outcome = match &cli.command {
        Commands::Status => commands::status::run(&app).await,
        Commands::Catalog => commands::catalog::run(&app).await,
        Commands::Search { month, year, mine } => {
            commands::search::run(&app, *month, *year, *mine).await
        }
        Commands::Buy { magazine } => commands::market::buy(&mut app, magazine).await,
        Commands::Subscribe => commands::market::subscribe(&mut app).await,
        Commands::Revoke => commands::market::revoke(&mut app).await,
        Commands::Donate { amount } => commands::market::donate(&mut app, *amount).await,
        Commands::New { title } => commands::admin::new_magazine(&mut app, title).await,
        Commands::Release { magazine } => commands::admin::release(&mut app, magazine).await,
        Commands::AddAdmin { address } => commands::owner::add_admin(&mut app, address).await,
        Commands::Withdraw { amount } => commands::owner::withdraw(&mut app, *amount).await,
        Commands::SplitProfit => commands::owner::split_profit(&mut app).await,
        Commands::Watch => commands::watch::run(&app).await,
    };

    if let Err(err) = outcome {
        display::action_failed(cli.command.action(), &err);
        if !err.is_silent() {
            std::process::exit(1);
        }
    }
    Ok(())
}
