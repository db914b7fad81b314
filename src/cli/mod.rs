use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::application::WalletService;
use crate::config::{self, Config};
use crate::domain::{AmountInput, Wallet, WalletId, parse_wallet_id};
use crate::http::{AppState, create_router};
use crate::logging::init_logging;
use crate::storage::SqlWalletStore;

/// Wallet Ledger - balances with guarded deposits and withdrawals
#[derive(Parser)]
#[command(name = "wallet-ledger")]
#[command(about = "A minimal wallet ledger: read balances, deposit and withdraw")]
#[command(version)]
pub struct Cli {
    /// SQLite database file (omit to use the PostgreSQL settings from the environment)
    #[arg(short, long, global = true)]
    pub database: Option<String>,

    /// Environment file to load before reading configuration [default: config.env]
    #[arg(long, global = true)]
    pub env_file: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the HTTP API
    Serve {
        /// Listen port (overrides API_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Create the wallets table if it doesn't exist
    Init,

    /// Create a wallet with an opening balance
    Create {
        /// Wallet id (positive integer)
        id: String,

        /// Opening balance in the smallest currency unit
        #[arg(short, long, default_value = "0")]
        balance: i64,
    },

    /// Show a wallet's balance
    Balance {
        /// Wallet id
        id: String,
    },

    /// Add funds to a wallet
    Deposit {
        /// Wallet id
        id: String,

        /// Amount in the smallest currency unit
        amount: String,
    },

    /// Remove funds from a wallet, refusing to overdraw it
    Withdraw {
        /// Wallet id
        id: String,

        /// Amount in the smallest currency unit
        amount: String,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        config::load_env_file(self.env_file.as_deref())?;
        init_logging(self.verbose);
        let config = Config::from_env().context("Invalid configuration")?;

        let backend = config
            .store_backend(self.database.as_deref())
            .context("Invalid database configuration")?;
        let store = SqlWalletStore::open(&backend).await?;

        match self.command {
            Commands::Serve { port } => {
                let port = port.unwrap_or(config.api_port);
                serve(WalletService::new(Arc::new(store)), port).await?;
            }

            Commands::Init => {
                store.migrate().await?;
                println!("Database initialized");
            }

            Commands::Create { id, balance } => {
                let id = wallet_id(&id)?;
                let wallet = store.create_wallet(id, balance).await?;
                println!("Created wallet {}", format_wallet(&wallet));
            }

            Commands::Balance { id } => {
                let service = WalletService::new(Arc::new(store));
                let wallet = service.get_wallet(wallet_id(&id)?).await?;
                println!("{}", format_wallet(&wallet));
            }

            Commands::Deposit { id, amount } => {
                let service = WalletService::new(Arc::new(store));
                let wallet = service
                    .deposit(wallet_id(&id)?, AmountInput::from(amount))
                    .await?;
                println!("Deposited. {}", format_wallet(&wallet));
            }

            Commands::Withdraw { id, amount } => {
                let service = WalletService::new(Arc::new(store));
                let wallet = service
                    .withdraw(wallet_id(&id)?, AmountInput::from(amount))
                    .await?;
                println!("Withdrew. {}", format_wallet(&wallet));
            }
        }

        Ok(())
    }
}

async fn serve(service: WalletService, port: u16) -> Result<()> {
    let app = create_router(AppState::new(service));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Server is running on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    wait_for_shutdown(tokio::signal::ctrl_c()).await
}

/// Resolve once `signal` fires. A signal handler that cannot be installed
/// never requests shutdown; the server keeps running until it is killed.
async fn wait_for_shutdown<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await
        }
    }
}

fn wallet_id(input: &str) -> Result<WalletId> {
    parse_wallet_id(input)
        .with_context(|| format!("Invalid wallet id '{}'. Use a positive integer", input))
}

fn format_wallet(wallet: &Wallet) -> String {
    format!("Wallet {}: balance {}", wallet.id, wallet.balance)
}
