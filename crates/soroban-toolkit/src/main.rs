use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use soroban_toolkit::account::{airdrop_account, get_token_balance};
use soroban_toolkit::managers::{
    bump_contract_code, bump_contract_instance, deploy_contract, deploy_soroban_token,
    install_contract, invoke_custom_contract, TransactionOutcome,
};
use soroban_toolkit::utils::crypto::decode_hash_hex;
use soroban_toolkit::utils::scval::{decode_contract_id, parse_typed_arg};
use soroban_toolkit::{
    create_toolkit, Keypair, SorobanToolkit, ToolkitConfig, ToolkitOptions, Verbosity,
};

const DEFAULT_CONFIG_PATH: &str = "soroban-toolkit.toml";

#[derive(Parser)]
#[command(name = "soroban-toolkit")]
#[command(about = "Deploy and invoke Soroban contracts")]
#[command(version)]
pub struct Cli {
    /// Configuration file path (defaults to ./soroban-toolkit.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Network to operate on
    #[arg(short, long, default_value = "testnet")]
    pub network: String,

    /// Toolkit verbosity (none, some, full); overrides the config file
    #[arg(long)]
    pub verbose: Option<Verbosity>,

    /// Log level; derived from the verbosity when omitted
    #[arg(long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List configured networks
    Networks,
    /// Upload a contract WASM
    Install {
        /// Contract path key
        wasm_key: String,
        /// WASM file to upload instead of the configured path
        #[arg(long)]
        wasm: Option<PathBuf>,
    },
    /// Deploy an uploaded WASM
    Deploy {
        /// Address book key of the WASM hash
        wasm_key: String,
        /// Address book key for the new contract id
        contract_key: String,
        /// Constructor arguments as type:value
        args: Vec<String>,
    },
    /// Invoke a contract method
    Invoke {
        /// Contract id (C...) or address book key
        contract: String,
        /// Method name
        method: String,
        /// Method arguments as type:value
        args: Vec<String>,
        /// Only simulate
        #[arg(long)]
        simulate: bool,
    },
    /// Extend the TTL of a contract instance
    BumpInstance {
        /// Contract id (C...) or address book key
        contract: String,
    },
    /// Extend the TTL of uploaded contract code
    BumpCode {
        /// Hex WASM hash or address book key
        wasm: String,
    },
    /// Fund an account from the network faucet
    Airdrop {
        /// Account to fund (defaults to the admin)
        account: Option<String>,
    },
    /// Read a token balance
    Balance {
        /// Token contract id (C...) or address book key
        token: String,
        /// Owner address (defaults to the admin)
        owner: Option<String>,
    },
    /// Deploy a Soroban token
    DeployToken {
        name: String,
        symbol: String,
        #[arg(long, default_value_t = 7)]
        decimals: u32,
    },
    /// Show an account through Horizon
    Account {
        /// Account id (defaults to the admin)
        account: Option<String>,
    },
    /// Key utilities
    Keys {
        #[command(subcommand)]
        command: KeyCommands,
    },
}

#[derive(Subcommand)]
pub enum KeyCommands {
    /// Generate a random keypair
    Generate,
    /// Print the admin account id
    Admin,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(verbosity) = cli.verbose {
        config.verbosity = verbosity;
    }

    // Initialize logging
    let log_level = cli.log_level.clone().unwrap_or_else(|| match config.verbosity {
        Verbosity::Full => "debug".to_string(),
        _ => "info".to_string(),
    });
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("soroban_toolkit={}", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let factory = create_toolkit(ToolkitOptions::from_config(&config));

    match cli.command {
        Commands::Networks => {
            for network in factory.list_available_networks() {
                println!("{}", network);
            }
        }
        Commands::Keys { command: KeyCommands::Generate } => {
            let keypair = Keypair::random();
            println!("Public key: {}", keypair.public_key());
            println!("Secret key: {}", keypair.secret());
        }
        command => {
            let mut toolkit = factory.get_network_toolkit(&cli.network)?;
            info!("Using network {}", cli.network);
            run(&mut toolkit, command).await?;
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ToolkitConfig> {
    match path {
        Some(path) => {
            let config = ToolkitConfig::load(path)?;
            info!("Loaded configuration from: {}", path.display());
            Ok(config)
        }
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => ToolkitConfig::load(DEFAULT_CONFIG_PATH),
        None => Ok(ToolkitConfig::default()),
    }
}

async fn run(toolkit: &mut SorobanToolkit, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Install { wasm_key, wasm } => {
            let bytes = wasm.map(std::fs::read).transpose()?;
            let outcome = install_contract(toolkit, &wasm_key, bytes.as_deref(), None).await?;
            report(&outcome);
            println!("WASM hash: {}", toolkit.address_book().get_wasm_hash(&wasm_key)?);
        }
        Commands::Deploy { wasm_key, contract_key, args } => {
            let args = parse_args(&args)?;
            let contract_id = deploy_contract(toolkit, &wasm_key, &contract_key, args, None).await?;
            println!("Contract id: {}", contract_id);
        }
        Commands::Invoke { contract, method, args, simulate } => {
            let contract_id = resolve_contract_id(toolkit, &contract)?;
            let args = parse_args(&args)?;
            let outcome =
                invoke_custom_contract(toolkit, &contract_id, &method, args, simulate, None).await?;
            report(&outcome);
        }
        Commands::BumpInstance { contract } => {
            let contract_id = resolve_contract_id(toolkit, &contract)?;
            report(&bump_contract_instance(toolkit, &contract_id, None).await?);
        }
        Commands::BumpCode { wasm } => {
            let wasm_hash = if decode_hash_hex(&wasm).is_ok() {
                wasm
            } else {
                toolkit.address_book().get_wasm_hash(&wasm)?.to_string()
            };
            report(&bump_contract_code(toolkit, &wasm_hash, None).await?);
        }
        Commands::Airdrop { account } => {
            let account = account.unwrap_or_else(|| toolkit.admin().public_key());
            airdrop_account(toolkit, &account).await;
        }
        Commands::Balance { token, owner } => {
            let contract_id = resolve_contract_id(toolkit, &token)?;
            let owner = owner.unwrap_or_else(|| toolkit.admin().public_key());
            let balance = get_token_balance(toolkit, &contract_id, &owner, None).await?;
            println!("{}", balance);
        }
        Commands::DeployToken { name, symbol, decimals } => {
            let contract_id = deploy_soroban_token(toolkit, &name, &symbol, decimals, None).await?;
            println!("Token contract id: {}", contract_id);
        }
        Commands::Account { account } => {
            let account = account.unwrap_or_else(|| toolkit.admin().public_key());
            let details = toolkit.horizon().get_account(&account).await?;
            println!("Account: {}", details.id);
            println!("Sequence: {}", details.sequence);
            for balance in &details.balances {
                match &balance.asset_code {
                    Some(code) => println!("{} {}", balance.balance, code),
                    None => println!("{} XLM", balance.balance),
                }
            }
        }
        Commands::Keys { command: KeyCommands::Admin } => {
            println!("{}", toolkit.admin().public_key());
        }
        Commands::Networks | Commands::Keys { command: KeyCommands::Generate } => {}
    }

    Ok(())
}

fn parse_args(args: &[String]) -> anyhow::Result<Vec<stellar_xdr::curr::ScVal>> {
    Ok(args
        .iter()
        .map(|arg| parse_typed_arg(arg))
        .collect::<Result<Vec<_>, _>>()?)
}

/// Accept either a `C...` contract id or an address book key
fn resolve_contract_id(toolkit: &SorobanToolkit, contract: &str) -> anyhow::Result<String> {
    if decode_contract_id(contract).is_ok() {
        return Ok(contract.to_string());
    }
    Ok(toolkit.address_book().get_contract_id(contract)?.to_string())
}

fn report(outcome: &TransactionOutcome) {
    match outcome {
        TransactionOutcome::Simulated(simulation) => match simulation.result_value() {
            Ok(Some(value)) => println!("Result: {:?}", value),
            Ok(None) => println!("Simulation returned no value"),
            Err(e) => println!("Undecodable simulation result: {}", e),
        },
        TransactionOutcome::Submitted(submitted) => {
            println!("Transaction hash: {}", submitted.hash);
            match &submitted.final_status {
                Some(response) => println!("Status: {:?}", response.status),
                None => println!("Submission status: {:?}", submitted.send_status),
            }
        }
    }
}
