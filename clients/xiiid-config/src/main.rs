use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use solana_client::rpc_client::RpcClient;
use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey, signature::read_keypair_file};

use xiiid_config::config::{
    default_keypair_path, DEFAULT_CAP, DEFAULT_MINT, DEFAULT_PROGRAM_ID, DEFAULT_RPC_URL,
};
use xiiid_config::{
    fetch_config, ConfigInitializer, InitializerConfig, InitializerError, MintSource,
};

#[derive(Parser, Debug)]
#[command(name = "xiiid-config")]
#[command(about = "Initialize and inspect the xiiid-token-solana config account", long_about = None)]
struct Cli {
    /// Cluster RPC endpoint
    #[arg(long, env = "ANCHOR_PROVIDER_URL", default_value = DEFAULT_RPC_URL)]
    url: String,

    /// Signing keypair file; defaults to ~/.config/solana/id.json
    #[arg(long, env = "ANCHOR_WALLET")]
    keypair: Option<PathBuf>,

    /// Deployed program id
    #[arg(long, env = "PROGRAM_ID", default_value_t = DEFAULT_PROGRAM_ID)]
    program_id: Pubkey,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Send initialize_config and verify the stored account
    Init {
        /// Existing mint to record in the config
        #[arg(long, conflicts_with = "create_mint")]
        mint: Option<Pubkey>,

        /// Create a fresh 9-decimal mint owned by the payer
        #[arg(long)]
        create_mint: bool,

        /// Supply cap
        #[arg(long, default_value_t = DEFAULT_CAP)]
        cap: u128,
    },
    /// Print the decoded config account; needs no keypair
    Show,
    /// Print the config PDA and its bump
    Derive,
}

impl Cli {
    fn initializer_config(&self) -> InitializerConfig {
        let keypair_path = self
            .keypair
            .clone()
            .unwrap_or_else(|| default_keypair_path(std::env::var_os("HOME").map(PathBuf::from)));
        let config = InitializerConfig::new(&self.url, keypair_path).with_program_id(self.program_id);

        match &self.command {
            Command::Init {
                mint,
                create_mint,
                cap,
            } => {
                let source = if *create_mint {
                    MintSource::create()
                } else {
                    MintSource::Existing(mint.unwrap_or(DEFAULT_MINT))
                };
                config.with_mint(source).with_cap(*cap)
            }
            Command::Show | Command::Derive => config,
        }
    }
}

fn rpc_client(config: &InitializerConfig) -> RpcClient {
    info!("Connecting to {}", config.rpc_url);
    RpcClient::new_with_commitment(config.rpc_url.clone(), CommitmentConfig::confirmed())
}

fn connect(config: &InitializerConfig) -> Result<ConfigInitializer<RpcClient>> {
    let payer = read_keypair_file(&config.keypair_path).map_err(|err| InitializerError::Keypair {
        path: config.keypair_path.display().to_string(),
        reason: err.to_string(),
    })?;
    Ok(ConfigInitializer::new(rpc_client(config), payer, config.program_id))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = cli.initializer_config();

    match cli.command {
        Command::Init { .. } => {
            let initializer = connect(&config)?;
            let outcome = initializer
                .run(config.mint, config.cap)
                .context("initialize_config failed")?;
            println!("initialize_config tx: {}", outcome.signature);
            println!("programId: {}", config.program_id);
            println!("configPda: {}", outcome.config.address);
            println!("mint: {}", outcome.mint);
            println!("cap: {}", outcome.record.cap);
        }
        Command::Show => {
            let client = rpc_client(&config);
            let derived = xiiid_config::derive_config_address(&config.program_id)?;
            let record = fetch_config(&client, &config.program_id, &derived)
                .with_context(|| format!("failed to read config {}", derived.address))?;
            println!("configPda: {}", derived.address);
            println!("owner: {}", record.owner);
            println!("mint: {}", record.mint);
            println!("cap: {}", record.cap);
            println!("bump: {}", record.bump);
        }
        Command::Derive => {
            let derived = xiiid_config::derive_config_address(&config.program_id)?;
            println!("programId: {}", config.program_id);
            println!("configPda: {}", derived.address);
            println!("bump: {}", derived.bump);
        }
    }

    Ok(())
}
