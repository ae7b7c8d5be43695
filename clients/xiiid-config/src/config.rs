use std::path::PathBuf;

use solana_sdk::{pubkey, pubkey::Pubkey};

use crate::mint::MintSource;

/// Local validator endpoint used when no URL is given.
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8899";

/// Deployed `xiiid-token-solana` program.
pub const DEFAULT_PROGRAM_ID: Pubkey = pubkey!("J6fKvYJvvaZ1RvYYBMy7L7jpUaLkWUzzZXKEfr5UfBrr");

/// Mint used when the caller neither names one nor asks for a new one.
pub const DEFAULT_MINT: Pubkey = pubkey!("5Cb6V6EJyvEbfGBXZ9MmUqiNS3KrVnjudnBBL3KJLqu2");

pub const DEFAULT_CAP: u128 = 1_000_000_000_000;

/// Everything the initializer needs, resolved before any network call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitializerConfig {
    pub rpc_url: String,
    pub keypair_path: PathBuf,
    pub program_id: Pubkey,
    pub mint: MintSource,
    pub cap: u128,
}

impl InitializerConfig {
    pub fn new(rpc_url: impl Into<String>, keypair_path: impl Into<PathBuf>) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            keypair_path: keypair_path.into(),
            program_id: DEFAULT_PROGRAM_ID,
            mint: MintSource::Existing(DEFAULT_MINT),
            cap: DEFAULT_CAP,
        }
    }

    pub fn with_program_id(mut self, program_id: Pubkey) -> Self {
        self.program_id = program_id;
        self
    }

    pub fn with_mint(mut self, mint: MintSource) -> Self {
        self.mint = mint;
        self
    }

    pub fn with_cap(mut self, cap: u128) -> Self {
        self.cap = cap;
        self
    }
}

/// `$HOME/.config/solana/id.json`, the Solana CLI's default wallet.
pub fn default_keypair_path(home: Option<PathBuf>) -> PathBuf {
    home.unwrap_or_default()
        .join(".config")
        .join("solana")
        .join("id.json")
}
